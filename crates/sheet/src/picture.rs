//! Resizing images and anchoring them into worksheet cells.

use crate::error::{Result, SheetError};
use crate::sheet::Worksheet;
use image::imageops::FilterType;
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// Bounding box (in pixels) an inserted image is resized to fit.
pub const IMAGE_BOX_WIDTH: u32 = 700;
pub const IMAGE_BOX_HEIGHT: u32 = 467;
/// Column width forced on a column that receives an image.
pub const IMAGE_COLUMN_WIDTH: f64 = 100.0;
/// Row height (points) forced on a row that receives an image.
pub const IMAGE_ROW_HEIGHT: f64 = 350.0;

/// Image encodings that can be embedded in a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Canonical file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Gif => "gif",
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = SheetError;

    /// Parse an extension, case-insensitively. `jpg` is accepted as `jpeg`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" | "jpg" => Ok(ImageFormat::Jpeg),
            "gif" => Ok(ImageFormat::Gif),
            other => Err(SheetError::Image(format!(
                "Unsupported image extension: {other}"
            ))),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An image anchored at a single cell.
///
/// The image moves with its anchor cell but keeps its size when neighboring
/// rows or columns are resized.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetImage {
    pub row: u32,
    pub col: u16,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Displayed size in pixels.
    pub width: u32,
    pub height: u32,
}

/// Resize `bytes` to fit inside the image bounding box, keeping the aspect
/// ratio, and re-encode them as `format`.
pub fn fit_inside(bytes: &[u8], format: ImageFormat) -> Result<Vec<u8>> {
    let source = image::load_from_memory(bytes)?;
    let resized = source.resize(IMAGE_BOX_WIDTH, IMAGE_BOX_HEIGHT, FilterType::Lanczos3);
    tracing::debug!(
        from_width = source.width(),
        from_height = source.height(),
        width = resized.width(),
        height = resized.height(),
        "resized image"
    );

    // JPEG has no alpha channel; the GIF encoder only takes 8-bit color.
    let resized = match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(resized.to_rgb8()),
        ImageFormat::Gif => image::DynamicImage::ImageRgba8(resized.to_rgba8()),
        ImageFormat::Png => resized,
    };

    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format.codec())?;
    Ok(out.into_inner())
}

impl Worksheet {
    /// Resize an image and anchor it at the top-left of `(row, col)`.
    ///
    /// The image is displayed at the full bounding-box size. The target
    /// column width and row height are replaced so the picture is not
    /// clipped.
    pub fn insert_image(
        &mut self,
        row: u32,
        col: u16,
        bytes: &[u8],
        format: ImageFormat,
    ) -> Result<()> {
        let resized = fit_inside(bytes, format)?;
        self.push_image(SheetImage {
            row,
            col,
            bytes: resized,
            format,
            width: IMAGE_BOX_WIDTH,
            height: IMAGE_BOX_HEIGHT,
        })?;
        self.set_column_width(col, IMAGE_COLUMN_WIDTH)?;
        self.set_row_height(row, IMAGE_ROW_HEIGHT)?;
        tracing::debug!(sheet = self.name(), row, col, %format, "inserted image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, RgbaImage};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!("jpeg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(".gif".parse::<ImageFormat>().unwrap(), ImageFormat::Gif);
        assert!("bmp".parse::<ImageFormat>().is_err());
        assert_eq!(ImageFormat::Jpeg.to_string(), "jpeg");
    }

    #[test]
    fn test_fit_inside_keeps_aspect_ratio() {
        let resized = fit_inside(&png(1400, 700), ImageFormat::Png).unwrap();
        let img = image::load_from_memory(&resized).unwrap();
        assert_eq!(img.dimensions(), (700, 350));
    }

    #[test]
    fn test_fit_inside_tall_image() {
        let resized = fit_inside(&png(200, 934), ImageFormat::Png).unwrap();
        let img = image::load_from_memory(&resized).unwrap();
        assert!(img.width() <= IMAGE_BOX_WIDTH);
        assert_eq!(img.height(), IMAGE_BOX_HEIGHT);
    }

    #[test]
    fn test_fit_inside_reencodes_jpeg() {
        let resized = fit_inside(&png(100, 100), ImageFormat::Jpeg).unwrap();
        assert_eq!(
            image::guess_format(&resized).unwrap(),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn test_insert_image_sizes_row_and_column() {
        let mut sheet = Worksheet::with_name("Sheet1");
        sheet.set_column_width(2, 50.0).unwrap();
        sheet.insert_image(3, 2, &png(10, 10), ImageFormat::Png).unwrap();

        assert_eq!(sheet.column_width(2), Some(IMAGE_COLUMN_WIDTH));
        assert_eq!(sheet.row_height(3), Some(IMAGE_ROW_HEIGHT));
        let image = &sheet.images()[0];
        assert_eq!((image.row, image.col), (3, 2));
        assert_eq!((image.width, image.height), (IMAGE_BOX_WIDTH, IMAGE_BOX_HEIGHT));
    }

    #[test]
    fn test_insert_undecodable_image() {
        let mut sheet = Worksheet::with_name("Sheet1");
        let result = sheet.insert_image(2, 1, b"not an image", ImageFormat::Png);
        assert!(matches!(result, Err(SheetError::Image(_))));
        assert!(sheet.images().is_empty());
    }
}
