use thiserror::Error;

/// Errors that can occur during workbook operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Invalid workbook: {0}")]
    InvalidWorkbook(String),

    #[error("Sheet \"{name}\" not found in workbook")]
    SheetNotFound { name: String },

    #[error("Sheet already exists: {name}")]
    SheetAlreadyExists { name: String },

    #[error("Index out of bounds: row {row}, col {col}")]
    IndexOutOfBounds { row: u32, col: u32 },

    #[error("Image error: {0}")]
    Image(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

impl From<rust_xlsxwriter::XlsxError> for SheetError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        SheetError::Serialize(e.to_string())
    }
}

impl From<image::ImageError> for SheetError {
    fn from(e: image::ImageError) -> Self {
        SheetError::Image(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
