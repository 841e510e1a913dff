use crate::cell::{Cell, CellStyle, CellValue};
use crate::error::{Result, SheetError};
use crate::picture::SheetImage;
use std::collections::BTreeMap;

/// Largest row index a worksheet accepts (1-based).
pub const MAX_ROWS: u32 = 1_048_576;
/// Largest column index a worksheet accepts (1-based).
pub const MAX_COLS: u16 = 16_384;

/// A single named worksheet held in memory.
///
/// Cells are stored sparsely and addressed with 1-based `(row, col)`
/// indices, the same way spreadsheet applications number them. Row 1 is the
/// header row used by [`Worksheet::resolve_column`].
#[derive(Debug, Clone, Default)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(u32, u16), Cell>,
    column_widths: BTreeMap<u16, f64>,
    row_heights: BTreeMap<u32, f64>,
    images: Vec<SheetImage>,
}

impl Worksheet {
    /// Create a new empty worksheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Worksheet {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check whether the sheet holds no cells and no images
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.images.is_empty()
    }

    /// Highest column index that holds a cell in any row, 0 for an empty sheet.
    #[must_use]
    pub fn column_count(&self) -> u16 {
        self.cells.keys().map(|&(_, col)| col).max().unwrap_or(0)
    }

    /// Highest row index that holds a cell, 0 for an empty sheet.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.cells.keys().map(|&(row, _)| row).max().unwrap_or(0)
    }

    // ===== Cell Access =====

    /// Get a cell by 1-based position
    #[must_use]
    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Get a cell value by 1-based position
    #[must_use]
    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cell(row, col).map(|cell| &cell.value)
    }

    /// Set a cell value, keeping any style the cell already has.
    pub fn set_value(&mut self, row: u32, col: u16, value: CellValue) -> Result<()> {
        self.cell_mut(row, col)?.value = value;
        Ok(())
    }

    /// Replace the style of a cell, creating an empty cell if needed.
    pub fn set_style(&mut self, row: u32, col: u16, style: CellStyle) -> Result<()> {
        self.cell_mut(row, col)?.style = style;
        Ok(())
    }

    fn cell_mut(&mut self, row: u32, col: u16) -> Result<&mut Cell> {
        check_bounds(row, col)?;
        Ok(self.cells.entry((row, col)).or_default())
    }

    /// Iterate over all cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u16), &Cell)> {
        self.cells.iter().map(|(pos, cell)| (*pos, cell))
    }

    // ===== Dimensions =====

    /// Width of a column in character units, if one was set
    #[must_use]
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Set the width of a column, replacing any earlier width
    pub fn set_column_width(&mut self, col: u16, width: f64) -> Result<()> {
        check_bounds(1, col)?;
        self.column_widths.insert(col, width);
        Ok(())
    }

    /// Height of a row in points, if one was set
    #[must_use]
    pub fn row_height(&self, row: u32) -> Option<f64> {
        self.row_heights.get(&row).copied()
    }

    /// Set the height of a row, replacing any earlier height
    pub fn set_row_height(&mut self, row: u32, height: f64) -> Result<()> {
        check_bounds(row, 1)?;
        self.row_heights.insert(row, height);
        Ok(())
    }

    /// Explicit column widths in column order
    pub fn column_widths(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.column_widths.iter().map(|(col, width)| (*col, *width))
    }

    /// Explicit row heights in row order
    pub fn row_heights(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.row_heights.iter().map(|(row, height)| (*row, *height))
    }

    // ===== Images =====

    /// Images anchored in this sheet, in insertion order
    #[must_use]
    pub fn images(&self) -> &[SheetImage] {
        &self.images
    }

    pub(crate) fn push_image(&mut self, image: SheetImage) -> Result<()> {
        check_bounds(image.row, image.col)?;
        self.images.push(image);
        Ok(())
    }
}

fn check_bounds(row: u32, col: u16) -> Result<()> {
    if row == 0 || row > MAX_ROWS || col == 0 || col > MAX_COLS {
        return Err(SheetError::IndexOutOfBounds {
            row,
            col: u32::from(col),
        });
    }
    Ok(())
}
