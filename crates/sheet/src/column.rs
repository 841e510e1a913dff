use crate::cell::{CellStyle, CellValue};
use crate::error::Result;
use crate::sheet::Worksheet;

/// Row that carries column titles.
pub const HEADER_ROW: u32 = 1;

impl Worksheet {
    /// Find the column titled `title` in `header_row`, creating it if missing.
    ///
    /// Header cells are scanned left to right and compared by exact string
    /// equality. When nothing matches, a new bold header cell is written
    /// right after the last used column and its index is returned.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if the sheet has no room for another column.
    pub fn resolve_column(&mut self, title: &str, header_row: u32) -> Result<u16> {
        if let Some(col) = self.find_column(title, header_row) {
            return Ok(col);
        }

        let col = self.column_count() + 1;
        self.set_value(header_row, col, CellValue::String(title.to_string()))?;
        self.set_style(header_row, col, CellStyle::HEADER)?;
        tracing::debug!(sheet = self.name(), title, col, "created column");
        Ok(col)
    }

    /// Find the column titled `title` without modifying the sheet.
    #[must_use]
    pub fn find_column(&self, title: &str, header_row: u32) -> Option<u16> {
        (1..=self.column_count()).find(|&col| {
            self.get(header_row, col)
                .and_then(CellValue::as_text)
                .is_some_and(|value| value == title)
        })
    }

    /// Column titles of the header row, in column order.
    #[must_use]
    pub fn headers(&self, header_row: u32) -> Vec<Option<String>> {
        (1..=self.column_count())
            .map(|col| {
                self.get(header_row, col)
                    .and_then(CellValue::as_text)
                    .map(str::to_string)
            })
            .collect()
    }
}
