//! Writing records and text into a worksheet row.

use crate::cell::{CellStyle, CellValue};
use crate::column::HEADER_ROW;
use crate::error::Result;
use crate::sheet::Worksheet;
use serde_json::{Map, Value as JsonValue};

/// Column width applied to columns that receive text or record values.
pub const TEXT_COLUMN_WIDTH: f64 = 50.0;

impl Worksheet {
    /// Write a single value at `(row, col)` with wrapped text and a wide column.
    ///
    /// The column width is replaced on every call.
    pub fn write_cell(&mut self, row: u32, col: u16, value: CellValue) -> Result<()> {
        self.set_value(row, col, value)?;
        self.set_style(row, col, CellStyle::WRAPPED)?;
        self.set_column_width(col, TEXT_COLUMN_WIDTH)
    }

    /// Write every field of `record` into `row`, one column per key.
    ///
    /// Columns are resolved by key, so unseen keys append new columns in the
    /// record's key order. Returns the columns that were written.
    pub fn write_record(&mut self, row: u32, record: &Map<String, JsonValue>) -> Result<Vec<u16>> {
        let mut written = Vec::with_capacity(record.len());
        for (key, value) in record {
            let col = self.resolve_column(key, HEADER_ROW)?;
            self.write_cell(row, col, CellValue::from_json(value))?;
            written.push(col);
        }
        tracing::debug!(sheet = self.name(), row, fields = written.len(), "wrote record");
        Ok(written)
    }

    /// Write `text` into `row` under the column titled `title`.
    pub fn write_text(&mut self, row: u32, title: &str, text: &str) -> Result<u16> {
        let col = self.resolve_column(title, HEADER_ROW)?;
        self.write_cell(row, col, CellValue::String(text.to_string()))?;
        tracing::debug!(sheet = self.name(), row, col, len = text.len(), "wrote text");
        Ok(col)
    }
}
