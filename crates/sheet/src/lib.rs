//! Workbook module for xlnode
//!
//! Loads a spreadsheet blob into an in-memory [`Book`], lets callers locate
//! or create columns by header title and write records, text or images into
//! a row, then serializes the result to a fresh xlsx blob.
//!
//! # Examples
//!
//! ## Writing a record under header columns
//!
//! ```
//! use xlnode_sheet::{Book, CellValue, HEADER_ROW};
//! use serde_json::json;
//!
//! let mut book = Book::new();
//! let sheet = book.add_sheet("Sheet1").unwrap();
//!
//! let record = json!({"name": "Alice", "age": 30});
//! sheet.write_record(2, record.as_object().unwrap()).unwrap();
//!
//! assert_eq!(sheet.find_column("age", HEADER_ROW), Some(2));
//! assert_eq!(sheet.get(2, 2), Some(&CellValue::Int(30)));
//! ```
//!
//! ## Round-tripping a blob
//!
//! ```
//! use xlnode_sheet::Book;
//!
//! let mut book = Book::new();
//! book.add_sheet("Data").unwrap().write_text(2, "Notes", "hello").unwrap();
//!
//! let bytes = book.to_bytes().unwrap();
//! let loaded = Book::from_bytes(&bytes).unwrap();
//! assert_eq!(loaded.sheet_names(), vec!["Data"]);
//! ```

mod book;
mod cell;
mod column;
mod error;
mod picture;
mod sheet;
mod writer;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell types.
pub use cell::{Cell, CellStyle, CellValue, FormulaCell};
/// Re-export the header row constant.
pub use column::HEADER_ROW;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export image insertion types.
pub use picture::{
    fit_inside, ImageFormat, SheetImage, IMAGE_BOX_HEIGHT, IMAGE_BOX_WIDTH, IMAGE_COLUMN_WIDTH,
    IMAGE_ROW_HEIGHT,
};
/// Re-export worksheet type.
pub use sheet::{Worksheet, MAX_COLS, MAX_ROWS};
/// Re-export cell writer constants.
pub use writer::TEXT_COLUMN_WIDTH;
