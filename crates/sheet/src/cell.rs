use serde_json::Value as JsonValue;
use std::fmt;

/// Represents a formula stored in a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaCell {
    pub source: String,
    pub cached: Option<Box<CellValue>>,
}

/// Represents a cell value in a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Formula(FormulaCell),
}

impl CellValue {
    /// Convert a JSON value into a cell value.
    ///
    /// Scalars map onto their cell counterparts. Arrays and objects are
    /// written as their compact JSON text.
    #[must_use]
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map_or(CellValue::Null, CellValue::Float),
            },
            JsonValue::String(s) => CellValue::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => CellValue::String(value.to_string()),
        }
    }

    /// Return the cached value for formulas, or self for non-formulas.
    #[must_use]
    pub fn cached_or_self(&self) -> &CellValue {
        match self {
            CellValue::Formula(formula) => formula.cached.as_deref().unwrap_or(self),
            _ => self,
        }
    }

    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.cached_or_self(), CellValue::Null)
    }

    /// Try to get the value as a float
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.cached_or_self() {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::String(s) => s.parse().ok(),
            CellValue::Null => None,
            CellValue::Formula(_) => None,
        }
    }

    /// Borrow the text of a string cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Formula(formula) => write!(f, "{}", formula.source),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

/// Formatting applied to a single cell when the workbook is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStyle {
    pub bold: bool,
    pub wrap_text: bool,
}

impl CellStyle {
    /// Style used for header titles.
    pub const HEADER: CellStyle = CellStyle {
        bold: true,
        wrap_text: false,
    };

    /// Style used for written data cells.
    pub const WRAPPED: CellStyle = CellStyle {
        bold: false,
        wrap_text: true,
    };

    #[must_use]
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.wrap_text
    }
}

/// A cell in the worksheet grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}
