use crate::error::{Result, SheetError};
use crate::sheet::Worksheet;
use indexmap::IndexMap;

/// A workbook held in memory (preserves sheet order)
#[derive(Debug, Clone, Default)]
pub struct Book {
    sheets: IndexMap<String, Worksheet>,
}

impl Book {
    /// Create a new empty book
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of sheets
    #[must_use]
    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    /// Check if the book is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Get all sheet names in order
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.keys().map(String::as_str).collect()
    }

    /// Check if a sheet exists
    #[must_use]
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    // ===== Sheet Access =====

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Result<&Worksheet> {
        self.sheets
            .get(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Get a mutable sheet by name
    pub fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.sheets
            .get_mut(name)
            .ok_or_else(|| SheetError::SheetNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate over sheets in order
    pub fn sheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.values()
    }

    // ===== Sheet Management =====

    /// Add a new empty sheet and return it
    pub fn add_sheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        if self.sheets.contains_key(name) {
            return Err(SheetError::SheetAlreadyExists {
                name: name.to_string(),
            });
        }
        Ok(self
            .sheets
            .entry(name.to_string())
            .or_insert_with(|| Worksheet::with_name(name)))
    }
}
