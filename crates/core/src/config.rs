//! Per-item node configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{NodeError, NodeResult};

/// Which kind of payload an Excel Writer run writes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Write every field of a JSON record into its own column.
    #[default]
    #[serde(alias = "json")]
    Record,
    /// Write a text string under the header column.
    Text,
    /// Insert an image under the header column.
    Image,
}

/// Options recognized by the Excel Writer node. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeConfig {
    pub operation: OperationKind,
    /// Binary field holding the spreadsheet.
    pub spreadsheet_field: String,
    /// Binary or JSON field holding the payload.
    pub payload_field: String,
    pub sheet_name: String,
    /// 1-based record index; the data lands on row `serial_number + 1`.
    pub serial_number: u32,
    /// Column title used by text and image writes.
    pub header_title: String,
    pub output_file_name: String,
    /// Binary field the updated spreadsheet is attached under.
    pub output_field: String,
    /// Save each image in its own folder. Accepted but not used by the write path.
    pub save_all_images: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            operation: OperationKind::Record,
            spreadsheet_field: "excel".to_string(),
            payload_field: "data".to_string(),
            sheet_name: "Sheet1".to_string(),
            serial_number: 1,
            header_title: "Data".to_string(),
            output_file_name: "updated.xlsx".to_string(),
            output_field: "data".to_string(),
            save_all_images: false,
        }
    }
}

impl NodeConfig {
    /// Load a configuration from a JSON file; missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> NodeResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&source)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))
    }

    /// Worksheet row the payload is written to.
    pub fn target_row(&self) -> NodeResult<u32> {
        if self.serial_number == 0 {
            return Err(NodeError::InvalidSerialNumber(self.serial_number));
        }
        self.serial_number
            .checked_add(1)
            .ok_or(NodeError::InvalidSerialNumber(self.serial_number))
    }
}

/// Supplies the configuration for each item of a batch.
pub trait ItemParameters {
    fn config(&self, index: usize) -> Option<&NodeConfig>;
}

/// One configuration shared by every item.
impl ItemParameters for NodeConfig {
    fn config(&self, _index: usize) -> Option<&NodeConfig> {
        Some(self)
    }
}

/// One configuration per item; items past the end reuse the last entry.
impl ItemParameters for [NodeConfig] {
    fn config(&self, index: usize) -> Option<&NodeConfig> {
        self.get(index).or_else(|| self.last())
    }
}

impl ItemParameters for Vec<NodeConfig> {
    fn config(&self, index: usize) -> Option<&NodeConfig> {
        self.as_slice().config(index)
    }
}
