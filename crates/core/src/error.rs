//! Error types for xlnode nodes.

use thiserror::Error;
use xlnode_sheet::SheetError;

/// Result type for node operations.
pub type NodeResult<T> = Result<T, NodeError>;

/// Semantic category of a [`NodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingAttachment,
    InvalidPayload,
    UnsupportedFormat,
    InvalidWorkbook,
    SheetNotFound,
    InvalidConfig,
    Internal,
}

/// Errors that can occur while running a node over an item.
#[derive(Debug, Error)]
pub enum NodeError {
    /// A required binary attachment is absent from the item.
    #[error("No binary found in field \"{field}\". Available keys: {available}")]
    MissingAttachment { field: String, available: String },

    /// The payload has the wrong shape for the selected operation.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The image extension is not png, jpeg/jpg or gif.
    #[error("Unsupported image extension: {0}")]
    UnsupportedFormat(String),

    /// The spreadsheet bytes are not a readable workbook.
    #[error("Invalid workbook: {0}")]
    InvalidWorkbook(String),

    /// The configured sheet is not in the workbook.
    #[error("Sheet \"{0}\" not found in Excel file.")]
    SheetNotFound(String),

    /// The serial number would target the header row.
    #[error("Serial number must be 1 or greater, got {0}")]
    InvalidSerialNumber(u32),

    /// The first input carried no items.
    #[error("First input (Excel) is empty.")]
    EmptyInput,

    /// Configuration could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A stored attachment could not be read.
    #[error("Binary store error for \"{id}\": {message}")]
    Store { id: String, message: String },

    /// Writing the output blob failed.
    #[error("Failed to serialize workbook: {0}")]
    Serialize(String),
}

impl NodeError {
    /// Create a missing-attachment error listing the keys that are present.
    pub fn missing_attachment<'a>(
        field: impl Into<String>,
        available: impl IntoIterator<Item = &'a String>,
    ) -> Self {
        let available: Vec<&str> = available.into_iter().map(String::as_str).collect();
        Self::MissingAttachment {
            field: field.into(),
            available: available.join(", "),
        }
    }

    /// Create an invalid-payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// The semantic kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAttachment { .. } => ErrorKind::MissingAttachment,
            Self::InvalidPayload(_) => ErrorKind::InvalidPayload,
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::InvalidWorkbook(_) => ErrorKind::InvalidWorkbook,
            Self::SheetNotFound(_) => ErrorKind::SheetNotFound,
            Self::InvalidSerialNumber(_) | Self::EmptyInput | Self::Config(_) => {
                ErrorKind::InvalidConfig
            }
            Self::Store { .. } | Self::Serialize(_) => ErrorKind::Internal,
        }
    }
}

impl From<SheetError> for NodeError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::InvalidWorkbook(message) => Self::InvalidWorkbook(message),
            SheetError::SheetNotFound { name } => Self::SheetNotFound(name),
            SheetError::Image(message) => Self::InvalidPayload(message),
            other => Self::Serialize(other.to_string()),
        }
    }
}
