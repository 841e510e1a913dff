//! # xlnode-core
//!
//! Workflow node that writes JSON records, text and images into Excel
//! workbooks carried as item attachments.
//!
//! This crate provides:
//! - Item and attachment types
//! - Node configuration and per-item parameters
//! - Payload normalization
//! - The Excel Writer node and its batch semantics
//! - Error types

/// Node configuration.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Workflow items and attachments.
pub mod item;
/// Pairing of the spreadsheet and data inputs.
pub mod merge;
/// The Excel Writer node.
pub mod node;
/// Payload normalization.
pub mod payload;
/// Attachment storage.
pub mod store;

pub use config::{ItemParameters, NodeConfig, OperationKind};
pub use error::{ErrorKind, NodeError, NodeResult};
pub use item::{BinaryData, Item, XLSX_MIME_TYPE};
pub use merge::merge_inputs;
pub use node::ExcelWriterNode;
pub use payload::Operation;
pub use store::{read_attachment, BinaryStore, FsStore, MemoryStore};
