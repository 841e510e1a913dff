//! Workflow items: a JSON body plus named binary attachments.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{NodeError, NodeResult};

/// MIME type of xlsx workbooks.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// A binary attachment on an item.
///
/// The content is either held inline as base64 in `data` or, when `id` is
/// set, kept in a [`BinaryStore`](crate::store::BinaryStore) under that id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    #[serde(default)]
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl BinaryData {
    /// Build an inline attachment from raw bytes.
    ///
    /// The file extension is taken from `file_name`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], file_name: &str, mime_type: &str) -> Self {
        let file_extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .filter(|ext| !ext.is_empty());
        Self {
            data: STANDARD.encode(bytes),
            id: None,
            file_name: Some(file_name.to_string()),
            file_extension,
            mime_type: Some(mime_type.to_string()),
        }
    }

    /// Decode the inline base64 content.
    pub fn decode_inline(&self) -> NodeResult<Vec<u8>> {
        STANDARD
            .decode(self.data.trim())
            .map_err(|e| NodeError::invalid_payload(format!("attachment is not valid base64: {e}")))
    }

    /// Declared extension: the explicit extension, else the file name's,
    /// else the MIME subtype.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        let from_name = || {
            self.file_name
                .as_deref()
                .and_then(|name| name.rsplit_once('.'))
                .map(|(_, ext)| ext.to_string())
        };
        let from_mime = || {
            self.mime_type
                .as_deref()
                .and_then(|mime| mime.split_once('/'))
                .map(|(_, subtype)| subtype.to_string())
        };
        self.file_extension
            .clone()
            .or_else(from_name)
            .or_else(from_mime)
            .filter(|ext| !ext.is_empty())
            .map(|ext| ext.to_ascii_lowercase())
    }
}

/// One unit of workflow data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub binary: IndexMap<String, BinaryData>,
}

impl Item {
    /// Create an item with a JSON body and no attachments.
    #[must_use]
    pub fn from_json(json: Map<String, JsonValue>) -> Self {
        Self {
            json,
            binary: IndexMap::new(),
        }
    }

    /// Attach a binary under `field`, replacing any existing one.
    #[must_use]
    pub fn with_binary(mut self, field: impl Into<String>, binary: BinaryData) -> Self {
        self.binary.insert(field.into(), binary);
        self
    }

    /// Successful output: `{ "success": true }` plus one attachment.
    #[must_use]
    pub fn success(field: impl Into<String>, binary: BinaryData) -> Self {
        Self::from_json(status_body(json!({ "success": true }))).with_binary(field, binary)
    }

    /// Recovered failure: `{ "error": message }` and no attachments.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::from_json(status_body(json!({ "error": message.into() })))
    }

    /// Look up an attachment, failing with `MissingAttachment` if absent.
    pub fn require_binary(&self, field: &str) -> NodeResult<&BinaryData> {
        self.binary
            .get(field)
            .ok_or_else(|| NodeError::missing_attachment(field, self.binary.keys()))
    }

    /// `true` when the item carries `{ "success": true }`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.json.get("success") == Some(&JsonValue::Bool(true))
    }

    /// Error message of a recovered failure item.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.json.get("error").and_then(JsonValue::as_str)
    }
}

fn status_body(value: JsonValue) -> Map<String, JsonValue> {
    match value {
        JsonValue::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_round_trip() {
        let binary = BinaryData::from_bytes(b"hello", "note.txt", "text/plain");
        assert_eq!(binary.file_extension.as_deref(), Some("txt"));
        assert_eq!(binary.decode_inline().unwrap(), b"hello");
    }

    #[test]
    fn test_extension_fallbacks() {
        let mut binary = BinaryData {
            file_extension: Some("PNG".to_string()),
            file_name: Some("photo.gif".to_string()),
            mime_type: Some("image/jpeg".to_string()),
            ..Default::default()
        };
        assert_eq!(binary.extension().as_deref(), Some("png"));

        binary.file_extension = None;
        assert_eq!(binary.extension().as_deref(), Some("gif"));

        binary.file_name = Some("photo".to_string());
        assert_eq!(binary.extension().as_deref(), Some("jpeg"));

        binary.mime_type = None;
        assert_eq!(binary.extension(), None);
    }

    #[test]
    fn test_invalid_base64() {
        let binary = BinaryData {
            data: "%%%".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            binary.decode_inline(),
            Err(NodeError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_status_items() {
        let ok = Item::success("data", BinaryData::default());
        assert!(ok.is_success());
        assert!(ok.binary.contains_key("data"));

        let failed = Item::error("boom");
        assert!(!failed.is_success());
        assert_eq!(failed.error_message(), Some("boom"));
        assert!(failed.binary.is_empty());
    }

    #[test]
    fn test_item_json_shape() {
        let source = r#"{
            "json": {"a": 1},
            "binary": {"excel": {"data": "", "id": "f1", "fileName": "book.xlsx"}}
        }"#;
        let item: Item = serde_json::from_str(source).unwrap();
        assert_eq!(item.binary["excel"].id.as_deref(), Some("f1"));
        assert_eq!(item.binary["excel"].file_name.as_deref(), Some("book.xlsx"));

        let err = item.require_binary("data").unwrap_err();
        assert!(err.to_string().contains("Available keys: excel"));
    }
}
