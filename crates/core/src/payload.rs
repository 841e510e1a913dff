//! Extracting a well-typed payload from an item.

use serde_json::{Map, Value as JsonValue};
use xlnode_sheet::ImageFormat;

use crate::config::{NodeConfig, OperationKind};
use crate::error::{NodeError, NodeResult};
use crate::item::Item;
use crate::store::{read_attachment, BinaryStore};

/// Extension assumed when an image attachment declares none.
const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// A payload resolved for one item, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Record(Map<String, JsonValue>),
    Text(String),
    Image { bytes: Vec<u8>, format: ImageFormat },
}

impl Operation {
    /// Resolve the payload selected by `config.operation`.
    pub async fn resolve<S>(item: &Item, config: &NodeConfig, store: &S) -> NodeResult<Self>
    where
        S: BinaryStore + ?Sized,
    {
        match config.operation {
            OperationKind::Record => normalize_record(item, config, store).await,
            OperationKind::Text => normalize_text(item, config, store).await,
            OperationKind::Image => normalize_image(item, config, store).await,
        }
    }
}

/// Resolve a JSON record.
///
/// Sources, in order: a JSON document in the payload attachment, a
/// structured value under the payload field of the item's JSON, the item's
/// whole JSON body.
pub async fn normalize_record<S>(
    item: &Item,
    config: &NodeConfig,
    store: &S,
) -> NodeResult<Operation>
where
    S: BinaryStore + ?Sized,
{
    let field = &config.payload_field;
    let value = if let Some(binary) = item.binary.get(field) {
        let bytes = read_attachment(store, binary).await?;
        let text = decode_utf8(bytes)?;
        unwrap_wrapper(parse_json(&text)?)?
    } else if let Some(value) = item.json.get(field) {
        match value {
            JsonValue::String(text) => unwrap_wrapper(parse_json(text)?)?,
            other => other.clone(),
        }
    } else {
        JsonValue::Object(item.json.clone())
    };

    match value {
        JsonValue::Object(record) => Ok(Operation::Record(record)),
        other => Err(NodeError::invalid_payload(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Resolve a text string from the payload attachment or JSON field.
pub async fn normalize_text<S>(
    item: &Item,
    config: &NodeConfig,
    store: &S,
) -> NodeResult<Operation>
where
    S: BinaryStore + ?Sized,
{
    let field = &config.payload_field;
    if let Some(binary) = item.binary.get(field) {
        let bytes = read_attachment(store, binary).await?;
        return decode_utf8(bytes).map(Operation::Text);
    }

    match item.json.get(field) {
        Some(JsonValue::String(text)) => Ok(Operation::Text(text.clone())),
        Some(other) => Err(NodeError::invalid_payload(format!(
            "field \"{field}\" must be a string, got {}",
            json_type_name(other)
        ))),
        None => Err(NodeError::missing_attachment(field.as_str(), item.binary.keys())),
    }
}

/// Resolve image bytes and their declared format from the payload attachment.
pub async fn normalize_image<S>(
    item: &Item,
    config: &NodeConfig,
    store: &S,
) -> NodeResult<Operation>
where
    S: BinaryStore + ?Sized,
{
    let binary = item.require_binary(&config.payload_field)?;
    let extension = binary
        .extension()
        .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string());
    let format: ImageFormat = extension
        .parse()
        .map_err(|_| NodeError::UnsupportedFormat(extension.clone()))?;
    let bytes = read_attachment(store, binary).await?;
    Ok(Operation::Image { bytes, format })
}

fn decode_utf8(bytes: Vec<u8>) -> NodeResult<String> {
    String::from_utf8(bytes)
        .map_err(|e| NodeError::invalid_payload(format!("payload is not valid UTF-8: {e}")))
}

fn parse_json(text: &str) -> NodeResult<JsonValue> {
    serde_json::from_str(text)
        .map_err(|e| NodeError::invalid_payload(format!("payload is not valid JSON: {e}")))
}

/// Unwrap a single-key wrapper object one level.
///
/// `{"payload": {...}}` becomes the inner object and `{"payload": "{...}"}`
/// becomes the parsed inner document. A wrapper around an array is unwrapped
/// too, so it fails the object check afterwards. A single key holding a
/// scalar, including a plain string, is an ordinary one-field record and is
/// left alone.
fn unwrap_wrapper(value: JsonValue) -> NodeResult<JsonValue> {
    let JsonValue::Object(map) = value else {
        return Ok(value);
    };
    if map.len() != 1 {
        return Ok(JsonValue::Object(map));
    }
    let inner = map.values().next().cloned().unwrap_or(JsonValue::Null);
    match inner {
        JsonValue::Object(_) | JsonValue::Array(_) => Ok(inner),
        JsonValue::String(text) if looks_like_document(&text) => parse_json(&text),
        _ => Ok(JsonValue::Object(map)),
    }
}

/// `true` when a string starts like a JSON object or array.
fn looks_like_document(text: &str) -> bool {
    matches!(text.trim_start().as_bytes().first(), Some(b'{' | b'['))
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
