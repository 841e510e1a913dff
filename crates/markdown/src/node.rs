use serde::{Deserialize, Serialize};
use xlnode_core::{BinaryData, Item};

use crate::docx::{html_to_docx, DOCX_MIME_TYPE};
use crate::error::Result;
use crate::html::{markdown_to_html, wrap_html_document};

/// Binary field the document is attached under.
const OUTPUT_FIELD: &str = "data";

/// Options recognized by the Markdown to Word node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownParams {
    pub markdown_text: String,
    #[serde(alias = "filename")]
    pub file_name: String,
}

impl Default for MarkdownParams {
    fn default() -> Self {
        Self {
            markdown_text: String::new(),
            file_name: "document.docx".to_string(),
        }
    }
}

/// Converts Markdown text to a Word document, one per input item.
#[derive(Debug, Clone, Default)]
pub struct MarkdownToWordNode;

impl MarkdownToWordNode {
    pub fn new() -> Self {
        Self
    }

    /// Produce one `{ "success": true }` item with a `.docx` attachment per
    /// input item.
    ///
    /// `params` holds one entry per item; items past the end reuse the last
    /// entry, and an empty slice means defaults.
    pub fn execute(&self, items: &[Item], params: &[MarkdownParams]) -> Result<Vec<Item>> {
        let fallback = MarkdownParams::default();
        tracing::info!(items = items.len(), "running markdown to word");

        (0..items.len())
            .map(|index| {
                let params = params.get(index).or(params.last()).unwrap_or(&fallback);
                convert(params)
            })
            .collect()
    }
}

/// Convert one set of parameters to an output item.
pub fn convert(params: &MarkdownParams) -> Result<Item> {
    let html = wrap_html_document(&markdown_to_html(&params.markdown_text));
    let docx = html_to_docx(&html)?;
    Ok(Item::success(
        OUTPUT_FIELD,
        BinaryData::from_bytes(&docx, &params.file_name, DOCX_MIME_TYPE),
    ))
}
