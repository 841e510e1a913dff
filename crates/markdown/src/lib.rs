//! Markdown to Word conversion.
//!
//! Markdown is rendered to HTML with comrak and the HTML is packaged as an
//! `altChunk` inside a minimal `.docx` container.

pub mod docx;
pub mod error;
mod html;
mod node;

pub use docx::{html_to_docx, DOCX_MIME_TYPE};
pub use error::{MarkdownError, Result};
pub use html::{markdown_to_html, wrap_html_document};
pub use node::{convert, MarkdownParams, MarkdownToWordNode};
