//! The Excel Writer node: writes each item's payload into its spreadsheet.

use xlnode_sheet::{Book, HEADER_ROW};

use crate::config::{ItemParameters, NodeConfig, OperationKind};
use crate::error::{NodeError, NodeResult};
use crate::item::{BinaryData, Item, XLSX_MIME_TYPE};
use crate::merge::merge_inputs;
use crate::payload::Operation;
use crate::store::{read_attachment, BinaryStore};

/// Writes JSON records, text or images into a binary Excel file.
///
/// Items are processed one at a time in input order, and each one loads,
/// mutates and serializes its own workbook.
#[derive(Debug, Clone)]
pub struct ExcelWriterNode<S> {
    store: S,
    continue_on_fail: bool,
}

impl<S: BinaryStore> ExcelWriterNode<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            continue_on_fail: false,
        }
    }

    /// Turn per-item failures into `{ "error": message }` items instead of
    /// aborting the batch.
    #[must_use]
    pub fn continue_on_fail(mut self, enabled: bool) -> Self {
        self.continue_on_fail = enabled;
        self
    }

    /// Run the node over `items`.
    ///
    /// # Errors
    ///
    /// Without continue-on-failure, the first item error stops the batch and
    /// is returned; no output items are produced.
    pub async fn execute<P>(&self, items: &[Item], params: &P) -> NodeResult<Vec<Item>>
    where
        P: ItemParameters + ?Sized,
    {
        tracing::info!(
            items = items.len(),
            continue_on_fail = self.continue_on_fail,
            "running excel writer"
        );
        let mut output = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let result = match params.config(index) {
                Some(config) => self.process_item(item, config).await,
                None => Err(NodeError::Config(format!("no configuration for item {index}"))),
            };

            match result {
                Ok(out) => output.push(out),
                Err(e) if self.continue_on_fail => {
                    tracing::warn!(item = index, "item failed: {}", e);
                    output.push(Item::error(e.to_string()));
                }
                Err(e) => {
                    tracing::debug!(item = index, "aborting batch: {}", e);
                    return Err(e);
                }
            }
        }

        Ok(output)
    }

    /// Merge the spreadsheet and data inputs, then run the node.
    ///
    /// Field names come from the first item's configuration.
    pub async fn execute_merged<P>(
        &self,
        excel_items: &[Item],
        data_items: &[Item],
        params: &P,
    ) -> NodeResult<Vec<Item>>
    where
        P: ItemParameters + ?Sized,
    {
        let config = params
            .config(0)
            .ok_or_else(|| NodeError::Config("no configuration".to_string()))?;
        let merged = merge_inputs(
            excel_items,
            data_items,
            &config.spreadsheet_field,
            &config.payload_field,
        )?;
        self.execute(&merged, params).await
    }

    /// Load, write and serialize one item's workbook.
    async fn process_item(&self, item: &Item, config: &NodeConfig) -> NodeResult<Item> {
        let spreadsheet = item.require_binary(&config.spreadsheet_field)?;
        if config.operation == OperationKind::Image {
            item.require_binary(&config.payload_field)?;
        }
        let row = config.target_row()?;

        let bytes = read_attachment(&self.store, spreadsheet).await?;
        let mut book = Book::from_bytes(&bytes)?;
        let sheet = book.sheet_mut(&config.sheet_name)?;

        let operation = Operation::resolve(item, config, &self.store).await?;
        match operation {
            Operation::Record(record) => {
                sheet.write_record(row, &record)?;
            }
            Operation::Text(text) => {
                sheet.write_text(row, &config.header_title, &text)?;
            }
            Operation::Image { bytes, format } => {
                let col = sheet.resolve_column(&config.header_title, HEADER_ROW)?;
                sheet.insert_image(row, col, &bytes, format)?;
            }
        }

        let updated = book.to_bytes()?;
        tracing::debug!(
            sheet = %config.sheet_name,
            row,
            operation = ?config.operation,
            bytes = updated.len(),
            "item written"
        );
        Ok(Item::success(
            config.output_field.as_str(),
            BinaryData::from_bytes(&updated, &config.output_file_name, XLSX_MIME_TYPE),
        ))
    }
}
