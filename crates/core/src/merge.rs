//! Pairing the spreadsheet input with the payload input.

use crate::error::{NodeError, NodeResult};
use crate::item::{BinaryData, Item};

/// Pick the attachment for `field`: the named field first, then the item's
/// only attachment when it has exactly one.
fn select_binary<'a>(item: &'a Item, field: &str) -> Option<&'a BinaryData> {
    item.binary.get(field).or_else(|| match item.binary.len() {
        1 => item.binary.values().next(),
        _ => None,
    })
}

/// Merge the two node inputs into one item per spreadsheet item.
///
/// Items are paired by position. The merged item carries the data item's
/// JSON, the spreadsheet under `excel_field` and, when the data item has
/// one, the payload attachment under `data_field`.
///
/// # Errors
///
/// `EmptyInput` when there are no spreadsheet items, `MissingAttachment`
/// when a spreadsheet item has no usable attachment.
pub fn merge_inputs(
    excel_items: &[Item],
    data_items: &[Item],
    excel_field: &str,
    data_field: &str,
) -> NodeResult<Vec<Item>> {
    if excel_items.is_empty() {
        return Err(NodeError::EmptyInput);
    }

    excel_items
        .iter()
        .enumerate()
        .map(|(index, excel_item)| {
            let spreadsheet = select_binary(excel_item, excel_field).ok_or_else(|| {
                NodeError::missing_attachment(excel_field, excel_item.binary.keys())
            })?;

            let data_item = data_items.get(index);
            let mut merged = Item::from_json(data_item.map(|d| d.json.clone()).unwrap_or_default())
                .with_binary(excel_field, spreadsheet.clone());

            if let Some(payload) = data_item.and_then(|d| select_binary(d, data_field)) {
                merged = merged.with_binary(data_field, payload.clone());
            }
            Ok(merged)
        })
        .collect()
}
