use rust_xlsxwriter::Workbook;
use serde_json::{json, Map, Value as JsonValue};
use xlnode_core::{
    BinaryData, ErrorKind, ExcelWriterNode, Item, MemoryStore, NodeConfig, NodeError,
    OperationKind, XLSX_MIME_TYPE,
};
use xlnode_sheet::{Book, CellValue};

fn workbook_with_headers(headers: &[&str]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1").unwrap();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

fn spreadsheet(bytes: &[u8]) -> BinaryData {
    BinaryData::from_bytes(bytes, "book.xlsx", XLSX_MIME_TYPE)
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn object(value: JsonValue) -> Map<String, JsonValue> {
    value.as_object().cloned().unwrap()
}

fn output_book(item: &Item) -> Book {
    assert!(item.is_success(), "item failed: {:?}", item.error_message());
    let bytes = item.binary["data"].decode_inline().unwrap();
    Book::from_bytes(&bytes).unwrap()
}

fn text_item(workbook: &[u8], text: &str) -> Item {
    Item::from_json(object(json!({ "data": text }))).with_binary("excel", spreadsheet(workbook))
}

// ===== Record Mode =====

#[tokio::test]
async fn test_record_fills_existing_and_new_columns() {
    let workbook = workbook_with_headers(&["Name", "Age"]);
    let item = Item::from_json(object(json!({
        "data": { "Name": "Alice", "Age": 30, "City": "Paris" }
    })))
    .with_binary("excel", spreadsheet(&workbook));

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node.execute(&[item], &NodeConfig::default()).await.unwrap();
    assert_eq!(out.len(), 1);

    let book = output_book(&out[0]);
    let sheet = book.sheet("Sheet1").unwrap();
    assert_eq!(sheet.column_count(), 3);
    assert_eq!(sheet.get(1, 3), Some(&CellValue::String("City".into())));
    assert_eq!(sheet.get(2, 1), Some(&CellValue::String("Alice".into())));
    assert_eq!(sheet.get(2, 2).and_then(CellValue::as_float), Some(30.0));
    assert_eq!(sheet.get(2, 3), Some(&CellValue::String("Paris".into())));
}

#[tokio::test]
async fn test_record_from_attachment_and_wrapper() {
    let workbook = workbook_with_headers(&["id"]);
    let payload = br#"{"payload": {"id": 7, "tags": ["a", "b"], "meta": {"k": 1}}}"#;
    let item = Item::default()
        .with_binary("excel", spreadsheet(&workbook))
        .with_binary("data", BinaryData::from_bytes(payload, "record.json", "application/json"));

    let config = NodeConfig {
        serial_number: 3,
        ..Default::default()
    };
    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node.execute(&[item], &config).await.unwrap();

    let book = output_book(&out[0]);
    let sheet = book.sheet("Sheet1").unwrap();
    assert_eq!(sheet.get(4, 1).and_then(CellValue::as_float), Some(7.0));
    assert_eq!(sheet.get(4, 2), Some(&CellValue::String(r#"["a","b"]"#.into())));
    assert_eq!(sheet.get(4, 3), Some(&CellValue::String(r#"{"k":1}"#.into())));
    assert!(sheet.get(2, 1).is_none());
}

#[tokio::test]
async fn test_record_array_payload_is_invalid() {
    let workbook = workbook_with_headers(&[]);
    let item = Item::from_json(object(json!({ "data": "[1, 2, 3]" })))
        .with_binary("excel", spreadsheet(&workbook));

    let node = ExcelWriterNode::new(MemoryStore::new());
    let err = node
        .execute(&[item], &NodeConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPayload);
}

// ===== Text Mode =====

#[tokio::test]
async fn test_text_writes_under_header() {
    let workbook = workbook_with_headers(&["Data"]);
    let config = NodeConfig {
        operation: OperationKind::Text,
        serial_number: 2,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node
        .execute(&[text_item(&workbook, "line one\nline two")], &config)
        .await
        .unwrap();

    let book = output_book(&out[0]);
    let sheet = book.sheet("Sheet1").unwrap();
    assert_eq!(sheet.column_count(), 1);
    assert_eq!(
        sheet.get(3, 1),
        Some(&CellValue::String("line one\nline two".into()))
    );
}

#[tokio::test]
async fn test_text_from_stored_attachment() {
    let workbook = workbook_with_headers(&[]);
    let mut store = MemoryStore::new();
    store.insert("book", workbook);
    store.insert("note", "Grüße".as_bytes().to_vec());

    let item = Item::default()
        .with_binary(
            "excel",
            BinaryData {
                id: Some("book".to_string()),
                ..Default::default()
            },
        )
        .with_binary(
            "data",
            BinaryData {
                id: Some("note".to_string()),
                ..Default::default()
            },
        );
    let config = NodeConfig {
        operation: OperationKind::Text,
        header_title: "Notes".to_string(),
        ..Default::default()
    };

    let node = ExcelWriterNode::new(store);
    let out = node.execute(&[item], &config).await.unwrap();
    let book = output_book(&out[0]);
    let sheet = book.sheet("Sheet1").unwrap();
    assert_eq!(sheet.get(1, 1), Some(&CellValue::String("Notes".into())));
    assert_eq!(sheet.get(2, 1), Some(&CellValue::String("Grüße".into())));
}

// ===== Image Mode =====

#[tokio::test]
async fn test_image_is_embedded() {
    let workbook = workbook_with_headers(&["Name"]);
    let item = Item::default()
        .with_binary("excel", spreadsheet(&workbook))
        .with_binary(
            "data",
            BinaryData::from_bytes(&png_bytes(1400, 467), "photo.png", "image/png"),
        );
    let config = NodeConfig {
        operation: OperationKind::Image,
        header_title: "Photo".to_string(),
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node.execute(&[item], &config).await.unwrap();

    let bytes = out[0].binary["data"].decode_inline().unwrap();
    assert!(bytes
        .windows(b"xl/media/image1.png".len())
        .any(|w| w == b"xl/media/image1.png"));

    let book = Book::from_bytes(&bytes).unwrap();
    let sheet = book.sheet("Sheet1").unwrap();
    assert_eq!(sheet.get(1, 2), Some(&CellValue::String("Photo".into())));
}

#[tokio::test]
async fn test_unsupported_image_format() {
    let workbook = workbook_with_headers(&[]);
    let item = Item::default()
        .with_binary("excel", spreadsheet(&workbook))
        .with_binary("data", BinaryData::from_bytes(b"BM....", "scan.bmp", "image/bmp"));
    let config = NodeConfig {
        operation: OperationKind::Image,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let err = node.execute(&[item], &config).await.unwrap_err();
    assert!(matches!(err, NodeError::UnsupportedFormat(ref ext) if ext == "bmp"));
}

#[tokio::test]
async fn test_image_requires_attachment() {
    let workbook = workbook_with_headers(&[]);
    let item = text_item(&workbook, "not an image");
    let config = NodeConfig {
        operation: OperationKind::Image,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let err = node.execute(&[item], &config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingAttachment);
    assert!(err.to_string().contains("Available keys: excel"));
}

// ===== Failures and Batches =====

#[tokio::test]
async fn test_missing_sheet() {
    let workbook = workbook_with_headers(&["Data"]);
    let config = NodeConfig {
        operation: OperationKind::Text,
        sheet_name: "Missing".to_string(),
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let err = node
        .execute(&[text_item(&workbook, "x")], &config)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SheetNotFound);
    assert_eq!(err.to_string(), "Sheet \"Missing\" not found in Excel file.");
}

#[tokio::test]
async fn test_corrupt_workbook() {
    let item = text_item(b"definitely not a zip", "x");
    let config = NodeConfig {
        operation: OperationKind::Text,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let err = node.execute(&[item], &config).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidWorkbook);
}

#[tokio::test]
async fn test_missing_spreadsheet() {
    let item = Item::from_json(object(json!({ "data": "x" })));
    let node = ExcelWriterNode::new(MemoryStore::new());
    let err = node
        .execute(&[item], &NodeConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::MissingAttachment { ref field, .. } if field == "excel"));
}

#[tokio::test]
async fn test_batch_items_are_isolated() {
    let first = workbook_with_headers(&["Data"]);
    let second = workbook_with_headers(&["Other"]);
    let config = NodeConfig {
        operation: OperationKind::Text,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node
        .execute(&[text_item(&first, "one"), text_item(&second, "two")], &config)
        .await
        .unwrap();
    assert_eq!(out.len(), 2);

    let one = output_book(&out[0]);
    let one = one.sheet("Sheet1").unwrap();
    assert_eq!(one.column_count(), 1);
    assert_eq!(one.get(2, 1), Some(&CellValue::String("one".into())));

    let two = output_book(&out[1]);
    let two = two.sheet("Sheet1").unwrap();
    assert_eq!(two.column_count(), 2);
    assert_eq!(two.get(2, 2), Some(&CellValue::String("two".into())));
    assert!(two.get(2, 1).is_none());
}

#[tokio::test]
async fn test_continue_on_fail_keeps_order() {
    let workbook = workbook_with_headers(&["Data"]);
    let broken = Item::from_json(object(json!({ "data": 42 })))
        .with_binary("excel", spreadsheet(&workbook));
    let items = [text_item(&workbook, "a"), broken, text_item(&workbook, "c")];
    let config = NodeConfig {
        operation: OperationKind::Text,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new()).continue_on_fail(true);
    let out = node.execute(&items, &config).await.unwrap();
    assert_eq!(out.len(), 3);
    assert!(out[0].is_success());
    assert!(out[1].error_message().is_some());
    assert!(out[1].binary.is_empty());
    assert!(out[2].is_success());
}

#[tokio::test]
async fn test_failure_aborts_without_continue() {
    let workbook = workbook_with_headers(&["Data"]);
    let items = [
        text_item(&workbook, "a"),
        Item::default(),
        text_item(&workbook, "c"),
    ];
    let config = NodeConfig {
        operation: OperationKind::Text,
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    assert!(node.execute(&items, &config).await.is_err());
}

#[tokio::test]
async fn test_per_item_serial_numbers() {
    let workbook = workbook_with_headers(&["Data"]);
    let configs = vec![
        NodeConfig {
            operation: OperationKind::Text,
            serial_number: 1,
            ..Default::default()
        },
        NodeConfig {
            operation: OperationKind::Text,
            serial_number: 5,
            ..Default::default()
        },
    ];

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node
        .execute(&[text_item(&workbook, "a"), text_item(&workbook, "b")], &configs)
        .await
        .unwrap();

    let first = output_book(&out[0]);
    assert_eq!(
        first.sheet("Sheet1").unwrap().get(2, 1),
        Some(&CellValue::String("a".into()))
    );
    let second = output_book(&out[1]);
    assert_eq!(
        second.sheet("Sheet1").unwrap().get(6, 1),
        Some(&CellValue::String("b".into()))
    );
}

#[tokio::test]
async fn test_output_attachment_metadata() {
    let workbook = workbook_with_headers(&["Data"]);
    let config = NodeConfig {
        operation: OperationKind::Text,
        output_file_name: "report.xlsx".to_string(),
        ..Default::default()
    };

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node
        .execute(&[text_item(&workbook, "x")], &config)
        .await
        .unwrap();

    let binary = &out[0].binary["data"];
    assert_eq!(binary.file_name.as_deref(), Some("report.xlsx"));
    assert_eq!(binary.mime_type.as_deref(), Some(XLSX_MIME_TYPE));
    assert_eq!(out[0].json, object(json!({ "success": true })));
}

#[tokio::test]
async fn test_execute_merged_inputs() {
    let workbook = workbook_with_headers(&["Name"]);
    let excel_items = vec![Item::default().with_binary("file", spreadsheet(&workbook))];
    let data_items = vec![Item::from_json(object(json!({ "Name": "Zed", "Score": 3 })))];

    let node = ExcelWriterNode::new(MemoryStore::new());
    let out = node
        .execute_merged(&excel_items, &data_items, &NodeConfig::default())
        .await
        .unwrap();

    let book = output_book(&out[0]);
    let sheet = book.sheet("Sheet1").unwrap();
    assert_eq!(sheet.get(2, 1), Some(&CellValue::String("Zed".into())));
    assert_eq!(sheet.get(1, 2), Some(&CellValue::String("Score".into())));
}
