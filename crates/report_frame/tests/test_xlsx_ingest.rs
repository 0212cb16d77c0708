use report_frame::{CellValue, ColumnKind, read_xlsx, summarize};
use rust_xlsxwriter::Workbook;

fn workbook_bytes(build: impl FnOnce(&mut rust_xlsxwriter::Worksheet)) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    build(worksheet);
    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_reads_first_sheet_with_typed_columns() {
    let bytes = workbook_bytes(|ws| {
        ws.write_string(0, 0, "Product Name").unwrap();
        ws.write_string(0, 1, "Units").unwrap();
        ws.write_string(0, 2, "Price").unwrap();
        ws.write_string(0, 3, "In Stock").unwrap();
        ws.write_string(1, 0, "Widget").unwrap();
        ws.write_number(1, 1, 3.0).unwrap();
        ws.write_number(1, 2, 9.99).unwrap();
        ws.write_boolean(1, 3, true).unwrap();
        ws.write_string(2, 0, "Gadget").unwrap();
        ws.write_number(2, 1, 5.0).unwrap();
        ws.write_number(2, 2, 19.5).unwrap();
        ws.write_boolean(2, 3, false).unwrap();
    });

    let frame = read_xlsx(&bytes).unwrap();
    assert_eq!(frame.row_count(), 2);
    assert_eq!(
        frame.column_names(),
        vec!["product_name", "units", "price", "in_stock"]
    );
    assert_eq!(frame.column("product_name").unwrap().kind(), ColumnKind::Text);
    assert_eq!(frame.column("units").unwrap().kind(), ColumnKind::Integer);
    assert_eq!(frame.column("price").unwrap().kind(), ColumnKind::Float);
    assert_eq!(frame.column("in_stock").unwrap().kind(), ColumnKind::Boolean);
    assert_eq!(frame.column("units").unwrap().values()[1], CellValue::Int(5));
}

#[test]
fn test_blank_cells_are_missing() {
    let bytes = workbook_bytes(|ws| {
        ws.write_string(0, 0, "a").unwrap();
        ws.write_string(0, 1, "b").unwrap();
        ws.write_number(1, 0, 1.0).unwrap();
        ws.write_number(1, 1, 2.0).unwrap();
        ws.write_number(2, 1, 4.0).unwrap();
        ws.write_string(3, 0, "NA").unwrap();
        ws.write_number(3, 1, 6.0).unwrap();
    });

    let frame = read_xlsx(&bytes).unwrap();
    assert_eq!(frame.row_count(), 3);
    let a = frame.column("a").unwrap();
    assert_eq!(a.kind(), ColumnKind::Float);
    assert_eq!(a.values()[1], CellValue::Missing);
    assert_eq!(a.values()[2], CellValue::Missing);

    let summary = summarize(&frame);
    assert_eq!(summary.columns()[0].get("count"), Some(1.0));
    assert_eq!(summary.columns()[1].get("mean"), Some(4.0));
}

#[test]
fn test_empty_sheet_is_rejected() {
    let bytes = workbook_bytes(|_| {});
    let err = read_xlsx(&bytes).unwrap_err();
    assert_eq!(err.to_string(), "No columns to parse from file");
}

#[test]
fn test_duplicate_headers_are_made_unique() {
    let bytes = workbook_bytes(|ws| {
        ws.write_string(0, 0, "Value").unwrap();
        ws.write_string(0, 1, "value").unwrap();
        ws.write_number(1, 0, 1.0).unwrap();
        ws.write_number(1, 1, 2.0).unwrap();
    });

    let frame = read_xlsx(&bytes).unwrap();
    assert_eq!(frame.column_names(), vec!["value", "value_1"]);
}

#[test]
fn test_leading_empty_column_is_unnamed() {
    let bytes = workbook_bytes(|ws| {
        ws.write_string(1, 1, "Qty").unwrap();
        ws.write_number(2, 1, 3.0).unwrap();
        ws.write_number(3, 1, 4.0).unwrap();
    });

    let frame = read_xlsx(&bytes).unwrap();
    assert_eq!(frame.column_names(), vec!["unnamed_0", "qty"]);
    assert_eq!(frame.row_count(), 2);

    let unnamed = frame.column("unnamed_0").unwrap();
    assert_eq!(unnamed.kind(), ColumnKind::Float);
    assert!(unnamed.values().iter().all(CellValue::is_missing));
    assert_eq!(frame.column("qty").unwrap().values()[1], CellValue::Int(4));
}

#[test]
fn test_fully_empty_rows_are_skipped() {
    let bytes = workbook_bytes(|ws| {
        ws.write_string(0, 0, "a").unwrap();
        ws.write_number(1, 0, 1.0).unwrap();
        ws.write_number(3, 0, 2.0).unwrap();
    });

    let frame = read_xlsx(&bytes).unwrap();
    assert_eq!(frame.row_count(), 2);
    assert_eq!(frame.column("a").unwrap().kind(), ColumnKind::Integer);
}
