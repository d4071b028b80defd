// Ingestion tests
// Author: Gabriel Demetrios Lafis

use rust_eda_service::data::{self, sniff_delimiter, DataError, DataType, Value};

#[test]
fn test_csv_is_always_comma_delimited() {
    let dataset = data::parse(b"a;b,c\n1;2,3\n", "semi.csv").unwrap();

    assert_eq!(dataset.column_names(), vec!["a;b", "c"]);
    assert_eq!(dataset.metadata.get("delimiter").map(String::as_str), Some(","));
}

#[test]
fn test_txt_delimiter_sniffing_is_first_match() {
    assert_eq!(sniff_delimiter("a\tb;c,d"), b'\t');
    assert_eq!(sniff_delimiter("a;b,c"), b';');
    assert_eq!(sniff_delimiter("a,b"), b',');

    let dataset = data::parse(b"x;y\n1;2\n3;4\n", "data.TXT").unwrap();
    assert_eq!(dataset.column_names(), vec!["x", "y"]);
    assert_eq!(dataset.len(), 2);
}

#[test]
fn test_type_inference() {
    let csv = "id,score,active,name,empty\n1,1.5,true,Alice,\n2,,FALSE,Bob,\n3,2.5,true,NA,\n";
    let dataset = data::parse(csv.as_bytes(), "people.csv").unwrap();
    let types: Vec<DataType> = dataset.schema.fields.iter().map(|f| f.data_type).collect();

    assert_eq!(
        types,
        vec![DataType::Integer, DataType::Float, DataType::Boolean, DataType::String, DataType::Float]
    );
    assert_eq!(dataset.data[1].values[1], Value::Null);
    assert_eq!(dataset.data[2].values[3], Value::Null);
    assert_eq!(dataset.data[1].values[2], Value::Boolean(false));
}

#[test]
fn test_integer_column_with_nulls_becomes_float() {
    let dataset = data::parse(b"n\n1\n\n3\n", "n.csv").unwrap();

    // The blank line is skipped by the reader; an explicit NA keeps the row
    let with_na = data::parse(b"n\n1\nNA\n3\n", "n.csv").unwrap();

    assert_eq!(dataset.schema.fields[0].data_type, DataType::Integer);
    assert_eq!(with_na.schema.fields[0].data_type, DataType::Float);
    assert_eq!(with_na.data[0].values[0], Value::Float(1.0));
    assert_eq!(with_na.data[0].values[0].to_string(), "1.0");
}

#[test]
fn test_headers_are_normalized() {
    let dataset = data::parse(b"a,,a,a\n1,2,3,4\n", "h.csv").unwrap();

    assert_eq!(dataset.column_names(), vec!["a", "Unnamed: 1", "a.1", "a.2"]);
}

#[test]
fn test_short_rows_are_padded_and_long_rows_fail() {
    let dataset = data::parse(b"a,b,c\n1,2\n", "short.csv").unwrap();
    assert_eq!(dataset.data[0].values[2], Value::Null);

    let err = data::parse(b"a,b\n1,2\n1,2,3\n", "long.csv").unwrap_err();
    assert!(matches!(err, DataError::ParseError(ref msg) if msg == "Expected 2 fields in line 3, saw 3"));
}

#[test]
fn test_rejected_inputs() {
    assert!(matches!(
        data::parse(b"a\n1\n", "data.xlsx"),
        Err(DataError::UnsupportedFile(_))
    ));
    assert!(matches!(
        data::parse(&[0xff, 0xfe, 0x00], "bad.csv"),
        Err(DataError::ParseError(_))
    ));
    assert!(matches!(data::parse(b"", "empty.csv"), Err(DataError::ParseError(_))));
}

#[test]
fn test_byte_order_mark_is_stripped() {
    let dataset = data::parse("\u{feff}col\n1\n".as_bytes(), "bom.csv").unwrap();

    assert_eq!(dataset.column_names(), vec!["col"]);
}
