//! Integration tests for multipart request bodies.

use pdfdata::multipart::{self, FormFields, FormValue};
use pdfdata::{Error, Operation};
use std::io::Write;
use tempfile::Builder;

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|window| *window == needle)
        .count()
}

#[test]
fn test_tags_and_file_parts() {
    let pdf = b"%PDF-1.7\n1 0 obj\n<< /Type /Catalog >>\nendobj\n".to_vec();
    let fields = FormFields::new()
        .with_many("tag", ["a", "b"])
        .with("file", FormValue::file("report.pdf", pdf.clone()));

    let body = multipart::encode(&fields).unwrap();
    let bytes = body.body();
    let delimiter = format!("--{}\r\n", body.boundary());

    assert_eq!(count(bytes, delimiter.as_bytes()), 3);
    assert_eq!(count(bytes, b"Content-Disposition: form-data; name=\"tag\"\r\n"), 2);
    assert_eq!(count(bytes, b"name=\"file\"; filename=\"report.pdf\""), 1);
    assert!(bytes.ends_with(format!("--{}--\r\n", body.boundary()).as_bytes()));
    assert_eq!(
        body.content_type(),
        format!("multipart/form-data; boundary={}", body.boundary())
    );

    // The boundary only appears as a delimiter.
    assert_eq!(count(bytes, body.boundary().as_bytes()), 4);
    assert_eq!(count(&pdf, body.boundary().as_bytes()), 0);
}

#[test]
fn test_operations_sent_as_single_json_part() {
    let ops = [Operation::Metadata, Operation::text()];
    let fields = FormFields::new().with("operations", FormValue::json(&ops).unwrap());
    let body = multipart::encode(&fields).unwrap();
    let text = String::from_utf8(body.into_body()).unwrap();

    assert_eq!(count(text.as_bytes(), b"name=\"operations\""), 1);
    assert!(text.contains(
        "\r\n\r\n[{\"op\":\"metadata\"},{\"layout\":\"preserve\",\"op\":\"text\"}]\r\n"
    ));
}

#[test]
fn test_file_from_path() {
    let mut file = Builder::new().suffix(".png").tempfile().unwrap();
    file.write_all(b"\x89PNG\r\n\x1a\n0000").unwrap();

    let value = FormValue::file_from_path(file.path()).unwrap();
    match &value {
        FormValue::File {
            filename, content, ..
        } => {
            let expected = file.path().file_name().unwrap().to_string_lossy();
            assert_eq!(filename, &expected);
            assert_eq!(content.len(), 12);
        }
        other => panic!("unexpected value: {other:?}"),
    }

    let body = multipart::encode(&FormFields::new().with("file", value)).unwrap();
    let text = String::from_utf8_lossy(body.body());
    assert!(text.contains("Content-Type: image/png\r\n"));
    assert!(text.contains("Content-Transfer-Encoding: binary\r\n"));
}

#[test]
fn test_missing_file() {
    let err = FormValue::file_from_path("/nonexistent/dir/missing.pdf").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_unsupported_field_value() {
    let fields = FormFields::new().with("wait", serde_json::json!({"seconds": 5}));
    let err = multipart::encode(&fields).unwrap_err();
    assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("\"wait\"")));
}
