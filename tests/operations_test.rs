//! Integration tests for operation encoding and registry dispatch.

use pdfdata::codec::{self, DecodeContext};
use pdfdata::model::{PageTemplates, Region, Template, TextLayout};
use pdfdata::{Error, Operation, OperationKind, OperationRegistry};
use serde_json::json;
use url::Url;

const FIVE_OPS: &str = r#"[{"op":"metadata"},{"op":"xmp-metadata"},{"op":"images"},{"layout":"preserve","op":"text"},{"layout":"decompose","op":"text"}]"#;

fn ctx() -> DecodeContext {
    DecodeContext::new(Url::parse("https://api.pdfdata.io/v1/").unwrap())
}

#[test]
fn test_operation_list_reencodes_exactly() {
    let ops: Vec<Operation> = codec::from_str(FIVE_OPS, &ctx()).unwrap();
    assert_eq!(
        ops,
        [
            Operation::Metadata,
            Operation::XmpMetadata,
            Operation::Images,
            Operation::text(),
            Operation::text_with_layout(TextLayout::Decompose),
        ]
    );
    assert_eq!(codec::to_string(&ops).unwrap(), FIVE_OPS);
}

#[test]
fn test_single_metadata_operation() {
    let ops: Vec<Operation> = codec::from_str(r#"[{"op":"metadata"}]"#, &ctx()).unwrap();
    assert_eq!(ops, [Operation::Metadata]);
    assert_eq!(codec::to_string(&ops).unwrap(), r#"[{"op":"metadata"}]"#);
}

#[test]
fn test_unknown_operation() {
    let err = codec::from_str::<Vec<Operation>>(
        r#"[{"op":"metadata"},{"op":"unknown-op"}]"#,
        &ctx(),
    )
    .unwrap_err();
    match err {
        Error::UnknownVariant { tag } => assert_eq!(tag, "unknown-op"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_or_non_string_tag() {
    let err = codec::from_str::<Operation>(r#"{"layout":"preserve"}"#, &ctx()).unwrap_err();
    assert!(matches!(err, Error::Format { .. }));

    let err = codec::from_str::<Operation>(r#"{"op":7}"#, &ctx()).unwrap_err();
    assert!(matches!(err, Error::Format { .. }));
}

#[test]
fn test_tags_are_case_sensitive() {
    let err = codec::from_str::<Operation>(r#"{"op":"Metadata"}"#, &ctx()).unwrap_err();
    assert!(matches!(err, Error::UnknownVariant { .. }));
}

#[test]
fn test_layout_tag_case_folding() {
    let op: Operation =
        codec::from_str(r#"{"op":"text","layout":"DECOMPOSE"}"#, &ctx()).unwrap();
    assert_eq!(op, Operation::text_with_layout(TextLayout::Decompose));
    assert_eq!(
        codec::to_string(&op).unwrap(),
        r#"{"layout":"decompose","op":"text"}"#
    );

    // Missing layout falls back to the default.
    let op: Operation = codec::from_str(r#"{"op":"text"}"#, &ctx()).unwrap();
    assert_eq!(op, Operation::text());

    let err = codec::from_str::<Operation>(r#"{"op":"text","layout":"columns"}"#, &ctx())
        .unwrap_err();
    assert!(matches!(err, Error::Format { .. }));
}

#[test]
fn test_page_templates_roundtrip() {
    let templates = PageTemplates::new().with_template(
        "invoice",
        Template::new()
            .restrict_to_page(1)
            .with_region(
                "number",
                Region::from_coords(400.0, 700.0, 560.0, 740.0).matching_regex(r"\d{4}"),
            )
            .with_region(
                "total",
                Region::from_coords(400.0, 80.0, 560.0, 120.0).containing_string("Total"),
            ),
    );
    let op = Operation::PageTemplates(templates);

    let node = codec::to_node(&op).unwrap();
    assert_eq!(
        node,
        json!({
            "op": "page-templates",
            "templates": {
                "invoice": {
                    "pagenum": 1,
                    "regions": {
                        "number": {"bounds": [400.0, 700.0, 560.0, 740.0], "match": "\\d{4}"},
                        "total": {"bounds": [400.0, 80.0, 560.0, 120.0], "contains": "Total"}
                    }
                }
            }
        })
    );

    let decoded: Operation = codec::from_node(node, &ctx()).unwrap();
    assert_eq!(decoded, op);
}

#[test]
fn test_registry_covers_every_kind() {
    let tags: Vec<&str> = OperationRegistry::entries()
        .iter()
        .map(|entry| entry.tag())
        .collect();
    assert_eq!(
        tags,
        [
            "metadata",
            "xmp-metadata",
            "images",
            "text",
            "attachments",
            "page-templates"
        ]
    );

    for entry in OperationRegistry::entries() {
        assert_eq!(OperationRegistry::resolve(entry.tag()).unwrap().kind, entry.kind);
        assert_eq!(OperationRegistry::entry(entry.kind).kind, entry.kind);
    }

    let produces: Vec<OperationKind> = OperationRegistry::entries()
        .iter()
        .map(|entry| entry.kind)
        .filter(|kind| kind.produces_resources())
        .collect();
    assert_eq!(produces, [OperationKind::Images, OperationKind::Attachments]);
}
