//! Operation registry: the closed table mapping `op` discriminators to
//! decoders.
//!
//! Both operations and their results carry the same `op` tag. Decoding either
//! one starts by reading that tag from the generic tree, looking it up here,
//! and handing the node to the entry's decoder. Adding an operation means
//! adding a variant to [`Operation`], [`OperationKind`] and [`ResultData`],
//! plus one entry to this table.
//!
//! # Example
//!
//! ```
//! use pdfdata::registry::OperationRegistry;
//! use pdfdata::model::OperationKind;
//!
//! let entry = OperationRegistry::resolve("xmp-metadata").unwrap();
//! assert_eq!(entry.kind, OperationKind::XmpMetadata);
//! assert!(OperationRegistry::resolve("ocr").is_err());
//! ```

use crate::codec::{self, node_kind};
use crate::error::{Error, Result};
use crate::model::{
    Attachment, ImagePage, Operation, OperationKind, PageTemplates, ResultData, TemplateMatch,
    TextLayout, TextPage,
};
use serde::Deserialize;
use serde_json::Value;

/// One registry row: a discriminator and the decoders for its operation and
/// result payload.
#[derive(Debug)]
pub struct OperationEntry {
    /// Kind identified by this entry
    pub kind: OperationKind,

    /// Decode an operation object (including its `op` field)
    pub decode_operation: fn(Value) -> Result<Operation>,

    /// Decode the non-null `data` payload of a result
    pub decode_data: fn(Value) -> Result<ResultData>,
}

impl OperationEntry {
    /// The `op` value of this entry.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }
}

#[derive(Deserialize)]
struct TextConfig {
    #[serde(default)]
    layout: TextLayout,
}

static ENTRIES: [OperationEntry; 6] = [
    OperationEntry {
        kind: OperationKind::Metadata,
        decode_operation: |_| Ok(Operation::Metadata),
        decode_data: |data| Ok(ResultData::Metadata(data)),
    },
    OperationEntry {
        kind: OperationKind::XmpMetadata,
        decode_operation: |_| Ok(Operation::XmpMetadata),
        decode_data: |data| Ok(ResultData::XmpMetadata(data)),
    },
    OperationEntry {
        kind: OperationKind::Images,
        decode_operation: |_| Ok(Operation::Images),
        decode_data: |data| codec::from_node_plain::<Vec<ImagePage>>(data).map(ResultData::Images),
    },
    OperationEntry {
        kind: OperationKind::Text,
        decode_operation: |node| {
            let config: TextConfig = codec::from_node_plain(node)?;
            Ok(Operation::Text {
                layout: config.layout,
            })
        },
        decode_data: |data| codec::from_node_plain::<Vec<TextPage>>(data).map(ResultData::Text),
    },
    OperationEntry {
        kind: OperationKind::Attachments,
        decode_operation: |_| Ok(Operation::Attachments),
        decode_data: |data| {
            codec::from_node_plain::<Vec<Attachment>>(data).map(ResultData::Attachments)
        },
    },
    OperationEntry {
        kind: OperationKind::PageTemplates,
        decode_operation: |node| codec::from_node_plain::<PageTemplates>(node).map(Operation::PageTemplates),
        decode_data: |data| {
            codec::from_node_plain::<Vec<TemplateMatch>>(data).map(ResultData::PageTemplates)
        },
    },
];

/// Lookup facade over the static operation table.
pub struct OperationRegistry;

impl OperationRegistry {
    /// All registered entries, in declaration order.
    pub fn entries() -> &'static [OperationEntry] {
        &ENTRIES
    }

    /// Find the entry for an `op` tag.
    pub fn resolve(tag: &str) -> Result<&'static OperationEntry> {
        ENTRIES
            .iter()
            .find(|entry| entry.tag() == tag)
            .ok_or_else(|| Error::UnknownVariant {
                tag: tag.to_string(),
            })
    }

    /// Find the entry for a kind.
    pub fn entry(kind: OperationKind) -> &'static OperationEntry {
        let index = match kind {
            OperationKind::Metadata => 0,
            OperationKind::XmpMetadata => 1,
            OperationKind::Images => 2,
            OperationKind::Text => 3,
            OperationKind::Attachments => 4,
            OperationKind::PageTemplates => 5,
        };
        &ENTRIES[index]
    }

    /// Read the `op` discriminator of a tree node and find its entry.
    pub fn dispatch(node: &Value) -> Result<&'static OperationEntry> {
        let object = node.as_object().ok_or_else(|| {
            Error::format(format!(
                "expected an operation object, found {}",
                node_kind(node)
            ))
        })?;

        match object.get("op") {
            Some(Value::String(tag)) => {
                log::debug!("Dispatching on op \"{}\"", tag);
                Self::resolve(tag)
            }
            Some(other) => Err(Error::format(format!(
                "\"op\" discriminator must be a string, found {}",
                node_kind(other)
            ))),
            None => Err(Error::format("missing \"op\" discriminator")),
        }
    }
}
