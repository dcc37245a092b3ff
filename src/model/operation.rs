//! Operations: the units of extraction requested from the service.

use super::PageTemplates;
use crate::codec::tag::wire_tag;
use crate::codec::{DecodeContext, FromNode};
use crate::error::Result;
use crate::registry::OperationRegistry;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;

wire_tag! {
    /// How the `text` operation lays out extracted page text.
    pub enum TextLayout : "text layout" {
        /// Approximate the visual layout of the page with whitespace.
        Preserve => "preserve",
        /// Emit text in content-stream order without layout reconstruction.
        Decompose => "decompose",
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        TextLayout::Preserve
    }
}

/// Discriminator of an [`Operation`] and of the results it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Metadata,
    XmpMetadata,
    Images,
    Text,
    Attachments,
    PageTemplates,
}

impl OperationKind {
    /// The `op` value identifying this kind on the wire.
    pub const fn tag(self) -> &'static str {
        match self {
            OperationKind::Metadata => "metadata",
            OperationKind::XmpMetadata => "xmp-metadata",
            OperationKind::Images => "images",
            OperationKind::Text => "text",
            OperationKind::Attachments => "attachments",
            OperationKind::PageTemplates => "page-templates",
        }
    }

    /// Check if results of this kind carry binary resources.
    pub const fn produces_resources(self) -> bool {
        matches!(self, OperationKind::Attachments | OperationKind::Images)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A configured extraction operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Document-level metadata (title, author, dates...).
    Metadata,
    /// The raw XMP metadata packet, converted to JSON.
    XmpMetadata,
    /// Bitmap images, per page.
    Images,
    /// Page text.
    Text {
        /// Layout mode
        layout: TextLayout,
    },
    /// Embedded file attachments.
    Attachments,
    /// Template-driven extraction of named page regions.
    PageTemplates(PageTemplates),
}

impl Operation {
    /// A `text` operation with the default layout.
    pub fn text() -> Self {
        Operation::Text {
            layout: TextLayout::default(),
        }
    }

    /// A `text` operation with the given layout.
    pub fn text_with_layout(layout: TextLayout) -> Self {
        Operation::Text { layout }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Metadata => OperationKind::Metadata,
            Operation::XmpMetadata => OperationKind::XmpMetadata,
            Operation::Images => OperationKind::Images,
            Operation::Text { .. } => OperationKind::Text,
            Operation::Attachments => OperationKind::Attachments,
            Operation::PageTemplates(_) => OperationKind::PageTemplates,
        }
    }

    /// The `op` discriminator of this operation.
    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }
}

// Keys are written in lexicographic order.
impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Operation::Text { layout } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("layout", layout)?;
                map.serialize_entry("op", self.tag())?;
                map.end()
            }
            Operation::PageTemplates(config) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("op", self.tag())?;
                map.serialize_entry("templates", config.templates())?;
                map.end()
            }
            _ => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("op", self.tag())?;
                map.end()
            }
        }
    }
}

impl FromNode for Operation {
    fn from_node(node: Value, _ctx: &DecodeContext) -> Result<Self> {
        let entry = OperationRegistry::dispatch(&node)?;
        (entry.decode_operation)(node)
    }
}
