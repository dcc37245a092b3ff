//! Document-level types.

use super::OperationResult;
use crate::codec::{self, node_kind, timestamp, DecodeContext, FromNode};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::ops::Deref;

/// A source PDF document stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID
    pub id: String,

    /// Name of the uploaded file
    pub filename: String,

    /// Tags attached at upload time
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub tags: BTreeSet<String>,

    /// Upload time
    #[serde(with = "timestamp")]
    pub created: DateTime<Utc>,

    /// Time after which the service deletes the document
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires: Option<DateTime<Utc>>,

    /// Number of pages
    #[serde(rename = "pagecount", default)]
    pub page_count: u32,

    #[serde(skip)]
    pub(crate) response_body: Option<Value>,
}

impl Document {
    /// Check if the document carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// The raw JSON this document was decoded from, when response capture is enabled.
    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }
}

impl FromNode for Document {
    fn from_node(node: Value, _ctx: &DecodeContext) -> Result<Self> {
        codec::from_node_plain(node)
    }
}

/// A document as delivered within a completed proc, with the results of
/// every operation the proc applied to it.
///
/// Derefs to [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDocument {
    document: Document,
    pub(crate) results: Vec<OperationResult>,
}

impl ProcessedDocument {
    /// The document fields.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Results in the same order as the proc's operations.
    pub fn results(&self) -> &[OperationResult] {
        &self.results
    }
}

impl Deref for ProcessedDocument {
    type Target = Document;

    fn deref(&self) -> &Document {
        &self.document
    }
}

impl FromNode for ProcessedDocument {
    fn from_node(node: Value, ctx: &DecodeContext) -> Result<Self> {
        let mut object = match node {
            Value::Object(object) => object,
            other => {
                return Err(Error::format(format!(
                    "expected a document object, found {}",
                    node_kind(&other)
                )))
            }
        };

        let results = match object.remove("results") {
            None | Some(Value::Null) => Vec::new(),
            Some(results) => Vec::<OperationResult>::from_node(results, ctx)?,
        };
        let document = Document::from_node(Value::Object(object), ctx)?;

        Ok(Self { document, results })
    }
}
