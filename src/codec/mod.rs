//! JSON wire codec.
//!
//! Decoding is a two-step affair: bytes or text are first parsed into a
//! generic [`Value`] tree, and the tree is then mapped onto a typed shape via
//! [`FromNode`]. Types whose shape depends on the content of the tree
//! (operations and results, dispatched on their `op` field; resources,
//! dispatched on the presence of `dimensions`) look at the node before
//! committing to a concrete variant.
//!
//! Every typed decode receives a [`DecodeContext`]. It carries the service
//! endpoint so that endpoint-relative resource URLs can be made absolute.
//!
//! Conventions shared by all model types:
//!
//! - fields present on the wire but not modelled are ignored;
//! - `None` fields are omitted when encoding;
//! - timestamps use [`timestamp::FORMAT`], always UTC;
//! - enumerated tags are written lower-case and read case-insensitively
//!   (see [`tag::WireTag`]).

pub mod tag;
pub mod timestamp;

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Decode-time context threaded explicitly through every typed decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    endpoint: Url,
}

impl DecodeContext {
    /// Create a context for responses produced by the service at `endpoint`.
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    /// The service endpoint in effect for this decode.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolve a wire-level, endpoint-relative URL to an absolute one.
    pub fn resolve_url(&self, path: &str) -> Result<Url> {
        self.endpoint
            .join(path)
            .map_err(|e| Error::format(format!("invalid resource URL \"{}\": {}", path, e)))
    }
}

/// Types that can be materialized from a generic JSON tree.
pub trait FromNode: Sized {
    /// Decode `node` into `Self`.
    fn from_node(node: Value, ctx: &DecodeContext) -> Result<Self>;
}

impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(node: Value, ctx: &DecodeContext) -> Result<Self> {
        match node {
            Value::Array(items) => items.into_iter().map(|n| T::from_node(n, ctx)).collect(),
            other => Err(Error::format(format!(
                "expected an array, found {}",
                node_kind(&other)
            ))),
        }
    }
}

/// Parse JSON text into a generic tree.
pub fn parse_str(text: &str) -> Result<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Parse JSON bytes into a generic tree.
pub fn parse_slice(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse JSON text and decode it into `T`.
pub fn from_str<T: FromNode>(text: &str, ctx: &DecodeContext) -> Result<T> {
    T::from_node(parse_str(text)?, ctx)
}

/// Parse JSON bytes and decode them into `T`.
pub fn from_slice<T: FromNode>(bytes: &[u8], ctx: &DecodeContext) -> Result<T> {
    T::from_node(parse_slice(bytes)?, ctx)
}

/// Decode an already-parsed tree into `T`.
pub fn from_node<T: FromNode>(node: Value, ctx: &DecodeContext) -> Result<T> {
    T::from_node(node, ctx)
}

/// Encode a value as compact JSON text.
pub fn to_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encode a value as a generic tree.
pub fn to_node<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Structural decode of a context-free shape.
///
/// Any mismatch between the tree and `T` is reported as [`Error::Format`].
pub(crate) fn from_node_plain<T: DeserializeOwned>(node: Value) -> Result<T> {
    serde_json::from_value(node).map_err(|e| Error::format(e.to_string()))
}

/// `deserialize_with` helper: an explicit `null` decodes as `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Short name of a tree node's JSON type, for error messages.
pub(crate) fn node_kind(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
