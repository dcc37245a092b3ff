//! Response decoding: raw HTTP responses to typed entities.
//!
//! A [`ResponseDecoder`] turns a [`RawResponse`] into one of the typed
//! response shapes the service produces (a single [`Proc`], [`Document`] or
//! [`Info`], or a list of them). It classifies the response by content type
//! and status before attempting any JSON decoding:
//!
//! | content type | status | outcome |
//! |---|---|---|
//! | `application/json` | 2xx | typed entity |
//! | `application/json` | other | [`Error::Api`] with the error body |
//! | anything else | any | [`Error::Decode`] with the body as text |

use crate::codec::{self, node_kind, DecodeContext, FromNode};
use crate::error::{Error, Result};
use crate::model::{Document, Info, Proc};
use serde_json::Value;
use std::borrow::Cow;

/// An HTTP response as delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` header value (empty if absent)
    pub content_type: String,
    /// Response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Create a response.
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Check for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check for an `application/json` content type, ignoring parameters.
    pub fn is_json(&self) -> bool {
        self.content_type
            .split(';')
            .next()
            .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false)
    }

    /// The body as (lossily decoded) text.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    fn decode_error(&self, message: impl Into<String>) -> Error {
        Error::Decode {
            status: self.status,
            content_type: self.content_type.clone(),
            message: message.into(),
        }
    }
}

/// Top-level entities that can keep the raw JSON they were decoded from.
pub trait ResponseEntity {
    /// Attach the raw response sub-tree.
    fn set_response_body(&mut self, body: Value);

    /// The attached raw sub-tree, if any.
    fn response_body(&self) -> Option<&Value>;
}

macro_rules! response_entity {
    ($($ty:ty),+) => {
        $(
            impl ResponseEntity for $ty {
                fn set_response_body(&mut self, body: Value) {
                    self.response_body = Some(body);
                }

                fn response_body(&self) -> Option<&Value> {
                    self.response_body.as_ref()
                }
            }
        )+
    };
}

response_entity!(Proc, Document, Info);

/// JSON container expected at the top of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Object,
    Array,
}

impl Envelope {
    fn accepts(self, tree: &Value) -> bool {
        match self {
            Envelope::Object => tree.is_object(),
            Envelope::Array => tree.is_array(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Envelope::Object => "object",
            Envelope::Array => "array",
        }
    }
}

/// A typed shape a response body can be decoded into.
pub trait ResponseShape: Sized {
    /// Top-level container the body must have.
    const ENVELOPE: Envelope;

    /// Decode a tree whose envelope has been checked. With `capture`, every
    /// top-level entity keeps its own raw sub-tree.
    fn from_tree(tree: Value, ctx: &DecodeContext, capture: bool) -> Result<Self>;
}

fn entity_from_tree<T: FromNode + ResponseEntity>(
    tree: Value,
    ctx: &DecodeContext,
    capture: bool,
) -> Result<T> {
    let raw = if capture { Some(tree.clone()) } else { None };
    let mut entity = T::from_node(tree, ctx)?;
    if let Some(raw) = raw {
        entity.set_response_body(raw);
    }
    Ok(entity)
}

macro_rules! response_shape {
    ($($ty:ty),+) => {
        $(
            impl ResponseShape for $ty {
                const ENVELOPE: Envelope = Envelope::Object;

                fn from_tree(tree: Value, ctx: &DecodeContext, capture: bool) -> Result<Self> {
                    entity_from_tree(tree, ctx, capture)
                }
            }

            impl ResponseShape for Vec<$ty> {
                const ENVELOPE: Envelope = Envelope::Array;

                fn from_tree(tree: Value, ctx: &DecodeContext, capture: bool) -> Result<Self> {
                    match tree {
                        Value::Array(items) => items
                            .into_iter()
                            .map(|item| entity_from_tree(item, ctx, capture))
                            .collect(),
                        other => Err(Error::format(format!(
                            "expected an array, found {}",
                            node_kind(&other)
                        ))),
                    }
                }
            }
        )+
    };
}

response_shape!(Proc, Document, Info);

/// Decodes raw responses against one service endpoint.
#[derive(Debug, Clone)]
pub struct ResponseDecoder {
    context: DecodeContext,
    capture_response_bodies: bool,
}

impl ResponseDecoder {
    /// Create a decoder that does not capture response bodies.
    pub fn new(context: DecodeContext) -> Self {
        Self {
            context,
            capture_response_bodies: false,
        }
    }

    /// Enable or disable capture of raw response sub-trees.
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture_response_bodies = capture;
        self
    }

    pub fn context(&self) -> &DecodeContext {
        &self.context
    }

    /// Decode a JSON response into `T`.
    pub fn decode<T: ResponseShape>(&self, response: &RawResponse) -> Result<T> {
        if !response.is_json() {
            log::warn!(
                "Response with status {} has unexpected Content-Type \"{}\"",
                response.status,
                response.content_type
            );
            return Err(response.decode_error(response.body_text()));
        }

        let tree = codec::parse_slice(&response.body)
            .map_err(|e| response.decode_error(format!("invalid JSON: {}", e)))?;

        if !response.is_success() {
            log::warn!("API error response with status {}", response.status);
            return Err(Error::Api {
                status: response.status,
                body: tree,
            });
        }

        if !T::ENVELOPE.accepts(&tree) {
            return Err(response.decode_error(format!(
                "expected a JSON {}, found {}",
                T::ENVELOPE.describe(),
                node_kind(&tree)
            )));
        }

        log::debug!(
            "Decoding {} response ({} bytes, capture: {})",
            T::ENVELOPE.describe(),
            response.body.len(),
            self.capture_response_bodies
        );
        T::from_tree(tree, &self.context, self.capture_response_bodies)
    }

    /// Check a binary (resource) response and hand back its body.
    ///
    /// Failure responses are classified the same way as in [`decode`](Self::decode).
    pub fn check_binary(&self, response: RawResponse) -> Result<Vec<u8>> {
        if response.is_success() {
            return Ok(response.body);
        }

        log::warn!(
            "Resource request failed with status {} ({})",
            response.status,
            response.content_type
        );
        if response.is_json() {
            let body = codec::parse_slice(&response.body)
                .map_err(|e| response.decode_error(format!("invalid JSON: {}", e)))?;
            Err(Error::Api {
                status: response.status,
                body,
            })
        } else {
            Err(response.decode_error(format!(
                "failure response with an unparseable Content-Type: {}",
                response.body_text()
            )))
        }
    }
}
