use crate::codec::{self, DecodeContext, FromNode};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of the service's root resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// Greeting / status message
    #[serde(default)]
    pub message: String,

    /// Version of the API served at the endpoint
    #[serde(default)]
    pub api_version: String,

    /// Server build identifier
    #[serde(default)]
    pub build: String,

    #[serde(skip)]
    pub(crate) response_body: Option<Value>,
}

impl Info {
    /// The raw JSON this entity was decoded from, when response capture is enabled.
    pub fn response_body(&self) -> Option<&Value> {
        self.response_body.as_ref()
    }
}

impl FromNode for Info {
    fn from_node(node: Value, _ctx: &DecodeContext) -> Result<Self> {
        codec::from_node_plain(node)
    }
}
