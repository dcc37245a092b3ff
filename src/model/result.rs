//! Operation results: the per-document outcome of each operation in a proc.

use super::{Attachment, Dimensions, Image, OperationKind, Resource};
use crate::codec::{self, node_kind, timestamp, DecodeContext, FromNode};
use crate::error::{Error, Result};
use crate::registry::OperationRegistry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A page of `images` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePage {
    /// Page number (0-indexed)
    pub pagenum: u32,

    /// Page size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,

    /// Images found on the page
    #[serde(default)]
    pub images: Vec<Image>,
}

/// A page of `text` output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPage {
    /// Page number (0-indexed)
    pub pagenum: u32,

    /// Page size in points
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,

    /// Extracted text
    #[serde(default)]
    pub text: String,
}

/// A page that matched one of the submitted page templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMatch {
    /// Page number (0-indexed)
    #[serde(rename = "pagenum")]
    pub page_number: u32,

    /// Name of the matching template
    #[serde(rename = "template")]
    pub template_name: String,

    /// Region name to the text extracted from that region
    #[serde(default)]
    pub regions: BTreeMap<String, String>,
}

/// Kind-specific payload of an [`OperationResult`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResultData {
    /// Free-form document metadata
    Metadata(Value),
    /// XMP packet converted to JSON
    XmpMetadata(Value),
    Images(Vec<ImagePage>),
    Text(Vec<TextPage>),
    Attachments(Vec<Attachment>),
    PageTemplates(Vec<TemplateMatch>),
}

impl ResultData {
    /// Empty payload of the given kind, used when a result carries no data.
    pub fn empty(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Metadata => ResultData::Metadata(Value::Null),
            OperationKind::XmpMetadata => ResultData::XmpMetadata(Value::Null),
            OperationKind::Images => ResultData::Images(Vec::new()),
            OperationKind::Text => ResultData::Text(Vec::new()),
            OperationKind::Attachments => ResultData::Attachments(Vec::new()),
            OperationKind::PageTemplates => ResultData::PageTemplates(Vec::new()),
        }
    }

    /// The operation kind this payload belongs to.
    pub fn kind(&self) -> OperationKind {
        match self {
            ResultData::Metadata(_) => OperationKind::Metadata,
            ResultData::XmpMetadata(_) => OperationKind::XmpMetadata,
            ResultData::Images(_) => OperationKind::Images,
            ResultData::Text(_) => OperationKind::Text,
            ResultData::Attachments(_) => OperationKind::Attachments,
            ResultData::PageTemplates(_) => OperationKind::PageTemplates,
        }
    }
}

/// Read-only view over `metadata` result data.
///
/// PDF metadata is free-form; the accessors cover the well-known keys and
/// [`MetadataFields::get`] reaches everything else.
#[derive(Debug, Clone, Copy)]
pub struct MetadataFields<'a> {
    data: &'a Value,
}

impl<'a> MetadataFields<'a> {
    /// Raw value of any metadata key.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key)
    }

    fn text(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&'a str> {
        self.text("Title")
    }

    pub fn author(&self) -> Option<&'a str> {
        self.text("Author")
    }

    pub fn subject(&self) -> Option<&'a str> {
        self.text("Subject")
    }

    pub fn keywords(&self) -> Option<&'a str> {
        self.text("Keywords")
    }

    pub fn creator(&self) -> Option<&'a str> {
        self.text("Creator")
    }

    pub fn producer(&self) -> Option<&'a str> {
        self.text("Producer")
    }

    /// `CreationDate`, parsed as a wire timestamp.
    pub fn creation_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.text("CreationDate").map(timestamp::parse).transpose()
    }

    /// `ModDate`, parsed as a wire timestamp.
    pub fn modification_date(&self) -> Result<Option<DateTime<Utc>>> {
        self.text("ModDate").map(timestamp::parse).transpose()
    }

    /// The whole metadata object.
    pub fn raw(&self) -> &'a Value {
        self.data
    }
}

/// The outcome of applying one operation to one document.
///
/// Results are positionally aligned with the operations of their proc: the
/// i-th result of every processed document belongs to the i-th operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResult {
    failure: bool,
    pub(crate) resources: HashMap<String, Arc<Resource>>,
    pub(crate) document: Option<usize>,
    pub(crate) data: ResultData,
}

impl OperationResult {
    /// Kind of the operation that produced this result.
    pub fn kind(&self) -> OperationKind {
        self.data.kind()
    }

    /// The `op` discriminator of this result.
    pub fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    /// Returns `false` if the operation was applied and yielded data without error.
    pub fn is_failure(&self) -> bool {
        self.failure
    }

    /// Resources carried by this result, by ID.
    ///
    /// Only `images` and `attachments` results produce resources; for every
    /// other kind the map is empty.
    pub fn resources(&self) -> &HashMap<String, Arc<Resource>> {
        &self.resources
    }

    /// Look up one resource by ID.
    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id).map(Arc::as_ref)
    }

    /// Index of the owning document within its proc, once the proc is built.
    ///
    /// See [`Proc::document_of`](super::Proc::document_of).
    pub fn document_index(&self) -> Option<usize> {
        self.document
    }

    pub fn data(&self) -> &ResultData {
        &self.data
    }

    /// Metadata fields, for `metadata` results.
    pub fn metadata(&self) -> Option<MetadataFields<'_>> {
        match &self.data {
            ResultData::Metadata(data) => Some(MetadataFields { data }),
            _ => None,
        }
    }

    /// XMP tree, for `xmp-metadata` results.
    pub fn xmp_metadata(&self) -> Option<&Value> {
        match &self.data {
            ResultData::XmpMetadata(data) => Some(data),
            _ => None,
        }
    }

    /// Pages with images, for `images` results.
    pub fn image_pages(&self) -> Option<&[ImagePage]> {
        match &self.data {
            ResultData::Images(pages) => Some(pages),
            _ => None,
        }
    }

    /// Pages with text, for `text` results.
    pub fn text_pages(&self) -> Option<&[TextPage]> {
        match &self.data {
            ResultData::Text(pages) => Some(pages),
            _ => None,
        }
    }

    /// Attachments, for `attachments` results.
    pub fn attachments(&self) -> Option<&[Attachment]> {
        match &self.data {
            ResultData::Attachments(attachments) => Some(attachments),
            _ => None,
        }
    }

    /// Template matches, for `page-templates` results.
    pub fn template_matches(&self) -> Option<&[TemplateMatch]> {
        match &self.data {
            ResultData::PageTemplates(matches) => Some(matches),
            _ => None,
        }
    }
}

impl FromNode for OperationResult {
    fn from_node(node: Value, ctx: &DecodeContext) -> Result<Self> {
        let entry = OperationRegistry::dispatch(&node)?;
        let mut object = match node {
            Value::Object(object) => object,
            other => {
                return Err(Error::format(format!(
                    "expected a result object, found {}",
                    node_kind(&other)
                )))
            }
        };

        let failure = match object.remove("failure") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(failure)) => failure,
            Some(other) => {
                return Err(Error::format(format!(
                    "\"failure\" must be a boolean, found {}",
                    node_kind(&other)
                )))
            }
        };

        let resources = match object.remove("resources") {
            None | Some(Value::Null) => HashMap::new(),
            Some(Value::Object(entries)) => entries
                .into_iter()
                .map(|(id, node)| Ok((id, Arc::new(Resource::from_node(node, ctx)?))))
                .collect::<Result<HashMap<_, _>>>()?,
            Some(other) => {
                return Err(Error::format(format!(
                    "\"resources\" must be an object, found {}",
                    node_kind(&other)
                )))
            }
        };

        let data = match object.remove("data") {
            None | Some(Value::Null) => ResultData::empty(entry.kind),
            Some(data) => (entry.decode_data)(data)?,
        };

        Ok(Self {
            failure,
            resources,
            document: None,
            data,
        })
    }
}

/// Encodes the wire shape of a result, with absolute resource URLs.
impl Serialize for OperationResult {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::{Error as _, SerializeMap};

        let data = match &self.data {
            ResultData::Metadata(v) | ResultData::XmpMetadata(v) => v.clone(),
            ResultData::Images(pages) => codec::to_node(pages).map_err(S::Error::custom)?,
            ResultData::Text(pages) => codec::to_node(pages).map_err(S::Error::custom)?,
            ResultData::Attachments(list) => codec::to_node(list).map_err(S::Error::custom)?,
            ResultData::PageTemplates(list) => codec::to_node(list).map_err(S::Error::custom)?,
        };
        let resources: BTreeMap<&str, WireResourceRef<'_>> = self
            .resources
            .iter()
            .map(|(id, res)| (id.as_str(), WireResourceRef(res)))
            .collect();

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("data", &data)?;
        map.serialize_entry("failure", &self.failure)?;
        map.serialize_entry("op", self.tag())?;
        if !resources.is_empty() {
            map.serialize_entry("resources", &resources)?;
        }
        map.end()
    }
}

struct WireResourceRef<'a>(&'a Resource);

impl Serialize for WireResourceRef<'_> {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        if let Some(dimensions) = self.0.dimensions() {
            map.serialize_entry("dimensions", &dimensions)?;
        }
        map.serialize_entry("mimetype", self.0.mimetype())?;
        map.serialize_entry("url", self.0.url().as_str())?;
        map.end()
    }
}
