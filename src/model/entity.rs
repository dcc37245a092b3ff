//! Resourceful entities: result elements that refer to exactly one resource.

use super::{Bounds, Resource};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

/// Link from an entity to its resource.
///
/// Decoding produces [`ResourceLink::Unresolved`]; the resolver pass turns it
/// into [`ResourceLink::Resolved`], sharing the resource owned by the
/// enclosing result's resource map.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceLink {
    /// Only the resource ID is known.
    Unresolved(String),
    /// Bound to the resource with this ID in the owning result.
    Resolved {
        /// Resource ID
        id: String,
        /// The resource, shared with the result's resource map
        resource: Arc<Resource>,
    },
}

impl ResourceLink {
    /// The resource ID carried on the wire.
    pub fn id(&self) -> &str {
        match self {
            ResourceLink::Unresolved(id) | ResourceLink::Resolved { id, .. } => id,
        }
    }

    /// The linked resource, once resolved.
    pub fn resource(&self) -> Option<&Resource> {
        self.shared().map(Arc::as_ref)
    }

    /// The linked resource as a shared handle, once resolved.
    pub fn shared(&self) -> Option<&Arc<Resource>> {
        match self {
            ResourceLink::Resolved { resource, .. } => Some(resource),
            ResourceLink::Unresolved(_) => None,
        }
    }

    /// Check if the link has been resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResourceLink::Resolved { .. })
    }

    /// Find this link's entry in `resources`.
    pub(crate) fn lookup<'r>(
        &self,
        resources: &'r HashMap<String, Arc<Resource>>,
    ) -> Option<&'r Arc<Resource>> {
        resources.get(self.id())
    }

    /// Bind this link to `resource`, replacing any earlier binding.
    pub(crate) fn bind(&mut self, resource: Arc<Resource>) {
        let id = self.id().to_string();
        *self = ResourceLink::Resolved { id, resource };
    }
}

impl Serialize for ResourceLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for ResourceLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer).map(ResourceLink::Unresolved)
    }
}

/// A file attachment embedded in a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(rename = "resource")]
    pub(crate) link: ResourceLink,

    /// Attachment description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// File name / location of the attachment within the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Attachment title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page the attachment annotation appears on (0-indexed)
    #[serde(default)]
    pub pagenum: u32,

    /// On-page bounds of the attachment annotation, for page-level attachments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl Attachment {
    /// The resource ID carrying this attachment's data.
    pub fn resource_id(&self) -> &str {
        self.link.id()
    }

    /// The attachment's resource, once resolved.
    pub fn resource(&self) -> Option<&Resource> {
        self.link.resource()
    }

    /// The resource link.
    pub fn link(&self) -> &ResourceLink {
        &self.link
    }
}

/// A bitmap image embedded on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    #[serde(rename = "resource")]
    pub(crate) link: ResourceLink,

    /// On-page bounding box within which the bitmap is rendered.
    ///
    /// These are page coordinates, not the raster size; see
    /// [`Image::dimensions`] for that.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

impl Image {
    /// The resource ID carrying this image's raster data.
    pub fn resource_id(&self) -> &str {
        self.link.id()
    }

    /// The image's bitmap resource, once resolved.
    pub fn resource(&self) -> Option<&Resource> {
        self.link.resource()
    }

    /// Raster size of the bitmap, once resolved.
    pub fn dimensions(&self) -> Option<super::Dimensions> {
        self.resource().and_then(Resource::dimensions)
    }

    /// The resource link.
    pub fn link(&self) -> &ResourceLink {
        &self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dimensions;
    use serde_json::json;
    use url::Url;

    fn bitmap() -> Arc<Resource> {
        Arc::new(Resource::Bitmap {
            url: Url::parse("https://api.pdfdata.io/v1/resources/res_1").unwrap(),
            mimetype: "image/png".to_string(),
            dimensions: Dimensions::new(10, 20),
        })
    }

    #[test]
    fn test_decoded_link_is_unresolved() {
        let image: Image =
            serde_json::from_value(json!({"resource": "res_1", "bounds": [0, 0, 10, 10]})).unwrap();
        assert_eq!(image.resource_id(), "res_1");
        assert!(!image.link().is_resolved());
        assert!(image.resource().is_none());
    }

    #[test]
    fn test_bind_shares_resource() {
        let mut resources = HashMap::new();
        resources.insert("res_1".to_string(), bitmap());

        let mut link = ResourceLink::Unresolved("res_1".to_string());
        let resource = Arc::clone(link.lookup(&resources).unwrap());
        link.bind(resource);
        assert!(link.is_resolved());
        assert_eq!(link.id(), "res_1");
        assert!(Arc::ptr_eq(link.shared().unwrap(), &resources["res_1"]));
    }

    #[test]
    fn test_lookup_missing() {
        let resources = HashMap::new();
        let link = ResourceLink::Unresolved("res_9".to_string());
        assert!(link.lookup(&resources).is_none());
    }

    #[test]
    fn test_attachment_serializes_resource_id() {
        let attachment: Attachment = serde_json::from_value(json!({
            "resource": "res_a", "location": "avatar.png", "description": "logo", "pagenum": 0
        }))
        .unwrap();
        let node = serde_json::to_value(&attachment).unwrap();
        assert_eq!(node["resource"], "res_a");
        assert!(node.get("title").is_none());
        assert!(node.get("bounds").is_none());
    }
}
