//! Binary resources (images, attachments) produced by some operations.

use super::Dimensions;
use crate::codec::{self, DecodeContext, FromNode};
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// A binary artifact referenced by ID from within a result.
///
/// The variant is chosen structurally: a `dimensions` key on the wire selects
/// [`Resource::Bitmap`], its absence selects [`Resource::Generic`]. There is
/// no explicit type tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Any binary data (e.g. an embedded file attachment).
    Generic {
        /// Absolute URL from which the data can be retrieved
        url: Url,
        /// MIME type (e.g., "application/pdf")
        mimetype: String,
    },
    /// Raster image data with known pixel dimensions.
    Bitmap {
        /// Absolute URL from which the data can be retrieved
        url: Url,
        /// MIME type (e.g., "image/png")
        mimetype: String,
        /// Raster size in pixels (not the on-page size)
        dimensions: Dimensions,
    },
}

#[derive(Deserialize)]
struct WireResource {
    url: String,
    mimetype: String,
    #[serde(default)]
    dimensions: Option<Dimensions>,
}

impl Resource {
    /// URL of the resource data, already resolved against the service endpoint.
    pub fn url(&self) -> &Url {
        match self {
            Resource::Generic { url, .. } | Resource::Bitmap { url, .. } => url,
        }
    }

    /// MIME type of the resource data.
    pub fn mimetype(&self) -> &str {
        match self {
            Resource::Generic { mimetype, .. } | Resource::Bitmap { mimetype, .. } => mimetype,
        }
    }

    /// Pixel dimensions, for bitmap resources.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match self {
            Resource::Bitmap { dimensions, .. } => Some(*dimensions),
            Resource::Generic { .. } => None,
        }
    }

    /// Check if this is a bitmap resource.
    pub fn is_bitmap(&self) -> bool {
        matches!(self, Resource::Bitmap { .. })
    }

    /// Short name of the variant ("bitmap" or "generic").
    pub fn variant_name(&self) -> &'static str {
        match self {
            Resource::Generic { .. } => "generic",
            Resource::Bitmap { .. } => "bitmap",
        }
    }

    /// Get a suggested filename for saving this resource under the given ID.
    pub fn suggested_filename(&self, id: &str) -> String {
        format!("{}.{}", id, self.extension())
    }

    /// Get the file extension based on MIME type.
    pub fn extension(&self) -> &str {
        match self.mimetype() {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/tiff" => "tiff",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            "image/jp2" | "image/jpeg2000" => "jp2",
            "application/pdf" => "pdf",
            "application/xml" | "text/xml" => "xml",
            "text/plain" => "txt",
            _ if self.is_bitmap() => "raw",
            _ => "bin",
        }
    }
}

impl FromNode for Resource {
    fn from_node(node: Value, ctx: &DecodeContext) -> Result<Self> {
        let wire: WireResource = codec::from_node_plain(node)?;
        let url = ctx.resolve_url(&wire.url)?;
        Ok(match wire.dimensions {
            Some(dimensions) => Resource::Bitmap {
                url,
                mimetype: wire.mimetype,
                dimensions,
            },
            None => Resource::Generic {
                url,
                mimetype: wire.mimetype,
            },
        })
    }
}
