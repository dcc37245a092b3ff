//! Binary resource downloads.

use super::Client;
use crate::error::Result;
use url::Url;

/// Facility for binary resources.
#[derive(Debug, Clone, Copy)]
pub struct ResourcesRequest<'a> {
    client: &'a Client,
}

impl<'a> ResourcesRequest<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Download a resource by ID.
    pub fn by_id(&self, id: &str) -> Result<Vec<u8>> {
        self.fetch(self.client.url(&["resources", id])?)
    }

    /// Download a resource by URL.
    ///
    /// Only the path and query of `url` are used; the request always goes to
    /// the configured endpoint's host.
    pub fn by_url(&self, url: &Url) -> Result<Vec<u8>> {
        let mut target = self.client.endpoint().clone();
        target.set_path(url.path());
        target.set_query(url.query());
        self.fetch(target)
    }

    fn fetch(&self, url: Url) -> Result<Vec<u8>> {
        log::debug!("Fetching resource {}", url);
        self.client.get_binary(url)
    }
}
