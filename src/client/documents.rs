//! Source document storage.

use super::Client;
use crate::codec::timestamp;
use crate::error::Result;
use crate::model::Document;
use crate::multipart::{FormFields, FormValue};
use chrono::{DateTime, TimeZone, Utc};
use std::path::Path;

/// Facility for source documents.
#[derive(Debug, Clone, Copy)]
pub struct DocumentsRequest<'a> {
    client: &'a Client,
}

impl<'a> DocumentsRequest<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Retrieve a stored document.
    pub fn by_id(&self, id: &str) -> Result<Document> {
        self.client.get(self.client.url(&["documents", id])?)
    }

    /// List all stored documents.
    pub fn list(&self) -> Result<Vec<Document>> {
        let far_future = Utc
            .with_ymd_and_hms(2099, 12, 31, 23, 59, 59)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.list_before(far_future)
    }

    /// List stored documents created before `before`.
    pub fn list_before(&self, before: DateTime<Utc>) -> Result<Vec<Document>> {
        let mut url = self.client.url(&["documents"])?;
        url.query_pairs_mut()
            .append_pair("before", &timestamp::format(&before));
        self.client.get(url)
    }

    /// Upload files without tags.
    pub fn upload<I, P>(&self, files: I) -> Result<Vec<Document>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.upload_tagged(std::iter::empty::<&str>(), files)
    }

    /// Upload files, tagging every one of them with `tags`.
    pub fn upload_tagged<T, S, I, P>(&self, tags: T, files: I) -> Result<Vec<Document>>
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut fields = FormFields::new()
            .with_many("tag", tags.into_iter().map(|tag| FormValue::Text(tag.into())));
        for file in files {
            fields.push("file", FormValue::file_from_path(file)?);
        }
        self.client.post(self.client.url(&["documents"])?, &fields)
    }
}
