//! Starting and retrieving procs.

use super::Client;
use crate::error::{Error, Result};
use crate::model::{Operation, Proc};
use crate::multipart::{FormFields, FormValue};
use crate::resolve;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Configuration of a new proc.
///
/// Source documents are given by exactly one of: IDs of stored documents,
/// files to upload, or tags selecting stored documents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcConfig {
    document_ids: BTreeSet<String>,
    files: Vec<PathBuf>,
    tags: BTreeSet<String>,
    operations: Vec<Operation>,
    wait: Option<u32>,
}

impl ProcConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stored documents by ID.
    pub fn with_document_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.document_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Add files to upload and process.
    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        for path in paths {
            let path = path.into();
            if !self.files.contains(&path) {
                self.files.push(path);
            }
        }
        self
    }

    /// Add tags selecting stored documents.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Append operations, keeping their order.
    pub fn with_operations<I>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(operations);
        self
    }

    /// Ask the service to wait up to `seconds` for the proc to complete
    /// before responding.
    pub fn with_wait(mut self, seconds: u32) -> Self {
        self.wait = Some(seconds);
        self
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Check that exactly one kind of source document identifier is set.
    pub fn validate(&self) -> Result<()> {
        let used: Vec<&str> = [
            ("docid", !self.document_ids.is_empty()),
            ("file", !self.files.is_empty()),
            ("tag", !self.tags.is_empty()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| name)
        .collect();

        match used.len() {
            1 => Ok(()),
            0 => Err(Error::Configuration(
                "No source documents were specified, cannot create proc. You must provide: a set \
                 of files to upload and process OR a set of tags used to identify \
                 previously-uploaded source documents OR a set of document IDs. Use one of \
                 `.with_files()`, `.with_tags()`, or `.with_document_ids()` prior to attempting \
                 to `.start()` the proc."
                    .to_string(),
            )),
            _ => Err(Error::Configuration(format!(
                "Attempted to start a proc with more than one type of identifier of source \
                 documents: [{}]. Only *one* of new files to upload, document tags, or document \
                 IDs can be provided when configuring a new proc.",
                used.join(", ")
            ))),
        }
    }

    /// Form fields of the proc-creation request. Reads the files to upload.
    pub fn to_form_fields(&self) -> Result<FormFields> {
        let mut fields =
            FormFields::new().with_many("docid", self.document_ids.iter().map(String::as_str));
        for path in &self.files {
            fields.push("file", FormValue::file_from_path(path)?);
        }
        let mut fields = fields.with_many("tag", self.tags.iter().map(String::as_str));
        if let Some(wait) = self.wait {
            fields.push("wait", u64::from(wait));
        }
        fields.push("operations", FormValue::json(&self.operations)?);
        Ok(fields)
    }
}

/// Facility for procs.
#[derive(Debug, Clone, Copy)]
pub struct ProcsRequest<'a> {
    client: &'a Client,
}

impl<'a> ProcsRequest<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Retrieve a proc, with its resources resolved.
    pub fn by_id(&self, id: &str) -> Result<Proc> {
        let proc: Proc = self.client.get(self.client.url(&["procs", id])?)?;
        resolve::resolve(proc)
    }

    /// Start a new proc, with its resources resolved.
    pub fn start(&self, config: &ProcConfig) -> Result<Proc> {
        config.validate()?;
        let fields = config.to_form_fields()?;
        log::debug!(
            "Starting proc with {} operations",
            config.operations().len()
        );
        let proc: Proc = self.client.post(self.client.url(&["procs"])?, &fields)?;
        resolve::resolve(proc)
    }
}
