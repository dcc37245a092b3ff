//! `multipart/form-data` request bodies.
//!
//! Fields are kept in insertion order. A field may hold several values; each
//! becomes its own part under the same name. Generic JSON values are coerced
//! when the body is encoded: strings and numbers become text parts, `null` is
//! dropped, and anything else is rejected.
//!
//! # Example
//!
//! ```
//! use pdfdata::multipart::{self, FormFields, FormValue};
//!
//! let fields = FormFields::new()
//!     .with_many("tag", ["invoices", "2016"])
//!     .with("file", FormValue::file("a.pdf", b"%PDF-1.4 ...".to_vec()));
//!
//! let body = multipart::encode(&fields).unwrap();
//! assert!(body.content_type().starts_with("multipart/form-data; boundary="));
//! ```

use crate::codec::node_kind;
use crate::detect;
use crate::error::{Error, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use serde_json::{Number, Value};
use std::fs;
use std::path::Path;

const BOUNDARY_LEN: usize = 32;
const CRLF: &[u8] = b"\r\n";

/// One value of a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    /// Plain text
    Text(String),
    /// A number, sent in its JSON text form
    Number(Number),
    /// A file upload
    File {
        /// File name reported to the server
        filename: String,
        /// Raw file contents
        content: Vec<u8>,
        /// Explicit content type; detected from the content when absent
        content_type: Option<String>,
    },
    /// A pre-serialized JSON document sent as a single text field
    Json(String),
    /// A generic tree value, coerced when the body is encoded
    Node(Value),
}

impl FormValue {
    /// A text value.
    pub fn text(value: impl Into<String>) -> Self {
        FormValue::Text(value.into())
    }

    /// A file value with a detected content type.
    pub fn file(filename: impl Into<String>, content: Vec<u8>) -> Self {
        FormValue::File {
            filename: filename.into(),
            content,
            content_type: None,
        }
    }

    /// Read a file from disk, using its file name as the part's file name.
    pub fn file_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::file(filename, content))
    }

    /// Serialize `value` as a JSON blob.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(FormValue::Json(serde_json::to_string(value)?))
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

impl From<u64> for FormValue {
    fn from(value: u64) -> Self {
        FormValue::Number(value.into())
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        FormValue::Number(value.into())
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        FormValue::Node(value)
    }
}

/// Ordered form fields, each with one or more values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormFields {
    fields: Vec<(String, Vec<FormValue>)>,
}

impl FormFields {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FormValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Append several values to `name`.
    pub fn with_many<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FormValue>,
    {
        let name = name.into();
        for value in values {
            self.push(name.clone(), value);
        }
        self
    }

    /// Append a value to `name`, creating the field on first use.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FormValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value),
            None => self.fields.push((name, vec![value])),
        }
    }

    /// Values of a field.
    pub fn get(&self, name: &str) -> Option<&[FormValue]> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    /// Field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An encoded `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    /// The boundary separating parts.
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value of the `Content-Type` header to send with this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }
}

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: &'a str,
    content: PartContent<'a>,
}

enum PartContent<'a> {
    Borrowed(&'a [u8]),
    Owned(Vec<u8>),
}

impl PartContent<'_> {
    fn as_bytes(&self) -> &[u8] {
        match self {
            PartContent::Borrowed(bytes) => bytes,
            PartContent::Owned(bytes) => bytes,
        }
    }
}

const TEXT_PLAIN: &str = "text/plain; charset=UTF-8";

fn text_part<'a>(name: &'a str, content: PartContent<'a>) -> Part<'a> {
    Part {
        name,
        filename: None,
        content_type: TEXT_PLAIN,
        content,
    }
}

/// Turn one field value into a part, or `None` for values that are skipped.
fn to_part<'a>(name: &'a str, value: &'a FormValue) -> Result<Option<Part<'a>>> {
    let part = match value {
        FormValue::Text(text) | FormValue::Json(text) => {
            text_part(name, PartContent::Borrowed(text.as_bytes()))
        }
        FormValue::Number(n) => text_part(name, PartContent::Owned(n.to_string().into_bytes())),
        FormValue::File {
            filename,
            content,
            content_type,
        } => Part {
            name,
            filename: Some(filename.as_str()),
            content_type: content_type
                .as_deref()
                .unwrap_or_else(|| detect::content_type(filename, content)),
            content: PartContent::Borrowed(content.as_slice()),
        },
        FormValue::Node(Value::Null) => return Ok(None),
        FormValue::Node(Value::String(text)) => {
            text_part(name, PartContent::Borrowed(text.as_bytes()))
        }
        FormValue::Node(Value::Number(n)) => {
            text_part(name, PartContent::Owned(n.to_string().into_bytes()))
        }
        FormValue::Node(other) => {
            return Err(Error::Configuration(format!(
                "Illegal value of type {} provided for form field \"{}\"",
                node_kind(other),
                name
            )))
        }
    };
    Ok(Some(part))
}

fn random_boundary() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(BOUNDARY_LEN)
        .map(char::from)
        .collect();
    format!("----pdfdata{}", token)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Header parameter values are quoted; quotes and line breaks cannot appear inside.
fn quote(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Encode fields as a `multipart/form-data` body with a fresh random boundary.
pub fn encode(fields: &FormFields) -> Result<MultipartBody> {
    encode_with(fields, random_boundary)
}

fn encode_with(
    fields: &FormFields,
    mut next_boundary: impl FnMut() -> String,
) -> Result<MultipartBody> {
    let mut parts = Vec::new();
    for (name, values) in &fields.fields {
        for value in values {
            if let Some(part) = to_part(name, value)? {
                parts.push(part);
            }
        }
    }

    let boundary = loop {
        let candidate = next_boundary();
        if !parts
            .iter()
            .any(|part| contains(part.content.as_bytes(), candidate.as_bytes()))
        {
            break candidate;
        }
        log::debug!("Boundary collided with part content, regenerating");
    };

    let mut body = Vec::new();
    for part in &parts {
        body.extend_from_slice(b"--");
        body.extend_from_slice(boundary.as_bytes());
        body.extend_from_slice(CRLF);

        let disposition = match part.filename {
            Some(filename) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                quote(part.name),
                quote(filename)
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"", quote(part.name)),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(CRLF);
        body.extend_from_slice(format!("Content-Type: {}", part.content_type).as_bytes());
        body.extend_from_slice(CRLF);
        if part.filename.is_some() {
            body.extend_from_slice(b"Content-Transfer-Encoding: binary");
            body.extend_from_slice(CRLF);
        }
        body.extend_from_slice(CRLF);
        body.extend_from_slice(part.content.as_bytes());
        body.extend_from_slice(CRLF);
    }
    body.extend_from_slice(b"--");
    body.extend_from_slice(boundary.as_bytes());
    body.extend_from_slice(b"--");
    body.extend_from_slice(CRLF);

    log::debug!("Encoded {} form parts ({} bytes)", parts.len(), body.len());
    Ok(MultipartBody { boundary, body })
}
