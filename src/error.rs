//! Error types for the pdfdata client.

use std::io;
use thiserror::Error;

/// Result type alias for pdfdata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while encoding requests, decoding responses,
/// or linking decoded entities.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading upload files or writing downloaded resources.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON text outside of an HTTP response.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A well-formed JSON value does not fit the declared shape
    /// (bad timestamp, bounds array of the wrong length, unknown enum tag...).
    #[error("Format error: {message}")]
    Format {
        /// What was wrong, including the offending value.
        message: String,
    },

    /// A discriminator tag that the operation registry does not know.
    #[error("Unknown operation variant: \"{tag}\"")]
    UnknownVariant {
        /// The offending `op` value.
        tag: String,
    },

    /// The response could not be decoded: unexpected content type, invalid
    /// JSON, or an envelope of the wrong shape.
    #[error("Cannot decode response (status {status}, Content-Type: {content_type}): {message}")]
    Decode {
        /// HTTP status code of the response.
        status: u16,
        /// Content-Type header of the response.
        content_type: String,
        /// Description of the problem; for non-JSON bodies, the body text.
        message: String,
    },

    /// The service answered with a structured (JSON) error.
    #[error("The PDFDATA.io API responded with an error (status {status}): {body}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// The error body as sent by the service.
        body: serde_json::Value,
    },

    /// A resourceful entity names a resource that its result does not carry.
    #[error(
        "No resource \"{resource_id}\" in result {result_index} of document {document_id}"
    )]
    BrokenReference {
        /// The missing resource ID.
        resource_id: String,
        /// The document whose result was being linked.
        document_id: String,
        /// Position of the result within the document's results.
        result_index: usize,
    },

    /// A resource resolved to a different variant than the entity requires.
    #[error("Resource {resource_id} was supposed to be a {expected} resource, but was {found} instead")]
    VariantMismatch {
        /// The resource ID that was resolved.
        resource_id: String,
        /// The variant the entity requires.
        expected: &'static str,
        /// The variant found in the result's resource map.
        found: &'static str,
    },

    /// A processed document's results are not aligned with the proc's operations.
    #[error("Result {index} of document {document_id} is \"{found}\", expected \"{expected}\"")]
    ResultMismatch {
        /// The document whose results are misaligned.
        document_id: String,
        /// Position of the first misaligned result.
        index: usize,
        /// Operation tag at that position (empty if there is no operation).
        expected: String,
        /// Result tag at that position (empty if there is no result).
        found: String,
    },

    /// Invalid configuration or request parameters supplied by the caller.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The HTTP transport failed before a response was received.
    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Build a [`Error::Format`] from anything printable.
    pub(crate) fn format(message: impl Into<String>) -> Self {
        Error::Format {
            message: message.into(),
        }
    }

    /// Convert into a serde deserialization error.
    ///
    /// Format errors pass only their message, so the outer decode does not
    /// repeat the "Format error" prefix.
    pub(crate) fn into_de<E: serde::de::Error>(self) -> E {
        match self {
            Error::Format { message } => E::custom(message),
            other => E::custom(other),
        }
    }

    /// Returns the HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Decode { status, .. } | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownVariant {
            tag: "unknown-op".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown operation variant: \"unknown-op\"");

        let err = Error::VariantMismatch {
            resource_id: "res_1".to_string(),
            expected: "bitmap",
            found: "generic",
        };
        assert_eq!(
            err.to_string(),
            "Resource res_1 was supposed to be a bitmap resource, but was generic instead"
        );
    }

    #[test]
    fn test_error_status() {
        let err = Error::Decode {
            status: 502,
            content_type: "text/html".to_string(),
            message: "Bad Gateway".to_string(),
        };
        assert_eq!(err.status(), Some(502));
        assert_eq!(Error::Configuration("x".into()).status(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
