//! Service client: request facilities over a pluggable [`Transport`].
//!
//! # Example
//!
//! ```no_run
//! use pdfdata::client::{Client, ClientOptions, ProcConfig};
//! use pdfdata::model::Operation;
//!
//! fn main() -> pdfdata::Result<()> {
//!     let client = Client::new(ClientOptions::from_env()?)?;
//!     let proc = client.procs().start(
//!         &ProcConfig::new()
//!             .with_files(["invoice.pdf"])
//!             .with_operations([Operation::Metadata, Operation::Images, Operation::text()]),
//!     )?;
//!
//!     for doc in proc.documents() {
//!         println!("{}: {} pages", doc.filename, doc.page_count);
//!     }
//!     Ok(())
//! }
//! ```

mod documents;
mod options;
mod procs;
mod resources;
mod transport;

pub use documents::DocumentsRequest;
pub use options::{ClientOptions, APIKEY_VAR, DEFAULT_ENDPOINT, ENDPOINT_VAR};
pub use procs::{ProcConfig, ProcsRequest};
pub use resources::ResourcesRequest;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{user_agent, HttpRequest, Method, Transport};

use crate::codec::DecodeContext;
use crate::decode::{ResponseDecoder, ResponseShape};
use crate::error::{Error, Result};
use crate::model::{Info, Resource};
use crate::multipart::{self, FormFields};
use std::sync::Arc;
use url::Url;

/// Client for one service endpoint.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct Client {
    options: ClientOptions,
    transport: Arc<dyn Transport>,
    decoder: ResponseDecoder,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.options.endpoint.as_str())
            .field("capture_response_bodies", &self.options.capture_response_bodies)
            .finish()
    }
}

impl Client {
    /// Create a client using the HTTP transport.
    #[cfg(feature = "http")]
    pub fn new(options: ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(&options)?;
        Ok(Self::with_transport(options, transport))
    }

    /// Create a client configured from the environment.
    #[cfg(feature = "http")]
    pub fn from_env() -> Result<Self> {
        Self::new(ClientOptions::from_env()?)
    }

    /// Create a client over a custom transport.
    pub fn with_transport(options: ClientOptions, transport: impl Transport + 'static) -> Self {
        let decoder = ResponseDecoder::new(DecodeContext::new(options.endpoint.clone()))
            .with_capture(options.capture_response_bodies);
        Self {
            options,
            transport: Arc::new(transport),
            decoder,
        }
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The service endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.options.endpoint
    }

    /// The decoder used for this client's responses.
    pub fn decoder(&self) -> &ResponseDecoder {
        &self.decoder
    }

    /// Facility for the service's root resource.
    pub fn info(&self) -> InfoRequest<'_> {
        InfoRequest { client: self }
    }

    /// Facility for source documents.
    pub fn documents(&self) -> DocumentsRequest<'_> {
        DocumentsRequest::new(self)
    }

    /// Facility for starting and retrieving procs.
    pub fn procs(&self) -> ProcsRequest<'_> {
        ProcsRequest::new(self)
    }

    /// Facility for binary resources.
    pub fn resources(&self) -> ResourcesRequest<'_> {
        ResourcesRequest::new(self)
    }

    /// Download the data of a resource.
    pub fn fetch(&self, resource: &Resource) -> Result<Vec<u8>> {
        self.resources().by_url(resource.url())
    }

    /// Build an endpoint URL from path segments (each one percent-encoded).
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.options.endpoint.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                Error::Configuration(format!(
                    "endpoint {} cannot carry a path",
                    self.options.endpoint
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    pub(crate) fn get<T: ResponseShape>(&self, url: Url) -> Result<T> {
        let response = self.transport.execute(HttpRequest::get(url))?;
        self.decoder.decode(&response)
    }

    pub(crate) fn post<T: ResponseShape>(&self, url: Url, fields: &FormFields) -> Result<T> {
        let body = multipart::encode(fields)?;
        let response = self.transport.execute(HttpRequest::post(url, body))?;
        self.decoder.decode(&response)
    }

    pub(crate) fn get_binary(&self, url: Url) -> Result<Vec<u8>> {
        let response = self.transport.execute(HttpRequest::get(url))?;
        self.decoder.check_binary(response)
    }
}

/// Facility for the root resource.
#[derive(Debug, Clone, Copy)]
pub struct InfoRequest<'a> {
    client: &'a Client,
}

impl InfoRequest<'_> {
    /// Fetch service information.
    pub fn get(&self) -> Result<Info> {
        self.client.get(self.client.endpoint().clone())
    }
}
