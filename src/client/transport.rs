//! HTTP transport seam.
//!
//! The client builds [`HttpRequest`]s and hands them to a [`Transport`]; the
//! transport returns a [`RawResponse`] for any response it received, whatever
//! the status. Only failures to obtain a response at all are errors here.

use crate::decode::RawResponse;
use crate::error::Result;
use crate::multipart::MultipartBody;
use std::fmt;
use url::Url;

#[cfg(feature = "http")]
use super::ClientOptions;
#[cfg(feature = "http")]
use crate::error::Error;

/// HTTP methods used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// An outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    /// Request-specific headers; the transport adds authentication and `Accept`
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// A GET request without body.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A POST request carrying a multipart body.
    pub fn post(url: Url, body: MultipartBody) -> Self {
        Self {
            method: Method::Post,
            url,
            headers: vec![("Content-Type".to_string(), body.content_type())],
            body: Some(body.into_body()),
        }
    }

    /// Look up a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Executes HTTP requests.
pub trait Transport: Send + Sync {
    /// Send `request` and return the response, successful or not.
    fn execute(&self, request: HttpRequest) -> Result<RawResponse>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: HttpRequest) -> Result<RawResponse> {
        (**self).execute(request)
    }
}

/// `User-Agent` sent with every request.
pub fn user_agent() -> String {
    format!("PDFDATA.io/v1 RustBindings/{}", env!("CARGO_PKG_VERSION"))
}

/// Blocking HTTP transport backed by `reqwest`.
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    api_key: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Build a transport from client options. An API key is required.
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let api_key = options.api_key.clone().ok_or_else(|| {
            Error::Configuration(format!(
                "You must provide an API key to use this library, either through \
                 `ClientOptions::with_api_key()` or by setting the {} environment variable.",
                super::options::APIKEY_VAR
            ))
        })?;

        let client = reqwest::blocking::Client::builder()
            .connect_timeout(options.connect_timeout)
            .timeout(options.read_timeout)
            .user_agent(user_agent())
            .build()?;

        Ok(Self { client, api_key })
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn execute(&self, request: HttpRequest) -> Result<RawResponse> {
        log::debug!("{} {}", request.method, request.url);

        let mut builder = match request.method {
            Method::Get => self.client.get(request.url),
            Method::Post => self.client.post(request.url),
        };
        builder = builder
            .basic_auth(&self.api_key, Option::<&str>::None)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::ACCEPT_CHARSET, "UTF-8")
            .header("X-API-Intent", "Y");
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes()?.to_vec();

        log::debug!("{} response, {} bytes ({})", status, body.len(), content_type);
        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
