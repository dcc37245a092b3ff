//! Client configuration.

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use url::Url;

/// Default service endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.pdfdata.io/v1/";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_VAR: &str = "PDFDATA_ENDPOINT";

/// Environment variable holding the API key.
pub const APIKEY_VAR: &str = "PDFDATA_APIKEY";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(80);

/// Options for talking to the service.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Service endpoint, always ending with `/`
    pub endpoint: Url,

    /// API key, sent as the basic-auth user name
    pub api_key: Option<String>,

    /// Timeout for establishing connections
    pub connect_timeout: Duration,

    /// Timeout for a whole request, including reading the response
    pub read_timeout: Duration,

    /// Keep the raw JSON of every decoded top-level entity
    pub capture_response_bodies: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            capture_response_bodies: false,
        }
    }
}

fn default_endpoint() -> Url {
    match Url::parse(DEFAULT_ENDPOINT) {
        Ok(url) => url,
        Err(e) => unreachable!("default endpoint is a valid URL: {}", e),
    }
}

/// Ensure the endpoint path ends with `/` so relative paths join beneath it.
fn normalize(mut endpoint: Url) -> Url {
    if !endpoint.path().ends_with('/') {
        let path = format!("{}/", endpoint.path());
        endpoint.set_path(&path);
    }
    endpoint
}

impl ClientOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `PDFDATA_ENDPOINT` and `PDFDATA_APIKEY` from the environment.
    ///
    /// Missing variables leave the defaults in place; an endpoint that is
    /// not a valid URL is an error.
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Ok(endpoint) = env::var(ENDPOINT_VAR) {
            options = options.with_endpoint_str(&endpoint).map_err(|_| {
                Error::Configuration(format!(
                    "The `{}` environment variable is set improperly: \"{}\" is not a valid URL",
                    ENDPOINT_VAR, endpoint
                ))
            })?;
        }
        if let Ok(key) = env::var(APIKEY_VAR) {
            options = options.with_api_key(key);
        }
        Ok(options)
    }

    /// Set the service endpoint.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = normalize(endpoint);
        self
    }

    /// Parse and set the service endpoint.
    pub fn with_endpoint_str(self, endpoint: &str) -> Result<Self> {
        let url = Url::parse(endpoint).map_err(|e| {
            Error::Configuration(format!("\"{}\" is not a valid URL: {}", endpoint, e))
        })?;
        Ok(self.with_endpoint(url))
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Enable capture of raw response bodies.
    pub fn with_capture_response_bodies(mut self, capture: bool) -> Self {
        self.capture_response_bodies = capture;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::new();
        assert_eq!(options.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(options.connect_timeout, Duration::from_secs(30));
        assert_eq!(options.read_timeout, Duration::from_secs(80));
        assert!(options.api_key.is_none());
        assert!(!options.capture_response_bodies);
    }

    #[test]
    fn test_endpoint_normalized() {
        let options = ClientOptions::new()
            .with_endpoint_str("http://localhost:8080/v1")
            .unwrap();
        assert_eq!(options.endpoint.as_str(), "http://localhost:8080/v1/");
        assert_eq!(
            options.endpoint.join("procs/p1").unwrap().as_str(),
            "http://localhost:8080/v1/procs/p1"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = ClientOptions::new().with_endpoint_str("not a url").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_builder_chain() {
        let options = ClientOptions::new()
            .with_api_key("secret")
            .with_read_timeout(Duration::from_secs(5))
            .with_capture_response_bodies(true);
        assert_eq!(options.api_key.as_deref(), Some("secret"));
        assert_eq!(options.read_timeout, Duration::from_secs(5));
        assert!(options.capture_response_bodies);
    }
}
