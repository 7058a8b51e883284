//! Transport seam between the dispatcher and the wire
//!
//! The dispatcher only needs one attempt's worth of behavior: send a fully
//! described request, get back either a raw status/body pair or a transport
//! failure. Putting that behind a trait keeps the retry loop testable with
//! scripted in-process transports while production uses reqwest.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};

/// Header carrying the bearer credential on every request
pub const ACCESS_TOKEN_HEADER: &str = "Access-Token";

/// Query parameter value: scalar, or a list serialized as repeated keys
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

/// One immutable request, reused unchanged across retry attempts
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    /// Ordered key/value pairs; `Many` values repeat the key
    pub query: Vec<(String, QueryValue)>,
    pub body: Option<Value>,
}

impl RequestSpec {
    /// A GET request for the given endpoint path
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// A POST request with a JSON body
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Append a scalar query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .push((key.into(), QueryValue::Single(value.into())));
        self
    }

    /// Append a list query parameter (repeated key on the wire)
    pub fn with_query_list(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.query.push((key.into(), QueryValue::Many(values)));
        self
    }
}

/// Raw result of one successful transport round-trip, any HTTP status
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// A failure where no HTTP response was obtained
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            source: Some(anyhow::Error::new(err)),
        }
    }
}

/// Sends one HTTP request per call; retry and classification live above
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, spec: &RequestSpec) -> std::result::Result<RawResponse, TransportFailure>;
}

/// Production transport over reqwest
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport with the static header pair every request carries
    /// and the per-request timeout.
    pub fn new(base_url: &str, access_token: &str, timeout_secs: u64) -> Result<Self> {
        // Validate the base URL up front; execute() only concatenates
        Url::parse(base_url).map_err(|e| {
            Error::configuration(format!("invalid base URL {}: {}", base_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let token_value = HeaderValue::from_str(access_token).map_err(|_| {
            Error::configuration("access token contains invalid header characters")
        })?;
        headers.insert(ACCESS_TOKEN_HEADER, token_value);

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Transport {
                message: format!("failed to create HTTP client: {}", e),
                source: Some(anyhow::Error::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint paths are absolute within the API root, so plain
    /// concatenation keeps the `/business-api/v1` prefix that `Url::join`
    /// would drop.
    fn full_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, spec: &RequestSpec) -> std::result::Result<RawResponse, TransportFailure> {
        let mut request = self
            .client
            .request(spec.method.clone(), self.full_url(&spec.path));

        for (key, value) in &spec.query {
            match value {
                QueryValue::Single(v) => {
                    request = request.query(&[(key, v)]);
                }
                QueryValue::Many(values) => {
                    for v in values {
                        request = request.query(&[(key, v)]);
                    }
                }
            }
        }

        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
