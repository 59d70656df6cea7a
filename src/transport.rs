//! HTTP transport seam.
//!
//! The client never talks to the network directly; it hands fully-built
//! requests to an [`HttpTransport`]. [`ReqwestTransport`] is the production
//! implementation. Tests substitute a recording transport.

use crate::error::{GatewayError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Request timeout applied by [`ReqwestTransport::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header name/value pairs.
pub type Headers = [(String, String)];

/// Body of a POST request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    /// `application/x-www-form-urlencoded` pairs.
    Form(Vec<(String, String)>),
    Json(Value),
}

/// What the client needs to know about a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    url: String,
    body: String,
}

impl HttpResponse {
    /// Creates a response. `url` is the final URL after redirects.
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The resolved URL of the response.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Minimal HTTP capability the gateway client depends on.
pub trait HttpTransport: Send + Sync {
    fn get(&self, url: &str, headers: &Headers) -> Result<HttpResponse>;

    fn post(&self, url: &str, body: RequestBody, headers: &Headers) -> Result<HttpResponse>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    fn get(&self, url: &str, headers: &Headers) -> Result<HttpResponse> {
        (**self).get(url, headers)
    }

    fn post(&self, url: &str, body: RequestBody, headers: &Headers) -> Result<HttpResponse> {
        (**self).post(url, body, headers)
    }
}

/// Blocking transport backed by `reqwest`. Redirects are followed.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds a client with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()?;
        Ok(ReqwestTransport::from_client(client))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: reqwest::blocking::Client) -> Self {
        ReqwestTransport { client }
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        headers: &Headers,
    ) -> Result<HttpResponse> {
        // replaces any content type set by `form`/`json`
        let response = request.headers(header_map(headers)?).send()?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text()?;
        Ok(HttpResponse::new(status, url, body))
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &str, headers: &Headers) -> Result<HttpResponse> {
        self.send(self.client.get(url), headers)
    }

    fn post(&self, url: &str, body: RequestBody, headers: &Headers) -> Result<HttpResponse> {
        let request = self.client.post(url);
        let request = match body {
            RequestBody::Empty => request,
            RequestBody::Form(pairs) => request.form(&pairs),
            RequestBody::Json(value) => request.json(&value),
        };
        self.send(request, headers)
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| GatewayError::Transport(format!("invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| GatewayError::Transport(format!("invalid header value: {}", e)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Maps a non-success response to [`GatewayError::ApiResponse`].
pub fn ensure_success(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(GatewayError::ApiResponse {
            status: response.status,
            body: response.body,
        })
    }
}
