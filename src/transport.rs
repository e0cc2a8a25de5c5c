//! HTTP transport for the batch API.
//!
//! The client only needs one primitive: send a request, get the body back or
//! an error. `HttpTransport` does that with `reqwest`; tests plug in their own.

use crate::error::TransportError;
use async_trait::async_trait;
use log::debug;
use reqwest::header::COOKIE;
use std::fmt;
use std::time::Duration;

/// HTTP method used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// One request to the API, relative to the server's base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    /// Session token, sent as the `t` cookie
    pub token: Option<String>,
}

impl HttpRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            token: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            token: None,
        }
    }

    /// Attach the session token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Performs a single request/response exchange.
///
/// Implementations must not retry; every failure goes straight back to the caller.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response body on a 2xx status.
    async fn exchange(&self, request: HttpRequest) -> Result<String, TransportError>;
}

/// `reqwest`-backed transport.
pub struct HttpTransport {
    base_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for the given base URL (e.g. `https://api.dida365.com/api/v2`).
    pub fn new(base_url: impl Into<String>, timeout: Duration, user_agent: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn exchange(&self, request: HttpRequest) -> Result<String, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("exchange: {} {}", request.method, url);

        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        if let Some(token) = &request.token {
            builder = builder.header(COOKIE, format!("t={}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("exchange: {} {} failed with {}", request.method, url, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}
