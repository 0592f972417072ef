use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use serde::Serialize;

use crate::domain::errors::{ApiError, RequestError};
use crate::domain::ports::{Clock, SystemClock, TokenSource};
use crate::interface_adapters::response::NormalizedResponse;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

// Per-call options. Method defaults to GET.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl CallOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::method(Method::POST)
    }

    pub fn put() -> Self {
        Self::method(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::method(Method::DELETE)
    }

    fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_string(payload).map_err(|err| {
            tracing::error!(error = %err, "failed to encode request body.");
            RequestError {
                status: None,
                message: format!("failed to encode request: {err}"),
            }
        })?;
        Ok(self.body(body))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

// Fully resolved request, built per call and never kept.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub path: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestDescriptor {
    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(AUTHORIZATION).map(String::as_str)
    }
}

// Result of the unauthenticated connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub status: u16,
    pub message: String,
}

/// The only component that talks to the backend.
///
/// The bearer token is read from the injected [`TokenSource`] when each
/// request is built, never cached, so a token set or cleared between calls
/// is honoured by the next call and in-flight calls keep what they captured.
#[derive(Clone)]
pub struct ApiGateway {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    clock: Arc<dyn Clock>,
}

impl ApiGateway {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self::with_client(Client::new(), base_url, tokens)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenSource>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, tokens))
    }

    fn with_client(http: Client, base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            tokens,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub fn describe(&self, path: &str, options: CallOptions) -> RequestDescriptor {
        let mut headers: BTreeMap<String, String> = options.headers.into_iter().collect();
        headers.insert(CONTENT_TYPE_HEADER.to_string(), JSON_CONTENT_TYPE.to_string());
        // Read fresh on every call.
        if let Some(token) = self.tokens.current_token() {
            headers.insert(AUTHORIZATION.to_string(), format!("Bearer {token}"));
        }

        RequestDescriptor {
            path: path.to_string(),
            method: options.method,
            headers,
            body: options.body,
        }
    }

    #[tracing::instrument(name = "api_call", skip(self, options), fields(method = %options.method))]
    pub async fn call(&self, path: &str, options: CallOptions) -> Result<NormalizedResponse, ApiError> {
        let descriptor = self.describe(path, options);
        Ok(self.send(descriptor).await?)
    }

    pub async fn send(&self, descriptor: RequestDescriptor) -> Result<NormalizedResponse, RequestError> {
        let url = format!("{}{}", self.base_url, descriptor.path);
        tracing::debug!(
            authorized = descriptor.authorization().is_some(),
            "sending request."
        );

        let mut request = self.http.request(descriptor.method, url);
        for (name, value) in &descriptor.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = descriptor.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|err| {
            tracing::error!(error = %err, "request failed before a response arrived.");
            RequestError::transport()
        })?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let raw = response.text().await.map_err(|err| {
            tracing::error!(status, error = %err, "failed to read response body.");
            RequestError::transport()
        })?;

        let normalized = NormalizedResponse::from_parts(status, content_type.as_deref(), &raw);
        if !normalized.ok {
            tracing::warn!(status, message = ?normalized.message, "backend rejected request.");
        }
        normalized.into_result()
    }

    // Probes `GET /test` without credentials. Never fails.
    pub async fn test_connection(&self) -> ConnectionStatus {
        let url = format!("{}/test", self.base_url);
        match self
            .http
            .get(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                let ok = status.is_success();
                ConnectionStatus {
                    ok,
                    status: status.as_u16(),
                    message: if ok { "Connected" } else { "Connection failed" }.to_string(),
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "connection test failed.");
                ConnectionStatus {
                    ok: false,
                    status: 0,
                    message: "Backend not accessible".to_string(),
                }
            }
        }
    }
}
