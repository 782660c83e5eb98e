//! The request primitive every resource call goes through.
//!
//! # Design
//! `ApiClient` keeps request building and response parsing pure and
//! separate: `build_request` turns an endpoint and
//! `RequestOptions` into an `HttpRequest`, `parse_response` turns an
//! `HttpResponse` into an `ApiResponse<T>`. `request` glues the two around a
//! single `Transport::execute` call and is the only place where failures are
//! converted into envelope values. It never panics and never returns `Err`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use crate::error::{ApiError, ApiErrorKind};
use crate::http::{upsert_header, HttpMethod, HttpRequest, HttpResponse};
use crate::storage::{FileStore, MemoryStore, SessionStore};
use crate::transport::{Transport, UreqTransport};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const HEALTH_ENDPOINT: &str = "/health";

/// Per-call options. Everything defaults: `GET`, no body, no extra headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options carrying `body` serialized as JSON.
    pub fn json<B: Serialize + ?Sized>(method: HttpMethod, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_string(body)
            .map_err(|e| ApiError::unknown(format!("failed to serialize request body: {e}")))?;
        Ok(Self {
            method,
            body: Some(body),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Outcome of the `/health` probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub reachable: bool,
    /// HTTP status of the probe, if a response arrived.
    pub status: Option<u16>,
    pub message: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.reachable && self.status.is_some_and(|s| (200..=299).contains(&s))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<Value>,
    message: Option<Value>,
}

#[derive(Deserialize)]
struct HealthBody {
    status: Option<Value>,
    message: Option<Value>,
}

/// Typed client for the hospital REST API.
///
/// Cloning is cheap; clones share the transport and the session store.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        transport: Arc<dyn Transport>,
        session: SessionStore,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    /// Production wiring: `ureq` transport, file-backed session when the
    /// config names a session file, in-memory otherwise.
    pub fn from_config(config: &ClientConfig) -> Self {
        let session = match &config.session_file {
            Some(path) => SessionStore::new(Arc::new(FileStore::open(path.clone()))),
            None => SessionStore::new(Arc::new(MemoryStore::new())),
        };
        Self::new(&config.base_url, Arc::new(UreqTransport::new()), session)
    }

    pub fn from_env() -> Self {
        Self::from_config(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    /// Build the outgoing request for `endpoint`.
    ///
    /// Header precedence: JSON content type, then caller headers, then the
    /// bearer token when one is stored.
    pub fn build_request(&self, endpoint: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
        for (name, value) in &options.headers {
            upsert_header(&mut headers, name, value);
        }
        if let Some(token) = self.session.get_token() {
            upsert_header(&mut headers, "Authorization", &format!("Bearer {token}"));
        }
        HttpRequest {
            method: options.method,
            url: self.url(endpoint),
            headers,
            body: options.body,
        }
    }

    /// Normalize a raw response into the envelope.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> ApiResponse<T> {
        match parse_envelope(response) {
            Ok(envelope) => envelope,
            Err(err) => ApiResponse::failure(err),
        }
    }

    /// Perform one call and normalize its outcome.
    pub fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        let request = self.build_request(endpoint, options);
        tracing::debug!(method = %request.method, url = %request.url, "api request");

        let envelope = match self.transport.execute(&request) {
            Ok(response) => self.parse_response(response),
            Err(err) => ApiResponse::failure(ApiError::from(err)),
        };
        if let (Some(kind), Some(message)) = (envelope.error_kind, envelope.error.as_deref()) {
            tracing::warn!(
                method = %request.method,
                url = %request.url,
                kind = %kind,
                error = message,
                "api request failed"
            );
        }
        envelope
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.request(endpoint, RequestOptions::default())
    }

    pub fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResponse<T> {
        self.request(endpoint, RequestOptions::new(HttpMethod::Delete))
    }

    /// Send `body` as JSON with `method`. Serialization failures become an
    /// `Unknown` failure without touching the network.
    pub fn send_json<T, B>(&self, method: HttpMethod, endpoint: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match RequestOptions::json(method, body) {
            Ok(options) => self.request(endpoint, options),
            Err(err) => {
                tracing::warn!(%method, endpoint, error = %err, "request body rejected");
                ApiResponse::failure(err)
            }
        }
    }

    /// True when `GET /health` answers with a 2xx status.
    pub fn check_health(&self) -> bool {
        self.health_report().is_healthy()
    }

    /// Descriptive connectivity status from `GET /health`.
    pub fn health_report(&self) -> HealthReport {
        let request = self.build_request(HEALTH_ENDPOINT, RequestOptions::default());
        match self.transport.execute(&request) {
            Ok(response) => {
                let from_body = if response.is_json() {
                    serde_json::from_str::<HealthBody>(&response.body)
                        .ok()
                        .and_then(|body| non_empty_str(body.status).or(non_empty_str(body.message)))
                } else {
                    None
                };
                let message = from_body
                    .unwrap_or_else(|| status_line(response.status, &response.status_text));
                HealthReport {
                    reachable: true,
                    status: Some(response.status),
                    message,
                }
            }
            Err(err) => {
                tracing::warn!(url = %request.url, error = %err, "health probe failed");
                HealthReport {
                    reachable: false,
                    status: None,
                    message: err.to_string(),
                }
            }
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

fn parse_envelope<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
    if !response.is_json() {
        let received = response.header("content-type").unwrap_or("no content type");
        return Err(ApiError::protocol(format!(
            "Expected JSON response from server but received {received} (HTTP {})",
            response.status
        ))
        .with_status(response.status));
    }

    let body: Value = serde_json::from_str(&response.body).map_err(|e| {
        ApiError::protocol(format!("Expected JSON response body: {e}")).with_status(response.status)
    })?;

    if !response.is_success() {
        return Err(application_error(&response, body));
    }

    let mut envelope: ApiResponse<T> = serde_json::from_value(body).map_err(|e| {
        ApiError::protocol(format!("Unexpected response shape: {e}")).with_status(response.status)
    })?;
    if !envelope.success {
        envelope.data = None;
        envelope.error_kind = Some(ApiErrorKind::Application);
        if envelope.error.as_deref().map_or(true, |e| e.trim().is_empty()) {
            envelope.error = Some(status_line(response.status, &response.status_text));
        }
    }
    Ok(envelope)
}

fn application_error(response: &HttpResponse, body: Value) -> ApiError {
    let message = serde_json::from_value::<ErrorBody>(body)
        .ok()
        .and_then(|body| non_empty_str(body.error).or(non_empty_str(body.message)))
        .unwrap_or_else(|| status_line(response.status, &response.status_text));
    ApiError::application(response.status, message)
}

fn non_empty_str(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

fn status_line(status: u16, status_text: &str) -> String {
    match status_text.trim() {
        "" => format!("HTTP {status}"),
        text => format!("HTTP {status}: {text}"),
    }
}
