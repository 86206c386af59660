//! The request core shared by every resource client.
//!
//! # Design
//! Each call is split into `build_request` (pure), one transport round trip,
//! and `parse_response` (pure). The parse step owns the whole response
//! contract:
//!
//! - non-2xx: `ApiError` with the body text (or `Request failed: <status>`)
//! - 204: no value, the body is never parsed
//! - anything else: the JSON body as the caller's declared type
//!
//! No retry, timeout or backoff happens here.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ApiError, ClientError, ClientResult};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

const CONTENT_TYPE: &str = "content-type";
const JSON: &str = "application/json";

/// Per-call options merged over the defaults (GET, no body, JSON content type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInit {
    pub method: HttpMethod,
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestInit {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestInit {
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// `method` with `payload` serialized as the JSON body.
    pub fn json<T: Serialize + ?Sized>(method: HttpMethod, payload: &T) -> ClientResult<Self> {
        let body = serde_json::to_string(payload).map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(Self {
            method,
            body: Some(body),
            headers: Vec::new(),
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Builds, sends and normalizes requests against one base URL.
///
/// Cloning is cheap and shares the transport, so the auth and todo clients
/// issue their calls through the same cookie jar.
#[derive(Clone)]
pub struct RequestCore {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for RequestCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCore").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

impl RequestCore {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Resolve `path` against the base URL and merge headers.
    ///
    /// Caller headers replace a default of the same name and are appended
    /// otherwise.
    pub fn build_request(&self, path: &str, init: RequestInit) -> HttpRequest {
        let mut headers = vec![(CONTENT_TYPE.to_string(), JSON.to_string())];
        for (name, value) in init.headers {
            match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(&name)) {
                Some(existing) => *existing = (name, value),
                None => headers.push((name, value)),
            }
        }
        HttpRequest {
            method: init.method,
            url: format!("{}{path}", self.base_url),
            headers,
            body: init.body,
        }
    }

    /// `Ok(None)` for 204, otherwise the deserialized body.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> ClientResult<Option<T>> {
        if !(200..300).contains(&response.status) {
            return Err(ApiError::from_response(response.status, &response.body).into());
        }
        if response.status == 204 {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ClientError::Deserialization(e.to_string()))
    }

    /// One round trip through the transport.
    pub async fn send<T: DeserializeOwned>(&self, path: &str, init: RequestInit) -> ClientResult<Option<T>> {
        let request = self.build_request(path, init);
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "sending request");

        let response = self.transport.execute(request).await?;
        debug!(%method, %url, status = response.status, "received response");

        let parsed = self.parse_response(response);
        if let Err(ClientError::Api(err)) = &parsed {
            warn!(%method, %url, status = err.status, message = %err.message, "request failed");
        }
        parsed
    }

    /// A call whose success must carry a body.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str, init: RequestInit) -> ClientResult<T> {
        self.send(path, init).await?.ok_or(ClientError::MissingBody)
    }

    /// A call whose success carries nothing worth reading. A body, if any,
    /// is ignored rather than parsed.
    pub async fn execute(&self, path: &str, init: RequestInit) -> ClientResult<()> {
        self.send::<serde::de::IgnoredAny>(path, init).await.map(|_| ())
    }
}
