//! Request dispatch and response classification for the Confluence API.
//!
//! # Design
//! `ConfluenceClient` holds only configuration (wiki root and optional
//! credentials) and carries no mutable state between calls, so one instance
//! can be shared across threads. Each dispatch is split into
//! `build_http_request`, which resolves a [`Request`] into plain HTTP data,
//! and `parse_response`, which turns the raw answer into the request's
//! response type or a [`RequestFailure`]. `perform` strings the two together
//! around a caller-supplied [`Transport`].

use serde::de::DeserializeOwned;
use tracing::{debug, info_span, warn};

use crate::auth::Auth;
use crate::config::ClientConfig;
use crate::error::{ApiError, ConfigError, ErrorResponse, RequestFailure};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::request::Request;

/// Stateless client for the Confluence REST API.
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    base_url: String,
    auth: Option<Auth>,
}

impl ConfluenceClient {
    /// A client rooted at `base_url`, e.g. `https://example.atlassian.net/wiki`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self::from_config(ClientConfig::new(base_url)?))
    }

    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url,
            auth: config.auth,
        }
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `request`, query string included.
    pub fn url_for<R>(&self, request: &Request<R>) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url,
            request.relative_path().trim_start_matches('/')
        );
        let query = request.query_params().to_query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Resolve `request` into plain HTTP data ready for a transport.
    pub fn build_http_request<R>(&self, request: &Request<R>) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![("accept".to_string(), request.accept().to_string())];

        let body = match request.body() {
            Some(content) => {
                let json = serde_json::to_string(content)
                    .map_err(|e| ApiError::Serialization(e.to_string()))?;
                headers.push(("content-type".to_string(), request.content_type().to_string()));
                Some(json)
            }
            None => None,
        };

        if let Some(auth) = &self.auth {
            headers.push(("authorization".to_string(), auth.header_value()));
        }

        Ok(HttpRequest {
            method: request.method(),
            url: self.url_for(request),
            headers,
            body,
        })
    }

    /// Classify a response: 2xx bodies deserialize into `R`, anything else
    /// becomes a [`RequestFailure`].
    pub fn parse_response<R: DeserializeOwned>(
        &self,
        _request: &Request<R>,
        response: HttpResponse,
    ) -> Result<R, ApiError> {
        if !response.is_success() {
            return Err(request_failure(&response).into());
        }
        // An empty body (204) reads as `null` so `()` and `Option<_>` work.
        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Build, send and parse `request` in one call.
    ///
    /// Transport errors are boxed but otherwise passed through untouched.
    pub fn perform<R, T>(&self, transport: &T, request: &Request<R>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        T: Transport + ?Sized,
    {
        let span = info_span!(
            "confluence.request",
            operation = %request.operation(),
            method = %request.method(),
            path = request.relative_path(),
        );
        let _guard = span.enter();

        let http_request = self.build_http_request(request)?;
        debug!(url = %http_request.url, "sending request");

        let response = transport.send(&http_request).map_err(|e| {
            warn!(error = %e, "transport failure");
            ApiError::Transport(Box::new(e))
        })?;
        debug!(status = response.status, "received response");

        self.parse_response(request, response).inspect_err(|e| {
            if let ApiError::Request(failure) = e {
                warn!(status = failure.status, message = %failure.message, "request rejected");
            }
        })
    }
}

/// Turn a non-2xx response into a failure value.
///
/// JSON bodies are read as Confluence's error envelope; anything else (HTML
/// error pages from proxies, empty bodies) only contributes its status.
fn request_failure(response: &HttpResponse) -> RequestFailure {
    let envelope = if response.is_json() {
        serde_json::from_str::<ErrorResponse>(&response.body).ok()
    } else {
        None
    };

    match envelope {
        Some(envelope) => RequestFailure {
            status: response.status,
            message: envelope
                .best_message()
                .map(str::to_string)
                .unwrap_or_else(|| reason_phrase(response.status)),
            data: envelope.data,
        },
        None => RequestFailure {
            status: response.status,
            message: reason_phrase(response.status),
            data: None,
        },
    }
}

/// The standard reason phrase for `status`, e.g. `Not Found`.
fn reason_phrase(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
