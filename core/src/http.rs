//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! builds `HttpRequest` values and parses `HttpResponse` values; moving bytes
//! over the network is the job of a [`Transport`] supplied by the caller.
//! Connection handling, TLS, redirects and socket-level retries all live on
//! the other side of that trait.

use std::fmt;

/// Media type sent and accepted by every built-in request.
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `ConfluenceClient::build_http_request`. `url` is absolute and
/// already carries the encoded query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// `body` is text. Bytes that are not valid UTF-8 (a Latin-1 error page from
/// a proxy, say) are replaced with U+FFFD; [`HttpResponse::from_bytes`] does
/// that decoding for transports that read raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Builds a response from a raw body, decoding it lossily.
    pub fn from_bytes(status: u16, headers: Vec<(String, String)>, body: &[u8]) -> Self {
        Self {
            status,
            headers,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the `content-type` header names a JSON media type
    /// (`application/json`, optionally with parameters, or a `+json` suffix).
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .map(|value| {
                let essence = value
                    .split(';')
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_ascii_lowercase();
                essence == APPLICATION_JSON || essence.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// The single capability the core needs from the outside world: execute one
/// HTTP exchange and hand back whatever the server answered.
///
/// Implementations must return non-2xx responses as `Ok` data; only faults
/// below HTTP (refused connections, timeouts) belong in `Err`. The core never
/// retries or rewrites those errors. A body that is not valid UTF-8 is not a
/// fault either: decode it lossily, as [`HttpResponse::from_bytes`] does.
pub trait Transport {
    type Error: std::error::Error + Send + Sync + 'static;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &T {
    type Error = T::Error;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(content_type: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), content_type.to_string())],
            body: String::new(),
        }
    }

    #[test]
    fn json_content_type_detection() {
        assert!(response("application/json").is_json());
        assert!(response("application/json;charset=UTF-8").is_json());
        assert!(response("Application/JSON").is_json());
        assert!(response("application/problem+json").is_json());
        assert!(!response("text/html").is_json());
    }

    #[test]
    fn missing_content_type_is_not_json() {
        let resp = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: "{}".to_string(),
        };
        assert!(!resp.is_json());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = response("text/plain");
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.header("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(resp.header("accept"), None);
    }

    #[test]
    fn success_range() {
        let mut resp = response(APPLICATION_JSON);
        for (status, expected) in [(199, false), (200, true), (204, true), (299, true), (300, false), (404, false)] {
            resp.status = status;
            assert_eq!(resp.is_success(), expected, "status {status}");
        }
    }

    #[test]
    fn invalid_utf8_body_is_decoded_lossily() {
        let resp = HttpResponse::from_bytes(
            502,
            vec![("Content-Type".to_string(), "text/html; charset=ISO-8859-1".to_string())],
            b"<html>Passerelle d\xe9faillante</html>",
        );
        assert_eq!(resp.status, 502);
        assert_eq!(resp.body, "<html>Passerelle d\u{FFFD}faillante</html>");
        assert_eq!(resp.header("content-type"), Some("text/html; charset=ISO-8859-1"));
    }

    #[test]
    fn method_names() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Put.as_str(), "PUT");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
