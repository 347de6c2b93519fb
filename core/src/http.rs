//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The host (an axum adapter, a test,
//! anything else) reads the socket, fills in an `HttpRequest`, hands it to
//! `CodeHandler::load`, and writes the returned `HttpResponse` back out. The
//! handler itself never touches the network.
//!
//! All fields use owned types so values can be built and inspected freely in
//! tests.

use std::fmt;

use uuid::Uuid;

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Other(String),
}

impl HttpMethod {
    /// Read-style methods carry the master category in the path instead of
    /// the body.
    pub fn is_read_style(&self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head)
    }

    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Other(m) => m,
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(s: &str) -> Self {
        match s {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An incoming HTTP request described as plain data.
///
/// `body` is `None` when the host could not read the body at all. An empty
/// but readable body is `Some(String::new())`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(path: &str) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: &str, body: &str) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.to_string(),
            headers: Vec::new(),
            body: Some(body.to_string()),
        }
    }

    /// Text after the last `/` in the path, or `None` if the path has no
    /// separator.
    pub fn last_segment(&self) -> Option<&str> {
        self.path.rfind('/').map(|i| &self.path[i + 1..])
    }
}

/// An outgoing HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// JSON response. A payload that fails to serialize yields an empty body;
    /// the status and content type are still written.
    pub fn json<T: serde::Serialize + ?Sized>(status: u16, payload: &T) -> Self {
        let body = serde_json::to_string(payload).unwrap_or_default();
        Self {
            status,
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![(CONTENT_TYPE.to_string(), TEXT_PLAIN.to_string())],
            body: body.to_string(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Per-request value handed to the loader and to both logging callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub method: HttpMethod,
    pub path: String,
}

impl RequestContext {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            method,
            path: path.to_string(),
        }
    }

    pub fn for_request(request: &HttpRequest) -> Self {
        Self::new(request.method.clone(), &request.path)
    }
}
