//! Framework-free handler for serving code lookup lists.
//!
//! # Overview
//! A request names a master category (last path segment for GET/HEAD, the
//! trimmed body otherwise). `CodeHandler` passes it to an injected loader and
//! answers with the records as JSON, optionally relabelling `id`/`name` and
//! optionally writing an audit entry.
//!
//! # Design
//! - Host-does-IO: the handler consumes `HttpRequest` and returns
//!   `HttpResponse`, both plain data. `code-server` is the axum host.
//! - Loader, error reporter and audit logger are optional trait objects;
//!   a missing one is skipped, never an error.
//! - Settings are resolved once when the handler is built.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod loader;
pub mod types;

pub use config::{CodeHandlerConfig, HandlerSettings};
pub use error::{AuditError, HandlerError, LoadError};
pub use handler::{CodeHandler, CodeHandlerBuilder};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestContext};
pub use loader::{AuditLogger, CodeLoader, ErrorReporter};
pub use types::CodeRecord;
