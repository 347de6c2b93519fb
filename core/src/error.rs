//! Error types for the code lookup handler.
//!
//! # Design
//! Only two things can go wrong inside a request: the body the category should
//! come from cannot be read, or the loader fails. `HandlerError` names both and
//! knows how each is shown to the caller. Loader detail never reaches the
//! response body; it only goes to the error reporter and the audit log.

use thiserror::Error;

use crate::http::HttpResponse;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

/// Kept verbatim; clients match on this exact text.
pub const BODY_REQUIRED: &str = "Body cannot is empty";

/// Failure reported by a `CodeLoader`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Backend(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
    pub fn backend(message: impl Into<String>) -> Self {
        LoadError::Backend(message.into())
    }
}

/// Failure reported by an `AuditLogger`. The handler never surfaces it.
#[derive(Debug, Error)]
#[error("audit log failed: {0}")]
pub struct AuditError(pub String);

/// Request-level failures produced by `CodeHandler::load`.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A category was required but the request body could not be read.
    #[error("request body is missing or unreadable")]
    BodyUnreadable,

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl HandlerError {
    pub fn status(&self) -> u16 {
        match self {
            HandlerError::BodyUnreadable => 400,
            HandlerError::Load(_) => 500,
        }
    }

    /// The body the caller sees.
    pub fn to_response(&self) -> HttpResponse {
        match self {
            HandlerError::BodyUnreadable => HttpResponse::text(self.status(), BODY_REQUIRED),
            HandlerError::Load(_) => HttpResponse::json(self.status(), INTERNAL_SERVER_ERROR),
        }
    }
}
