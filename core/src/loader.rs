//! Collaborator seams: where records come from and where failures and audit
//! entries go.
//!
//! All three are optional on the handler. Closures implement the traits
//! directly, so a caller can pass `|ctx, master| async { ... }` as a loader
//! and `|ctx, msg| ...` as an error reporter.

use std::future::Future;

use async_trait::async_trait;

use crate::error::{AuditError, LoadError};
use crate::http::RequestContext;
use crate::types::CodeRecord;

/// Fetches the records for one master category.
#[async_trait]
pub trait CodeLoader: Send + Sync {
    async fn load(&self, ctx: &RequestContext, master: &str) -> Result<Vec<CodeRecord>, LoadError>;
}

#[async_trait]
impl<F, Fut> CodeLoader for F
where
    F: Fn(RequestContext, String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<CodeRecord>, LoadError>> + Send + 'static,
{
    async fn load(&self, ctx: &RequestContext, master: &str) -> Result<Vec<CodeRecord>, LoadError> {
        (self)(ctx.clone(), master.to_string()).await
    }
}

/// Receives the real message of a loader failure. Fire-and-forget.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, ctx: &RequestContext, message: &str);
}

impl<F> ErrorReporter for F
where
    F: Fn(&RequestContext, &str) + Send + Sync,
{
    fn report(&self, ctx: &RequestContext, message: &str) {
        (self)(ctx, message)
    }
}

/// Records the outcome of one handled request.
#[async_trait]
pub trait AuditLogger: Send + Sync {
    async fn log(
        &self,
        ctx: &RequestContext,
        resource: &str,
        action: &str,
        success: bool,
        description: &str,
    ) -> Result<(), AuditError>;
}
