//! Tracing setup and the tracing-backed error reporter and audit logger.

use async_trait::async_trait;
use code_core::{AuditError, AuditLogger, ErrorReporter, RequestContext};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "code_server=info,code_core=info,audit=info";

/// Console logging, filtered by `RUST_LOG` when set.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, ctx: &RequestContext, message: &str) {
        error!(request_id = %ctx.request_id, method = %ctx.method, path = %ctx.path, "{message}");
    }
}

/// Writes one event per handled request on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditLogger;

#[async_trait]
impl AuditLogger for TracingAuditLogger {
    async fn log(
        &self,
        ctx: &RequestContext,
        resource: &str,
        action: &str,
        success: bool,
        description: &str,
    ) -> Result<(), AuditError> {
        info!(
            target: "audit",
            request_id = %ctx.request_id,
            resource,
            action,
            success,
            description,
            "request handled"
        );
        Ok(())
    }
}
