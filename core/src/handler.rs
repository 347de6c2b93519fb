//! The code lookup handler.
//!
//! # Design
//! `CodeHandler` holds resolved settings and up to three optional
//! collaborators; it carries no mutable state, so one instance can be shared
//! behind an `Arc` by every request. `load` is a single linear pass:
//! pick the master category, call the loader, render JSON, audit.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{or_default, CodeHandlerConfig, HandlerSettings, DEFAULT_ACTION, DEFAULT_RESOURCE};
use crate::error::{HandlerError, LoadError};
use crate::http::{HttpRequest, HttpResponse, RequestContext};
use crate::loader::{AuditLogger, CodeLoader, ErrorReporter};
use crate::types::CodeRecord;

/// Serves code lists for a master category.
pub struct CodeHandler {
    loader: Option<Arc<dyn CodeLoader>>,
    error_reporter: Option<Arc<dyn ErrorReporter>>,
    audit_logger: Option<Arc<dyn AuditLogger>>,
    settings: HandlerSettings,
}

impl fmt::Debug for CodeHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeHandler")
            .field("settings", &self.settings)
            .field("loader", &self.loader.is_some())
            .field("error_reporter", &self.error_reporter.is_some())
            .field("audit_logger", &self.audit_logger.is_some())
            .finish()
    }
}

impl CodeHandler {
    pub fn new<L: CodeLoader + 'static>(loader: L, require_master: bool) -> Self {
        Self::builder().loader(loader).require_master(require_master).build()
    }

    /// Handler that requires a master category on every request.
    pub fn default_for<L: CodeLoader + 'static>(loader: L) -> Self {
        Self::builder().loader(loader).build()
    }

    pub fn from_config<L: CodeLoader + 'static>(loader: L, config: &CodeHandlerConfig) -> Self {
        Self::builder().loader(loader).config(config).build()
    }

    pub fn builder() -> CodeHandlerBuilder {
        CodeHandlerBuilder::default()
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// Handle one request with a fresh context.
    pub async fn load(&self, request: &HttpRequest) -> HttpResponse {
        let ctx = RequestContext::for_request(request);
        self.load_with_context(&ctx, request).await
    }

    pub async fn load_with_context(&self, ctx: &RequestContext, request: &HttpRequest) -> HttpResponse {
        let master = match self.master_category(request) {
            Ok(master) => master,
            Err(err) => {
                debug!(request_id = %ctx.request_id, method = %request.method, "rejecting request: {err}");
                return err.to_response();
            }
        };

        debug!(request_id = %ctx.request_id, master = %master, "loading codes");
        match self.fetch(ctx, &master).await {
            Ok(records) => {
                let response = self.render(&records);
                self.audit(ctx, true, "").await;
                response
            }
            Err(err) => {
                let message = err.to_string();
                if let Some(reporter) = &self.error_reporter {
                    reporter.report(ctx, &message);
                }
                let response = HandlerError::from(err).to_response();
                self.audit(ctx, false, &message).await;
                response
            }
        }
    }

    /// Empty unless a category is required. Read-style requests take the last
    /// path segment; everything else takes the body with spaces trimmed.
    pub fn master_category(&self, request: &HttpRequest) -> Result<String, HandlerError> {
        if !self.settings.require_master {
            return Ok(String::new());
        }
        if request.method.is_read_style() {
            return Ok(request.last_segment().unwrap_or_default().to_string());
        }
        match &request.body {
            Some(body) => Ok(body.trim_matches(' ').to_string()),
            None => Err(HandlerError::BodyUnreadable),
        }
    }

    async fn fetch(&self, ctx: &RequestContext, master: &str) -> Result<Vec<CodeRecord>, LoadError> {
        match &self.loader {
            Some(loader) => loader.load(ctx, master).await,
            None => Ok(Vec::new()),
        }
    }

    fn render(&self, records: &[CodeRecord]) -> HttpResponse {
        if !self.settings.remaps() {
            return HttpResponse::json(200, records);
        }
        let rows: Vec<_> = records
            .iter()
            .map(|r| r.relabel(&self.settings.id_label, &self.settings.name_label))
            .collect();
        HttpResponse::json(200, &rows)
    }

    async fn audit(&self, ctx: &RequestContext, success: bool, description: &str) {
        let Some(logger) = &self.audit_logger else {
            return;
        };
        if let Err(err) = logger
            .log(ctx, &self.settings.resource, &self.settings.action, success, description)
            .await
        {
            warn!(request_id = %ctx.request_id, "ignoring audit failure: {err}");
        }
    }
}

/// Builder for `CodeHandler`. Defaults: category required, resource `code`,
/// action `load`, no label remap, no collaborators.
pub struct CodeHandlerBuilder {
    loader: Option<Arc<dyn CodeLoader>>,
    error_reporter: Option<Arc<dyn ErrorReporter>>,
    audit_logger: Option<Arc<dyn AuditLogger>>,
    require_master: bool,
    resource: String,
    action: String,
    id_label: String,
    name_label: String,
}

impl Default for CodeHandlerBuilder {
    fn default() -> Self {
        Self {
            loader: None,
            error_reporter: None,
            audit_logger: None,
            require_master: true,
            resource: String::new(),
            action: String::new(),
            id_label: String::new(),
            name_label: String::new(),
        }
    }
}

impl CodeHandlerBuilder {
    pub fn loader<L: CodeLoader + 'static>(self, loader: L) -> Self {
        self.shared_loader(Arc::new(loader))
    }

    pub fn shared_loader(mut self, loader: Arc<dyn CodeLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn error_reporter<R: ErrorReporter + 'static>(mut self, reporter: R) -> Self {
        self.error_reporter = Some(Arc::new(reporter));
        self
    }

    pub fn audit_logger<A: AuditLogger + 'static>(self, logger: A) -> Self {
        self.shared_audit_logger(Arc::new(logger))
    }

    pub fn shared_audit_logger(mut self, logger: Arc<dyn AuditLogger>) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    pub fn require_master(mut self, required: bool) -> Self {
        self.require_master = required;
        self
    }

    /// Empty falls back to `code`.
    pub fn resource(mut self, resource: &str) -> Self {
        self.resource = resource.to_string();
        self
    }

    /// Empty falls back to `load`.
    pub fn action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    pub fn labels(mut self, id_label: &str, name_label: &str) -> Self {
        self.id_label = id_label.to_string();
        self.name_label = name_label.to_string();
        self
    }

    /// Apply a config block. An absent `master` means required.
    pub fn config(self, config: &CodeHandlerConfig) -> Self {
        self.require_master(config.master.unwrap_or(true))
            .resource(&config.resource)
            .action(&config.action)
            .labels(&config.id, &config.name)
    }

    pub fn build(self) -> CodeHandler {
        CodeHandler {
            loader: self.loader,
            error_reporter: self.error_reporter,
            audit_logger: self.audit_logger,
            settings: HandlerSettings {
                require_master: self.require_master,
                resource: or_default(&self.resource, DEFAULT_RESOURCE),
                action: or_default(&self.action, DEFAULT_ACTION),
                id_label: self.id_label,
                name_label: self.name_label,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AuditError;
    use crate::http::{HttpMethod, APPLICATION_JSON};

    #[derive(Default)]
    struct Recorder {
        masters: Mutex<Vec<String>>,
        fail_with: Option<String>,
    }

    impl Recorder {
        fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl CodeLoader for Recorder {
        async fn load(&self, _ctx: &RequestContext, master: &str) -> Result<Vec<CodeRecord>, LoadError> {
            self.masters.lock().unwrap().push(master.to_string());
            match &self.fail_with {
                Some(message) => Err(LoadError::backend(message.clone())),
                None => Ok(vec![CodeRecord::new("1", "A"), CodeRecord::new("2", "B")]),
            }
        }
    }

    type AuditEntry = (String, String, bool, String);

    #[derive(Default)]
    struct AuditRecorder {
        entries: Mutex<Vec<AuditEntry>>,
        fail: bool,
    }

    #[async_trait]
    impl AuditLogger for AuditRecorder {
        async fn log(
            &self,
            _ctx: &RequestContext,
            resource: &str,
            action: &str,
            success: bool,
            description: &str,
        ) -> Result<(), AuditError> {
            self.entries.lock().unwrap().push((
                resource.to_string(),
                action.to_string(),
                success,
                description.to_string(),
            ));
            if self.fail {
                return Err(AuditError("sink offline".to_string()));
            }
            Ok(())
        }
    }

    fn masters_of(loader: &Arc<Recorder>) -> Vec<String> {
        loader.masters.lock().unwrap().clone()
    }

    fn handler_with(loader: &Arc<Recorder>, require_master: bool) -> CodeHandler {
        CodeHandler::builder()
            .shared_loader(loader.clone())
            .require_master(require_master)
            .build()
    }

    #[tokio::test]
    async fn optional_master_always_loads_empty_category() {
        let loader = Arc::new(Recorder::default());
        let handler = handler_with(&loader, false);

        handler.load(&HttpRequest::get("/codes/group/42")).await;
        handler.load(&HttpRequest::post("/codes", "  abc  ")).await;
        let mut unreadable = HttpRequest::post("/codes", "");
        unreadable.body = None;
        let resp = handler.load(&unreadable).await;

        assert_eq!(resp.status, 200);
        assert_eq!(masters_of(&loader), vec!["", "", ""]);
    }

    #[tokio::test]
    async fn get_takes_last_path_segment() {
        let loader = Arc::new(Recorder::default());
        let handler = handler_with(&loader, true);

        handler.load(&HttpRequest::get("/codes/group/42")).await;
        handler.load(&HttpRequest::get("nosep")).await;

        assert_eq!(masters_of(&loader), vec!["42", ""]);
    }

    #[tokio::test]
    async fn post_body_is_trimmed_of_spaces_only() {
        let loader = Arc::new(Recorder::default());
        let handler = handler_with(&loader, true);

        handler.load(&HttpRequest::post("/codes", "  abc  ")).await;
        handler.load(&HttpRequest::post("/codes", "\tabc\n")).await;

        assert_eq!(masters_of(&loader), vec!["abc", "\tabc\n"]);
    }

    #[tokio::test]
    async fn unreadable_body_is_rejected_without_loading_or_logging() {
        let loader = Arc::new(Recorder::default());
        let audit = Arc::new(AuditRecorder::default());
        let reported = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = reported.clone();
        let handler = CodeHandler::builder()
            .shared_loader(loader.clone())
            .shared_audit_logger(audit.clone())
            .error_reporter(move |_: &RequestContext, msg: &str| sink.lock().unwrap().push(msg.to_string()))
            .build();

        let mut request = HttpRequest::post("/codes", "");
        request.method = HttpMethod::Put;
        request.body = None;
        let resp = handler.load(&request).await;

        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, "Body cannot is empty");
        assert!(masters_of(&loader).is_empty());
        assert!(audit.entries.lock().unwrap().is_empty());
        assert!(reported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn loader_failure_is_masked_reported_and_audited() {
        let loader = Arc::new(Recorder::failing("connection refused"));
        let audit = Arc::new(AuditRecorder::default());
        let reported = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = reported.clone();
        let handler = CodeHandler::builder()
            .shared_loader(loader)
            .shared_audit_logger(audit.clone())
            .error_reporter(move |_: &RequestContext, msg: &str| sink.lock().unwrap().push(msg.to_string()))
            .build();

        let resp = handler.load(&HttpRequest::get("/codes/status")).await;

        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, r#""Internal Server Error""#);
        assert_eq!(resp.header("content-type"), Some(APPLICATION_JSON));
        assert_eq!(*reported.lock().unwrap(), vec!["connection refused"]);
        assert_eq!(
            *audit.entries.lock().unwrap(),
            vec![("code".to_string(), "load".to_string(), false, "connection refused".to_string())]
        );
    }

    #[tokio::test]
    async fn success_returns_raw_records_and_audits() {
        let audit = Arc::new(AuditRecorder::default());
        let handler = CodeHandler::builder()
            .loader(Recorder::default())
            .shared_audit_logger(audit.clone())
            .resource("gender")
            .action("list")
            .build();

        let resp = handler.load(&HttpRequest::get("/codes/gender")).await;

        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("content-type"), Some(APPLICATION_JSON));
        assert_eq!(resp.body, r#"[{"id":"1","name":"A"},{"id":"2","name":"B"}]"#);
        assert_eq!(
            *audit.entries.lock().unwrap(),
            vec![("gender".to_string(), "list".to_string(), true, String::new())]
        );
    }

    #[tokio::test]
    async fn labels_remap_records() {
        let handler = CodeHandler::builder()
            .loader(Recorder::default())
            .labels("code", "label")
            .build();

        let resp = handler.load(&HttpRequest::get("/codes/x")).await;

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, r#"[{"code":"1","label":"A"},{"code":"2","label":"B"}]"#);
    }

    #[tokio::test]
    async fn audit_failure_does_not_change_response() {
        let audit = AuditRecorder {
            fail: true,
            ..AuditRecorder::default()
        };
        let handler = CodeHandler::builder()
            .loader(Recorder::default())
            .audit_logger(audit)
            .build();

        let resp = handler.load(&HttpRequest::get("/codes/x")).await;
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn missing_loader_yields_empty_list() {
        let handler = CodeHandler::builder().require_master(false).build();
        let resp = handler.load(&HttpRequest::get("/codes")).await;
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, "[]");
    }

    #[tokio::test]
    async fn closure_loader_receives_category() {
        let handler = CodeHandler::default_for(|_ctx: RequestContext, master: String| async move {
            Ok::<_, LoadError>(vec![CodeRecord::new(&master, &master.to_uppercase())])
        });
        let resp = handler.load(&HttpRequest::post("/codes", " us ")).await;
        assert_eq!(resp.body, r#"[{"id":"us","name":"US"}]"#);
    }

    #[tokio::test]
    async fn repeated_load_is_identical() {
        let handler = CodeHandler::new(Recorder::default(), true);
        let request = HttpRequest::get("/codes/a");
        let first = handler.load(&request).await;
        let second = handler.load(&request).await;
        assert_eq!(first, second);
    }

    #[test]
    fn from_config_resolves_defaults() {
        let config = CodeHandlerConfig {
            id: "value".to_string(),
            name: "text".to_string(),
            ..CodeHandlerConfig::default()
        };
        let handler = CodeHandler::from_config(Recorder::default(), &config);
        let settings = handler.settings();
        assert!(settings.require_master);
        assert_eq!(settings.resource, "code");
        assert_eq!(settings.action, "load");
        assert_eq!(settings.id_label, "value");
    }
}
