use crate::{
    core::Request,
    error::{FailureKind, HandlerError},
    listener::ErrorListener,
    logging::{Level, Logger},
};
use std::sync::Arc;

/// Error listener that writes one line per failure to a [`Logger`].
///
/// Promoted diagnostics are logged at `Warn`, everything else at the
/// configured level (default `Error`).
pub struct LoggingListener {
    logger: Arc<dyn Logger>,
    level: Level,
    request_id_header: &'static str,
}

impl LoggingListener {
    pub fn new<L: Logger + 'static>(logger: L) -> Self {
        Self {
            logger: Arc::new(logger),
            level: Level::Error,
            request_id_header: "x-request-id",
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Header the request id is read from (default: `x-request-id`)
    pub fn request_id_header(mut self, header: &'static str) -> Self {
        self.request_id_header = header;
        self
    }
}

impl ErrorListener for LoggingListener {
    fn trigger(&self, error: &HandlerError, request: &Request) {
        let request_id = request
            .headers()
            .get(self.request_id_header)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        let (level, what) = match error.kind() {
            FailureKind::Diagnostic(severity) => (Level::Warn, format!("{severity} promoted")),
            FailureKind::Panic => (self.level, "panicked".to_string()),
            FailureKind::Error => (self.level, "failed".to_string()),
        };
        let msg = format!(
            "{} {} {}: {} (code {})",
            request.method().as_str(),
            request.path(),
            what,
            error,
            error.code()
        );
        self.logger.log(level, &msg, request_id);
    }
}
