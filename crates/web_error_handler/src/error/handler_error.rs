use std::any::Any;

use super::ResponseError;
use crate::diagnostics::Severity;

/// How a failure reached the error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The handler returned `Err`.
    Error,
    /// A runtime diagnostic raised inside a promotion scope.
    Diagnostic(Severity),
    /// The handler panicked.
    Panic,
}

/// Failure intercepted while producing a response.
#[derive(Debug)]
pub struct HandlerError {
    message: String,
    code: i64,
    kind: FailureKind,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HandlerError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self::with_code(0, message)
    }

    pub fn with_code<S: Into<String>>(code: i64, message: S) -> Self {
        Self {
            message: message.into(),
            code,
            kind: FailureKind::Error,
            source: None,
        }
    }

    /// Wrap any [`ResponseError`], taking its message and code.
    #[track_caller]
    pub fn from_source<T: ResponseError + 'static>(err: T) -> Self {
        Self {
            message: err.to_string(),
            code: err.code(),
            kind: FailureKind::Error,
            source: Some(Box::new(err)),
        }
    }

    pub fn diagnostic<S: Into<String>>(severity: Severity, message: S) -> Self {
        Self {
            message: message.into(),
            code: 0,
            kind: FailureKind::Diagnostic(severity),
            source: None,
        }
    }

    /// Build from a panic payload as returned by `catch_unwind`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic occurred".to_string()
        };

        Self {
            message,
            code: 0,
            kind: FailureKind::Panic,
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The raw code, not guaranteed to be a valid HTTP status.
    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

impl ResponseError for HandlerError {
    fn code(&self) -> i64 {
        self.code
    }
}

impl From<std::io::Error> for HandlerError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::from_source(err)
    }
}

impl From<serde_json::Error> for HandlerError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::from_source(err)
    }
}

impl From<super::SimpleError> for HandlerError {
    #[track_caller]
    fn from(err: super::SimpleError) -> Self {
        Self::from_source(err)
    }
}
