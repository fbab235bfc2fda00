//! Error-handling layer for HTTP handlers.
//!
//! Wrap a [`Handler`] in an [`ErrorHandler`], or put an
//! [`ErrorHandlerMiddleware`] into a middleware chain, and every failure of
//! the wrapped code (an `Err`, a panic, or a runtime diagnostic promoted by
//! [`diagnostics::raise`]) comes back as an error response in the format the
//! client asked for in `Accept`: HTML, plain text, JSON or XML.
//!
//! ```no_run
//! use std::sync::Arc;
//! use web_error_handler::{ErrorHandler, FnHandler, LoggingListener, TracingLogger, error};
//!
//! let app = ErrorHandler::new(Arc::new(FnHandler::new(|_req| Err(error::not_found("no such user")))));
//! app.add_listener("log", LoggingListener::new(TracingLogger::new()));
//! ```

pub mod config;
pub mod core;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod interceptor;
pub mod listener;
pub mod logging;
pub mod middleware;
pub mod negotiation;
pub mod status;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, ErrorHandlerConfig};
pub use self::core::*;
pub use diagnostics::{Severity, SeverityMask};
pub use error::{FailureKind, HandlerError, ResponseError};
pub use generator::{DefaultErrorResponseGenerator, ErrorResponseGenerator, Representation};
pub use http::StatusCode;
pub use interceptor::{ErrorHandler, ErrorInterceptor};
pub use listener::{ErrorListener, ListenerKey, ListenerRegistry};
pub use logging::*;
pub use middleware::*;
pub use negotiation::MalformedQuality;
