//! Catches handler failures and turns them into error responses.

mod error_handler;

pub use error_handler::ErrorHandler;

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;

use crate::config::ErrorHandlerConfig;
use crate::core::{Handler, Request, Response};
use crate::diagnostics::{Promoted, PromotionGuard};
use crate::error::HandlerError;
use crate::generator::{DefaultErrorResponseGenerator, ErrorResponseGenerator};
use crate::listener::{ErrorListener, ListenerKey, ListenerRegistry};
use crate::status::reconcile;

/// Shared state machine behind [`ErrorHandler`] and
/// [`ErrorHandlerMiddleware`](crate::middleware::ErrorHandlerMiddleware).
///
/// For each call the downstream handler runs with diagnostic promotion
/// armed. A successful response is passed through untouched. On failure
/// (an `Err`, a promoted diagnostic or a panic) the listeners are notified,
/// the generator builds a response and its status is forced into the
/// 4xx/5xx range.
pub struct ErrorInterceptor {
    generator: Arc<dyn ErrorResponseGenerator>,
    listeners: ListenerRegistry,
    config: ErrorHandlerConfig,
}

impl std::fmt::Debug for ErrorInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorInterceptor")
            .field("listeners", &self.listeners)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ErrorInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorInterceptor {
    pub fn new() -> Self {
        Self::with_config(ErrorHandlerConfig::default())
    }

    /// The default generator follows `config.malformed_quality`.
    pub fn with_config(config: ErrorHandlerConfig) -> Self {
        Self {
            generator: Arc::new(DefaultErrorResponseGenerator::with_malformed_quality(
                config.malformed_quality,
            )),
            listeners: ListenerRegistry::new(),
            config,
        }
    }

    /// Replace the response generator
    pub fn generator<G: ErrorResponseGenerator>(mut self, generator: G) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn add_listener<K, L>(&self, key: K, listener: L)
    where
        K: Into<ListenerKey>,
        L: ErrorListener,
    {
        self.listeners.register(key, listener);
    }

    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    pub fn config(&self) -> &ErrorHandlerConfig {
        &self.config
    }

    /// Run `next` and recover from whatever it fails with.
    ///
    /// Listeners and the generator run with promotion still armed. Panics
    /// raised by listeners are not caught.
    pub async fn intercept(&self, req: Request, next: &dyn Handler) -> Response {
        // listeners and the generator need the request after `next` consumed it
        let request = req.clone();
        let call = Promoted::new(
            Box::pin(async move { next.handle(req).await }),
            self.config.reporting,
        );

        let outcome = if self.config.catch_panics {
            AssertUnwindSafe(call)
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| Err(HandlerError::from_panic(payload)))
        } else {
            call.await
        };

        match outcome {
            Ok(response) => response,
            Err(error) => {
                let _armed = PromotionGuard::install(self.config.reporting);
                self.recover(error, &request)
            }
        }
    }

    fn recover(&self, error: HandlerError, request: &Request) -> Response {
        self.listeners.notify_all(&error, request);

        let mut response = self.generator.generate(&error, request);
        let status = reconcile(response.status_code(), error.code());
        if status != response.status {
            tracing::debug!(
                proposed = response.status_code(),
                status = status.as_u16(),
                "replacing generated status"
            );
            response.set_status(status);
        }

        tracing::error!(
            kind = ?error.kind(),
            code = error.code(),
            status = status.as_u16(),
            method = %request.method(),
            path = request.path(),
            error = %error,
            "request failed, sending error response",
        );
        response
    }
}
