use async_trait::async_trait;
use std::sync::Arc;

use super::Middleware;
use crate::config::ErrorHandlerConfig;
use crate::core::{Handler, Request, Response};
use crate::error::HandlerError;
use crate::generator::ErrorResponseGenerator;
use crate::interceptor::ErrorInterceptor;
use crate::listener::{ErrorListener, ListenerKey};

/// Chainable error handler: recovers from failures of whatever `next` is
/// passed in on each call.
#[derive(Debug, Default)]
pub struct ErrorHandlerMiddleware {
    interceptor: ErrorInterceptor,
}

impl ErrorHandlerMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ErrorHandlerConfig) -> Self {
        Self {
            interceptor: ErrorInterceptor::with_config(config),
        }
    }

    /// Replace the response generator
    pub fn generator<G: ErrorResponseGenerator>(mut self, generator: G) -> Self {
        self.interceptor = self.interceptor.generator(generator);
        self
    }

    /// Register a listener; a listener already registered under `key` is replaced.
    pub fn add_listener<K, L>(&self, key: K, listener: L)
    where
        K: Into<ListenerKey>,
        L: ErrorListener,
    {
        self.interceptor.add_listener(key, listener);
    }

    pub fn interceptor(&self) -> &ErrorInterceptor {
        &self.interceptor
    }
}

#[async_trait]
impl Middleware for ErrorHandlerMiddleware {
    async fn handle(&self, req: Request, next: Arc<dyn Handler>) -> Result<Response, HandlerError> {
        Ok(self.interceptor.intercept(req, next.as_ref()).await)
    }
}
