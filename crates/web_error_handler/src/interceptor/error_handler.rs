use async_trait::async_trait;
use std::sync::Arc;

use super::ErrorInterceptor;
use crate::config::ErrorHandlerConfig;
use crate::core::{Handler, Request, Response};
use crate::error::HandlerError;
use crate::generator::ErrorResponseGenerator;
use crate::listener::{ErrorListener, ListenerKey};

/// Terminal error handler: wraps one fixed handler and never fails.
pub struct ErrorHandler {
    handler: Arc<dyn Handler>,
    interceptor: ErrorInterceptor,
}

impl ErrorHandler {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self {
            handler,
            interceptor: ErrorInterceptor::new(),
        }
    }

    pub fn with_config(handler: Arc<dyn Handler>, config: ErrorHandlerConfig) -> Self {
        Self {
            handler,
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
impl Handler for ErrorHandler {
    async fn handle(&self, req: Request) -> Result<Response, HandlerError> {
        Ok(self.interceptor.intercept(req, self.handler.as_ref()).await)
    }
}
