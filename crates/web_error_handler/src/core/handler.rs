use crate::core::{Request, Response};
use crate::error::HandlerError;
use async_trait::async_trait;

/// Downstream request handler. Returning `Err` or panicking are both failures
/// the error handler recovers from.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    /// Process the request and return a response or error
    async fn handle(&self, req: Request) -> Result<Response, HandlerError>;
}

/// Wrapper for simple closure-based handlers that return Result
pub struct FnHandler<F>
where
    F: Fn(Request) -> Result<Response, HandlerError> + Send + Sync + 'static,
{
    closure: F,
}

impl<F> FnHandler<F>
where
    F: Fn(Request) -> Result<Response, HandlerError> + Send + Sync + 'static,
{
    pub fn new(closure: F) -> Self {
        Self { closure }
    }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(Request) -> Result<Response, HandlerError> + Send + Sync + 'static,
{
    async fn handle(&self, req: Request) -> Result<Response, HandlerError> {
        (self.closure)(req)
    }
}
