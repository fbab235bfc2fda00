#![allow(clippy::module_inception)]
pub mod error_handler_middleware;
pub mod middleware;

pub use error_handler_middleware::ErrorHandlerMiddleware;
pub use middleware::{Middleware, compose};
