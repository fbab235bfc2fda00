mod handler_error;
mod response_error;

pub use handler_error::{FailureKind, HandlerError};
pub use response_error::ResponseError;

/// Quick error generation functions
pub fn bad_request<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(400, msg.to_string()).into()
}

pub fn unauthorized<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(401, msg.to_string()).into()
}

pub fn forbidden<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(403, msg.to_string()).into()
}

pub fn not_found<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(404, msg.to_string()).into()
}

pub fn unprocessable_entity<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(422, msg.to_string()).into()
}

pub fn internal_error<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(500, msg.to_string()).into()
}

pub fn service_unavailable<T: std::fmt::Display>(msg: T) -> HandlerError {
    SimpleError::new(503, msg.to_string()).into()
}

/// Simple error implementation for quick error generation
#[derive(Debug)]
pub struct SimpleError {
    code: i64,
    message: String,
}

impl SimpleError {
    pub fn new<S: Into<String>>(code: i64, message: S) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SimpleError {}

impl ResponseError for SimpleError {
    fn code(&self) -> i64 {
        self.code
    }
}

// Standard library error implementations
impl ResponseError for std::io::Error {}

impl ResponseError for serde_json::Error {
    fn code(&self) -> i64 {
        400
    }
}
