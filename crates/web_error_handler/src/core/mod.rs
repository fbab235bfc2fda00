pub mod handler;
pub mod request;
pub mod response;

pub use handler::{FnHandler, Handler};
pub use http::Method; // Use standard HTTP Method
pub use request::Request;
pub use response::Response;
