pub mod logger;
pub mod logging_listener;
pub mod tracing_logger;

pub use logger::{Level, Logger};
pub use logging_listener::LoggingListener;
pub use tracing_logger::TracingLogger;
