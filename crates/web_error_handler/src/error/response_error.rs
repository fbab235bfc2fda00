/// Errors that carry an integer error code.
///
/// The code is an application-level hint, it may or may not be a valid HTTP
/// status. The error handler only trusts codes in `400..600` and falls back to
/// 500 for everything else.
pub trait ResponseError: std::error::Error + Send + Sync {
    /// The default implementation returns 0 (no code).
    fn code(&self) -> i64 {
        0
    }
}
