use serde::Deserialize;

use crate::diagnostics::{Severity, SeverityMask};
use crate::negotiation::MalformedQuality;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid error handler config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Configuration for the error handler
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErrorHandlerConfig {
    /// Diagnostic severities promoted to failures (default: all)
    pub reporting: SeverityMask,
    /// Treatment of malformed `q` parameters in `Accept` (default: weight 1.0)
    pub malformed_quality: MalformedQuality,
    /// Convert downstream panics into error responses (default: true)
    pub catch_panics: bool,
}

impl Default for ErrorHandlerConfig {
    fn default() -> Self {
        Self {
            reporting: SeverityMask::ALL,
            malformed_quality: MalformedQuality::FallbackToOne,
            catch_panics: true,
        }
    }
}

impl ErrorHandlerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from JSON, e.g. `{"reporting": ["warning", "notice"], "catch_panics": false}`.
    /// Missing fields keep their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Set the severities promoted to failures
    pub fn reporting(mut self, mask: SeverityMask) -> Self {
        self.reporting = mask;
        self
    }

    /// Stop promoting one severity
    pub fn ignore(mut self, severity: Severity) -> Self {
        self.reporting = self.reporting.without(severity);
        self
    }

    pub fn malformed_quality(mut self, policy: MalformedQuality) -> Self {
        self.malformed_quality = policy;
        self
    }

    pub fn catch_panics(mut self, catch: bool) -> Self {
        self.catch_panics = catch;
        self
    }
}
