//! Non-fatal runtime diagnostics and their promotion into failures.
//!
//! Handler code reports recoverable oddities (a missing optional field, a
//! deprecated parameter) through [`raise`]. Outside of an error handler they
//! are only logged. While an error handler is running the downstream call, a
//! [`PromotionGuard`] is installed and any diagnostic whose severity is in the
//! guard's reporting mask becomes a [`HandlerError`], so `?` aborts the handler
//! and the error handler answers with an error response instead.
//!
//! The active mask lives in a thread-local slot. [`Promoted`] re-installs it
//! around every poll of the wrapped future, so the window follows the task
//! across worker threads and never leaks into other tasks polled on the same
//! thread.

use std::cell::Cell;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::Deserialize;

use crate::error::HandlerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Notice,
    Deprecated,
    UserWarning,
    UserNotice,
    UserDeprecated,
}

impl Severity {
    pub const fn bit(self) -> u32 {
        match self {
            Severity::Warning => 1 << 0,
            Severity::Notice => 1 << 1,
            Severity::Deprecated => 1 << 2,
            Severity::UserWarning => 1 << 3,
            Severity::UserNotice => 1 << 4,
            Severity::UserDeprecated => 1 << 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Deprecated => "deprecated",
            Severity::UserWarning => "user_warning",
            Severity::UserNotice => "user_notice",
            Severity::UserDeprecated => "user_deprecated",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of severities that get promoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "Vec<Severity>")]
pub struct SeverityMask(u32);

impl SeverityMask {
    pub const NONE: SeverityMask = SeverityMask(0);
    pub const ALL: SeverityMask = SeverityMask(0b11_1111);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bit() != 0
    }

    pub const fn with(self, severity: Severity) -> Self {
        Self(self.0 | severity.bit())
    }

    pub const fn without(self, severity: Severity) -> Self {
        Self(self.0 & !severity.bit())
    }
}

impl Default for SeverityMask {
    fn default() -> Self {
        Self::ALL
    }
}

impl From<Severity> for SeverityMask {
    fn from(severity: Severity) -> Self {
        Self(severity.bit())
    }
}

impl From<Vec<Severity>> for SeverityMask {
    fn from(severities: Vec<Severity>) -> Self {
        severities
            .into_iter()
            .fold(Self::NONE, |mask, severity| mask.with(severity))
    }
}

impl std::ops::BitOr for SeverityMask {
    type Output = SeverityMask;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOr<Severity> for SeverityMask {
    type Output = SeverityMask;

    fn bitor(self, rhs: Severity) -> Self::Output {
        self.with(rhs)
    }
}

thread_local! {
    static ACTIVE: Cell<Option<SeverityMask>> = const { Cell::new(None) };
}

/// Installs a reporting mask for the current thread and puts back whatever
/// was there before when dropped.
#[must_use = "the mask is uninstalled as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PromotionGuard {
    prev: Option<SeverityMask>,
    // the slot is per thread, the guard must be dropped where it was created
    _not_send: PhantomData<*const ()>,
}

impl PromotionGuard {
    pub fn install(mask: SeverityMask) -> Self {
        let prev = ACTIVE.with(|active| active.replace(Some(mask)));
        Self {
            prev,
            _not_send: PhantomData,
        }
    }
}

impl Drop for PromotionGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| active.set(self.prev));
    }
}

/// The mask installed by the innermost live guard, if any.
pub fn current() -> Option<SeverityMask> {
    ACTIVE.with(|active| active.get())
}

/// Report a runtime diagnostic.
///
/// Returns `Err` only when a promotion scope is active and `severity` is in
/// its mask.
pub fn raise<S: Into<String>>(severity: Severity, message: S) -> Result<(), HandlerError> {
    let message = message.into();
    match current() {
        Some(mask) if mask.contains(severity) => {
            tracing::debug!(%severity, detail = %message, "promoting diagnostic to failure");
            Err(HandlerError::diagnostic(severity, message))
        }
        Some(_) => {
            tracing::trace!(%severity, detail = %message, "diagnostic outside reporting mask");
            Ok(())
        }
        None => {
            tracing::warn!(%severity, "{}", message);
            Ok(())
        }
    }
}

pub fn warning<S: Into<String>>(message: S) -> Result<(), HandlerError> {
    raise(Severity::Warning, message)
}

pub fn notice<S: Into<String>>(message: S) -> Result<(), HandlerError> {
    raise(Severity::Notice, message)
}

pub fn deprecated<S: Into<String>>(message: S) -> Result<(), HandlerError> {
    raise(Severity::Deprecated, message)
}

/// Future that runs every poll of `F` under a [`PromotionGuard`].
#[derive(Debug)]
pub struct Promoted<F> {
    inner: F,
    mask: SeverityMask,
}

impl<F> Promoted<F> {
    pub fn new(inner: F, mask: SeverityMask) -> Self {
        Self { inner, mask }
    }
}

impl<F: Future + Unpin> Future for Promoted<F> {
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let _guard = PromotionGuard::install(this.mask);
        Pin::new(&mut this.inner).poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_outside_scope_is_not_promoted() {
        assert_eq!(current(), None);
        assert!(notice("nobody is listening").is_ok());
    }

    #[test]
    fn guard_promotes_only_masked_severities() {
        let _guard = PromotionGuard::install(SeverityMask::from(Severity::Notice));
        let err = notice("Undefined index: id").unwrap_err();
        assert_eq!(err.message(), "Undefined index: id");
        assert!(warning("suppressed").is_ok());
        assert!(deprecated("suppressed").is_ok());
    }

    #[test]
    fn guards_restore_previous_mask_in_stack_order() {
        let outer = SeverityMask::ALL;
        let inner = SeverityMask::NONE.with(Severity::Deprecated);
        {
            let _outer = PromotionGuard::install(outer);
            assert_eq!(current(), Some(outer));
            {
                let _inner = PromotionGuard::install(inner);
                assert_eq!(current(), Some(inner));
                assert!(notice("below inner mask").is_ok());
            }
            assert_eq!(current(), Some(outer));
            assert!(notice("back under outer mask").is_err());
        }
        assert_eq!(current(), None);
    }

    #[test]
    fn guard_is_released_on_unwind() {
        let result = std::panic::catch_unwind(|| {
            let _guard = PromotionGuard::install(SeverityMask::ALL);
            panic!("boom");
        });
        assert!(result.is_err());
        assert_eq!(current(), None);
    }

    #[test]
    fn mask_operations() {
        let mask = SeverityMask::NONE | Severity::Warning | Severity::UserNotice;
        assert!(mask.contains(Severity::Warning));
        assert!(mask.contains(Severity::UserNotice));
        assert!(!mask.contains(Severity::Notice));
        assert!(!mask.without(Severity::Warning).contains(Severity::Warning));
        assert_eq!(SeverityMask::from_bits(u32::MAX), SeverityMask::ALL);
        assert_eq!(SeverityMask::default(), SeverityMask::ALL);
    }

    #[test]
    fn mask_deserializes_from_names() {
        let mask: SeverityMask = serde_json::from_str(r#"["notice", "user_deprecated"]"#).unwrap();
        assert_eq!(mask, SeverityMask::NONE | Severity::Notice | Severity::UserDeprecated);
    }

    #[tokio::test]
    async fn promoted_future_scopes_each_poll() {
        let seen = Promoted::new(Box::pin(async { current() }), SeverityMask::NONE).await;
        assert_eq!(seen, Some(SeverityMask::NONE));
        assert_eq!(current(), None);
    }
}
