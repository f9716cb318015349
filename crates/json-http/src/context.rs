//! Cancellation context carried by every call

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::TransportError;

/// Cancellation context for a single call
///
/// A context is cancelled when its token (or any parent token) is
/// cancelled, or when its deadline passes. Cloning is cheap and clones
/// observe the same cancellation.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a child context together with the token that cancels it
    ///
    /// Cancelling the returned token does not affect `self`.
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = self.token.child_token();
        let child = Self {
            token: token.clone(),
            deadline: self.deadline,
        };
        (child, token)
    }

    /// Derive a child context that expires after `timeout`
    ///
    /// A timeout too large to represent adds no deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => Self {
                token: self.token.child_token(),
                deadline: self.deadline,
            },
        }
    }

    /// Derive a child context that expires at `deadline`
    ///
    /// An earlier deadline inherited from `self` is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Deadline of this context, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once the context is cancelled or its deadline passed
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Drive `fut` to completion unless the context ends first
    ///
    /// When the context wins, `fut` is dropped.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, TransportError>
    where
        F: Future,
    {
        if self.token.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(TransportError::Cancelled),
            _ = expired => Err(TransportError::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_background_runs_to_completion() {
        let ctx = Context::background();
        assert!(!ctx.is_cancelled());
        assert!(ctx.deadline().is_none());

        let out = ctx.run(async { 7 }).await.expect("not cancelled");
        assert_eq!(out, 7);
    }

    #[tokio::test]
    async fn test_cancelled_context_aborts() {
        let (ctx, token) = Context::background().with_cancel();
        token.cancel();

        assert!(ctx.is_cancelled());
        let result = ctx.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(TransportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_child_cancel_does_not_affect_parent() {
        let parent = Context::background();
        let (child, token) = parent.with_cancel();
        token.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_child() {
        let (parent, token) = Context::background().with_cancel();
        let child = parent.with_timeout(Duration::from_secs(60));
        token.cancel();

        assert!(child.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_exceeded() {
        let ctx = Context::background().with_timeout(Duration::from_millis(50));

        let result = ctx.run(std::future::pending::<()>()).await;
        assert!(matches!(result, Err(TransportError::DeadlineExceeded)));
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_unrepresentable_timeout_adds_no_deadline() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());

        let bounded = Context::background().with_timeout(Duration::from_secs(5));
        let unbounded = bounded.with_timeout(Duration::MAX);
        assert_eq!(unbounded.deadline(), bounded.deadline());

        let out = ctx.run(async { 1 }).await.expect("not cancelled");
        assert_eq!(out, 1);
    }

    #[test]
    fn test_with_deadline_keeps_earlier() {
        let now = Instant::now();
        let early = Context::background().with_deadline(now + Duration::from_secs(1));
        let later = early.with_deadline(now + Duration::from_secs(10));
        assert_eq!(later.deadline(), Some(now + Duration::from_secs(1)));

        let tighter = early.with_deadline(now + Duration::from_millis(10));
        assert_eq!(tighter.deadline(), Some(now + Duration::from_millis(10)));
    }
}
