//! UsageLimiter - an action behind a bounded invocation counter
//!
//! Key characteristics:
//! - The counter only ever goes down
//! - A use is counted before the action runs, so an action that re-enters
//!   its own limiter cannot earn extra uses
//! - Uses past the limit are silently ignored

use std::any::Any;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::capability::Usable;
use crate::config::UsageConfig;
use crate::error::{Result, UsageError};
use crate::DEFAULT_USAGE_LIMIT;

type Action<A> = Box<dyn Fn(A) -> anyhow::Result<()>>;

/// An action that may be invoked at most `limit` times
pub struct UsageLimiter<A = ()> {
    action: Action<A>,
    /// Limit the limiter was created with
    limit: u64,
    /// Uses left before the limiter becomes disused
    remaining: Cell<u64>,
}

impl<A: 'static> UsageLimiter<A> {
    /// Create a single-use limiter
    pub fn new<F>(action: F) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self::with_limit(action, DEFAULT_USAGE_LIMIT)
    }

    /// Create a limiter allowing `limit` uses
    pub fn with_limit<F>(action: F, limit: u64) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self::fallible(
            move |args| {
                action(args);
                Ok(())
            },
            limit,
        )
    }

    /// Create a limiter around an action that can fail.
    ///
    /// Errors from the action are returned from [`Usable::consume`]; the use
    /// still counts.
    pub fn fallible<F>(action: F, limit: u64) -> Self
    where
        F: Fn(A) -> anyhow::Result<()> + 'static,
    {
        Self {
            action: Box::new(action),
            limit,
            remaining: Cell::new(limit),
        }
    }

    /// Create a limiter from a signed limit, rejecting negative values
    pub fn try_with_limit<F>(action: F, limit: i64) -> Result<Self>
    where
        F: Fn(A) + 'static,
    {
        let limit = u64::try_from(limit).map_err(|_| {
            UsageError::invalid(format!("usage limit must be non-negative, got {limit}"))
        })?;
        Ok(Self::with_limit(action, limit))
    }

    /// Create a limiter using the configured default limit
    pub fn from_config<F>(action: F, config: &UsageConfig) -> Self
    where
        F: Fn(A) + 'static,
    {
        Self::with_limit(action, config.default_limit)
    }

    /// Create a limiter whose action does nothing
    pub fn noop(limit: u64) -> Self {
        Self::with_limit(|_| {}, limit)
    }

    /// Check if `candidate` is a limiter, owned or behind an `Rc`
    pub fn is_limiter(candidate: &dyn Any) -> bool {
        candidate.is::<Self>() || candidate.is::<Rc<Self>>()
    }
}

impl<A> UsageLimiter<A> {
    /// Uses left
    #[inline]
    pub fn remaining_uses(&self) -> u64 {
        self.remaining.get()
    }

    /// The limit this limiter was created with
    #[inline]
    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<A: 'static> Default for UsageLimiter<A> {
    fn default() -> Self {
        Self::noop(DEFAULT_USAGE_LIMIT)
    }
}

impl<A> Usable<A> for UsageLimiter<A> {
    fn consume(&self, args: A) -> Result<()> {
        let remaining = self.remaining.get();
        if remaining == 0 {
            trace!(limit = self.limit, "Limiter exhausted, ignoring use");
            return Ok(());
        }

        self.remaining.set(remaining - 1);
        trace!(remaining = remaining - 1, "Limiter used");
        (self.action)(args)?;
        Ok(())
    }

    fn disuse(&self) -> Result<()> {
        self.remaining.set(0);
        Ok(())
    }

    #[inline]
    fn is_usable(&self) -> bool {
        self.remaining.get() > 0
    }
}

impl<A> fmt::Debug for UsageLimiter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageLimiter")
            .field("limit", &self.limit)
            .field("remaining", &self.remaining.get())
            .finish_non_exhaustive()
    }
}
