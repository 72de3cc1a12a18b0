//! Usable capability
//!
//! Anything that can be used and permanently disused implements [`Usable`].
//! Groups hold members through the shared [`Member`] handle, so limiters,
//! custom types and nested groups can sit side by side in one group.

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, UsageError};
use crate::types::{group::UsageGroup, limiter::UsageLimiter};

/// Identity of a [`UsageGroup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(Uuid);

impl GroupId {
    /// Generate a new time-ordered identifier
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A value that can be used a bounded number of times and retired for good.
///
/// `A` is the argument forwarded to each use. Implementors only need
/// [`consume`](Usable::consume), [`disuse`](Usable::disuse) and
/// [`is_usable`](Usable::is_usable).
pub trait Usable<A> {
    /// Attempt one use. What a use means is up to the implementor; a value
    /// that is no longer usable should return `Ok(())` without effect.
    fn consume(&self, args: A) -> Result<()>;

    /// Make this value permanently inert. Must be idempotent.
    fn disuse(&self) -> Result<()>;

    fn is_usable(&self) -> bool;

    fn is_disused(&self) -> bool {
        !self.is_usable()
    }

    /// Whether `group` is this value or is reachable through its members.
    ///
    /// Types that hold other usable values, such as a wrapper around an
    /// `Rc<UsageGroup>`, must forward this to what they hold. Otherwise a
    /// group can be made to contain itself through the wrapper and will
    /// recurse without bound on use and disuse.
    fn reaches(&self, _group: &GroupId) -> bool {
        false
    }
}

/// Shared handle to a group member
pub struct Member<A>(Rc<dyn Usable<A>>);

impl<A> Member<A> {
    /// Wrap an owned value in a fresh shared handle
    pub fn new<U>(value: U) -> Self
    where
        U: Usable<A> + 'static,
    {
        Self(Rc::new(value))
    }

    /// Whether both handles point at the same value
    pub fn same(&self, other: &Member<A>) -> bool {
        self.addr() == other.addr()
    }
}

impl<A> Clone for Member<A> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<A> Deref for Member<A> {
    type Target = dyn Usable<A>;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl<A, U> From<Rc<U>> for Member<A>
where
    U: Usable<A> + 'static,
{
    fn from(value: Rc<U>) -> Self {
        Self(value)
    }
}

impl<A> fmt::Debug for Member<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("addr", &self.addr())
            .field("usable", &self.0.is_usable())
            .finish()
    }
}

/// Anything that identifies a member by the address of its shared value.
pub trait MemberHandle {
    fn addr(&self) -> *const ();
}

impl<U: ?Sized> MemberHandle for Rc<U> {
    fn addr(&self) -> *const () {
        Rc::as_ptr(self).cast::<()>()
    }
}

impl<A> MemberHandle for Member<A> {
    fn addr(&self) -> *const () {
        self.0.addr()
    }
}

/// Check candidates before any of them joins `group`.
///
/// Fails on the first candidate that would make the group contain itself.
pub fn validate_members<A>(group: &GroupId, candidates: &[Member<A>]) -> Result<()> {
    for (position, candidate) in candidates.iter().enumerate() {
        if candidate.reaches(group) {
            return Err(UsageError::invalid(format!(
                "member at position {position} would make group {group} contain itself"
            )));
        }
    }
    Ok(())
}

/// Runtime shape check for values whose type is only known as [`Any`].
///
/// True for limiters, groups, and handles to either or to any other
/// [`Usable`] value.
pub fn is_useful<A: 'static>(candidate: &dyn Any) -> bool {
    candidate.is::<Member<A>>()
        || UsageLimiter::<A>::is_limiter(candidate)
        || candidate.is::<UsageGroup<A>>()
        || candidate.is::<Rc<UsageGroup<A>>>()
}
