//! UsageGroup - many usable values used and retired as one
//!
//! A group forwards uses to every member, either right away
//! ([`UsageGroup::use_sync`]) or as detached tasks on the current thread
//! ([`UsageGroup::use_deferred`]). Disusing a group disuses every member and
//! then freezes the group: from then on every operation is a silent no-op.
//!
//! A group never drops exhausted members. A live group whose members are
//! all exhausted is neither usable nor disused.

use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::{debug, warn};

use crate::capability::{validate_members, GroupId, Member, MemberHandle, Usable};
use crate::error::Result;

/// An aggregate of [`Usable`] members with a lifecycle of its own
pub struct UsageGroup<A = ()> {
    id: GroupId,
    /// Insertion-ordered, deduplicated by identity
    members: RefCell<Vec<Member<A>>>,
    disused: Cell<bool>,
}

impl<A> UsageGroup<A> {
    /// Create an empty group
    pub fn new() -> Self {
        let id = GroupId::new();
        debug!(group = %id, "Created usage group");
        Self {
            id,
            members: RefCell::new(Vec::new()),
            disused: Cell::new(false),
        }
    }

    /// Create a group holding `members`.
    ///
    /// A fresh group cannot be reached from any existing value, so every
    /// candidate is accepted; duplicates collapse.
    pub fn with_members<I, M>(members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Member<A>>,
    {
        let group = Self::new();
        group.insert(members.into_iter().map(Into::into).collect());
        group
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    /// True if not disused and at least one member is usable
    pub fn is_usable(&self) -> bool {
        !self.disused.get() && self.members.borrow().iter().any(|m| m.is_usable())
    }

    /// True once [`disuse`](Self::disuse) has completed
    pub fn is_disused(&self) -> bool {
        self.disused.get()
    }

    /// Whether `candidate` is a member. Always false once disused.
    pub fn has(&self, candidate: &impl MemberHandle) -> bool {
        if self.disused.get() {
            return false;
        }
        let addr = candidate.addr();
        self.members.borrow().iter().any(|m| m.addr() == addr)
    }

    pub fn len(&self) -> usize {
        self.members.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.borrow().is_empty()
    }

    /// Snapshot of the current members in insertion order
    pub fn members(&self) -> Vec<Member<A>> {
        self.members.borrow().clone()
    }

    /// Add members.
    ///
    /// Every candidate is validated before any is inserted: if one would
    /// make this group contain itself, nothing is added and
    /// [`UsageError::InvalidArgument`](crate::UsageError::InvalidArgument)
    /// is returned. Does nothing once disused.
    pub fn add<I, M>(&self, members: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Member<A>>,
    {
        if self.disused.get() {
            return Ok(());
        }

        let candidates: Vec<Member<A>> = members.into_iter().map(Into::into).collect();
        if candidates.is_empty() {
            return Ok(());
        }

        validate_members(&self.id, &candidates)?;
        self.insert(candidates);
        Ok(())
    }

    /// Add a single member
    pub fn add_one(&self, member: impl Into<Member<A>>) -> Result<()> {
        self.add([member.into()])
    }

    /// Remove `candidate`, returning whether it was a member.
    /// Always false once disused.
    pub fn remove(&self, candidate: &impl MemberHandle) -> bool {
        if self.disused.get() {
            return false;
        }

        let addr = candidate.addr();
        let removed = {
            let mut members = self.members.borrow_mut();
            let index = members.iter().position(|m| m.addr() == addr);
            index.map(|index| members.remove(index))
        };

        if removed.is_some() {
            debug!(group = %self.id, members = self.len(), "Removed member");
        }
        removed.is_some()
    }

    /// Detach every member. Detached members are not disused.
    pub fn clear(&self) {
        if self.disused.get() {
            return;
        }

        let detached = self.members.take();
        debug!(group = %self.id, detached = detached.len(), "Cleared usage group");
    }

    /// Use every member once, in insertion order, before returning.
    ///
    /// The first member error is returned immediately and the remaining
    /// members are not used.
    pub fn use_sync(&self, args: A) -> Result<()>
    where
        A: Clone,
    {
        if self.disused.get() {
            return Ok(());
        }

        let members = self.members();
        debug!(group = %self.id, members = members.len(), "Using members");
        for member in &members {
            member.consume(args.clone())?;
        }
        Ok(())
    }

    /// Use every member once, each in its own detached task.
    ///
    /// Tasks are spawned onto the current [`tokio::task::LocalSet`] and run
    /// only after the caller yields, in no particular order. A failing
    /// member is logged and does not affect the others or the group.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a `LocalSet`, like
    /// [`tokio::task::spawn_local`].
    pub fn use_deferred(&self, args: A)
    where
        A: Clone + 'static,
    {
        if self.disused.get() {
            return;
        }

        let group = self.id;
        let members = self.members();
        debug!(group = %group, members = members.len(), "Scheduling deferred uses");
        for member in members {
            let args = args.clone();
            tokio::task::spawn_local(async move {
                if let Err(err) = member.consume(args) {
                    warn!(group = %group, error = %err, "Deferred member use failed");
                }
            });
        }
    }

    /// Disuse every member in insertion order, then this group.
    ///
    /// If a member fails to disuse, the error is returned and the group
    /// stays live. Once disused the group lets go of its members and cannot
    /// be revived.
    pub fn disuse(&self) -> Result<()> {
        if self.disused.get() {
            return Ok(());
        }

        let members = self.members();
        for member in &members {
            member.disuse()?;
        }

        self.disused.set(true);
        let released = self.members.take();
        debug!(group = %self.id, released = released.len(), "Disused usage group");
        Ok(())
    }

    /// Use every member once, in insertion order. A failing member is
    /// logged and the rest are still used.
    fn use_isolated(&self, args: A)
    where
        A: Clone,
    {
        if self.disused.get() {
            return;
        }

        let members = self.members();
        debug!(group = %self.id, members = members.len(), "Using nested members");
        for member in &members {
            if let Err(err) = member.consume(args.clone()) {
                warn!(group = %self.id, error = %err, "Nested member use failed");
            }
        }
    }

    fn insert(&self, candidates: Vec<Member<A>>) {
        let mut members = self.members.borrow_mut();
        let before = members.len();
        for candidate in candidates {
            if !members.iter().any(|m| m.same(&candidate)) {
                members.push(candidate);
            }
        }
        debug!(
            group = %self.id,
            added = members.len() - before,
            members = members.len(),
            "Added members"
        );
    }
}

impl<A> Default for UsageGroup<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// A group used as a member of another group uses every member, logging
/// failures instead of stopping at the first one.
impl<A: Clone> Usable<A> for UsageGroup<A> {
    fn consume(&self, args: A) -> Result<()> {
        self.use_isolated(args);
        Ok(())
    }

    fn disuse(&self) -> Result<()> {
        UsageGroup::disuse(self)
    }

    fn is_usable(&self) -> bool {
        UsageGroup::is_usable(self)
    }

    fn is_disused(&self) -> bool {
        UsageGroup::is_disused(self)
    }

    fn reaches(&self, group: &GroupId) -> bool {
        self.id == *group || self.members.borrow().iter().any(|m| m.reaches(group))
    }
}

impl<A> fmt::Debug for UsageGroup<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsageGroup")
            .field("id", &self.id)
            .field("members", &self.members.borrow().len())
            .field("disused", &self.disused.get())
            .finish()
    }
}
