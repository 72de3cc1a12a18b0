//! # Usage Limits
//!
//! Usage-limited actions, and groups that use and retire many of them at once.
//!
//! ## Core Types
//!
//! - [`Usable`]: the capability every group member has: use, disuse, report state
//! - [`UsageLimiter`]: an action that may run at most `limit` times
//! - [`UsageGroup`]: members used together, synchronously or as deferred
//!   local tasks, and disused together
//!
//! ```
//! use std::rc::Rc;
//! use usage_limits::prelude::*;
//!
//! let once = Rc::new(UsageLimiter::<()>::noop(1));
//! let twice = Rc::new(UsageLimiter::<()>::noop(2));
//! let group = UsageGroup::with_members([Rc::clone(&once), Rc::clone(&twice)]);
//!
//! group.use_sync(()).unwrap();
//! assert!(group.is_usable());
//! assert!(!once.is_usable());
//!
//! group.disuse().unwrap();
//! assert!(twice.is_disused());
//! ```

pub mod capability;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use capability::{is_useful, GroupId, Member, MemberHandle, Usable};
pub use config::UsageConfig;
pub use error::{Result, UsageError};
pub use types::{group::UsageGroup, limiter::UsageLimiter};

/// Everything needed to build and use limiters and groups
pub mod prelude {
    pub use crate::capability::{Member, Usable};
    pub use crate::error::{Result, UsageError};
    pub use crate::types::{group::UsageGroup, limiter::UsageLimiter};
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Uses granted to a limiter when no limit is given
pub const DEFAULT_USAGE_LIMIT: u64 = 1;
