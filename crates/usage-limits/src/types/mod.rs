//! Usage-limited value types

pub mod group;
pub mod limiter;
