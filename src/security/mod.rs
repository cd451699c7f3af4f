//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-IP limits)
//!     → Pass to the resolution handler
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject with 429 when the bucket is empty
//! - No trust in client input

pub mod rate_limit;
