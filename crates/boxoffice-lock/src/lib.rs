//! # boxoffice-lock
//!
//! Lock coordinator implementations for BoxOffice. Supports two modes:
//!
//! - **memory**: process-local entries in a [dashmap](https://crates.io/crates/dashmap)
//!   with lazy expiry, for single-instance deployments and tests
//! - **redis**: `SET NX EX` entries in Redis, shared by every instance
//!
//! The backend is selected at runtime based on configuration.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::LockManager;
