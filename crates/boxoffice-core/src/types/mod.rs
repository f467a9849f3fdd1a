//! Core type definitions used across the BoxOffice workspace.

pub mod id;
pub mod redact;
pub mod timestamp;

pub use id::*;
