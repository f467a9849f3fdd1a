//! Job implementations.

pub mod reaper;
