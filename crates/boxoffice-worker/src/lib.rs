//! Background tasks for BoxOffice.
//!
//! This crate provides:
//! - The expiry reaper job that returns lapsed, unlocked holds to sale
//! - A runner that repeats the job on a fixed interval until stopped

pub mod jobs;
pub mod runner;

pub use jobs::reaper::{ExpiryReaper, ReapReport};
pub use runner::{ReaperHandle, ReaperRunner};
