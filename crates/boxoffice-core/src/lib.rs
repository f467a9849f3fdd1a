//! # boxoffice-core
//!
//! Core crate for BoxOffice. Contains configuration schemas, typed
//! identifiers, wire timestamp formatting, the lock coordinator trait,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other BoxOffice crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
