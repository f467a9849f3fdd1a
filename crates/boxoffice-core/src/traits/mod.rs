//! Core traits defined in `boxoffice-core` and implemented by other crates.

pub mod lock;

pub use lock::LockCoordinator;
