//! In-memory lock coordinator.

mod store;

pub use store::MemoryLockCoordinator;
