//! Redis lock coordinator.

mod client;
mod coordinator;

pub use client::RedisClient;
pub use coordinator::RedisLockCoordinator;
