//! Broadcast hub: per-event observer sets and fan-out.

pub mod observer;
pub mod registry;
