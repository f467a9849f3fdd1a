//! # boxoffice-realtime
//!
//! Live seat feed for BoxOffice. Provides:
//!
//! - A per-event observer registry ([`BroadcastHub`]) with best-effort fan-out
//! - Observer handles that buffer pushes until the initial snapshot is out
//! - The JSON frames pushed to observers

pub mod hub;
pub mod message;

pub use hub::observer::{ObserverHandle, ObserverId};
pub use hub::registry::BroadcastHub;
pub use message::{OutboundMessage, SeatSnapshot};
