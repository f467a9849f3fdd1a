//! A single live feed observer.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::message::OutboundMessage;

/// Unique observer identifier.
pub type ObserverId = Uuid;

/// Handle to one observer of an event's seat feed.
///
/// A new handle starts in priming mode: pushes are buffered until
/// [`prime`](Self::prime) has delivered the snapshot, so the snapshot is
/// always the first frame the observer sees.
#[derive(Debug)]
pub struct ObserverHandle {
    /// Unique observer ID.
    pub id: ObserverId,
    /// Sender for outbound frames.
    sender: mpsc::Sender<OutboundMessage>,
    /// Whether the observer can still receive frames.
    alive: AtomicBool,
    /// Pushes that arrived before the snapshot went out.
    pending: Mutex<Option<Vec<OutboundMessage>>>,
}

impl ObserverHandle {
    /// Create a handle and the receiver that drains it.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let handle = Self {
            id: Uuid::new_v4(),
            sender,
            alive: AtomicBool::new(true),
            pending: Mutex::new(Some(Vec::new())),
        };
        (handle, receiver)
    }

    /// Deliver the snapshot, then everything buffered behind it.
    ///
    /// Returns `false` if the observer could not take the frames.
    pub fn prime(&self, snapshot: OutboundMessage) -> bool {
        let Ok(mut pending) = self.pending.lock() else {
            self.mark_dead();
            return false;
        };
        let buffered = pending.take().unwrap_or_default();

        if !self.try_deliver(snapshot) {
            return false;
        }
        buffered.into_iter().all(|msg| self.try_deliver(msg))
    }

    /// Push a frame, or buffer it while priming.
    ///
    /// Returns `false` if the observer is gone or its buffer is full.
    pub fn send(&self, msg: OutboundMessage) -> bool {
        if !self.is_alive() {
            return false;
        }
        let Ok(mut pending) = self.pending.lock() else {
            self.mark_dead();
            return false;
        };
        if let Some(buffer) = pending.as_mut() {
            buffer.push(msg);
            return true;
        }
        // Sent under the lock so concurrent pushes keep their order.
        self.try_deliver(msg)
    }

    /// Check if the observer is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the observer as dead.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    fn try_deliver(&self, msg: OutboundMessage) -> bool {
        match self.sender.try_send(msg) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(observer_id = %self.id, "Observer buffer full, dropping observer");
                self.mark_dead();
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }
}
