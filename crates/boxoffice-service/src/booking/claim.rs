//! All-or-nothing seat lock acquisition.
//!
//! Locks are taken one seat at a time in the caller's order. Every lock
//! created by the batch is recorded, and if any seat blocks, exactly those
//! locks are released again. Locks the principal already owned before the
//! batch started count as claimed but are never released by it.

use std::time::Duration;

use tracing::{debug, warn};

use boxoffice_core::result::AppResult;
use boxoffice_core::traits::lock::LockCoordinator;
use boxoffice_core::types::id::SeatId;
use boxoffice_entity::seat::Seat;
use boxoffice_lock::keys::seat_lock;

use super::types::{FailedSeat, FailureReason};

/// Locks held on behalf of one batch.
#[derive(Debug, Default)]
pub struct ClaimSet {
    /// Every claimed seat, in claim order.
    claimed: Vec<SeatId>,
    /// Seats whose lock this batch created. Released on compensation.
    fresh: Vec<SeatId>,
}

impl ClaimSet {
    /// Every claimed seat, in claim order.
    pub fn claimed(&self) -> &[SeatId] {
        &self.claimed
    }

    /// Seats whose lock this batch created.
    pub fn fresh(&self) -> &[SeatId] {
        &self.fresh
    }

    /// Release every lock this batch created.
    ///
    /// Release failures are logged; the lock then lapses with its TTL.
    pub async fn compensate<L>(self, locks: &L, owner: &str)
    where
        L: LockCoordinator + ?Sized,
    {
        for seat_id in self.fresh {
            match locks.release_if_owner(&seat_lock(seat_id), owner).await {
                Ok(true) => debug!(%seat_id, owner, "Released compensated seat lock"),
                Ok(false) => debug!(%seat_id, owner, "Compensated seat lock already gone"),
                Err(e) => warn!(%seat_id, owner, error = %e, "Failed to release seat lock"),
            }
        }
    }
}

/// Result of an all-or-nothing claim.
#[derive(Debug)]
pub enum BatchClaim {
    /// Every seat is locked by the owner.
    Granted(ClaimSet),
    /// At least one seat blocked; fresh locks were already released.
    Rejected(Vec<FailedSeat>),
}

/// Lock every seat for `owner`, or none of them.
///
/// All seats are attempted so the rejection names every blocker. A
/// coordinator error releases the fresh locks and is returned.
pub async fn claim_all<L>(
    locks: &L,
    owner: &str,
    ttl: Duration,
    seats: &[Seat],
) -> AppResult<BatchClaim>
where
    L: LockCoordinator + ?Sized,
{
    let mut set = ClaimSet::default();
    let mut blocked = Vec::new();

    for seat in seats {
        match claim_one(locks, owner, ttl, seat.id).await {
            Ok(Claim::Fresh) => {
                set.fresh.push(seat.id);
                set.claimed.push(seat.id);
            }
            Ok(Claim::AlreadyOwned) => set.claimed.push(seat.id),
            Ok(Claim::Blocked) => blocked.push(FailedSeat::new(
                seat.id,
                Some(seat.seat_number.clone()),
                FailureReason::HeldByAnotherUser,
            )),
            Err(e) => {
                set.compensate(locks, owner).await;
                return Err(e);
            }
        }
    }

    if blocked.is_empty() {
        return Ok(BatchClaim::Granted(set));
    }
    set.compensate(locks, owner).await;
    Ok(BatchClaim::Rejected(blocked))
}

enum Claim {
    Fresh,
    AlreadyOwned,
    Blocked,
}

async fn claim_one<L>(locks: &L, owner: &str, ttl: Duration, seat_id: SeatId) -> AppResult<Claim>
where
    L: LockCoordinator + ?Sized,
{
    let key = seat_lock(seat_id);
    if locks.try_acquire(&key, owner, ttl).await? {
        return Ok(Claim::Fresh);
    }
    // The batch writes a fresh hold expiry, so an owned lock must cover it too.
    if locks.extend_if_owner(&key, owner, ttl).await? {
        return Ok(Claim::AlreadyOwned);
    }
    Ok(Claim::Blocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxoffice_core::types::id::EventId;
    use boxoffice_entity::seat::SeatStatus;
    use boxoffice_lock::memory::MemoryLockCoordinator;

    const TTL: Duration = Duration::from_secs(300);

    fn seats(ids: &[i64]) -> Vec<Seat> {
        ids.iter()
            .map(|&id| Seat {
                id: SeatId::new(id),
                event_id: EventId::new(7),
                seat_number: format!("A{id}"),
                status: SeatStatus::Available,
                hold_expiry: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_grants_all_free_seats() {
        let locks = MemoryLockCoordinator::new();
        let BatchClaim::Granted(set) = claim_all(&locks, "1", TTL, &seats(&[1, 2, 3])).await.unwrap()
        else {
            panic!("expected grant");
        };
        assert_eq!(set.claimed(), &[SeatId::new(1), SeatId::new(2), SeatId::new(3)]);
        assert_eq!(set.fresh().len(), 3);
    }

    #[tokio::test]
    async fn test_rejection_releases_only_fresh_locks() {
        let locks = MemoryLockCoordinator::new();
        locks.try_acquire("seat_lock:1", "1", TTL).await.unwrap();
        locks.try_acquire("seat_lock:3", "2", TTL).await.unwrap();

        let outcome = claim_all(&locks, "1", TTL, &seats(&[1, 2, 3])).await.unwrap();
        let BatchClaim::Rejected(failed) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].seat_id, SeatId::new(3));
        assert_eq!(failed[0].reason, FailureReason::HeldByAnotherUser);

        // Pre-existing lock survives, fresh lock is gone, blocker untouched.
        assert_eq!(locks.current_owner("seat_lock:1").await.unwrap().as_deref(), Some("1"));
        assert_eq!(locks.current_owner("seat_lock:2").await.unwrap(), None);
        assert_eq!(locks.current_owner("seat_lock:3").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_owned_lock_is_extended_by_grant() {
        let locks = MemoryLockCoordinator::new();
        locks.try_acquire("seat_lock:1", "1", TTL).await.unwrap();
        tokio::time::advance(Duration::from_secs(200)).await;

        let BatchClaim::Granted(set) = claim_all(&locks, "1", TTL, &seats(&[1, 2])).await.unwrap()
        else {
            panic!("expected grant");
        };
        assert_eq!(set.fresh(), &[SeatId::new(2)]);
        assert_eq!(locks.remaining_ttl("seat_lock:1").await.unwrap(), Some(TTL));
    }

    #[tokio::test]
    async fn test_rejection_names_every_blocker() {
        let locks = MemoryLockCoordinator::new();
        locks.try_acquire("seat_lock:2", "9", TTL).await.unwrap();
        locks.try_acquire("seat_lock:4", "9", TTL).await.unwrap();

        let BatchClaim::Rejected(failed) =
            claim_all(&locks, "1", TTL, &seats(&[1, 2, 3, 4])).await.unwrap()
        else {
            panic!("expected rejection");
        };
        let ids: Vec<SeatId> = failed.iter().map(|f| f.seat_id).collect();
        assert_eq!(ids, vec![SeatId::new(2), SeatId::new(4)]);
        assert_eq!(locks.len(), 2);
        assert_eq!(locks.current_owner("seat_lock:1").await.unwrap(), None);
        assert_eq!(locks.current_owner("seat_lock:3").await.unwrap(), None);
    }
}
