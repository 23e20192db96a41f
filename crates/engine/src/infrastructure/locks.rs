//! Per-aggregate mutual exclusion.
//!
//! Storage calls are individually atomic, but a use case reads, decides and
//! then writes. Holding the aggregate's lock across that sequence keeps two
//! requests against the same game, treasure or creature from interleaving.
//!
//! Entries live only while someone holds or waits on them; the last guard to
//! drop removes its key.

use std::sync::Arc;

use dashmap::DashMap;
use delver_domain::{CreatureId, GameId, TreasureId};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum AggregateKey {
    Game(i64),
    Treasure(i64),
    Creature(i64),
}

type LockMap = DashMap<AggregateKey, Arc<Mutex<()>>>;

/// Registry of async mutexes keyed by aggregate id.
#[derive(Default)]
pub struct AggregateLocks {
    locks: Arc<LockMap>,
}

/// Held lock on one aggregate. Dropping it releases the lock.
pub struct AggregateGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: AggregateKey,
    locks: Arc<LockMap>,
}

impl Drop for AggregateGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own handle left: nobody holds or waits on it.
        self.locks
            .remove_if(&self.key, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

impl AggregateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    async fn lock(&self, key: AggregateKey) -> AggregateGuard {
        let mutex = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        AggregateGuard {
            guard: Some(mutex.lock_owned().await),
            key,
            locks: self.locks.clone(),
        }
    }

    pub async fn lock_game(&self, id: GameId) -> AggregateGuard {
        self.lock(AggregateKey::Game(id.get())).await
    }

    pub async fn lock_treasure(&self, id: TreasureId) -> AggregateGuard {
        self.lock(AggregateKey::Treasure(id.get())).await
    }

    /// Lock every listed creature, in ascending id order so that two callers
    /// with overlapping sets cannot deadlock.
    pub async fn lock_creatures(&self, ids: &[CreatureId]) -> Vec<AggregateGuard> {
        let mut keys: Vec<AggregateKey> = ids
            .iter()
            .map(|id| AggregateKey::Creature(id.get()))
            .collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            guards.push(self.lock(key).await);
        }
        guards
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_game_is_serialised() {
        let locks = Arc::new(AggregateLocks::new());
        let guard = locks.lock_game(GameId::new(1)).await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock_game(GameId::new(1)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_aggregates_do_not_block() {
        let locks = AggregateLocks::new();
        let _game = locks.lock_game(GameId::new(1)).await;
        let _other = locks.lock_game(GameId::new(2)).await;
        let _treasure = locks.lock_treasure(TreasureId::new(1)).await;
        let _creatures = locks
            .lock_creatures(&[CreatureId::new(1), CreatureId::new(1)])
            .await;
    }

    #[tokio::test]
    async fn overlapping_creature_sets_are_serialised() {
        let locks = Arc::new(AggregateLocks::new());
        let held = locks
            .lock_creatures(&[CreatureId::new(3), CreatureId::new(1)])
            .await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks
                    .lock_creatures(&[CreatureId::new(1), CreatureId::new(2)])
                    .await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(held);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn released_entries_are_removed() {
        let locks = AggregateLocks::new();
        for id in 0..50 {
            let _g = locks.lock_game(GameId::new(id)).await;
            let _t = locks.lock_treasure(TreasureId::new(id)).await;
        }
        let guards = locks
            .lock_creatures(&[CreatureId::new(1), CreatureId::new(2)])
            .await;
        assert_eq!(locks.len(), 2);

        drop(guards);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn entry_survives_while_a_waiter_is_queued() {
        let locks = Arc::new(AggregateLocks::new());
        let guard = locks.lock_game(GameId::new(7)).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.lock_game(GameId::new(7)).await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        assert_eq!(locks.len(), 1);
        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }
}
