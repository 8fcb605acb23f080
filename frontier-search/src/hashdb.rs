//! Concurrent fingerprint set for visited-state deduplication.
//!
//! The original source guards a single `atomicQueue_t`-style concurrent
//! set; the idiomatic Rust analogue used here is a fixed number of
//! independently-locked shards (`parking_lot::Mutex<hashbrown::HashSet>`),
//! the same sharded-lock pattern `ChainSafe-forest` uses for its own
//! high-contention concurrent maps. `try_insert` stays linearizable per
//! fingerprint (§5) because each fingerprint maps to exactly one shard.

use std::sync::atomic::{AtomicUsize, Ordering};

use hashbrown::HashSet;
use parking_lot::Mutex;

use frontier_core::Fingerprint;

const SHARD_COUNT: usize = 32;

/// Result of a [`HashDb::try_insert`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    InsertedNew,
    AlreadyPresent,
    Full,
}

/// Concurrent set of fingerprints, sized independently of the StateDB.
pub struct HashDb {
    shards: Vec<Mutex<HashSet<u64>>>,
    max_entries: usize,
    len: AtomicUsize,
}

impl HashDb {
    #[must_use]
    pub fn init(max_entries: usize) -> Self {
        let shards = (0..SHARD_COUNT).map(|_| Mutex::new(HashSet::new())).collect();
        Self {
            shards,
            max_entries,
            len: AtomicUsize::new(0),
        }
    }

    fn shard_index(fp: Fingerprint) -> usize {
        (fp.as_u64() as usize) % SHARD_COUNT
    }

    /// Atomic check-and-set. `Full` means `max_entries` was reached and
    /// `fp` itself is new — see [`Self::clear_generation`] for the
    /// eviction-policy escape hatch (§4.2).
    ///
    /// `max_entries == 0` disables dedup entirely (§8's boundary case):
    /// every fingerprint is reported `InsertedNew` and nothing is ever
    /// stored, so the engine degrades to uncontrolled exponential
    /// expansion rather than an unbounded visited set.
    pub fn try_insert(&self, fp: Fingerprint) -> InsertOutcome {
        if self.max_entries == 0 {
            return InsertOutcome::InsertedNew;
        }
        let mut shard = self.shards[Self::shard_index(fp)].lock();
        if shard.contains(&fp.as_u64()) {
            return InsertOutcome::AlreadyPresent;
        }
        if self.len.load(Ordering::Relaxed) >= self.max_entries {
            return InsertOutcome::Full;
        }
        shard.insert(fp.as_u64());
        self.len.fetch_add(1, Ordering::Relaxed);
        InsertOutcome::InsertedNew
    }

    #[must_use]
    pub fn contains(&self, fp: Fingerprint) -> bool {
        self.shards[Self::shard_index(fp)].lock().contains(&fp.as_u64())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear every shard, admitting re-exploration. The `Evict`
    /// configuration option (§4.2) calls this when `try_insert` reports
    /// `Full`, then retries the insert once.
    pub fn clear_generation(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
        self.len.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_core::compute_fingerprint;

    #[test]
    fn inserted_new_then_already_present() {
        let db = HashDb::init(100);
        let fp = compute_fingerprint(b"a");
        assert_eq!(db.try_insert(fp), InsertOutcome::InsertedNew);
        assert_eq!(db.try_insert(fp), InsertOutcome::AlreadyPresent);
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn reports_full_at_capacity() {
        let db = HashDb::init(1);
        let a = compute_fingerprint(b"a");
        let b = compute_fingerprint(b"b");
        assert_eq!(db.try_insert(a), InsertOutcome::InsertedNew);
        assert_eq!(db.try_insert(b), InsertOutcome::Full);
    }

    #[test]
    fn zero_max_entries_disables_dedup() {
        let db = HashDb::init(0);
        let fp = compute_fingerprint(b"repeated");
        for _ in 0..50 {
            assert_eq!(db.try_insert(fp), InsertOutcome::InsertedNew);
        }
        assert_eq!(db.len(), 0, "nothing is ever stored once dedup is disabled");
        assert!(!db.contains(fp));
    }

    #[test]
    fn clear_generation_admits_re_exploration() {
        let db = HashDb::init(1);
        let a = compute_fingerprint(b"a");
        assert_eq!(db.try_insert(a), InsertOutcome::InsertedNew);
        db.clear_generation();
        assert_eq!(db.len(), 0);
        assert_eq!(db.try_insert(a), InsertOutcome::InsertedNew);
    }
}
