//! Bounded pool of fixed-size state slots with free/current/next queues.
//!
//! Grounded on two sources: `sterling_search`'s `BestFirstFrontier`
//! (`frontier.rs`) for the overall "owns a priority collection, pop gives
//! you the best, prune_to enforces a budget" shape, generalized here from a
//! single-threaded `BinaryHeap` to a concurrent, multi-worker pool; and the
//! original source's `stateDb/plain.hpp` for the concrete free-list /
//! steal-from-tail recycling algorithm and first-touch parallel allocation.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_queue::{ArrayQueue, SegQueue};
use parking_lot::Mutex;
use rayon::prelude::*;

use frontier_core::{MagnetSet, StateBlob, StepRecord};

use crate::error::SearchError;

struct Slot {
    blob: StateBlob,
    step: StepRecord,
    magnets: MagnetSet,
}

/// An opaque index into the StateDB's slot array.
///
/// Stable for the life of the StateDB — slots are allocated once at init
/// and never moved, per the data model's slot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle(pub usize);

/// Bounded-memory pool of fixed-size state slots, backing the search
/// frontier.
///
/// Every slot is in exactly one of three disjoint sets at any time: the
/// free queue, the current frontier, or the next frontier (§3 invariant).
/// `current` is a `Mutex<VecDeque>` rather than a lock-free queue because
/// it must support both `pop_front` (normal expansion order) and
/// `pop_back` (steal-from-tail recycling) — `get_free` reads the back of
/// the very structure `pop_current` reads the front of.
pub struct StateDb {
    slots: Vec<Mutex<Slot>>,
    slot_size: usize,
    free: ArrayQueue<usize>,
    current: Mutex<std::collections::VecDeque<usize>>,
    next: SegQueue<usize>,
    count_current: AtomicUsize,
    count_next: AtomicUsize,
    steal_count: AtomicUsize,
}

impl StateDb {
    /// Allocate `N = memory_cap_bytes / slot_size` slots, first-touched in
    /// parallel across worker threads (the Rayon parallel iterator stands
    /// in for the original's `posix_memalign` + explicit NUMA first-touch
    /// loop — the goal, spreading page faults across threads rather than
    /// pinning them to the initializing thread, is the same).
    ///
    /// Returns [`SearchError::StateDbAllocationFailed`] if the cap is too
    /// small to hold even one slot.
    pub fn init(
        slot_size: usize,
        memory_cap_bytes: usize,
        rule_count: usize,
        magnets_template: &MagnetSet,
    ) -> Result<Self, SearchError> {
        let n = memory_cap_bytes / slot_size.max(1);
        if n == 0 {
            return Err(SearchError::StateDbAllocationFailed {
                slot_size,
                memory_cap_bytes,
            });
        }

        let slots: Vec<Mutex<Slot>> = (0..n)
            .into_par_iter()
            .map(|_| {
                Mutex::new(Slot {
                    blob: StateBlob::zeroed(slot_size),
                    step: StepRecord::root(rule_count),
                    magnets: magnets_template.clone(),
                })
            })
            .collect();

        let free = ArrayQueue::new(n);
        for i in 0..n {
            free.push(i).expect("free queue sized exactly N");
        }

        Ok(Self {
            slots,
            slot_size,
            free,
            current: Mutex::new(std::collections::VecDeque::new()),
            next: SegQueue::new(),
            count_current: AtomicUsize::new(0),
            count_next: AtomicUsize::new(0),
            steal_count: AtomicUsize::new(0),
        })
    }

    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// How many children have been produced by stealing the tail of the
    /// current frontier rather than a genuinely free slot (observability
    /// counter, not part of the contract).
    #[must_use]
    pub fn steal_count(&self) -> usize {
        self.steal_count.load(Ordering::Relaxed)
    }

    /// Return a free slot, stealing from the tail of the current frontier
    /// (the lowest-priority unexpanded state, since `current` is kept in
    /// descending-reward order by [`Self::swap_frontiers`]) if the free
    /// queue is empty. `None` means the frontier is exhausted: no free
    /// slot and nothing left to steal.
    pub fn get_free(&self) -> Option<SlotHandle> {
        if let Some(idx) = self.free.pop() {
            return Some(SlotHandle(idx));
        }
        let mut current = self.current.lock();
        let stolen = current.pop_back();
        drop(current);
        if stolen.is_some() {
            self.count_current.fetch_sub(1, Ordering::Relaxed);
            self.steal_count.fetch_add(1, Ordering::Relaxed);
        }
        stolen.map(SlotHandle)
    }

    /// Unconditionally return a slot to the free queue. A failure here is a
    /// programmer error — the free queue is sized exactly `N` and a slot
    /// can only be returned once per acquisition.
    pub fn return_free(&self, slot: SlotHandle) {
        self.free
            .push(slot.0)
            .unwrap_or_else(|_| panic!("free queue overflow: slot {} returned twice", slot.0));
    }

    pub fn push_next(&self, slot: SlotHandle) {
        self.next.push(slot.0);
        self.count_next.fetch_add(1, Ordering::Relaxed);
    }

    /// Take the front (highest-priority) slot of the current frontier.
    pub fn pop_current(&self) -> Option<SlotHandle> {
        let popped = self.current.lock().pop_front();
        if popped.is_some() {
            self.count_current.fetch_sub(1, Ordering::Relaxed);
        }
        popped.map(SlotHandle)
    }

    #[must_use]
    pub fn count_current(&self) -> usize {
        self.count_current.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn count_next(&self) -> usize {
        self.count_next.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn count_free(&self) -> usize {
        self.free.len()
    }

    /// Drain the next frontier into the current frontier, sorted by
    /// descending reward so that `pop_current` favors the best states and
    /// `get_free`'s steal-from-tail sacrifices the worst. Optionally
    /// truncates to `budget`, recycling the overflow's slots back to the
    /// free queue.
    ///
    /// Panics if the current frontier is not empty — every base must have
    /// been fully popped and expanded before a swap (§4.1 contract).
    pub fn swap_frontiers(&self, budget: Option<usize>) {
        assert!(
            self.current.lock().is_empty(),
            "swap_frontiers called with a non-empty current frontier"
        );

        let mut drained = Vec::with_capacity(self.count_next.load(Ordering::Relaxed));
        while let Some(idx) = self.next.pop() {
            drained.push(idx);
        }
        self.count_next.store(0, Ordering::Relaxed);

        drained.sort_by_key(|&idx| std::cmp::Reverse(self.slots[idx].lock().step.reward));

        if let Some(budget) = budget {
            if drained.len() > budget {
                for &idx in &drained[budget..] {
                    self.return_free(SlotHandle(idx));
                }
                drained.truncate(budget);
            }
        }

        self.count_current.store(drained.len(), Ordering::Relaxed);
        *self.current.lock() = drained.into();
    }

    #[must_use]
    pub fn read_blob(&self, slot: SlotHandle) -> StateBlob {
        self.slots[slot.0].lock().blob.clone()
    }

    #[must_use]
    pub fn read_step(&self, slot: SlotHandle) -> StepRecord {
        self.slots[slot.0].lock().step.clone()
    }

    #[must_use]
    pub fn read_magnets(&self, slot: SlotHandle) -> MagnetSet {
        self.slots[slot.0].lock().magnets.clone()
    }

    pub fn write_slot(&self, slot: SlotHandle, blob: StateBlob, step: StepRecord, magnets: MagnetSet) {
        let mut guard = self.slots[slot.0].lock();
        guard.blob = blob;
        guard.step = step;
        guard.magnets = magnets;
    }

    /// Seed the initial state into a fresh slot and place it directly on
    /// the current frontier, bootstrapping the first step.
    pub fn seed_initial(&self, blob: StateBlob, step: StepRecord, magnets: MagnetSet) -> Option<SlotHandle> {
        let slot = self.get_free()?;
        self.write_slot(slot, blob, step, magnets);
        self.current.lock().push_back(slot.0);
        self.count_current.fetch_add(1, Ordering::Relaxed);
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(n: usize) -> StateDb {
        StateDb::init(8, n * 8, 1, &MagnetSet::new(vec![])).unwrap()
    }

    #[test]
    fn allocation_failure_on_undersized_cap() {
        let result = StateDb::init(100, 10, 1, &MagnetSet::new(vec![]));
        assert!(matches!(
            result,
            Err(SearchError::StateDbAllocationFailed { .. })
        ));
    }

    #[test]
    fn every_slot_starts_in_free_queue() {
        let db = db(5);
        assert_eq!(db.count_free(), 5);
        assert_eq!(db.count_current(), 0);
        assert_eq!(db.count_next(), 0);
    }

    #[test]
    fn get_free_steals_tail_of_current_when_exhausted() {
        let db = db(2);
        let a = db.get_free().unwrap();
        let b = db.get_free().unwrap();
        assert!(db.get_free().is_none());

        db.write_slot(a, StateBlob::zeroed(8), StepRecord::root(1), MagnetSet::new(vec![]));
        let mut step_b = StepRecord::root(1);
        step_b.reward = 10;
        db.write_slot(b, StateBlob::zeroed(8), step_b, MagnetSet::new(vec![]));
        // Seed both directly onto current in priority order (b first, best).
        *db.current.lock() = std::collections::VecDeque::from(vec![b.0, a.0]);
        db.count_current.store(2, Ordering::Relaxed);

        let stolen = db.get_free().expect("should steal tail of current");
        assert_eq!(stolen, a, "tail (lowest priority) is stolen, not the head");
        assert_eq!(db.steal_count(), 1);
        assert_eq!(db.count_current(), 1);
    }

    #[test]
    fn push_next_then_swap_sorts_by_descending_reward() {
        let db = db(3);
        for reward in [1i64, 9, 4] {
            let slot = db.get_free().unwrap();
            let mut step = StepRecord::root(1);
            step.reward = reward;
            db.write_slot(slot, StateBlob::zeroed(8), step, MagnetSet::new(vec![]));
            db.push_next(slot);
        }
        db.swap_frontiers(None);
        assert_eq!(db.count_current(), 3);

        let first = db.pop_current().unwrap();
        assert_eq!(db.read_step(first).reward, 9, "best reward popped first");
    }

    #[test]
    fn swap_frontiers_truncates_to_budget_and_recycles_overflow() {
        let db = db(4);
        for reward in [1i64, 2, 3, 4] {
            let slot = db.get_free().unwrap();
            let mut step = StepRecord::root(1);
            step.reward = reward;
            db.write_slot(slot, StateBlob::zeroed(8), step, MagnetSet::new(vec![]));
            db.push_next(slot);
        }
        db.swap_frontiers(Some(2));
        assert_eq!(db.count_current(), 2);
        assert_eq!(db.count_free(), 2, "overflow slots recycled to free queue");
    }

    #[test]
    #[should_panic(expected = "non-empty current frontier")]
    fn swap_frontiers_panics_if_current_not_drained() {
        let db = db(2);
        let slot = db.get_free().unwrap();
        db.write_slot(slot, StateBlob::zeroed(8), StepRecord::root(1), MagnetSet::new(vec![]));
        db.current.lock().push_back(slot.0);
        db.swap_frontiers(None);
    }

    #[test]
    fn invariant_free_plus_current_plus_next_equals_n() {
        let db = db(5);
        let a = db.get_free().unwrap();
        let _b = db.get_free().unwrap();
        db.write_slot(a, StateBlob::zeroed(8), StepRecord::root(1), MagnetSet::new(vec![]));
        db.push_next(a);
        assert_eq!(db.count_free() + db.count_current() + db.count_next(), 5);
    }
}
