//! The search driver: worker pool, per-step frontier swap, termination,
//! best-winner tracking, and checkpointing (§4.6).
//!
//! Control flow is grounded on `sterling_search::search::search` (pop →
//! enumerate → score → apply → dedup → push, with typed termination),
//! generalized from one node per iteration to a parallel per-step fan-out
//! over every base in the current frontier. The worker-pool shape (sized
//! off the Rayon global pool, checkpoint gated by a `Mutex<Instant>`) is
//! grounded on `krukah_robopoker::workers::pool::Pool`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;

use frontier_core::{MagnetSet, RuleSet, StateBlob, StepRecord};

use crate::contract::Expander;
use crate::error::{SearchError, TerminationReason};
use crate::hashdb::{HashDb, InsertOutcome};
use crate::policy::EnginePolicy;
use crate::statedb::StateDb;

/// A recorded winning path: the shortest depth seen, tie-broken by the
/// highest reward (§4.6's best-winner replacement rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WinnerRecord {
    pub depth: u32,
    pub reward: i64,
    pub history: Vec<u8>,
}

/// A cloneable cooperative-cancellation switch (§5). Dropping every clone
/// has no effect on the underlying flag; call [`CancelHandle::cancel`] from
/// a signal handler or a supervising task.
#[derive(Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The full result of one engine run.
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub termination: TerminationReason,
    pub winner: Option<WinnerRecord>,
    pub steps_completed: u64,
    pub high_water_current: usize,
    pub dedup_drops: u64,
    pub fail_drops: u64,
}

/// Orchestrates a StateDB, a HashDB, an immutable [`RuleSet`], and an
/// [`Expander`] into the parallel best-first search described in §4.6.
pub struct Engine<E: Expander> {
    expander: Arc<E>,
    ruleset: Arc<RuleSet>,
    state_db: StateDb,
    hash_db: HashDb,
    policy: EnginePolicy,
    best_winner: Mutex<Option<WinnerRecord>>,
    won: AtomicBool,
    cancel: Arc<AtomicBool>,
    checkpoint_gate: Mutex<Instant>,
    dedup_drops: std::sync::atomic::AtomicU64,
    fail_drops: std::sync::atomic::AtomicU64,
    fatal_error: Mutex<Option<SearchError>>,
}

impl<E: Expander> Engine<E> {
    /// Build an engine around a fresh, empty StateDB/HashDB. Call
    /// [`Self::seed`] with the initial state before [`Self::run`].
    pub fn new(
        expander: Arc<E>,
        ruleset: Arc<RuleSet>,
        slot_size: usize,
        memory_cap_bytes: usize,
        hashdb_max_entries: usize,
        magnets_template: MagnetSet,
        policy: EnginePolicy,
    ) -> Result<Self, SearchError> {
        let state_db = StateDb::init(
            slot_size,
            memory_cap_bytes,
            ruleset.len(),
            &magnets_template,
        )?;
        let hash_db = HashDb::init(hashdb_max_entries);
        Ok(Self {
            expander,
            ruleset,
            state_db,
            hash_db,
            policy,
            best_winner: Mutex::new(None),
            won: AtomicBool::new(false),
            cancel: Arc::new(AtomicBool::new(false)),
            checkpoint_gate: Mutex::new(Instant::now()),
            dedup_drops: std::sync::atomic::AtomicU64::new(0),
            fail_drops: std::sync::atomic::AtomicU64::new(0),
            fatal_error: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }

    #[must_use]
    pub fn state_db(&self) -> &StateDb {
        &self.state_db
    }

    #[must_use]
    pub fn hash_db(&self) -> &HashDb {
        &self.hash_db
    }

    /// Seed the initial state (already rule-evaluated by the caller, since
    /// `initial_rule_status_bits()` is a Game-level concern this crate does
    /// not know about).
    pub fn seed(&self, blob: StateBlob, step: StepRecord, magnets: MagnetSet) {
        self.state_db.seed_initial(blob, step, magnets);
    }

    fn record_solution(&self, depth: u32, reward: i64, history: &[u8]) {
        let mut guard = self.best_winner.lock();
        let better = match &*guard {
            None => true,
            Some(existing) => depth < existing.depth || (depth == existing.depth && reward > existing.reward),
        };
        if better {
            *guard = Some(WinnerRecord {
                depth,
                reward,
                history: history.to_vec(),
            });
        }
        self.won.store(true, Ordering::Relaxed);
    }

    fn checkpoint_if_due(&self, step: u64) {
        let mut gate = self.checkpoint_gate.lock();
        if gate.elapsed() >= self.policy.checkpoint_interval {
            *gate = Instant::now();
            let best = self.best_winner.lock().clone();
            log::info!(
                "checkpoint: step={step} current={} next={} best_reward={:?}",
                self.state_db.count_current(),
                self.state_db.count_next(),
                best.map(|w| w.reward)
            );
        }
    }

    fn expand_base(&self, base: crate::statedb::SlotHandle) {
        if self.cancel.load(Ordering::Relaxed) || self.fatal_error.lock().is_some() {
            self.state_db.return_free(base);
            return;
        }

        let blob = self.state_db.read_blob(base);
        let step = self.state_db.read_step(base);
        let magnets = self.state_db.read_magnets(base);
        let inputs = self.expander.legal_inputs(&blob);

        for input in inputs {
            let Some(slot) = self.state_db.get_free() else {
                break;
            };

            let child_blob = match self.expander.advance(&blob, input) {
                Ok(b) => b,
                Err(e) => {
                    self.state_db.return_free(slot);
                    *self.fatal_error.lock() = Some(e);
                    self.cancel.store(true, Ordering::Relaxed);
                    break;
                }
            };

            let mut child_step = step.child(input);
            let mut child_magnets = magnets.clone();
            let outcome = self.ruleset.evaluate(
                child_blob.as_bytes(),
                &mut child_step.rules_status,
                &mut child_magnets,
            );
            child_step.reward = outcome.reward;
            child_step.is_win = outcome.is_win;
            child_step.is_fail = outcome.is_fail;

            if child_step.is_fail {
                self.state_db.return_free(slot);
                self.fail_drops.fetch_add(1, Ordering::Relaxed);
                continue;
            }

            let fp = self.expander.fingerprint(&child_blob);
            match self.hash_db.try_insert(fp) {
                InsertOutcome::AlreadyPresent => {
                    self.state_db.return_free(slot);
                    self.dedup_drops.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
                InsertOutcome::Full => match self.policy.hashdb_on_full {
                    frontier_core::config::OnFullPolicy::Ignore => {
                        self.state_db.return_free(slot);
                        continue;
                    }
                    frontier_core::config::OnFullPolicy::Evict => {
                        self.hash_db.clear_generation();
                        self.hash_db.try_insert(fp);
                    }
                },
                InsertOutcome::InsertedNew => {}
            }

            if child_step.is_win {
                self.record_solution(child_step.depth, child_step.reward, &child_step.history);
                self.state_db.return_free(slot);
                continue;
            }

            self.state_db.write_slot(slot, child_blob, child_step, child_magnets);
            self.state_db.push_next(slot);
        }

        self.state_db.return_free(base);
    }

    /// Run the search to termination (§4.6's top-level loop).
    pub fn run(&self) -> EngineOutcome {
        let started = Instant::now();
        let mut step: u64 = 0;
        let mut high_water = self.state_db.count_current();

        let termination = loop {
            if self.state_db.count_current() == 0 {
                break TerminationReason::FrontierExhausted;
            }
            if let Some(max_steps) = self.policy.max_steps {
                if step >= max_steps {
                    break TerminationReason::StepBudgetReached;
                }
            }
            if let Some(max_wall) = self.policy.max_wall_time {
                if started.elapsed() >= max_wall {
                    break TerminationReason::WallClockBudgetReached;
                }
            }
            if self.cancel.load(Ordering::Relaxed) {
                break TerminationReason::Cancelled;
            }

            // Workers pop `current` directly, one base at a time, rather
            // than draining it into a local Vec up front — `get_free`'s
            // steal-from-tail recycling (§4.1) only has anything to steal
            // while `current` still holds unexpanded bases.
            let worker_count = self
                .policy
                .worker_count
                .unwrap_or_else(rayon::current_num_threads)
                .max(1);
            let run_workers = || {
                (0..worker_count).into_par_iter().for_each(|_| {
                    while let Some(base) = self.state_db.pop_current() {
                        self.expand_base(base);
                    }
                });
            };
            match self.policy.worker_count {
                Some(n) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(n)
                        .build()
                        .expect("worker pool construction");
                    pool.install(run_workers);
                }
                None => run_workers(),
            }

            self.state_db.swap_frontiers(self.policy.frontier_budget);
            high_water = high_water.max(self.state_db.count_current());
            step += 1;
            self.checkpoint_if_due(step);

            if self.won.load(Ordering::Relaxed) && self.policy.stop_on_win {
                break TerminationReason::WinStopRequested;
            }
        };

        EngineOutcome {
            termination,
            winner: self.best_winner.lock().clone(),
            steps_completed: step,
            high_water_current: high_water,
            dedup_drops: self.dedup_drops.load(Ordering::Relaxed),
            fail_drops: self.fail_drops.load(Ordering::Relaxed),
        }
    }

    /// The fatal simulator error recorded during the run, if any (§7).
    #[must_use]
    pub fn fatal_error(&self) -> Option<SearchError> {
        self.fatal_error.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_core::{Action, CompareOp, Condition, PropertyRef, PropertyValue, PropertyWidth, Rule};

    /// A toy expander over a 1-byte "position", advanced by `0 = .`, `1 = L`,
    /// `2 = R` — matches the spec's seeded end-to-end scenario harness.
    struct LineExpander {
        inputs: Vec<u8>,
    }

    impl Expander for LineExpander {
        fn legal_inputs(&self, _blob: &StateBlob) -> Vec<u8> {
            self.inputs.clone()
        }

        fn advance(&self, blob: &StateBlob, input: u8) -> Result<StateBlob, SearchError> {
            let pos = blob.as_bytes()[0] as i16;
            let next = match input {
                0 => pos,
                1 => (pos - 1).max(0),
                2 => (pos + 1).min(255),
                _ => pos,
            };
            Ok(StateBlob::new(vec![next as u8]))
        }

        fn fingerprint(&self, blob: &StateBlob) -> frontier_core::Fingerprint {
            frontier_core::compute_fingerprint(blob.as_bytes())
        }
    }

    fn pos_eq(v: u8) -> Condition {
        Condition {
            property: PropertyRef::new(0, PropertyWidth::U8),
            op: CompareOp::Eq,
            immediate: PropertyValue::U8(v),
        }
    }

    #[test]
    fn linear_goal_scenario_finds_five_step_solution() {
        let win_rule = Rule::new(0, "win".into(), vec![pos_eq(5)], vec![Action::MarkWin]);
        let ruleset = Arc::new(RuleSet::new(vec![win_rule]));
        let expander = Arc::new(LineExpander { inputs: vec![0, 2] }); // '.' and 'R'

        let engine = Engine::new(
            expander,
            ruleset,
            1,
            1024,
            10_000,
            MagnetSet::new(vec![]),
            EnginePolicy::default(),
        )
        .unwrap();

        engine.seed(StateBlob::new(vec![0]), StepRecord::root(1), MagnetSet::new(vec![]));
        let outcome = engine.run();

        assert_eq!(outcome.termination, TerminationReason::WinStopRequested);
        let winner = outcome.winner.expect("a winner must be recorded");
        assert_eq!(winner.depth, 5);
        assert_eq!(winner.history, vec![2, 2, 2, 2, 2]);
    }

    #[test]
    fn dead_end_scenario_never_reports_fail_state_as_winner() {
        let fail_rule = Rule::new(0, "fail".into(), vec![pos_eq(3)], vec![Action::MarkFail]);
        let win_rule = Rule::new(1, "win".into(), vec![pos_eq(4)], vec![Action::MarkWin]);
        let ruleset = Arc::new(RuleSet::new(vec![fail_rule, win_rule]));
        let expander = Arc::new(LineExpander { inputs: vec![1, 2] }); // 'L' and 'R'

        let engine = Engine::new(
            expander,
            ruleset,
            1,
            4096,
            10_000,
            MagnetSet::new(vec![]),
            EnginePolicy::default(),
        )
        .unwrap();
        engine.seed(StateBlob::new(vec![0]), StepRecord::root(2), MagnetSet::new(vec![]));
        let outcome = engine.run();

        assert_eq!(outcome.termination, TerminationReason::WinStopRequested);
        let winner = outcome.winner.unwrap();
        assert_eq!(winner.depth, 4);
        assert!(outcome.fail_drops > 0, "the pos==3 dead end must have been dropped");
    }

    #[test]
    fn memory_cap_terminates_cleanly_without_a_reachable_win() {
        // No win rule at all: engine must exhaust the frontier under a tiny
        // memory cap without crashing.
        let ruleset = Arc::new(RuleSet::new(vec![]));
        let expander = Arc::new(LineExpander { inputs: vec![1, 2] });
        let policy = EnginePolicy {
            max_steps: Some(3),
            ..EnginePolicy::default()
        };
        let engine = Engine::new(expander, ruleset, 1, 24, 10_000, MagnetSet::new(vec![]), policy).unwrap();
        engine.seed(StateBlob::new(vec![128]), StepRecord::root(0), MagnetSet::new(vec![]));
        let outcome = engine.run();

        assert!(matches!(
            outcome.termination,
            TerminationReason::StepBudgetReached | TerminationReason::FrontierExhausted
        ));
        assert!(outcome.winner.is_none());
    }

    #[test]
    fn dedup_keeps_frontier_bounded_on_a_periodic_state_space() {
        // Position wraps mod 7 under both 'L' and 'R': exactly 7 distinct
        // states exist, but branching factor 2 means without dedup the
        // frontier would grow without bound.
        struct WrapExpander;
        impl Expander for WrapExpander {
            fn legal_inputs(&self, _blob: &StateBlob) -> Vec<u8> {
                vec![1, 2]
            }
            fn advance(&self, blob: &StateBlob, input: u8) -> Result<StateBlob, SearchError> {
                let pos = blob.as_bytes()[0] as i32;
                let next = if input == 1 { (pos + 6) % 7 } else { (pos + 1) % 7 };
                Ok(StateBlob::new(vec![next as u8]))
            }
            fn fingerprint(&self, blob: &StateBlob) -> frontier_core::Fingerprint {
                frontier_core::compute_fingerprint(blob.as_bytes())
            }
        }

        let ruleset = Arc::new(RuleSet::new(vec![]));
        let policy = EnginePolicy {
            max_steps: Some(20),
            ..EnginePolicy::default()
        };
        let engine = Engine::new(
            Arc::new(WrapExpander),
            ruleset,
            1,
            4096,
            10_000,
            MagnetSet::new(vec![]),
            policy,
        )
        .unwrap();
        engine.seed(StateBlob::new(vec![0]), StepRecord::root(0), MagnetSet::new(vec![]));
        let outcome = engine.run();

        assert!(
            outcome.high_water_current <= 7,
            "frontier must never exceed the period of the state space"
        );
    }

    #[test]
    fn steal_from_tail_recycling_actually_runs_during_expansion() {
        // A cap tight enough that expanding the current frontier outruns
        // the free queue: `current` must still hold unexpanded bases for
        // `get_free` to steal from (§4.1), which only happens if `run()`
        // pops bases one at a time instead of draining them up front.
        let ruleset = Arc::new(RuleSet::new(vec![]));
        let expander = Arc::new(LineExpander { inputs: vec![1, 2] });
        let policy = EnginePolicy {
            max_steps: Some(3),
            worker_count: Some(1),
            ..EnginePolicy::default()
        };
        // Only 3 slots total for a root plus two children per base: the
        // free queue is exhausted expanding the very first frontier after
        // the root, forcing `get_free` to steal the tail of `current`.
        let engine = Engine::new(expander, ruleset, 1, 3, 10_000, MagnetSet::new(vec![]), policy).unwrap();
        engine.seed(StateBlob::new(vec![0]), StepRecord::root(0), MagnetSet::new(vec![]));
        let _ = engine.run();

        assert!(
            engine.state_db().steal_count() > 0,
            "tight memory cap must force at least one steal-from-tail recycle"
        );
    }
}
