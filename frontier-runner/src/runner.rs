//! Wires a `Simulator` + `Game` pair into the `frontier_search::Expander`
//! the Engine drives.
//!
//! Each worker needs its own mutable `Simulator` instance to advance a
//! state (a simulator is not itself safely shared across threads); this
//! mirrors `StateDb`'s free/current queue pattern at a smaller scale, a
//! pool of instances guarded by a lock-free free list rather than one
//! instance behind one lock.

use std::sync::Arc;

use crossbeam_queue::ArrayQueue;
use parking_lot::Mutex;

use frontier_core::rule::RuleSet;
use frontier_core::{Fingerprint, StateBlob};
use frontier_search::{Expander, SearchError};

use crate::error::RunnerError;
use crate::game::Game;
use crate::inputs::InputTable;
use crate::simulator::Simulator;

/// Couples one `Simulator` backend with one `Game` definition and exposes
/// the combination as a `frontier_search::Expander`.
pub struct Runner {
    pool: Vec<Mutex<Box<dyn Simulator + Send>>>,
    free: ArrayQueue<usize>,
    game: Arc<dyn Game>,
    state_size: usize,
    input_table: InputTable,
    ruleset: Arc<RuleSet>,
}

impl Runner {
    /// Build a runner with `pool_size` simulator instances, each
    /// initialized from `config`. `state_size` is measured once, via a
    /// dry serialize of the first pool member right after
    /// initialization — every later `advance` must reproduce exactly that
    /// many bytes (§4.4).
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::SimulatorInitFailed`] if any pool member
    /// rejects `config`, or propagates a construction failure from
    /// `make_simulator`.
    pub fn new<F>(
        make_simulator: F,
        pool_size: usize,
        game: Arc<dyn Game>,
        config: &serde_json::Value,
        input_table: InputTable,
        ruleset: Arc<RuleSet>,
    ) -> Result<Self, RunnerError>
    where
        F: Fn() -> Box<dyn Simulator + Send>,
    {
        assert!(pool_size > 0, "a runner needs at least one simulator instance");
        let mut pool = Vec::with_capacity(pool_size);
        let free = ArrayQueue::new(pool_size);
        let mut state_size = 0;
        for i in 0..pool_size {
            let mut sim = make_simulator();
            sim.initialize(config)?;
            if i == 0 {
                let mut scratch = Vec::new();
                sim.serialize(&mut scratch);
                state_size = scratch.len();
            }
            pool.push(Mutex::new(sim));
            free.push(i).expect("free queue sized to pool_size");
        }
        log::info!("runner initialized: pool_size={pool_size} state_size={state_size}");
        Ok(Self {
            pool,
            free,
            game,
            state_size,
            input_table,
            ruleset,
        })
    }

    #[must_use]
    pub fn state_size(&self) -> usize {
        self.state_size
    }

    #[must_use]
    pub fn input_table(&self) -> &InputTable {
        &self.input_table
    }

    #[must_use]
    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    /// Serialize the current state of pool member 0 as the search root.
    /// Callers seed the engine with this once, before `run()`.
    #[must_use]
    pub fn root_blob(&self) -> StateBlob {
        let mut bytes = Vec::new();
        self.pool[0].lock().serialize(&mut bytes);
        StateBlob::new(bytes)
    }

    fn acquire(&self) -> usize {
        loop {
            if let Some(idx) = self.free.pop() {
                return idx;
            }
            // The pool is sized to at least the worker count; a miss here
            // means transient contention, not starvation.
            std::hint::spin_loop();
        }
    }

    fn release(&self, idx: usize) {
        self.free
            .push(idx)
            .expect("release called more times than acquire");
    }
}

impl Expander for Runner {
    fn legal_inputs(&self, blob: &StateBlob) -> Vec<u8> {
        self.game.legal_inputs(blob)
    }

    fn advance(&self, blob: &StateBlob, input: u8) -> Result<StateBlob, SearchError> {
        let idx = self.acquire();
        let result = (|| {
            let mut sim = self.pool[idx].lock();
            sim.deserialize(blob.as_bytes());
            sim.advance(input)
                .map_err(|e| SearchError::SimulatorAdvanceFailed {
                    detail: e.to_string(),
                })?;
            let mut bytes = vec![0u8; self.state_size];
            sim.serialize(&mut bytes);
            Ok(bytes)
        })();
        self.release(idx);
        let bytes = result?;
        let mut next = StateBlob::new(bytes);
        self.game.update_derived_values(&mut next);
        Ok(next)
    }

    fn fingerprint(&self, blob: &StateBlob) -> Fingerprint {
        let mut scope = Vec::new();
        for name in self.game.hash_includes() {
            if let Some(prop) = self.game.properties().get(name) {
                let end = prop.offset + prop.width.byte_len();
                if let Some(bytes) = blob.as_bytes().get(prop.offset..end) {
                    scope.extend_from_slice(bytes);
                }
            }
        }
        frontier_core::fingerprint::compute_fingerprint(&scope)
    }
}
