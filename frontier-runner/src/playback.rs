//! Replays a recorded input sequence through a [`Runner`], producing a
//! seekable trace of every intermediate state.
//!
//! Reframed from the original source's interactive TAS player as pure
//! data: a `Playback` holds no terminal/UI state, just the frames it
//! computed, and callers index into it however they like (a CLI front end
//! is explicitly out of scope, per the root spec's non-goals).

use std::sync::Arc;

use frontier_core::rule::RuleSet;
use frontier_core::state::StepRecord;
use frontier_core::{MagnetSet, StateBlob};
use frontier_search::{Expander, SearchError};

use crate::runner::Runner;

/// One step of a replayed trace: the state after applying `input` from
/// the previous frame, and the rule-evaluation outcome at that state.
#[derive(Debug, Clone)]
pub struct PlaybackFrame {
    pub blob: StateBlob,
    pub step: StepRecord,
}

/// A fully-materialized replay of one input sequence from a root state.
pub struct Playback {
    frames: Vec<PlaybackFrame>,
}

impl Playback {
    /// Replay `inputs` from `root`, evaluating `ruleset` at every frame.
    /// `magnets` is the per-game magnet template; a fresh clone is
    /// threaded through the whole replay exactly as the live engine
    /// threads one through a single state's lineage.
    ///
    /// # Errors
    ///
    /// Returns the first [`SearchError`] raised by `runner.advance`,
    /// stopping the replay at that point (§7: a simulator failure mid
    /// replay is fatal, not recoverable).
    pub fn replay(
        runner: &Runner,
        ruleset: &RuleSet,
        magnets: &MagnetSet,
        root: StateBlob,
        inputs: &[u8],
    ) -> Result<Self, SearchError> {
        let mut magnets = magnets.clone();
        let mut frames = Vec::with_capacity(inputs.len() + 1);
        let mut blob = root;
        let mut step = StepRecord::root(ruleset.len());
        let outcome = ruleset.evaluate(blob.as_bytes(), &mut step.rules_status, &mut magnets);
        step.reward = outcome.reward;
        step.is_win = outcome.is_win;
        step.is_fail = outcome.is_fail;
        frames.push(PlaybackFrame {
            blob: blob.clone(),
            step: step.clone(),
        });

        for &input in inputs {
            let next_blob = runner.advance(&blob, input)?;
            let mut next_step = step.child(input);
            let outcome = ruleset.evaluate(
                next_blob.as_bytes(),
                &mut next_step.rules_status,
                &mut magnets,
            );
            next_step.reward = outcome.reward;
            next_step.is_win = outcome.is_win;
            next_step.is_fail = outcome.is_fail;
            frames.push(PlaybackFrame {
                blob: next_blob.clone(),
                step: next_step.clone(),
            });
            blob = next_blob;
            step = next_step;
        }

        Ok(Self { frames })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&PlaybackFrame> {
        self.frames.get(index)
    }

    #[must_use]
    pub fn final_frame(&self) -> &PlaybackFrame {
        self.frames.last().expect("a playback always has a root frame")
    }

    #[must_use]
    pub fn frames(&self) -> &[PlaybackFrame] {
        &self.frames
    }
}

/// Convenience wrapper bundling a `Runner` with its compiled rules, for
/// callers that want to replay a `WinnerRecord`'s history directly.
pub struct RunnerBundle {
    pub runner: Arc<Runner>,
    pub ruleset: Arc<RuleSet>,
    pub magnets: MagnetSet,
}

impl RunnerBundle {
    /// Replay `history` from the runner's root state.
    ///
    /// # Errors
    ///
    /// See [`Playback::replay`].
    pub fn replay(&self, history: &[u8]) -> Result<Playback, SearchError> {
        let root = self.runner.root_blob();
        Playback::replay(&self.runner, &self.ruleset, &self.magnets, root, history)
    }
}
