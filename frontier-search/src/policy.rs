//! Engine run policy: budgets, termination, and eviction configuration.
//!
//! Grounded on `sterling_search::policy::SearchPolicyV1` — a plain struct
//! of concrete budgets with a `Default` impl, rather than a builder.

use std::time::Duration;

use frontier_core::config::OnFullPolicy;

/// Runtime policy for one engine run, derived from `EngineConfig` (§6.3)
/// by `frontier-runner` at startup.
#[derive(Debug, Clone)]
pub struct EnginePolicy {
    /// Stop (and terminate with `WinStopRequested`) on the first win.
    pub stop_on_win: bool,
    /// `Max Steps`: hard ceiling on step count, or unbounded.
    pub max_steps: Option<u64>,
    /// `Max Wall Time`: hard ceiling on wall-clock run time, or unbounded.
    pub max_wall_time: Option<Duration>,
    /// Optional next-frontier truncation budget, applied at every
    /// `swap_frontiers` (the "optionally sort next->current by descending
    /// reward, truncate to budget" step of §4.6's loop).
    pub frontier_budget: Option<usize>,
    /// HashDB's Full-handling policy (§4.2).
    pub hashdb_on_full: OnFullPolicy,
    /// Worker count for the per-step parallel expansion fan-out. `None`
    /// defers to the ambient Rayon global pool (sized by available
    /// parallelism), matching `krukah_robopoker`'s `Pool::new()` default.
    pub worker_count: Option<usize>,
    /// Minimum interval between checkpoint emissions.
    pub checkpoint_interval: Duration,
}

impl Default for EnginePolicy {
    fn default() -> Self {
        Self {
            stop_on_win: true,
            max_steps: None,
            max_wall_time: None,
            frontier_budget: None,
            hashdb_on_full: OnFullPolicy::Ignore,
            worker_count: None,
            checkpoint_interval: Duration::from_secs(30),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_stops_on_win_and_is_otherwise_unbounded() {
        let policy = EnginePolicy::default();
        assert!(policy.stop_on_win);
        assert_eq!(policy.max_steps, None);
        assert_eq!(policy.max_wall_time, None);
        assert_eq!(policy.hashdb_on_full, OnFullPolicy::Ignore);
    }
}
