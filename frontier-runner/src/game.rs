//! The `Game` capability: the domain knowledge layered on top of a raw
//! `Simulator` — legal moves, named properties, magnet slots, and which
//! bytes participate in the search fingerprint.
//!
//! Mirrors the split the original source draws between the emulator (raw
//! stepping) and the game definition (what the bytes mean); reframed here
//! as two traits instead of two base classes, per §9.

use std::collections::BTreeMap;

use frontier_core::property::PropertyRef;
use frontier_core::StateBlob;

/// Domain knowledge about one game, shared read-only across every worker
/// thread once compiled at startup.
pub trait Game: Send + Sync {
    /// Enumerate legal input ids for `state`, in declaration order. The
    /// same order `InputTable` assigned at config-parse time.
    fn legal_inputs(&self, state: &StateBlob) -> Vec<u8>;

    /// Named, typed properties this game exposes for rule conditions and
    /// magnet probes, keyed by the names used in `"Property"`/`"Magnet"`
    /// fields of the engine configuration.
    fn properties(&self) -> &BTreeMap<String, PropertyRef>;

    /// Magnet slot names, in declaration order — the order a rule's
    /// `"Magnet"` field resolves to a `magnet_id`.
    fn magnet_probes(&self) -> &[(String, PropertyRef)];

    /// The subset of `properties()` (by name) that participate in the
    /// search fingerprint. Two states differing only outside this set are
    /// treated as the same state for deduplication (§3).
    fn hash_includes(&self) -> &[String];

    /// The Game's declared initial rule-satisfaction bitset, applied to
    /// the root `StepRecord` before its first evaluation.
    fn initial_rule_status_bits(&self) -> Vec<bool>;

    /// Recompute any game-derived values after an `advance`, writing them
    /// back into `state` at their declared property offsets. A no-op for
    /// games with nothing derived (most of them).
    fn update_derived_values(&self, _state: &mut StateBlob) {}
}
