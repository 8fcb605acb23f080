//! The capability this crate needs from a Runner, without depending on
//! `frontier-runner` itself (that crate depends on this one, not the
//! other way around — mirrors `sterling_search`'s one-way dependency on
//! `sterling_kernel` only).

use frontier_core::{Fingerprint, StateBlob};

use crate::error::SearchError;

/// What the Engine needs in order to turn a base state plus an input
/// symbol into a child state and a fingerprint. `frontier-runner`'s
/// `Runner` is the concrete implementation; a test harness may supply a
/// lighter one directly.
pub trait Expander: Send + Sync {
    /// Enumerate legal input ids from `blob`, in declaration order.
    fn legal_inputs(&self, blob: &StateBlob) -> Vec<u8>;

    /// Apply one simulator step. Must be byte-deterministic: the same
    /// `(blob, input)` must always produce the same output bytes, in any
    /// process (§4.4 determinism contract).
    fn advance(&self, blob: &StateBlob, input: u8) -> Result<StateBlob, SearchError>;

    /// Compute the fingerprint over the game-declared "hash includes" of
    /// `blob`. Not a hash over the whole blob (§3).
    fn fingerprint(&self, blob: &StateBlob) -> Fingerprint;
}
