//! The `Simulator` capability: byte-deterministic state serialization and
//! single-step advance.
//!
//! A world harness in the original source is a concrete emulator wired
//! through a virtual `Emulator` base class. There is no safe Rust
//! equivalent to that vtable-and-raw-memory design, and none is needed: a
//! `Simulator` only has to serialize/deserialize its state and advance it
//! one input at a time. Object safety lets `SimulatorRegistry` hold many
//! backends behind one trait object (§9's redesign note on the `#define`
//! dispatch table).

use std::path::Path;

use frontier_core::property::PropertyRef;

use crate::error::RunnerError;

/// A single steppable, serializable simulator instance.
///
/// Implementors own whatever internal state a real backend needs (CPU
/// registers, memory, peripherals); none of that crosses the trait
/// boundary except through `serialize`/`deserialize`.
pub trait Simulator {
    /// One-time setup from the engine's configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::SimulatorInitFailed`] if the configuration is
    /// not acceptable to this backend.
    fn initialize(&mut self, config: &serde_json::Value) -> Result<(), RunnerError>;

    /// Load a simulator state from a save-state file, if this backend
    /// supports one. The default implementation reports it does not.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::StateFileIo`] on read failure.
    fn load_state_file(&mut self, path: &Path) -> Result<(), RunnerError> {
        Err(RunnerError::StateFileIo {
            path: path.display().to_string(),
            detail: "this simulator does not support save-state files".to_string(),
        })
    }

    /// Write the current simulator state to a save-state file.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::StateFileIo`] on write failure.
    fn save_state_file(&self, path: &Path) -> Result<(), RunnerError> {
        Err(RunnerError::StateFileIo {
            path: path.display().to_string(),
            detail: "this simulator does not support save-state files".to_string(),
        })
    }

    /// Serialize the current state into `out`, replacing its contents.
    /// Must produce exactly the same bytes for the same internal state in
    /// any process (§4.4's determinism contract).
    fn serialize(&self, out: &mut Vec<u8>);

    /// Restore the internal state from bytes previously produced by
    /// `serialize`.
    fn deserialize(&mut self, data: &[u8]);

    /// Apply one input symbol, advancing the simulator by one step.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::SimulatorAdvanceFailed`] for a fatal
    /// simulator-side failure (§7: this terminates the whole run, it is
    /// not per-edge recoverable).
    fn advance(&mut self, input_id: u8) -> Result<(), RunnerError>;

    /// Resolve a property name to its location in the serialized byte
    /// layout, or `None` if this backend does not expose it. Most callers
    /// should prefer `Game::properties()`, which is resolved once at
    /// startup; this exists for backends that compute offsets themselves
    /// rather than declaring a fixed table.
    fn get_property(&self, _name: &str) -> Option<PropertyRef> {
        None
    }

    /// Mark a byte range as irrelevant to comparison/hashing (e.g. a
    /// frame counter or RNG seed echoed back into state). A no-op for
    /// backends with nothing nondeterministic to mask.
    fn enable_state_property(&mut self, _name: &str) {}

    /// Reverse of `enable_state_property`.
    fn disable_state_property(&mut self, _name: &str) {}
}
