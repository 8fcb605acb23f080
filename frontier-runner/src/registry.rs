//! Name-keyed simulator construction.
//!
//! Replaces the original source's header-embedded `#define` dispatch
//! macros for selecting an emulator/game pair by name, per §9's redesign
//! note: a lookup table keyed by a string name, populated at startup.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::RunnerError;
use crate::simulator::Simulator;

type Constructor = Arc<dyn Fn() -> Box<dyn Simulator + Send> + Send + Sync>;

/// A name -> constructor table for `Simulator` backends.
#[derive(Clone, Default)]
pub struct SimulatorRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl SimulatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under `name`. A later call with the same name
    /// replaces the earlier one, matching a `#define`'s last-wins
    /// semantics.
    pub fn register<F>(&mut self, name: impl Into<String>, ctor: F)
    where
        F: Fn() -> Box<dyn Simulator + Send> + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(ctor));
    }

    /// Construct a fresh simulator instance from a registered name.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::UnknownSimulator`] if `name` was never
    /// registered.
    pub fn create(&self, name: &str) -> Result<Box<dyn Simulator + Send>, RunnerError> {
        self.constructors.get(name).map(|ctor| ctor()).ok_or_else(|| {
            log::warn!("requested simulator '{name}' is not registered");
            RunnerError::UnknownSimulator {
                name: name.to_string(),
            }
        })
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }
}
