//! Frontier Search: bounded-memory parallel best-first search.
//!
//! Depends only on `frontier-core` — it does not depend on
//! `frontier-runner`. Everything a Runner needs to plug in lives behind
//! the [`contract::Expander`] trait.
//!
//! # Crate dependency graph
//!
//! ```text
//! frontier-core  ←  frontier-search  ←  frontier-runner
//! (blob, rules)      (StateDB, HashDB,    (Simulator/Game,
//!                     Engine driver)        Runner, Playback)
//! ```

#![forbid(unsafe_code)]

pub mod contract;
pub mod engine;
pub mod error;
pub mod hashdb;
pub mod policy;
pub mod statedb;

pub use contract::Expander;
pub use engine::{CancelHandle, Engine, EngineOutcome, WinnerRecord};
pub use error::{SearchError, TerminationReason};
pub use hashdb::{HashDb, InsertOutcome};
pub use policy::EnginePolicy;
pub use statedb::{SlotHandle, StateDb};
