//! Frontier Core: the deterministic, dependency-light core of the search engine.
//!
//! This crate owns everything that is pure data and pure computation: the
//! opaque state blob, the fingerprint hash, the rule DSL and its cascading
//! evaluation, the magnet/reward scoring formula, and the engine's
//! configuration schema. It has no knowledge of threads, queues, or I/O —
//! those live in `frontier-search` and `frontier-runner`.
//!
//! # Module dependency direction
//!
//! `frontier-core` ← `frontier-search` ← `frontier-runner`
//!
//! One-way only. This crate depends on nothing internal to the workspace.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod magnet;
pub mod property;
pub mod rule;
pub mod state;

pub use config::EngineConfig;
pub use error::ConfigError;
pub use fingerprint::{compute_fingerprint, Fingerprint};
pub use magnet::{Magnet, MagnetSet, MagnetValue};
pub use property::{read_typed, PropertyRef, PropertyValue, PropertyWidth};
pub use rule::{Action, CompareOp, Condition, EvalOutcome, Rule, RuleSet};
pub use state::{RuleStatus, StateBlob, StepRecord};
