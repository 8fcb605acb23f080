//! Frontier Runner: wires a concrete `Simulator` + `Game` pair into the
//! search engine, and owns everything the search layer must not know
//! about — config-to-rule compilation, input-symbol tables, save/solution
//! file formats, and exit-code classification.
//!
//! # Crate dependency graph
//!
//! ```text
//! frontier-core  ←  frontier-search  ←  frontier-runner
//! ```

#![forbid(unsafe_code)]

pub mod artifacts;
pub mod compile;
pub mod error;
pub mod game;
pub mod inputs;
pub mod playback;
pub mod registry;
pub mod runner;
pub mod simulator;
pub mod toy;

pub use artifacts::{Checkpoint, ExitCode};
pub use compile::compile;
pub use error::RunnerError;
pub use game::Game;
pub use inputs::InputTable;
pub use playback::{Playback, PlaybackFrame, RunnerBundle};
pub use registry::SimulatorRegistry;
pub use runner::Runner;
pub use simulator::Simulator;
