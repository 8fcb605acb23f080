//! Typed runner-layer errors.

/// Typed failure for Simulator/Runner operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerError {
    /// `Simulator::initialize` rejected the configuration payload.
    SimulatorInitFailed { detail: String },
    /// `Simulator::advance` returned an error (fatal at runtime, §7).
    SimulatorAdvanceFailed { detail: String },
    /// A save/load state file operation failed.
    StateFileIo { path: String, detail: String },
    /// `SimulatorRegistry::create` was asked for an unregistered name.
    UnknownSimulator { name: String },
    /// A rule/magnet config referenced a property or magnet the Game does
    /// not declare.
    UnresolvedName { kind: &'static str, name: String },
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SimulatorInitFailed { detail } => write!(f, "simulator initialization failed: {detail}"),
            Self::SimulatorAdvanceFailed { detail } => write!(f, "simulator advance failed: {detail}"),
            Self::StateFileIo { path, detail } => write!(f, "state file I/O failed at '{path}': {detail}"),
            Self::UnknownSimulator { name } => write!(f, "no simulator registered under name '{name}'"),
            Self::UnresolvedName { kind, name } => write!(f, "unresolved {kind} name '{name}'"),
        }
    }
}

impl std::error::Error for RunnerError {}

impl From<RunnerError> for frontier_search::SearchError {
    fn from(e: RunnerError) -> Self {
        frontier_search::SearchError::SimulatorAdvanceFailed {
            detail: e.to_string(),
        }
    }
}
