//! On-disk artifacts: the solution file (§6.4), the optional checkpoint
//! file (§6.5), and the exit-code mapping a front end reports with
//! (§6.6). No CLI lives here — front ends are out of scope — only the
//! encode/decode functions and the mapping function a front end would
//! call into.

use std::io::{Read, Write};

use crate::error::RunnerError;
use crate::inputs::InputTable;

/// Write a solution file: one line of space-separated input symbols, in
/// execution order from the initial state.
///
/// # Errors
///
/// Returns [`RunnerError::StateFileIo`] on write failure.
pub fn write_solution_file(
    path: &std::path::Path,
    input_table: &InputTable,
    history: &[u8],
) -> Result<(), RunnerError> {
    let line = input_table.render(history);
    std::fs::write(path, line.trim_end()).map_err(|e| RunnerError::StateFileIo {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

/// Parse a solution file back into dense input ids.
///
/// # Errors
///
/// Returns [`RunnerError::StateFileIo`] if the file cannot be read, or
/// [`RunnerError::UnresolvedName`] if a symbol is not in `input_table`.
pub fn read_solution_file(
    path: &std::path::Path,
    input_table: &InputTable,
) -> Result<Vec<u8>, RunnerError> {
    let text = std::fs::read_to_string(path).map_err(|e| RunnerError::StateFileIo {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    text.trim_end()
        .split_whitespace()
        .map(|symbol| {
            input_table
                .id_of(symbol)
                .ok_or_else(|| RunnerError::UnresolvedName {
                    kind: "input symbol",
                    name: symbol.to_string(),
                })
        })
        .collect()
}

const CHECKPOINT_MAGIC: [u8; 4] = *b"FRCK";
const CHECKPOINT_VERSION: u32 = 1;

/// A minimal snapshot of search progress, enough to warm-restart a run.
/// Not required for correctness (§6.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    pub step: u64,
    pub best_reward: i64,
    pub best_history: Vec<u8>,
}

/// Serialize a checkpoint: `magic | version | step | best_reward |
/// best_history_len | best_history_bytes`, all integers little-endian.
///
/// # Errors
///
/// Returns [`RunnerError::StateFileIo`] on write failure.
pub fn write_checkpoint(path: &std::path::Path, checkpoint: &Checkpoint) -> Result<(), RunnerError> {
    let mut buf = Vec::with_capacity(4 + 4 + 8 + 8 + 8 + checkpoint.best_history.len());
    buf.extend_from_slice(&CHECKPOINT_MAGIC);
    buf.extend_from_slice(&CHECKPOINT_VERSION.to_le_bytes());
    buf.extend_from_slice(&checkpoint.step.to_le_bytes());
    buf.extend_from_slice(&checkpoint.best_reward.to_le_bytes());
    #[allow(clippy::cast_possible_truncation)]
    let len = checkpoint.best_history.len() as u64;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(&checkpoint.best_history);

    let mut file = std::fs::File::create(path).map_err(|e| RunnerError::StateFileIo {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    file.write_all(&buf).map_err(|e| RunnerError::StateFileIo {
        path: path.display().to_string(),
        detail: e.to_string(),
    })?;
    log::debug!(
        "checkpoint written: step={} best_reward={} path={}",
        checkpoint.step,
        checkpoint.best_reward,
        path.display()
    );
    Ok(())
}

/// Parse a checkpoint file written by [`write_checkpoint`].
///
/// # Errors
///
/// Returns [`RunnerError::StateFileIo`] on a read failure, a bad magic
/// number, or an unsupported version.
pub fn read_checkpoint(path: &std::path::Path) -> Result<Checkpoint, RunnerError> {
    let io_err = |detail: String| RunnerError::StateFileIo {
        path: path.display().to_string(),
        detail,
    };
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .map_err(|e| io_err(e.to_string()))?
        .read_to_end(&mut bytes)
        .map_err(|e| io_err(e.to_string()))?;

    if bytes.len() < 4 + 4 + 8 + 8 + 8 {
        return Err(io_err("checkpoint file is truncated".to_string()));
    }
    if bytes[0..4] != CHECKPOINT_MAGIC {
        log::warn!("checkpoint at {} has a bad magic number", path.display());
        return Err(io_err("bad checkpoint magic number".to_string()));
    }
    let version = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
    if version != CHECKPOINT_VERSION {
        log::warn!("checkpoint at {} has unsupported version {version}", path.display());
        return Err(io_err(format!("unsupported checkpoint version {version}")));
    }
    let step = u64::from_le_bytes(bytes[8..16].try_into().unwrap());
    let best_reward = i64::from_le_bytes(bytes[16..24].try_into().unwrap());
    let len = u64::from_le_bytes(bytes[24..32].try_into().unwrap()) as usize;
    let history = bytes
        .get(32..32 + len)
        .ok_or_else(|| io_err("checkpoint history length exceeds file size".to_string()))?
        .to_vec();

    Ok(Checkpoint {
        step,
        best_reward,
        best_history: history,
    })
}

/// The exit-code classification of a run outcome (§6.6). `0` covers both
/// a found win and an exhaustive search with no win — both are normal
/// termination, not failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    ConfigurationError = 1,
    SimulatorError = 2,
    ResourceExhaustion = 3,
}

/// Classify a terminal `SearchError` (or its absence) into an exit code.
#[must_use]
pub fn exit_code_for_search_error(err: Option<&frontier_search::SearchError>) -> ExitCode {
    match err {
        None => ExitCode::Success,
        Some(frontier_search::SearchError::StateDbAllocationFailed { .. }) => {
            ExitCode::ResourceExhaustion
        }
        Some(frontier_search::SearchError::SimulatorAdvanceFailed { .. }) => {
            ExitCode::SimulatorError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_core::config::InputSpec;

    fn input_table() -> InputTable {
        InputTable::from_specs(&[
            InputSpec { input: ".".to_string() },
            InputSpec { input: "L".to_string() },
            InputSpec { input: "R".to_string() },
        ])
    }

    #[test]
    fn solution_file_round_trips_through_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solution.txt");
        let table = input_table();
        write_solution_file(&path, &table, &[2, 2, 1]).unwrap();
        let read_back = read_solution_file(&path, &table).unwrap();
        assert_eq!(read_back, vec![2, 2, 1]);
    }

    #[test]
    fn checkpoint_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkpoint.bin");
        let checkpoint = Checkpoint {
            step: 42,
            best_reward: -7,
            best_history: vec![1, 2, 2, 0],
        };
        write_checkpoint(&path, &checkpoint).unwrap();
        let read_back = read_checkpoint(&path).unwrap();
        assert_eq!(read_back, checkpoint);
    }

    #[test]
    fn checkpoint_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, [0u8; 40]).unwrap();
        assert!(read_checkpoint(&path).is_err());
    }

    #[test]
    fn exit_code_maps_absence_of_error_to_success() {
        assert_eq!(exit_code_for_search_error(None), ExitCode::Success);
    }

    #[test]
    fn exit_code_maps_allocation_failure_to_resource_exhaustion() {
        let err = frontier_search::SearchError::StateDbAllocationFailed {
            slot_size: 4,
            memory_cap_bytes: 1,
        };
        assert_eq!(
            exit_code_for_search_error(Some(&err)),
            ExitCode::ResourceExhaustion
        );
    }
}
