//! Shared helpers for frontier benchmark suites.

use std::sync::Arc;

use frontier_core::rule::{Action, Condition, CompareOp, Rule, RuleSet};
use frontier_core::magnet::MagnetSet;
use frontier_core::property::{PropertyRef, PropertyValue, PropertyWidth};
use frontier_search::policy::EnginePolicy;
use frontier_search::engine::Engine;

use frontier_runner::runner::Runner;
use frontier_runner::toy::{LineGame, LineSimulator};
use frontier_runner::inputs::InputTable;

/// Build a small "reach position N" rule set over the toy line world, for
/// benchmarking rule evaluation and full engine runs without pulling in a
/// real simulator backend.
#[must_use]
pub fn line_win_ruleset(target: u8) -> RuleSet {
    let pos = PropertyRef::new(0, PropertyWidth::U8);
    let win = Rule::new(
        0,
        "win".to_string(),
        vec![Condition {
            property: pos,
            op: CompareOp::Eq,
            immediate: PropertyValue::U8(target),
        }],
        vec![Action::MarkWin, Action::AddReward(1)],
    );
    RuleSet::new(vec![win])
}

/// Construct a ready-to-run `Engine` over the toy line world with a
/// "reach position `target`" win condition, a fixed memory cap, and an
/// unbounded hash table.
///
/// # Panics
///
/// Panics if `Engine::new` or `Runner::new` fail — both are expected to
/// succeed with these fixed parameters.
#[must_use]
pub fn build_line_engine(target: u8, memory_cap_bytes: usize) -> Engine<Runner> {
    let ruleset = Arc::new(line_win_ruleset(target));
    let runner = Arc::new(
        Runner::new(
            || Box::new(LineSimulator::new()),
            4,
            Arc::new(LineGame::new()),
            &serde_json::json!({}),
            InputTable::from_specs(&[]),
            ruleset.clone(),
        )
        .expect("toy runner construction should succeed"),
    );
    let root = runner.root_blob();
    let slot_size = runner.state_size();
    let policy = EnginePolicy {
        stop_on_win: true,
        ..EnginePolicy::default()
    };
    let engine = Engine::new(
        runner,
        ruleset,
        slot_size,
        memory_cap_bytes,
        usize::MAX,
        MagnetSet::new(vec![]),
        policy,
    )
    .expect("engine construction should succeed");
    engine.seed(root, frontier_core::state::StepRecord::root(1), MagnetSet::new(vec![]));
    engine
}
