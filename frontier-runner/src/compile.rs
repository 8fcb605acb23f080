//! Resolves the raw, string-keyed specs from `frontier_core::config` into
//! the typed [`frontier_core::rule::RuleSet`] and
//! [`frontier_core::magnet::MagnetSet`] a [`crate::runner::Runner`] runs
//! against.
//!
//! This resolution step needs a `Game`'s `properties()`/`magnet_probes()`
//! tables and therefore cannot live in `frontier-core`, which has no
//! notion of a Game at all.

use frontier_core::config::{ActionSpec, ConditionSpec, EngineConfig, MagnetValueSpec, RuleSpec};
use frontier_core::error::ConfigError;
use frontier_core::magnet::{Magnet, MagnetSet, MagnetValue};
use frontier_core::property::PropertyValue;
use frontier_core::rule::{Action, CompareOp, Condition, Rule, RuleSet};

use crate::game::Game;
use crate::inputs::InputTable;

/// Compile an [`EngineConfig`] against a `Game`'s declared names, producing
/// the typed rule set, the magnet template (values unset), and the input
/// table.
///
/// # Errors
///
/// Returns the first [`ConfigError`] encountered: an unknown property,
/// unknown magnet, unknown `Satisfy` target label, or duplicate rule
/// label.
pub fn compile(
    config: &EngineConfig,
    game: &dyn Game,
) -> Result<(RuleSet, MagnetSet, InputTable), ConfigError> {
    let label_to_id = resolve_labels(&config.rules)?;
    let magnets = build_magnet_template(game);
    let magnet_name_to_id: std::collections::HashMap<&str, usize> = game
        .magnet_probes()
        .iter()
        .enumerate()
        .map(|(id, (name, _))| (name.as_str(), id))
        .collect();

    let mut rules = Vec::with_capacity(config.rules.len());
    for spec in &config.rules {
        let id = label_to_id[&spec.label];
        let conditions = spec
            .conditions
            .iter()
            .map(|c| resolve_condition(&spec.label, c, game))
            .collect::<Result<Vec<_>, _>>()?;
        let actions = spec
            .actions
            .iter()
            .map(|a| resolve_action(&spec.label, a, &label_to_id, &magnet_name_to_id))
            .collect::<Result<Vec<_>, _>>()?;
        rules.push(Rule::new(id, spec.label.clone(), conditions, actions));
    }
    rules.sort_by_key(|r| r.id);

    let input_table = InputTable::from_specs(&config.game_inputs);

    Ok((RuleSet::new(rules), magnets, input_table))
}

fn resolve_labels(
    rules: &[RuleSpec],
) -> Result<std::collections::HashMap<String, usize>, ConfigError> {
    let mut map = std::collections::HashMap::with_capacity(rules.len());
    for (id, spec) in rules.iter().enumerate() {
        if map.insert(spec.label.clone(), id).is_some() {
            return Err(ConfigError::DuplicateRuleLabel {
                label: spec.label.clone(),
            });
        }
    }
    Ok(map)
}

fn build_magnet_template(game: &dyn Game) -> MagnetSet {
    let magnets = game
        .magnet_probes()
        .iter()
        .map(|(name, probe)| Magnet {
            name: name.clone(),
            probe: *probe,
            value: None,
        })
        .collect();
    MagnetSet::new(magnets)
}

fn resolve_condition(
    rule_label: &str,
    spec: &ConditionSpec,
    game: &dyn Game,
) -> Result<Condition, ConfigError> {
    let property = *game
        .properties()
        .get(&spec.property)
        .ok_or_else(|| ConfigError::UnknownProperty {
            rule: rule_label.to_string(),
            property: spec.property.clone(),
        })?;
    Ok(Condition {
        property,
        op: spec.op,
        immediate: immediate_for(spec.op, spec.immediate),
    })
}

/// `Condition::holds` widens every operand to `f64` regardless of the
/// property's declared width, so the immediate is carried as an `F32`
/// wrapper purely to reuse `PropertyValue::as_f64`'s widening path.
fn immediate_for(_op: CompareOp, value: f64) -> PropertyValue {
    #[allow(clippy::cast_possible_truncation)]
    PropertyValue::F32(value as f32)
}

fn resolve_action(
    rule_label: &str,
    spec: &ActionSpec,
    label_to_id: &std::collections::HashMap<String, usize>,
    magnet_name_to_id: &std::collections::HashMap<&str, usize>,
) -> Result<Action, ConfigError> {
    match spec {
        ActionSpec::SetMagnet { magnet, kind } => {
            let magnet_id = *magnet_name_to_id
                .get(magnet.as_str())
                .ok_or_else(|| ConfigError::UnknownMagnet {
                    rule: rule_label.to_string(),
                    magnet: magnet.clone(),
                })?;
            Ok(Action::SetMagnet {
                magnet_id,
                value: magnet_value_for(kind),
            })
        }
        ActionSpec::AddReward { amount } => Ok(Action::AddReward(*amount)),
        ActionSpec::MarkWin => Ok(Action::MarkWin),
        ActionSpec::MarkFail => Ok(Action::MarkFail),
        ActionSpec::Satisfy { rule } => {
            let target = *label_to_id
                .get(rule)
                .ok_or_else(|| ConfigError::UnknownRuleLabel {
                    from_rule: rule_label.to_string(),
                    to_label: rule.clone(),
                })?;
            Ok(Action::Satisfy(target))
        }
    }
}

fn magnet_value_for(spec: &MagnetValueSpec) -> MagnetValue {
    match *spec {
        MagnetValueSpec::Generic {
            intensity,
            min,
            max,
            center,
        } => MagnetValue::Generic {
            intensity,
            min,
            max,
            center,
        },
        MagnetValueSpec::WeaponMatch { weapon_id, reward } => {
            MagnetValue::WeaponMatch { weapon_id, reward }
        }
        MagnetValueSpec::Scalar { intensity } => MagnetValue::Scalar { intensity },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontier_core::config::parse_config;
    use crate::toy::LineGame;

    const DOC: &str = r#"{
        "State Database": {"Max Size (Mb)": 8, "Type": "Plain"},
        "Hash Database": {"Max Entries": 100, "On Full": "ignore"},
        "Runner": {"Store Input History": true, "Hash Step Tolerance": 0},
        "Rules": [
            {
                "Label": "win",
                "Conditions": [{"Property": "pos", "Op": "==", "Immediate": 5.0}],
                "Actions": [{"Type": "MarkWin"}, {"Type": "Satisfy", "Rule": "win"}]
            }
        ],
        "Game Inputs": [{"Input": "."}, {"Input": "L"}, {"Input": "R"}],
        "Stop On Win": true
    }"#;

    #[test]
    fn compiles_against_a_known_game() {
        let cfg = parse_config(DOC).unwrap();
        let game = LineGame::new();
        let (ruleset, _magnets, inputs) = compile(&cfg, &game).unwrap();
        assert_eq!(ruleset.len(), 1);
        assert_eq!(inputs.len(), 3);
    }

    #[test]
    fn unknown_property_is_reported() {
        let bad = DOC.replace("\"pos\"", "\"nonexistent\"");
        let cfg = parse_config(&bad).unwrap();
        let game = LineGame::new();
        let err = compile(&cfg, &game).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownProperty {
                rule: "win".to_string(),
                property: "nonexistent".to_string()
            }
        );
    }

    #[test]
    fn duplicate_rule_label_is_rejected() {
        let two_rules = DOC.replacen(
            "\"Rules\": [",
            "\"Rules\": [{\"Label\": \"win\", \"Conditions\": [], \"Actions\": []},",
            1,
        );
        let cfg = parse_config(&two_rules).unwrap();
        let game = LineGame::new();
        let err = compile(&cfg, &game).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateRuleLabel { label: "win".to_string() });
    }
}
