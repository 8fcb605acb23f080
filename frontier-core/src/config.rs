//! The engine's configuration schema (§6.3) and the raw rule/magnet specs
//! that a Game later resolves into [`crate::rule::Rule`] /
//! [`crate::magnet::MagnetSet`] values.
//!
//! Property names, magnet names, and rule labels are plain strings here —
//! name resolution requires a Game's `properties()`/`magnet_layout()`
//! tables, which this crate does not have. `frontier-runner` does that
//! resolution at startup and produces the typed [`crate::rule::RuleSet`].

use serde::Deserialize;

use crate::rule::CompareOp;

/// The whole recognized configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(rename = "State Database")]
    pub state_database: StateDatabaseConfig,
    #[serde(rename = "Hash Database")]
    pub hash_database: HashDatabaseConfig,
    #[serde(rename = "Runner")]
    pub runner: RunnerConfig,
    #[serde(rename = "Rules")]
    pub rules: Vec<RuleSpec>,
    #[serde(rename = "Game Inputs")]
    pub game_inputs: Vec<InputSpec>,
    #[serde(rename = "Stop On Win")]
    pub stop_on_win: bool,
    #[serde(rename = "Max Steps", default)]
    pub max_steps: Option<u64>,
    #[serde(rename = "Max Wall Time", default)]
    pub max_wall_time_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StateDatabaseConfig {
    #[serde(rename = "Max Size (Mb)")]
    pub max_size_mb: u64,
    #[serde(rename = "Type", default = "default_state_database_type")]
    pub db_type: String,
}

fn default_state_database_type() -> String {
    "Plain".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct HashDatabaseConfig {
    #[serde(rename = "Max Entries")]
    pub max_entries: usize,
    #[serde(rename = "On Full", default)]
    pub on_full: OnFullPolicy,
}

/// HashDB's Full-handling policy (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnFullPolicy {
    /// Soft cap: further inserts report `AlreadyPresent`. The default —
    /// safe but pessimistic, never admits unbounded re-exploration.
    #[default]
    Ignore,
    /// Clear the oldest generation of fingerprints and retry the insert.
    Evict,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunnerConfig {
    #[serde(rename = "Store Input History", default)]
    pub store_input_history: bool,
    #[serde(rename = "Hash Step Tolerance", default)]
    pub hash_step_tolerance: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputSpec {
    #[serde(rename = "Input")]
    pub input: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuleSpec {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Conditions", default)]
    pub conditions: Vec<ConditionSpec>,
    #[serde(rename = "Actions", default)]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionSpec {
    #[serde(rename = "Property")]
    pub property: String,
    #[serde(rename = "Op")]
    pub op: CompareOp,
    #[serde(rename = "Immediate")]
    pub immediate: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "Type")]
pub enum ActionSpec {
    SetMagnet {
        #[serde(rename = "Magnet")]
        magnet: String,
        #[serde(flatten)]
        kind: MagnetValueSpec,
    },
    AddReward {
        #[serde(rename = "Amount")]
        amount: i64,
    },
    MarkWin,
    MarkFail,
    Satisfy {
        #[serde(rename = "Rule")]
        rule: String,
    },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(tag = "Kind")]
pub enum MagnetValueSpec {
    Generic {
        #[serde(rename = "Intensity")]
        intensity: f64,
        #[serde(rename = "Min")]
        min: f64,
        #[serde(rename = "Max")]
        max: f64,
        #[serde(rename = "Center")]
        center: f64,
    },
    WeaponMatch {
        #[serde(rename = "WeaponId")]
        weapon_id: i64,
        #[serde(rename = "Reward")]
        reward: f64,
    },
    Scalar {
        #[serde(rename = "Intensity")]
        intensity: f64,
    },
}

/// Parse an [`EngineConfig`] from a JSON document.
pub fn parse_config(json: &str) -> Result<EngineConfig, crate::error::ConfigError> {
    serde_json::from_str(json).map_err(|e| crate::error::ConfigError::Malformed {
        detail: e.to_string(),
    })
}
