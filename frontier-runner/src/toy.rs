//! A toy deterministic one-byte "position" simulator, used by this crate's
//! own tests and as a worked example of the `Simulator`/`Game` contract.
//!
//! State is a single byte: a position in `0..=255`. Input `0` ('.') is a
//! no-op, `1` ('L') decrements clamped at zero, `2` ('R') increments
//! clamped at 255. Mirrors the seeded scenarios of §8.

use std::collections::BTreeMap;

use frontier_core::property::{PropertyRef, PropertyWidth};
use frontier_core::StateBlob;

use crate::error::RunnerError;
use crate::game::Game;
use crate::simulator::Simulator;

#[derive(Debug, Clone, Copy, Default)]
pub struct LineSimulator {
    position: u8,
}

impl LineSimulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Simulator for LineSimulator {
    fn initialize(&mut self, _config: &serde_json::Value) -> Result<(), RunnerError> {
        self.position = 0;
        Ok(())
    }

    fn serialize(&self, out: &mut Vec<u8>) {
        out.clear();
        out.push(self.position);
    }

    fn deserialize(&mut self, data: &[u8]) {
        self.position = data.first().copied().unwrap_or(0);
    }

    fn advance(&mut self, input_id: u8) -> Result<(), RunnerError> {
        match input_id {
            0 => {}
            1 => self.position = self.position.saturating_sub(1),
            2 => self.position = self.position.saturating_add(1),
            other => {
                return Err(RunnerError::SimulatorAdvanceFailed {
                    detail: format!("unrecognized input id {other}"),
                })
            }
        }
        Ok(())
    }
}

pub struct LineGame {
    properties: BTreeMap<String, PropertyRef>,
    hash_includes: Vec<String>,
}

impl LineGame {
    #[must_use]
    pub fn new() -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("pos".to_string(), PropertyRef::new(0, PropertyWidth::U8));
        Self {
            properties,
            hash_includes: vec!["pos".to_string()],
        }
    }
}

impl Default for LineGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for LineGame {
    fn legal_inputs(&self, _state: &StateBlob) -> Vec<u8> {
        vec![0, 1, 2]
    }

    fn properties(&self) -> &BTreeMap<String, PropertyRef> {
        &self.properties
    }

    fn magnet_probes(&self) -> &[(String, PropertyRef)] {
        &[]
    }

    fn hash_includes(&self) -> &[String] {
        &self.hash_includes
    }

    fn initial_rule_status_bits(&self) -> Vec<bool> {
        Vec::new()
    }
}

/// Same world as [`LineGame`], but with one magnet slot probing `pos` —
/// used by tests that exercise `SetMagnet` actions without a real
/// simulator backend.
pub struct MagnetLineGame {
    properties: BTreeMap<String, PropertyRef>,
    hash_includes: Vec<String>,
    magnet_probes: Vec<(String, PropertyRef)>,
}

impl MagnetLineGame {
    #[must_use]
    pub fn new() -> Self {
        let mut properties = BTreeMap::new();
        let pos = PropertyRef::new(0, PropertyWidth::U8);
        properties.insert("pos".to_string(), pos);
        Self {
            properties,
            hash_includes: vec!["pos".to_string()],
            magnet_probes: vec![("horizontal".to_string(), pos)],
        }
    }
}

impl Default for MagnetLineGame {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for MagnetLineGame {
    fn legal_inputs(&self, _state: &StateBlob) -> Vec<u8> {
        vec![0, 1, 2]
    }

    fn properties(&self) -> &BTreeMap<String, PropertyRef> {
        &self.properties
    }

    fn magnet_probes(&self) -> &[(String, PropertyRef)] {
        &self.magnet_probes
    }

    fn hash_includes(&self) -> &[String] {
        &self.hash_includes
    }

    fn initial_rule_status_bits(&self) -> Vec<bool> {
        Vec::new()
    }
}
