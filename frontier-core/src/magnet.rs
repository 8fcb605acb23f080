//! Magnet attractors and the reward combination formula.

use crate::property::{read_typed, PropertyRef};

/// The runtime parameters of one active magnet, as set by a rule's
/// `SetMagnet` action. The shape (which variant is legal for a given
/// magnet slot) is fixed per game at `magnet_layout()` time; the values
/// inside are whatever the most recently satisfied setting rule supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MagnetValue {
    /// A generic bounded attractor: `intensity * -|center - clamp(v, min, max)|`.
    Generic {
        intensity: f64,
        min: f64,
        max: f64,
        center: f64,
    },
    /// Contributes `reward` iff the probed value equals `weapon_id`.
    WeaponMatch { weapon_id: i64, reward: f64 },
    /// Contributes `intensity * value` directly (health-style magnets).
    Scalar { intensity: f64 },
}

/// One named magnet slot: where it reads from, and its current value.
#[derive(Debug, Clone)]
pub struct Magnet {
    pub name: String,
    pub probe: PropertyRef,
    pub value: Option<MagnetValue>,
}

/// The fixed tuple of named magnets declared per-game.
///
/// Only one value is active per magnet slot at a time; [`RuleSet::evaluate`]
/// overwrites a slot's value when a newly satisfied rule's `SetMagnet`
/// action names it, with later rule ids observed last on a same-step tie
/// (see the module doc on [`crate::rule`]).
#[derive(Debug, Clone)]
pub struct MagnetSet {
    magnets: Vec<Magnet>,
}

impl MagnetSet {
    #[must_use]
    pub fn new(magnets: Vec<Magnet>) -> Self {
        Self { magnets }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.magnets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.magnets.is_empty()
    }

    pub fn set(&mut self, magnet_id: usize, value: MagnetValue) {
        self.magnets[magnet_id].value = Some(value);
    }

    #[must_use]
    pub fn get(&self, magnet_id: usize) -> Option<MagnetValue> {
        self.magnets[magnet_id].value
    }

    /// Sum of every active magnet's contribution against the given blob.
    #[must_use]
    pub fn total_term(&self, blob: &[u8]) -> f64 {
        self.magnets
            .iter()
            .map(|m| magnet_contribution(m, blob))
            .sum()
    }
}

fn magnet_contribution(magnet: &Magnet, blob: &[u8]) -> f64 {
    let Some(value) = magnet.value else {
        return 0.0;
    };
    let Some(probed) = read_typed(blob, magnet.probe) else {
        return 0.0;
    };
    let v = probed.as_f64();
    match value {
        MagnetValue::Generic {
            intensity,
            min,
            max,
            center,
        } => intensity * clamp_penalty(v, min, max, center),
        MagnetValue::WeaponMatch { weapon_id, reward } => {
            if (v.round() as i64) == weapon_id {
                reward
            } else {
                0.0
            }
        }
        MagnetValue::Scalar { intensity } => intensity * v,
    }
}

/// `-|center - clamp(v, min, max)|`, the generic attractor penalty term.
#[must_use]
pub fn clamp_penalty(v: f64, min: f64, max: f64, center: f64) -> f64 {
    let clamped = v.clamp(min, max);
    -(center - clamped).abs()
}
