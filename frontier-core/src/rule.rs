//! The rule DSL: typed conditions, cascading satisfaction, and scoring.
//!
//! Evaluation follows the original source's `evaluateRules`/`satisfyRule`
//! cascade almost exactly: sweep the not-yet-satisfied rules in id order,
//! and satisfying one recursively satisfies every rule in its
//! `satisfiesIndexes` closure, guarded against re-entry by the rule's own
//! status bit.

use crate::magnet::{MagnetSet, MagnetValue};
use crate::property::{read_typed, PropertyRef, PropertyValue};
use crate::state::RuleStatus;

/// A typed scalar comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl<'de> serde::Deserialize<'de> for CompareOp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "==" => Ok(CompareOp::Eq),
            "!=" => Ok(CompareOp::Ne),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Le),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Ge),
            other => Err(serde::de::Error::custom(format!(
                "unrecognized comparison operator '{other}'"
            ))),
        }
    }
}

impl CompareOp {
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Eq => (lhs - rhs).abs() < f64::EPSILON,
            CompareOp::Ne => (lhs - rhs).abs() >= f64::EPSILON,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
        }
    }
}

/// One typed comparison: `property op immediate`.
#[derive(Debug, Clone, Copy)]
pub struct Condition {
    pub property: PropertyRef,
    pub op: CompareOp,
    pub immediate: PropertyValue,
}

impl Condition {
    #[must_use]
    pub fn holds(&self, blob: &[u8]) -> bool {
        match read_typed(blob, self.property) {
            Some(v) => self.op.apply(v.as_f64(), self.immediate.as_f64()),
            None => false,
        }
    }
}

/// An action attached to a rule, executed exactly once when that rule
/// transitions from unsatisfied to satisfied.
#[derive(Debug, Clone)]
pub enum Action {
    SetMagnet { magnet_id: usize, value: MagnetValue },
    AddReward(i64),
    MarkWin,
    MarkFail,
    /// Declares a cascade edge: satisfying this rule also satisfies `rule_id`.
    Satisfy(usize),
}

/// A parsed, immutable rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: usize,
    pub label: String,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
    /// Rule ids transitively satisfied by this rule, derived from its
    /// `Satisfy` actions at construction time.
    satisfies_indexes: Vec<usize>,
    /// Sum of this rule's `AddReward` action amounts.
    reward_constant: i64,
    is_win: bool,
    is_fail: bool,
}

impl Rule {
    #[must_use]
    pub fn new(
        id: usize,
        label: String,
        conditions: Vec<Condition>,
        actions: Vec<Action>,
    ) -> Self {
        let satisfies_indexes = actions
            .iter()
            .filter_map(|a| match a {
                Action::Satisfy(k) => Some(*k),
                _ => None,
            })
            .collect();
        let reward_constant = actions
            .iter()
            .map(|a| match a {
                Action::AddReward(r) => *r,
                _ => 0,
            })
            .sum();
        let is_win = actions.iter().any(|a| matches!(a, Action::MarkWin));
        let is_fail = actions.iter().any(|a| matches!(a, Action::MarkFail));
        Self {
            id,
            label,
            conditions,
            actions,
            satisfies_indexes,
            reward_constant,
            is_win,
            is_fail,
        }
    }

    #[must_use]
    pub fn conditions_hold(&self, blob: &[u8]) -> bool {
        self.conditions.iter().all(|c| c.holds(blob))
    }

    #[must_use]
    pub fn satisfies_indexes(&self) -> &[usize] {
        &self.satisfies_indexes
    }
}

/// The outcome of one evaluation pass, ready to be folded into a
/// [`crate::state::StepRecord`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalOutcome {
    pub reward: i64,
    pub is_win: bool,
    pub is_fail: bool,
}

/// The full, parsed rule configuration for a game. Immutable after
/// construction and read-only from every worker thread thereafter.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn satisfy(&self, rule_id: usize, status: &mut RuleStatus, newly: &mut Vec<usize>) {
        if status.is_set(rule_id) {
            return;
        }
        status.set(rule_id);
        newly.push(rule_id);
        for &child in self.rules[rule_id].satisfies_indexes() {
            self.satisfy(child, status, newly);
        }
    }

    /// Run one step's worth of rule evaluation against `blob`, mutating
    /// `status` and `magnets` in place, and return the combined score and
    /// win/fail classification per §4.3's formula.
    pub fn evaluate(
        &self,
        blob: &[u8],
        status: &mut RuleStatus,
        magnets: &mut MagnetSet,
    ) -> EvalOutcome {
        let mut newly = Vec::new();
        for rule in &self.rules {
            if status.is_set(rule.id) {
                continue;
            }
            if rule.conditions_hold(blob) {
                self.satisfy(rule.id, status, &mut newly);
            }
        }

        // Ascending rule-id order: the last action applied for a given
        // magnet is the one from the highest rule id touched this step,
        // matching the documented tie-break contract.
        newly.sort_unstable();
        for &rule_id in &newly {
            for action in &self.rules[rule_id].actions {
                if let Action::SetMagnet { magnet_id, value } = action {
                    magnets.set(*magnet_id, *value);
                }
            }
        }

        let mut reward: i64 = 0;
        let mut is_win = false;
        let mut is_fail = false;
        for rule in &self.rules {
            if status.is_set(rule.id) {
                reward += rule.reward_constant;
                is_win |= rule.is_win;
                is_fail |= rule.is_fail;
            }
        }
        let magnet_term = magnets.total_term(blob);
        #[allow(clippy::cast_possible_truncation)]
        let combined = reward + magnet_term.round() as i64;

        EvalOutcome {
            reward: combined,
            is_win,
            is_fail,
        }
    }
}
