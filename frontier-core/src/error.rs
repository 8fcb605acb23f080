//! Typed configuration errors.
//!
//! Every configuration problem is fatal at init (per spec §7); the error
//! names the offending key and, where relevant, the rule label so the
//! operator does not have to guess which part of the document is wrong.

/// Typed failure for configuration parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON, or not an object at the top level.
    Malformed { detail: String },

    /// A rule condition or magnet action named a property the Game does
    /// not declare.
    UnknownProperty { rule: String, property: String },

    /// A rule action named a magnet the Game's `magnet_layout()` does not
    /// declare.
    UnknownMagnet { rule: String, magnet: String },

    /// A `Satisfy` action named a rule label that does not exist.
    UnknownRuleLabel { from_rule: String, to_label: String },

    /// `State Database.Type` named a backend this build does not support.
    UnsupportedStateDatabaseType { detail: String },

    /// `Game Inputs` declared a symbol the Game's `legal_inputs` alphabet
    /// does not recognize.
    UnknownInputSymbol { symbol: String },

    /// Two rules declared the same label.
    DuplicateRuleLabel { label: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed { detail } => write!(f, "malformed configuration: {detail}"),
            Self::UnknownProperty { rule, property } => {
                write!(f, "rule '{rule}' references unknown property '{property}'")
            }
            Self::UnknownMagnet { rule, magnet } => {
                write!(f, "rule '{rule}' references unknown magnet '{magnet}'")
            }
            Self::UnknownRuleLabel { from_rule, to_label } => write!(
                f,
                "rule '{from_rule}' satisfies unknown rule label '{to_label}'"
            ),
            Self::UnsupportedStateDatabaseType { detail } => {
                write!(f, "unsupported State Database Type: {detail}")
            }
            Self::UnknownInputSymbol { symbol } => {
                write!(f, "Game Inputs declared unrecognized input symbol '{symbol}'")
            }
            Self::DuplicateRuleLabel { label } => {
                write!(f, "duplicate rule label '{label}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
