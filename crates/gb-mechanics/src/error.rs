//! Error types for the mechanics engine.

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice formula did not match `NdS[+M|-M]`.
    #[error("invalid dice formula '{formula}': {reason}")]
    InvalidFormula {
        /// The formula text as given.
        formula: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An ability name did not match any of the six abilities.
    #[error("unknown ability: {0}")]
    UnknownAbility(String),

    /// A character class name did not match any known class.
    #[error("unknown character class: {0}")]
    UnknownClass(String),

    /// A saving throw name did not match fortitude, reflex, or will.
    #[error("unknown save type: {0}")]
    UnknownSaveType(String),
}

impl MechError {
    pub(crate) fn formula(formula: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFormula {
            formula: formula.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
