//! Error types for mixmax.

use thiserror::Error;

/// Result type alias for rule data and search operations.
pub type MixResult<T> = Result<T, MixError>;

/// Errors surfaced to callers of the rule data loader and the search engine.
///
/// An infeasible search is not an error: it yields an empty ranking.
#[derive(Debug, Error)]
pub enum MixError {
    /// The target names an effect the ruleset does not know.
    #[error("invalid target: unknown effect '{effect}'")]
    InvalidTarget { effect: String },

    /// The step bounds cannot describe any search.
    #[error("invalid step bound: {message}")]
    InvalidBound { message: String },

    /// An ingredient referenced by name was not found in the ruleset.
    #[error("unknown ingredient '{name}'")]
    UnknownIngredient { name: String },

    /// A product referenced by name was not found in the ruleset.
    #[error("unknown product '{name}'")]
    UnknownProduct { name: String },

    /// The rule tables are inconsistent.
    #[error("invalid rule data: {message}")]
    InvalidRuleData { message: String },

    /// CSV parse error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parse error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file operations).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl MixError {
    pub(crate) fn rule_data(message: impl Into<String>) -> Self {
        Self::InvalidRuleData {
            message: message.into(),
        }
    }

    pub(crate) fn bound(message: impl Into<String>) -> Self {
        Self::InvalidBound {
            message: message.into(),
        }
    }
}
