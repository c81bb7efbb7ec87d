//! Mutation Strategy - Kinds of mutations applied to a structured body
//!
//! Strategies run in the order returned by [`MutationStrategy::all`], which
//! keeps generated sequences reproducible.

use serde::{Deserialize, Serialize};

/// Mutation strategies for structured inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationStrategy {
    /// Replace one leaf value with a formatted payload
    Value,
    /// Inject a reserved top-level parameter carrying the payload
    Extra,
    /// Use the payload itself as a top-level parameter name
    Name,
}

impl MutationStrategy {
    /// Get all strategies in execution order
    pub fn all() -> Vec<Self> {
        vec![Self::Value, Self::Extra, Self::Name]
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value_mutation",
            Self::Extra => "extra_parameter",
            Self::Name => "name_fuzzing",
        }
    }
}

impl std::fmt::Display for MutationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
