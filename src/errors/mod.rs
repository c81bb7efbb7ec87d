//! Error types with miette diagnostics
//!
//! `MutationError` covers everything the mutation engine can report.
//! Only `PathNotFound` ever aborts a generation run; the soft-skip kinds
//! are rendered for the debug sink and generation carries on.

use miette::Diagnostic;
use thiserror::Error;

use crate::fuzzer::mutation::strategy::MutationStrategy;

/// Main error type for the mutation engine
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MutationError {
    /// A path walked through a container that does not exist
    #[error("Path not found: {path} ({reason})")]
    #[diagnostic(
        code(bodyfuzz::path_not_found),
        help("Every key of a path must resolve to a container of matching kind: names index objects, numbers index lists")
    )]
    PathNotFound { path: String, reason: String },

    /// Payload failed a strategy's validity predicate
    #[error("Invalid payload for {strategy}: {reason}")]
    #[diagnostic(code(bodyfuzz::invalid_payload), severity(Warning))]
    InvalidPayload {
        strategy: MutationStrategy,
        reason: String,
    },

    /// Reserved parameter name rejected by the name validator
    #[error("Name '{name}' rejected for {strategy}")]
    #[diagnostic(
        code(bodyfuzz::name_rejected),
        severity(Warning),
        help("Choose a reserved name the target accepts as an input name")
    )]
    NameRejected {
        name: String,
        strategy: MutationStrategy,
    },

    /// Raw body could not be parsed into a structured value
    #[error("Failed to parse input: {message}")]
    #[diagnostic(
        code(bodyfuzz::parse),
        help("No input set can be built from this body, so nothing will be mutated")
    )]
    Parse { message: String },
}

impl MutationError {
    /// Create a path-not-found error
    pub fn path_not_found(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::PathNotFound {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid payload error
    pub fn invalid_payload(strategy: MutationStrategy, reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            strategy,
            reason: reason.into(),
        }
    }

    /// Create a name rejected error
    pub fn name_rejected(name: impl Into<String>, strategy: MutationStrategy) -> Self {
        Self::NameRejected {
            name: name.into(),
            strategy,
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Whether this error aborts the current generation run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::PathNotFound { .. })
    }
}

impl From<serde_json::Error> for MutationError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string())
    }
}

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Config file not found")]
    NotFound,

    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Invalid field path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}
