//! Filters - Policy collaborators consulted during generation
//!
//! The session never decides on its own which fields are off limits,
//! which names are acceptable, or where diagnostics go. It asks these
//! traits.

use std::collections::HashSet;
use std::sync::{Mutex, OnceLock};

use regex::Regex;

use super::value::{Path, Scalar};

/// Decides which paths value mutation must leave alone (e.g. CSRF tokens)
pub trait ImmutabilityFilter {
    fn is_immutable(&self, path: &Path) -> bool;
}

impl<F> ImmutabilityFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn is_immutable(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Decides which names may be sent as input names
pub trait NameValidator {
    /// Whether a reserved name is accepted as an input name for this element
    fn is_valid_input_name(&self, name: &str) -> bool;

    /// Whether a payload may itself be used as an input name
    fn is_valid_as_input_name_payload(&self, payload: &str) -> bool;
}

/// Decides whether a payload may be written over a given leaf
pub trait PayloadValidator {
    fn is_valid_value_payload(&self, payload: &str, leaf: &Scalar) -> bool;
}

/// Receives diagnostics about skipped work
///
/// Purely observational: reporting never changes what gets generated.
pub trait DebugSink {
    fn report(&self, message: &str, payload: &str);
}

/// Immutable fields matched by exact path or by field name at any depth
#[derive(Debug, Clone, Default)]
pub struct ImmutableFields {
    paths: HashSet<Path>,
    names: HashSet<String>,
}

impl ImmutableFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Protect one exact path
    pub fn with_path(mut self, path: Path) -> Self {
        self.paths.insert(path);
        self
    }

    /// Protect every leaf with this field name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.insert(name.into());
        self
    }

    pub fn extend_paths(&mut self, paths: impl IntoIterator<Item = Path>) {
        self.paths.extend(paths);
    }

    pub fn extend_names<S: Into<String>>(&mut self, names: impl IntoIterator<Item = S>) {
        self.names.extend(names.into_iter().map(Into::into));
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.names.is_empty()
    }
}

impl ImmutabilityFilter for ImmutableFields {
    fn is_immutable(&self, path: &Path) -> bool {
        self.paths.contains(path)
            || path
                .leaf_name()
                .is_some_and(|name| self.names.contains(name))
    }
}

/// Maximum length of a payload used as an input name
pub const MAX_NAME_PAYLOAD_LEN: usize = 256;

fn reserved_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-\[\]]*$").ok())
        .as_ref()
}

/// Default name and payload policy
///
/// - reserved names: identifier-like (`^[A-Za-z_][A-Za-z0-9_.\-\[\]]*$`)
/// - payloads as names: non-empty, at most 256 chars, no control characters
/// - payloads as values: non-empty
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl NameValidator for DefaultValidator {
    fn is_valid_input_name(&self, name: &str) -> bool {
        reserved_name_pattern().is_some_and(|re| re.is_match(name))
    }

    fn is_valid_as_input_name_payload(&self, payload: &str) -> bool {
        !payload.is_empty()
            && payload.chars().count() <= MAX_NAME_PAYLOAD_LEN
            && !payload.chars().any(char::is_control)
    }
}

impl PayloadValidator for DefaultValidator {
    fn is_valid_value_payload(&self, payload: &str, _leaf: &Scalar) -> bool {
        !payload.is_empty()
    }
}

/// Forwards reports to `tracing` at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn report(&self, message: &str, payload: &str) {
        tracing::debug!(payload, "{}", message);
    }
}

/// Keeps every report in memory
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<(String, String)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(message, payload)` pairs reported so far
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DebugSink for CollectingSink {
    fn report(&self, message: &str, payload: &str) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push((message.to_string(), payload.to_string()));
        }
    }
}
