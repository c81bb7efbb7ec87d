//! Payload Formats - How a payload is combined with an original value
//!
//! Format variants are opaque identifiers owned by the payload library.
//! [`StandardFormatter`] ships a small default catalog; scanners with their
//! own variants implement [`Formatter`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a payload format variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatId(String);

impl FormatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Replace the original value with the payload
    pub fn straight() -> Self {
        Self::new(StandardFormat::Straight.as_str())
    }

    /// Original value followed by the payload
    pub fn append() -> Self {
        Self::new(StandardFormat::Append.as_str())
    }

    /// Payload followed by the original value
    pub fn prepend() -> Self {
        Self::new(StandardFormat::Prepend.as_str())
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<StandardFormat> for FormatId {
    fn from(format: StandardFormat) -> Self {
        Self::new(format.as_str())
    }
}

/// Combines a payload with the value it is injected over
///
/// Implementations must be pure: the same arguments always give the same string.
pub trait Formatter {
    fn format(&self, payload: &str, variant: &FormatId, original: &str) -> String;
}

impl<F> Formatter for F
where
    F: Fn(&str, &FormatId, &str) -> String,
{
    fn format(&self, payload: &str, variant: &FormatId, original: &str) -> String {
        self(payload, variant, original)
    }
}

/// Variants understood by [`StandardFormatter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFormat {
    Straight,
    Append,
    Prepend,
}

impl StandardFormat {
    pub fn all() -> Vec<Self> {
        vec![Self::Straight, Self::Append, Self::Prepend]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Straight => "straight",
            Self::Append => "append",
            Self::Prepend => "prepend",
        }
    }

    pub fn from_id(id: &FormatId) -> Option<Self> {
        Self::all().into_iter().find(|f| f.as_str() == id.as_str())
    }
}

/// Default catalog: straight, append, prepend
///
/// Unknown variants are treated as straight replacement.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFormatter;

impl Formatter for StandardFormatter {
    fn format(&self, payload: &str, variant: &FormatId, original: &str) -> String {
        match StandardFormat::from_id(variant) {
            Some(StandardFormat::Append) => format!("{}{}", original, payload),
            Some(StandardFormat::Prepend) => format!("{}{}", payload, original),
            Some(StandardFormat::Straight) | None => payload.to_string(),
        }
    }
}
