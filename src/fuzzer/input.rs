//! Input Set - One fuzzable structured body plus its frozen baseline
//!
//! An `InputSet` is never written in place. Every change returns a new set
//! sharing the same baseline snapshot, which is captured once when the set
//! is first built.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use super::traversal::Leaves;
use super::value::{Fields, Key, Path, StructuredValue};
use crate::errors::MutationError;

/// Turns a raw body into a structured tree
pub trait SourceParser {
    fn parse(&self, raw: &[u8]) -> Result<StructuredValue, MutationError>;
}

/// Parses JSON request bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSourceParser;

impl SourceParser for JsonSourceParser {
    fn parse(&self, raw: &[u8]) -> Result<StructuredValue, MutationError> {
        let value: Value = serde_json::from_slice(raw)?;
        Ok(StructuredValue::from(value))
    }
}

/// A structured input and the baseline it was derived from
#[derive(Debug, Clone)]
pub struct InputSet {
    root: StructuredValue,
    baseline: Arc<StructuredValue>,
}

impl InputSet {
    /// Create a new input set, freezing `root` as its baseline
    pub fn new(root: StructuredValue) -> Self {
        let baseline = Arc::new(root.clone());
        Self { root, baseline }
    }

    /// Build from an explicit field map
    pub fn from_fields<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, StructuredValue)>,
    {
        let fields: Fields = fields
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .collect();
        Self::new(StructuredValue::Object(fields))
    }

    /// Parse a raw body with the given parser
    pub fn parse(parser: &dyn SourceParser, raw: &[u8]) -> Result<Self, MutationError> {
        parser.parse(raw).map(Self::new)
    }

    /// Parse a JSON body
    pub fn from_json_slice(raw: &[u8]) -> Result<Self, MutationError> {
        Self::parse(&JsonSourceParser, raw)
    }

    /// Current tree
    pub fn root(&self) -> &StructuredValue {
        &self.root
    }

    /// Tree as it was when this set was first built
    pub fn baseline(&self) -> &StructuredValue {
        &self.baseline
    }

    /// Walk the current tree's leaves
    pub fn leaves(&self) -> Leaves<'_> {
        self.root.leaves()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// An input set with no leaves has nothing to mutate
    pub fn is_empty(&self) -> bool {
        self.leaves().next().is_none()
    }

    /// Read the node at `path`
    pub fn get(&self, path: &Path) -> Result<&StructuredValue, MutationError> {
        self.root.get(path)
    }

    /// New input set with the node at `path` replaced
    pub fn set(&self, path: &Path, value: StructuredValue) -> Result<Self, MutationError> {
        Ok(self.derive(self.root.set(path, value)?))
    }

    /// New input set with a top-level entry added or replaced
    ///
    /// Requires an object root.
    pub fn merge_top_level(
        &self,
        name: impl Into<String>,
        value: StructuredValue,
    ) -> Result<Self, MutationError> {
        self.set(&Path::new(vec![Key::Name(name.into())]), value)
    }

    /// New input set equal to the baseline
    pub fn restore(&self) -> Self {
        self.derive(self.baseline.as_ref().clone())
    }

    /// Leaf paths whose value differs from, or is absent in, the baseline
    pub fn changed_paths(&self) -> Vec<Path> {
        self.leaves()
            .filter(|(path, scalar)| {
                self.baseline
                    .get(path)
                    .ok()
                    .and_then(StructuredValue::as_scalar)
                    != Some(*scalar)
            })
            .map(|(path, _)| path)
            .collect()
    }

    /// Canonical form of the current tree
    pub fn canonical_json(&self) -> String {
        self.root.canonical_json()
    }

    /// Current tree as JSON, for the caller's body serializer
    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    fn derive(&self, root: StructuredValue) -> Self {
        Self {
            root,
            baseline: Arc::clone(&self.baseline),
        }
    }
}

impl PartialEq for InputSet {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl From<StructuredValue> for InputSet {
    fn from(root: StructuredValue) -> Self {
        Self::new(root)
    }
}

impl From<Value> for InputSet {
    fn from(value: Value) -> Self {
        Self::new(StructuredValue::from(value))
    }
}

impl Serialize for InputSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}
