//! Structured Value - Tree model for nested request bodies
//!
//! Bodies are trees of objects, lists and scalar leaves. Nodes are addressed
//! by a [`Path`] of name and index keys. Writes never touch the tree they are
//! called on: [`StructuredValue::set`] returns a new tree.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::errors::MutationError;

/// Object entries, kept in insertion order
pub type Fields = IndexMap<String, StructuredValue>;

/// A node of a structured input tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StructuredValue {
    /// Mapping of unique names to child nodes
    Object(Fields),
    /// Index-addressed sequence of child nodes
    List(Vec<StructuredValue>),
    /// Leaf value
    Scalar(Scalar),
}

/// Leaf value of a structured tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// String form handed to formatters
    ///
    /// Numbers keep their JSON spelling and null becomes the empty string.
    pub fn as_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::String(s) => s.clone(),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl StructuredValue {
    /// Empty object
    pub fn object() -> Self {
        Self::Object(Fields::new())
    }

    /// String leaf
    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Read the node at `path`
    pub fn get(&self, path: &Path) -> Result<&StructuredValue, MutationError> {
        let mut node = self;
        for (depth, key) in path.keys().iter().enumerate() {
            node = node
                .child(key)
                .ok_or_else(|| Self::not_found(path, depth, key, node))?;
        }
        Ok(node)
    }

    /// Return a copy of this tree with the node at `path` replaced
    ///
    /// Every container on the way to the written node is copied, so `self`
    /// is left exactly as it was. A missing final name on an object is
    /// inserted at the end; list indices must already exist.
    pub fn set(&self, path: &Path, value: StructuredValue) -> Result<StructuredValue, MutationError> {
        let mut tree = self.clone();
        tree.write(path, value)?;
        Ok(tree)
    }

    /// In-place write used on freshly cloned trees
    fn write(&mut self, path: &Path, value: StructuredValue) -> Result<(), MutationError> {
        let Some((last, spine)) = path.keys().split_last() else {
            *self = value;
            return Ok(());
        };

        let mut node = self;
        for (depth, key) in spine.iter().enumerate() {
            if node.child(key).is_none() {
                return Err(Self::not_found(path, depth, key, node));
            }
            node = node
                .child_mut(key)
                .ok_or_else(|| MutationError::path_not_found(path, "missing container"))?;
        }

        match (node, last) {
            (Self::Object(fields), Key::Name(name)) => {
                fields.insert(name.clone(), value);
                Ok(())
            }
            (Self::List(items), Key::Index(idx)) if *idx < items.len() => {
                items[*idx] = value;
                Ok(())
            }
            (node, key) => Err(Self::not_found(path, spine.len(), key, node)),
        }
    }

    fn child(&self, key: &Key) -> Option<&StructuredValue> {
        match (self, key) {
            (Self::Object(fields), Key::Name(name)) => fields.get(name),
            (Self::List(items), Key::Index(idx)) => items.get(*idx),
            _ => None,
        }
    }

    fn child_mut(&mut self, key: &Key) -> Option<&mut StructuredValue> {
        match (self, key) {
            (Self::Object(fields), Key::Name(name)) => fields.get_mut(name),
            (Self::List(items), Key::Index(idx)) => items.get_mut(*idx),
            _ => None,
        }
    }

    fn not_found(path: &Path, depth: usize, key: &Key, node: &StructuredValue) -> MutationError {
        let reason = match (node, key) {
            (Self::Object(_), Key::Name(name)) => format!("no field '{}' at depth {}", name, depth),
            (Self::List(items), Key::Index(idx)) => format!(
                "index {} out of bounds for list of {} at depth {}",
                idx,
                items.len(),
                depth
            ),
            (_, Key::Name(_)) => format!("expected object at depth {}", depth),
            (_, Key::Index(_)) => format!("expected list at depth {}", depth),
        };
        MutationError::path_not_found(path, reason)
    }

    /// Canonical serialization used for content hashing
    ///
    /// Object entries are written with their names sorted, so trees that
    /// compare equal serialize identically whatever order their fields were
    /// inserted in. [`to_json`](Self::to_json) keeps the stored order.
    pub fn canonical_json(&self) -> String {
        serde_json::to_string(&self.canonical_value()).unwrap_or_default()
    }

    fn canonical_value(&self) -> Value {
        match self {
            Self::Object(fields) => {
                let mut entries: Vec<_> = fields.iter().collect();
                entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                Value::Object(
                    entries
                        .into_iter()
                        .map(|(name, child)| (name.clone(), child.canonical_value()))
                        .collect(),
                )
            }
            Self::List(items) => Value::Array(items.iter().map(Self::canonical_value).collect()),
            Self::Scalar(scalar) => scalar.to_json(),
        }
    }

    /// Convert to a `serde_json::Value` for the caller's serializer
    pub fn to_json(&self) -> Value {
        match self {
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, child)| (name.clone(), child.to_json()))
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Scalar(scalar) => scalar.to_json(),
        }
    }
}

impl From<Value> for StructuredValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(name, child)| (name, Self::from(child)))
                    .collect(),
            ),
        }
    }
}

impl From<StructuredValue> for Value {
    fn from(value: StructuredValue) -> Self {
        value.to_json()
    }
}

impl From<Scalar> for StructuredValue {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

/// One step of a [`Path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// Object field name
    Name(String),
    /// List position
    Index(usize),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for Key {
    fn from(idx: usize) -> Self {
        Self::Index(idx)
    }
}

/// Address of one node in a structured tree
///
/// Displays as `user.tags[0]`; the empty path is the root and displays as `$`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<Key>);

impl Path {
    /// The root path
    pub fn root() -> Self {
        Self::default()
    }

    pub fn new(keys: Vec<Key>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend this path by one key
    pub fn child(&self, key: impl Into<Key>) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Self(keys)
    }

    /// Last key, if any
    pub fn last(&self) -> Option<&Key> {
        self.0.last()
    }

    /// Field name of the addressed node, when its parent is an object
    pub fn leaf_name(&self) -> Option<&str> {
        match self.last() {
            Some(Key::Name(name)) => Some(name),
            _ => None,
        }
    }
}

impl<K: Into<Key>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "$");
        }
        for (i, key) in self.0.iter().enumerate() {
            match key {
                Key::Name(name) if i == 0 => write!(f, "{}", name)?,
                Key::Name(name) => write!(f, ".{}", name)?,
                Key::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "$" {
            return Ok(Self::root());
        }

        let mut keys = Vec::new();
        let mut name = String::new();
        let mut chars = s.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if name.is_empty() && !matches!(keys.last(), Some(Key::Index(_))) {
                        return Err(format!("empty field name in '{}'", s));
                    }
                    if !name.is_empty() {
                        keys.push(Key::Name(std::mem::take(&mut name)));
                    }
                }
                '[' => {
                    if !name.is_empty() {
                        keys.push(Key::Name(std::mem::take(&mut name)));
                    }
                    let mut digits = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(d) => digits.push(d),
                            None => return Err(format!("unclosed '[' in '{}'", s)),
                        }
                    }
                    let idx = digits
                        .parse::<usize>()
                        .map_err(|_| format!("invalid list index '{}' in '{}'", digits, s))?;
                    keys.push(Key::Index(idx));
                    if let Some(&next) = chars.peek() {
                        if next != '.' && next != '[' {
                            return Err(format!("expected '.' or '[' after ']' in '{}'", s));
                        }
                    }
                }
                ']' => return Err(format!("unexpected ']' in '{}'", s)),
                other => name.push(other),
            }
        }

        if !name.is_empty() {
            keys.push(Key::Name(name));
        } else if s.ends_with('.') {
            return Err(format!("trailing '.' in '{}'", s));
        }

        Ok(Self(keys))
    }
}
