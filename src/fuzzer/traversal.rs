//! Traversal - Depth-first walk over structured values
//!
//! Yields `(Path, &Scalar)` for every leaf in pre-order: object entries in
//! stored order, list elements by ascending index. Containers are never
//! yielded themselves.

use std::iter::Enumerate;
use std::slice;

use indexmap::map;

use super::value::{Key, Path, Scalar, StructuredValue};

/// Lazy leaf iterator over a borrowed tree
#[derive(Clone)]
pub struct Leaves<'a> {
    /// Root not yet expanded
    pending: Option<&'a StructuredValue>,
    /// Open containers, innermost last
    stack: Vec<Frame<'a>>,
}

#[derive(Clone)]
enum Frame<'a> {
    Object(Path, map::Iter<'a, String, StructuredValue>),
    List(Path, Enumerate<slice::Iter<'a, StructuredValue>>),
}

impl<'a> Leaves<'a> {
    pub fn new(root: &'a StructuredValue) -> Self {
        Self {
            pending: Some(root),
            stack: Vec::new(),
        }
    }

    /// Push a container frame, or hand back a scalar leaf
    fn enter(&mut self, path: Path, node: &'a StructuredValue) -> Option<(Path, &'a Scalar)> {
        match node {
            StructuredValue::Scalar(scalar) => Some((path, scalar)),
            StructuredValue::Object(fields) => {
                self.stack.push(Frame::Object(path, fields.iter()));
                None
            }
            StructuredValue::List(items) => {
                self.stack.push(Frame::List(path, items.iter().enumerate()));
                None
            }
        }
    }
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (Path, &'a Scalar);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.pending.take() {
            if let Some(leaf) = self.enter(Path::root(), root) {
                return Some(leaf);
            }
        }

        loop {
            let (path, node) = match self.stack.last_mut()? {
                Frame::Object(prefix, entries) => match entries.next() {
                    Some((name, child)) => (prefix.child(Key::Name(name.clone())), child),
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
                Frame::List(prefix, items) => match items.next() {
                    Some((idx, child)) => (prefix.child(Key::Index(idx)), child),
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
            };

            if let Some(leaf) = self.enter(path, node) {
                return Some(leaf);
            }
        }
    }
}

impl std::iter::FusedIterator for Leaves<'_> {}

impl StructuredValue {
    /// Walk every scalar leaf of this tree
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves::new(self)
    }

    /// Number of scalar leaves
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(value: &StructuredValue) -> Vec<String> {
        value.leaves().map(|(path, _)| path.to_string()).collect()
    }

    #[test]
    fn nested_objects_yield_only_leaves() {
        let value = StructuredValue::from(json!({"a": {"b": 1}}));
        assert_eq!(paths(&value), vec!["a.b"]);
    }

    #[test]
    fn preorder_across_lists_and_objects() {
        let value = StructuredValue::from(json!({
            "z": 1,
            "items": [{"id": 7, "tags": ["x", "y"]}, null],
            "a": true
        }));
        assert_eq!(
            paths(&value),
            vec![
                "z",
                "items[0].id",
                "items[0].tags[0]",
                "items[0].tags[1]",
                "items[1]",
                "a"
            ]
        );
    }

    #[test]
    fn scalar_root_is_single_leaf() {
        let value = StructuredValue::string("solo");
        let leaves: Vec<_> = value.leaves().collect();
        assert_eq!(leaves.len(), 1);
        assert!(leaves[0].0.is_empty());
    }

    #[test]
    fn empty_containers_have_no_leaves() {
        assert_eq!(StructuredValue::from(json!({})).leaf_count(), 0);
        assert_eq!(StructuredValue::from(json!({"a": [], "b": {}})).leaf_count(), 0);
    }

    #[test]
    fn traversal_is_restartable() {
        let value = StructuredValue::from(json!({"a": [1, 2], "b": {"c": "d"}}));
        let first: Vec<_> = value.leaves().collect();
        let second: Vec<_> = value.leaves().collect();
        assert_eq!(first, second);

        let mut walker = value.leaves();
        walker.next();
        let resumed: Vec<_> = walker.clone().collect();
        assert_eq!(resumed, walker.collect::<Vec<_>>());
    }

    #[test]
    fn yielded_paths_resolve_to_their_values() {
        let value = StructuredValue::from(json!({"a": [{"b": "c"}, 4], "d": null}));
        for (path, scalar) in value.leaves() {
            assert_eq!(value.get(&path).unwrap().as_scalar(), Some(scalar));
        }
    }
}
