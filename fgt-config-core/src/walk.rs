//! Tree traversal helpers.

use std::collections::VecDeque;

use crate::tree::{Children, ConfigNode};

/// Breadth-first iterator of `(path, node)` pairs.
pub struct Walk<'a> {
    pending: VecDeque<(String, &'a ConfigNode)>,
    delimiter: String,
}

impl<'a> Walk<'a> {
    /// Walk `node` itself, then its descendants. Paths start at the node name.
    pub fn from_node(node: &'a ConfigNode, delimiter: &str) -> Self {
        Self {
            pending: VecDeque::from([(node.name().to_string(), node)]),
            delimiter: delimiter.to_string(),
        }
    }

    /// Walk every descendant of a container. Paths start at the child keys.
    pub fn from_children(children: &'a Children, delimiter: &str) -> Self {
        Self {
            pending: children
                .iter()
                .map(|(key, node)| (key.clone(), node))
                .collect(),
            delimiter: delimiter.to_string(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a ConfigNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (path, node) = self.pending.pop_front()?;
        if let Some(children) = node.children() {
            self.pending.extend(
                children
                    .iter()
                    .map(|(key, child)| (format!("{path}{}{key}", self.delimiter), child)),
            );
        }
        Some((path, node))
    }
}

/// Callbacks for [`traverse`]. `parents` holds the keys from the starting
/// container down to, but excluding, the current node.
pub trait Visitor {
    /// Called before a container's children. Return `false` to skip them.
    fn enter(&mut self, _key: &str, _node: &ConfigNode, _parents: &[&str]) -> bool {
        true
    }

    /// Called after a container's children, or right after `enter` when it
    /// returned `false`.
    fn leave(&mut self, _key: &str, _node: &ConfigNode, _parents: &[&str]) {}

    /// Called for `set` and `unset` nodes.
    fn leaf(&mut self, _key: &str, _node: &ConfigNode, _parents: &[&str]) {}
}

/// Depth-first traversal of `children` in insertion order.
pub fn traverse<V: Visitor + ?Sized>(children: &Children, visitor: &mut V) {
    let mut parents = Vec::new();
    visit_children(children, visitor, &mut parents);
}

fn visit_children<'a, V: Visitor + ?Sized>(
    children: &'a Children,
    visitor: &mut V,
    parents: &mut Vec<&'a str>,
) {
    for (key, node) in children {
        match node.children() {
            None => visitor.leaf(key, node, parents),
            Some(nested) => {
                if visitor.enter(key, node, parents) {
                    parents.push(key);
                    visit_children(nested, visitor, parents);
                    parents.pop();
                }
                visitor.leave(key, node, parents);
            }
        }
    }
}
