// src/record/tree.rs

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::metric::Metric;

/// Key a leaf moves to when a branch has to grow where it sits.
pub const VALUE_KEY: &str = "value";

/// Ordered metric tree built from flattened header paths. Children keep
/// insertion order so output follows the sheet's column order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Metric),
    Branch(Vec<(String, Node)>),
}

impl Default for Node {
    fn default() -> Self {
        Node::Branch(Vec::new())
    }
}

impl Node {
    pub fn branch() -> Self {
        Node::default()
    }

    pub fn child(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Branch(children) => children.iter().find(|(k, _)| k == key).map(|(_, n)| n),
            Node::Leaf(_) => None,
        }
    }

    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        path.iter().try_fold(self, |node, key| node.child(key))
    }

    pub fn metric(&self) -> Option<&Metric> {
        match self {
            Node::Leaf(m) => Some(m),
            Node::Branch(_) => None,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(children) => children.iter().map(|(_, n)| n.leaf_count()).sum(),
        }
    }

    /// Every leaf with its key path, depth first.
    pub fn leaves(&self) -> Vec<(Vec<String>, &Metric)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut Vec::new(), &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &mut Vec<String>, out: &mut Vec<(Vec<String>, &'a Metric)>) {
        match self {
            Node::Leaf(m) => out.push((prefix.clone(), m)),
            Node::Branch(children) => {
                for (key, child) in children {
                    prefix.push(key.clone());
                    child.collect_leaves(prefix, out);
                    prefix.pop();
                }
            }
        }
    }

    /// Insert `value` at `path`. A leaf standing where a branch is needed is
    /// kept under `value`; a second value for an occupied leaf goes to
    /// `value_2`, `value_3`, ... Nothing is ever overwritten.
    pub fn insert(&mut self, path: &[String], value: Metric) {
        let children = self.promote();
        let Some((head, rest)) = path.split_first() else {
            push_unique(children, VALUE_KEY, Node::Leaf(value));
            return;
        };
        match children.iter().position(|(k, _)| k == head) {
            Some(i) => children[i].1.insert(rest, value),
            None if rest.is_empty() => children.push((head.clone(), Node::Leaf(value))),
            None => {
                let mut fresh = Node::branch();
                fresh.insert(rest, value);
                children.push((head.clone(), fresh));
            }
        }
    }

    fn promote(&mut self) -> &mut Vec<(String, Node)> {
        if let Node::Leaf(old) = self {
            let old = std::mem::take(old);
            *self = Node::Branch(vec![(VALUE_KEY.to_string(), Node::Leaf(old))]);
        }
        match self {
            Node::Branch(children) => children,
            Node::Leaf(_) => unreachable!("leaf promoted to branch above"),
        }
    }
}

fn push_unique(children: &mut Vec<(String, Node)>, base: &str, node: Node) {
    let taken = |key: &str| children.iter().any(|(k, _)| k == key);
    let key = if !taken(base) {
        base.to_string()
    } else {
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|k| !taken(k))
            .unwrap_or_else(|| base.to_string())
    };
    children.push((key, node));
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(m) => m.serialize(serializer),
            Node::Branch(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (k, v) in children {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
