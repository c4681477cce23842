// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Structural diff of cluster instance parameters and classification of the
//! changes into allowed, ignored, node scaling and disallowed updates.
//!
//! Paths are sequences of object keys and array indices. Patterns are paths in
//! which `*` stands for exactly one element; a pattern matches every path it
//! is a prefix of.

use serde_json::Value;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeType {
    Create,
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    pub change_type: ChangeType,
    pub path: Vec<String>,
    pub from: Option<Value>,
    pub to: Option<Value>,
}

/// Outcome of comparing old and new parameters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Dotted paths of changes that are not permitted
    pub disallowed_updates: Vec<String>,
    /// Dotted `nodes.<index>` paths of nodes added or removed
    pub scaling_nodes: Vec<String>,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.disallowed_updates.is_empty() && self.scaling_nodes.is_empty()
    }
}

/// Every difference between `old` and `new`. Objects are compared by key and
/// arrays by index; anything else is a leaf.
pub fn diff(old: &Value, new: &Value) -> Vec<Change> {
    let mut changes = Vec::new();
    walk(&mut Vec::new(), old, new, &mut changes);
    changes
}

fn walk(path: &mut Vec<String>, old: &Value, new: &Value, changes: &mut Vec<Change>) {
    match (old, new) {
        (Value::Object(from), Value::Object(to)) => {
            for (key, value) in from {
                path.push(key.clone());
                match to.get(key) {
                    Some(other) => walk(path, value, other, changes),
                    None => changes.push(change(ChangeType::Delete, path, Some(value), None)),
                }
                path.pop();
            }
            for (key, value) in to.iter().filter(|(key, _)| !from.contains_key(*key)) {
                path.push(key.clone());
                changes.push(change(ChangeType::Create, path, None, Some(value)));
                path.pop();
            }
        }
        (Value::Array(from), Value::Array(to)) => {
            for index in 0..from.len().max(to.len()) {
                path.push(index.to_string());
                match (from.get(index), to.get(index)) {
                    (Some(value), Some(other)) => walk(path, value, other, changes),
                    (Some(value), None) => {
                        changes.push(change(ChangeType::Delete, path, Some(value), None))
                    }
                    (None, Some(other)) => {
                        changes.push(change(ChangeType::Create, path, None, Some(other)))
                    }
                    (None, None) => {}
                }
                path.pop();
            }
        }
        _ if old != new => changes.push(change(ChangeType::Update, path, Some(old), Some(new))),
        _ => {}
    }
}

fn change(change_type: ChangeType, path: &[String], from: Option<&Value>, to: Option<&Value>) -> Change {
    Change {
        change_type,
        path: path.to_vec(),
        from: from.cloned(),
        to: to.cloned(),
    }
}

#[derive(PartialEq, Eq)]
enum LeafKind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    String,
    Container,
}

fn leaf_kind(value: &Value) -> LeafKind {
    match value {
        Value::Null => LeafKind::Null,
        Value::Bool(_) => LeafKind::Bool,
        Value::Number(number) if number.is_u64() => LeafKind::Uint,
        Value::Number(number) if number.is_i64() => LeafKind::Int,
        Value::Number(_) => LeafKind::Float,
        Value::String(_) => LeafKind::String,
        Value::Array(_) | Value::Object(_) => LeafKind::Container,
    }
}

/// Text form of a leaf; integral floats render without a fraction
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 1e15 => {
                format!("{}", float as i64)
            }
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

/// An update between values of different types whose text is equal, e.g. `1` and `1.0`
fn is_type_mismatch_noop(change: &Change) -> bool {
    match (&change.change_type, &change.from, &change.to) {
        (ChangeType::Update, Some(from), Some(to)) => {
            leaf_kind(from) != leaf_kind(to) && render(from) == render(to)
        }
        _ => false,
    }
}

pub fn matches_pattern(pattern: &[&str], path: &[String]) -> bool {
    pattern.len() <= path.len()
        && pattern
            .iter()
            .zip(path)
            .all(|(element, segment)| *element == "*" || element == segment)
}

fn matches_any(patterns: &[&[&str]], path: &[String]) -> bool {
    patterns.iter().any(|pattern| matches_pattern(pattern, path))
}

fn is_node_scaling(path: &[String]) -> bool {
    path.len() == 2 && path[0] == "nodes" && path[1].parse::<usize>().is_ok()
}

/// Classify every change between `old` and `new`
pub fn find_disallowed_updates(
    old: &Value,
    new: &Value,
    allowed: &[&[&str]],
    ignored: &[&[&str]],
) -> UpdateReport {
    let mut report = UpdateReport::default();

    for change in diff(old, new) {
        if is_type_mismatch_noop(&change) {
            continue;
        }

        let path = &change.path;
        if matches_any(ignored, path) {
            continue;
        }

        let dotted = path.join(".");
        if matches_any(allowed, path) {
            debug!("Allowed update at {}", dotted);
            continue;
        }

        if is_node_scaling(path) {
            report.scaling_nodes.push(dotted);
        } else {
            report.disallowed_updates.push(dotted);
        }
    }

    report
}
