//! Tree normalizer: entity map → render rows.
//!
//! Every entity surfaces in at least one row. An entity without outgoing
//! relations gets a single `unknown` self-loop.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::assemble::{EntityMap, Relation};

/// Relation kind of synthesized self-loops.
pub const UNKNOWN_RELATION: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Row {
    pub from: String,
    pub to: String,
    pub kind: String,
}

impl Row {
    pub fn new(from: impl Into<String>, to: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: kind.into(),
        }
    }

    fn unknown_loop(name: &str) -> Self {
        Self::new(name, name, UNKNOWN_RELATION)
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

pub fn retree(entities: &EntityMap) -> Vec<Row> {
    let mut rows = Vec::new();

    for (name, entity) in entities {
        if entity.relations.is_empty() {
            rows.push(Row::unknown_loop(name));
            continue;
        }
        rows.extend(entity.relations.iter().map(|Relation { kind, to }| Row {
            from: name.clone(),
            to: to.clone(),
            kind: kind.clone(),
        }));
    }

    // Coverage check. The pass above already emits a row for every entity;
    // anything caught here means a caller handed us an inconsistent map.
    let covered: HashSet<&str> = rows
        .iter()
        .flat_map(|r| [r.from.as_str(), r.to.as_str()])
        .collect();
    let missing: Vec<&String> = entities
        .keys()
        .filter(|name| !covered.contains(name.as_str()))
        .collect();
    for name in missing {
        tracing::warn!(entity = %name, "entity missing from rows; adding unknown self-loop");
        rows.push(Row::unknown_loop(name));
    }

    rows
}
