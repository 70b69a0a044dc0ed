//! Netmap graph model.
//!
//! Folds the facts produced by `netmap-dsl` into an entity map
//! ([`assemble`]) and normalizes that map into render rows ([`retree`]).
//!
//! [`NetworkGraph::from_document`] runs the whole pipeline:
//!
//! ```text
//! document ──scan──▶ facts ──assemble──▶ entities ──retree──▶ rows
//! ```
//!
//! Entity order is the order in which names first appear in the fact list,
//! so rows are reproducible for identical input (legend disabled).

pub mod assemble;
pub mod retree;

use netmap_dsl::{scan_document, LegendPrefix, SkippedLine};
use serde::{Deserialize, Serialize};

pub use assemble::{assemble, Entity, EntityMap, MetaValue, Relation};
pub use retree::{retree, Row, UNKNOWN_RELATION};

/// Per-run conversion settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Append the built-in legend, namespaced with this prefix.
    pub legend: Option<LegendPrefix>,
}

impl ConvertOptions {
    /// Legend enabled with a fresh random prefix.
    pub fn with_random_legend() -> Self {
        Self {
            legend: Some(LegendPrefix::random()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkGraph {
    pub entities: EntityMap,
    pub rows: Vec<Row>,
    /// Lines that produced no fact (already logged while scanning).
    pub skipped: Vec<SkippedLine>,
}

impl NetworkGraph {
    pub fn from_document(text: &str, options: &ConvertOptions) -> Self {
        let scan = scan_document(text, options.legend.as_ref());
        let entities = assemble(&scan.facts);
        let rows = retree(&entities);
        tracing::debug!(
            entities = entities.len(),
            rows = rows.len(),
            "assembled network graph"
        );
        Self {
            entities,
            rows,
            skipped: scan.skipped,
        }
    }

    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.get(name)
    }

    /// Stable 0-based position of `name` in the entity map.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entities.get_index_of(name)
    }
}
