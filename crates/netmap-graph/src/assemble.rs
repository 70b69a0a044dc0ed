//! Graph assembler: ordered facts → entity map.
//!
//! Merge rules:
//! - every name a fact mentions gets an [`Entity`], created on first sight;
//! - a repeated attribute is promoted from a single value to a list holding
//!   every occurrence in arrival order (no dedup);
//! - a relation is recorded on its source only; the target merely exists.

use indexmap::IndexMap;
use netmap_dsl::Fact;
use serde::{Deserialize, Serialize};

/// Entities keyed by name, in order of first appearance.
pub type EntityMap = IndexMap<String, Entity>;

/// Attribute value: a single string until the attribute repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    One(String),
    Many(Vec<String>),
}

impl MetaValue {
    /// Append another occurrence, promoting a single value to a list.
    pub fn push(&mut self, value: String) {
        match self {
            MetaValue::One(first) => {
                let first = std::mem::take(first);
                *self = MetaValue::Many(vec![first, value]);
            }
            MetaValue::Many(values) => values.push(value),
        }
    }

    /// First declared value.
    pub fn first(&self) -> &str {
        match self {
            MetaValue::One(v) => v,
            MetaValue::Many(values) => values.first().map(String::as_str).unwrap_or(""),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            MetaValue::One(v) => std::slice::from_ref(v),
            MetaValue::Many(values) => values,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, MetaValue::Many(_))
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::One(value.to_string())
    }
}

/// Outgoing, kind-labelled edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub kind: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub metadata: IndexMap<String, MetaValue>,
    pub relations: Vec<Relation>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: IndexMap::new(),
            relations: Vec::new(),
        }
    }

    pub fn attr(&self, attribute: &str) -> Option<&MetaValue> {
        self.metadata.get(attribute)
    }

    pub fn set_attr(&mut self, attribute: &str, value: &str) {
        match self.metadata.get_mut(attribute) {
            Some(existing) => existing.push(value.to_string()),
            None => {
                self.metadata
                    .insert(attribute.to_string(), MetaValue::from(value));
            }
        }
    }
}

fn ensure<'a>(entities: &'a mut EntityMap, name: &str) -> &'a mut Entity {
    entities
        .entry(name.to_string())
        .or_insert_with(|| Entity::new(name))
}

/// Fold `facts` into an entity map in a single pass.
pub fn assemble(facts: &[Fact]) -> EntityMap {
    let mut entities = EntityMap::new();
    for fact in facts {
        match fact {
            Fact::Metadata {
                entity,
                attribute,
                value,
            } => ensure(&mut entities, entity).set_attr(attribute, value),
            Fact::Relation { from, to, kind } => {
                ensure(&mut entities, from).relations.push(Relation {
                    kind: kind.clone(),
                    to: to.clone(),
                });
                ensure(&mut entities, to);
            }
        }
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_attributes_promote_to_lists_in_order() {
        let entities = assemble(&[
            Fact::metadata("X", "Role", "admin"),
            Fact::metadata("X", "Role", "guest"),
            Fact::metadata("X", "Role", "admin"),
            Fact::metadata("X", "Type", "PC"),
        ]);
        let x = &entities["X"];
        assert_eq!(
            x.attr("Role"),
            Some(&MetaValue::Many(vec!["admin".into(), "guest".into(), "admin".into()]))
        );
        assert_eq!(x.attr("Type"), Some(&MetaValue::One("PC".into())));
    }

    #[test]
    fn relation_creates_target_without_reciprocal_edge() {
        let entities = assemble(&[Fact::relation("A", "B", "wifi")]);
        assert_eq!(entities.len(), 2);
        assert_eq!(
            entities["A"].relations,
            vec![Relation {
                kind: "wifi".into(),
                to: "B".into()
            }]
        );
        assert!(entities["B"].relations.is_empty());
        assert!(entities["B"].metadata.is_empty());
    }

    #[test]
    fn entity_order_is_first_appearance() {
        let entities = assemble(&[
            Fact::relation("C", "A", "ethernet"),
            Fact::metadata("B", "Type", "PC"),
            Fact::metadata("A", "Type", "Router"),
            Fact::relation("B", "C", "wifi"),
        ]);
        let names: Vec<&str> = entities.keys().map(String::as_str).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }

    #[test]
    fn attribute_names_are_case_sensitive() {
        let entities = assemble(&[
            Fact::metadata("X", "type", "a"),
            Fact::metadata("X", "Type", "b"),
        ]);
        assert_eq!(entities["X"].metadata.len(), 2);
    }

    #[test]
    fn meta_value_accessors() {
        let mut v = MetaValue::from("one");
        assert_eq!(v.first(), "one");
        assert_eq!(v.values(), ["one"]);
        assert!(!v.is_many());
        v.push("two".into());
        assert_eq!(v.first(), "one");
        assert_eq!(v.values(), ["one", "two"]);
        assert!(v.is_many());
    }

    #[test]
    fn meta_value_serializes_as_string_or_list() {
        let one = serde_json::to_string(&MetaValue::from("a")).unwrap();
        assert_eq!(one, "\"a\"");
        let many = serde_json::to_string(&MetaValue::Many(vec!["a".into(), "b".into()])).unwrap();
        assert_eq!(many, "[\"a\",\"b\"]");
    }
}
