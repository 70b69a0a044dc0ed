//! Sentence classifier: one tokenized line → one [`Fact`].
//!
//! Recognized shapes, tried in this order (keywords are case-insensitive):
//!
//! | sentence | fact |
//! |---|---|
//! | `N has a\|an ATTR of VALUE` | metadata `ATTR = VALUE` |
//! | `N is a VALUE` | metadata `Type = VALUE` |
//! | `A is connected to B via KIND` | relation `A -KIND-> B` |
//! | `A is connected to B` | relation `A -ethernet-> B` |
//! | `A connects to B via KIND` | relation `A -KIND-> B` |
//! | `A connects to B` | relation `A -ethernet-> B` |
//!
//! Keywords sit at fixed token positions; trailing tokens are ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tokenize::{tokenize, TokenizeError, Tokens};

/// Relation kind used when a connection sentence has no `via` clause.
pub const DEFAULT_RELATION: &str = "ethernet";

/// Attribute name assigned by `N is a VALUE`.
pub const TYPE_ATTRIBUTE: &str = "Type";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fact {
    Metadata {
        entity: String,
        attribute: String,
        value: String,
    },
    Relation {
        from: String,
        to: String,
        #[serde(rename = "relation")]
        kind: String,
    },
}

impl Fact {
    pub fn metadata(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Fact::Metadata {
            entity: entity.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn relation(from: impl Into<String>, to: impl Into<String>, kind: impl Into<String>) -> Self {
        Fact::Relation {
            from: from.into(),
            to: to.into(),
            kind: kind.into(),
        }
    }

    pub fn is_relation(&self) -> bool {
        matches!(self, Fact::Relation { .. })
    }

    /// Every entity name this fact mentions, subject first.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let (a, b) = match self {
            Fact::Metadata { entity, .. } => (entity.as_str(), None),
            Fact::Relation { from, to, .. } => (from.as_str(), Some(to.as_str())),
        };
        std::iter::once(a).chain(b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SentenceError {
    #[error("malformed quoting: {0}")]
    Tokenize(#[from] TokenizeError),
    #[error("unrecognized sentence")]
    Unrecognized,
}

fn name(tokens: &Tokens, index: usize) -> String {
    tokens.get(index).trim().to_string()
}

fn has_attribute(t: &Tokens) -> Option<Fact> {
    (t.is(1, "has") && (t.is(2, "a") || t.is(2, "an")) && t.is(4, "of"))
        .then(|| Fact::metadata(name(t, 0), t.get(3), t.get(5)))
}

fn is_a(t: &Tokens) -> Option<Fact> {
    (t.is(1, "is") && t.is(2, "a")).then(|| Fact::metadata(name(t, 0), TYPE_ATTRIBUTE, t.get(3)))
}

fn is_connected_to_via(t: &Tokens) -> Option<Fact> {
    (t.is(1, "is") && t.is(2, "connected") && t.is(3, "to") && t.is(5, "via"))
        .then(|| Fact::relation(name(t, 0), name(t, 4), t.get(6)))
}

fn is_connected_to(t: &Tokens) -> Option<Fact> {
    (t.is(1, "is") && t.is(2, "connected") && t.is(3, "to"))
        .then(|| Fact::relation(name(t, 0), name(t, 4), DEFAULT_RELATION))
}

fn connects_to_via(t: &Tokens) -> Option<Fact> {
    (t.is(1, "connects") && t.is(2, "to") && t.is(4, "via"))
        .then(|| Fact::relation(name(t, 0), name(t, 3), t.get(5)))
}

fn connects_to(t: &Tokens) -> Option<Fact> {
    (t.is(1, "connects") && t.is(2, "to"))
        .then(|| Fact::relation(name(t, 0), name(t, 3), DEFAULT_RELATION))
}

/// Sentence patterns in priority order; the first match wins.
const PATTERNS: &[fn(&Tokens) -> Option<Fact>] = &[
    has_attribute,
    is_a,
    is_connected_to_via,
    is_connected_to,
    connects_to_via,
    connects_to,
];

pub fn classify(tokens: &Tokens) -> Option<Fact> {
    PATTERNS.iter().find_map(|pattern| pattern(tokens))
}

pub fn parse_sentence(line: &str) -> Result<Fact, SentenceError> {
    let tokens = tokenize(line)?;
    classify(&tokens).ok_or(SentenceError::Unrecognized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Fact {
        parse_sentence(line).expect("parse sentence")
    }

    #[test]
    fn has_a_attribute_of_value() {
        assert_eq!(
            parse("Router1 has a IPAddress of 10.0.0.1"),
            Fact::metadata("Router1", "IPAddress", "10.0.0.1")
        );
        assert_eq!(
            parse("Router1 HAS AN Owner OF 'Net Ops'"),
            Fact::metadata("Router1", "Owner", "Net Ops")
        );
    }

    #[test]
    fn is_a_sets_type() {
        assert_eq!(parse("Router1 is a Router"), Fact::metadata("Router1", "Type", "Router"));
        assert_eq!(parse("x IS A switch"), Fact::metadata("x", "Type", "switch"));
    }

    #[test]
    fn missing_value_reads_as_empty() {
        assert_eq!(parse("Router1 is a"), Fact::metadata("Router1", "Type", ""));
    }

    #[test]
    fn connection_forms() {
        assert_eq!(parse("A is connected to B"), Fact::relation("A", "B", "ethernet"));
        assert_eq!(parse("A is connected to B via WiFi"), Fact::relation("A", "B", "WiFi"));
        assert_eq!(parse("A connects to B"), Fact::relation("A", "B", "ethernet"));
        assert_eq!(parse("A Connects To B VIA telnet"), Fact::relation("A", "B", "telnet"));
    }

    #[test]
    fn names_are_case_sensitive_and_quoted_names_are_trimmed() {
        assert_eq!(
            parse(r#"" Site:HQ " is connected to Router:r1"#),
            Fact::relation("Site:HQ", "Router:r1", "ethernet")
        );
    }

    #[test]
    fn has_pattern_wins_over_is_pattern() {
        // Token 1 is `has`, so the `is a` rule never gets a chance.
        assert_eq!(
            parse("A has a Type of is"),
            Fact::metadata("A", "Type", "is")
        );
    }

    #[test]
    fn unrecognized_and_malformed_lines() {
        assert_eq!(parse_sentence("hello world"), Err(SentenceError::Unrecognized));
        assert_eq!(parse_sentence("A has the IP of x"), Err(SentenceError::Unrecognized));
        assert!(matches!(
            parse_sentence("A is a \"Router"),
            Err(SentenceError::Tokenize(TokenizeError::UnterminatedQuote { quote: '"' }))
        ));
    }

    #[test]
    fn fact_names_lists_subject_first() {
        let f = Fact::relation("A", "B", "wifi");
        assert_eq!(f.names().collect::<Vec<_>>(), ["A", "B"]);
        let m = Fact::metadata("C", "Type", "PC");
        assert_eq!(m.names().collect::<Vec<_>>(), ["C"]);
    }
}
