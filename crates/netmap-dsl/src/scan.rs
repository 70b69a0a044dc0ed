//! Document scanner.
//!
//! Walks a document line by line, classifies every non-blank, non-comment
//! line, and optionally appends the built-in legend. Unrecognized lines are
//! reported (log + [`SkippedLine`]) and skipped; they never abort the scan.

use serde::{Deserialize, Serialize};

use crate::legend::{legend_text, LegendPrefix};
use crate::sentence::{parse_sentence, Fact, SentenceError};

pub const COMMENT_MARKER: char = '#';

/// A line that produced no fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// 0-based index across the document followed by the legend.
    pub index: usize,
    pub text: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    /// All relation facts in arrival order, then all metadata facts in
    /// arrival order.
    pub facts: Vec<Fact>,
    pub skipped: Vec<SkippedLine>,
}

impl Scan {
    pub fn relations(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter().filter(|f| f.is_relation())
    }

    pub fn metadata(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter().filter(|f| !f.is_relation())
    }
}

/// Blank after trailing whitespace is removed, or `#` in the first column.
fn is_ignored(raw: &str) -> bool {
    let line = raw.trim_end();
    line.is_empty() || line.starts_with(COMMENT_MARKER)
}

#[derive(Default)]
struct Scanner {
    index: usize,
    relations: Vec<Fact>,
    metadata: Vec<Fact>,
    skipped: Vec<SkippedLine>,
}

impl Scanner {
    fn feed(&mut self, text: &str) {
        for raw in text.lines() {
            let index = self.index;
            self.index += 1;

            if is_ignored(raw) {
                continue;
            }
            let line = raw.trim();

            match parse_sentence(line) {
                Ok(fact) if fact.is_relation() => self.relations.push(fact),
                Ok(fact) => self.metadata.push(fact),
                Err(err) => self.skip(index, line, &err),
            }
        }
    }

    fn skip(&mut self, index: usize, line: &str, err: &SentenceError) {
        tracing::warn!(line = index, text = %line, reason = %err, "line skipped");
        self.skipped.push(SkippedLine {
            index,
            text: line.to_string(),
            reason: err.to_string(),
        });
    }

    fn finish(self) -> Scan {
        let mut facts = self.relations;
        facts.extend(self.metadata);
        Scan {
            facts,
            skipped: self.skipped,
        }
    }
}

/// Scan `text` (and the legend, when a prefix is given) into facts.
pub fn scan_document(text: &str, legend: Option<&LegendPrefix>) -> Scan {
    let mut scanner = Scanner::default();
    scanner.feed(text);
    if let Some(prefix) = legend {
        scanner.feed(&legend_text(prefix));
    }
    let scan = scanner.finish();
    tracing::debug!(
        facts = scan.facts.len(),
        skipped = scan.skipped.len(),
        legend = legend.is_some(),
        "scanned document"
    );
    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_come_before_metadata() {
        let scan = scan_document(
            "A is a Router\nB connects to A\nA has a IP of 1.2.3.4\nC is connected to B via wifi\n",
            None,
        );
        assert_eq!(
            scan.facts,
            vec![
                Fact::relation("B", "A", "ethernet"),
                Fact::relation("C", "B", "wifi"),
                Fact::metadata("A", "Type", "Router"),
                Fact::metadata("A", "IP", "1.2.3.4"),
            ]
        );
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn blank_and_comment_lines_are_ignored_silently() {
        let scan = scan_document("\n   \n# A is a Router\n#\nB is a PC\t \n", None);
        assert_eq!(scan.facts, vec![Fact::metadata("B", "Type", "PC")]);
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn only_a_first_column_hash_starts_a_comment() {
        let scan = scan_document("  #pc1 is a PC\n\t# not a sentence\n", None);
        assert_eq!(scan.facts, vec![Fact::metadata("#pc1", "Type", "PC")]);
        assert_eq!(scan.skipped.len(), 1);
        assert_eq!(scan.skipped[0].index, 1);
        assert_eq!(scan.skipped[0].text, "# not a sentence");
    }

    #[test]
    fn unrecognized_lines_are_reported_with_their_index() {
        let scan = scan_document("A is a PC\n\nnonsense here\nB is a \"PC\n", None);
        assert_eq!(scan.facts.len(), 1);
        assert_eq!(scan.skipped.len(), 2);
        assert_eq!(scan.skipped[0].index, 2);
        assert_eq!(scan.skipped[0].text, "nonsense here");
        assert_eq!(scan.skipped[1].index, 3);
        assert!(scan.skipped[1].reason.contains("quote"));
    }

    #[test]
    fn legend_is_appended_after_document_facts() {
        let prefix = LegendPrefix::new("abc123");
        let scan = scan_document("User:1 connects to User:2\nUser:1 is a PC", Some(&prefix));

        let first_rel = scan.relations().next().expect("relation");
        assert_eq!(first_rel, &Fact::relation("User:1", "User:2", "ethernet"));
        let first_meta = scan.metadata().next().expect("metadata");
        assert_eq!(first_meta, &Fact::metadata("User:1", "Type", "PC"));

        assert!(scan
            .facts
            .iter()
            .flat_map(Fact::names)
            .any(|n| n == "Legend:abc123LegendLoc"));
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn line_index_continues_across_fed_documents() {
        let mut scanner = Scanner::default();
        scanner.feed("first\n\n# comment");
        scanner.feed("A is a PC\nsecond");
        let scan = scanner.finish();
        assert_eq!(scan.skipped.len(), 2);
        assert_eq!(scan.skipped[0].index, 0);
        assert_eq!(scan.skipped[1].index, 4);
    }
}
