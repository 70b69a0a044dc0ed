//! Netmap fact-sentence DSL
//!
//! A network description is a plain text document with one sentence per line:
//!
//! ```text
//! # comments start with a hash
//! Router1 is a Router
//! Router1 has a IPAddress of 10.0.0.1
//! Laptop1 connects to Router1 via WiFi
//! ```
//!
//! This crate turns such a document into an ordered list of [`Fact`]s:
//! - [`tokenize`] splits a line using shell-style quoting,
//! - [`sentence`] classifies a token sequence into one fact,
//! - [`scan`] walks a whole document (plus the optional built-in [`legend`]).
//!
//! Assembling facts into a graph lives in `netmap-graph`.

pub mod legend;
pub mod scan;
pub mod sentence;
pub mod tokenize;

pub use legend::{legend_text, LegendPrefix};
pub use scan::{scan_document, Scan, SkippedLine};
pub use sentence::{classify, parse_sentence, Fact, SentenceError, DEFAULT_RELATION};
pub use tokenize::{tokenize, TokenizeError, Tokens};
