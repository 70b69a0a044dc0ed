//! Shell-style line tokenizer.
//!
//! Splits one line into words following POSIX shell quoting:
//! - whitespace separates words outside quotes,
//! - `'single quotes'` keep their contents verbatim,
//! - `"double quotes"` honour `\\`, `\"`, `\$`, `` \` `` and `\<newline>`;
//!   any other backslash is kept as-is,
//! - outside quotes a backslash escapes the next character,
//! - adjacent segments join into one word (`a"b c"d` is `ab cd`).
//!
//! `#` is an ordinary character here: comment lines are dropped by the
//! scanner before they ever reach the tokenizer.

use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while},
    character::complete::{anychar, char as pchar, one_of},
    combinator::map,
    multi::{fold_many0, fold_many1},
    sequence::{delimited, pair, preceded},
    IResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated {quote} quote")]
    UnterminatedQuote { quote: char },
    #[error("line ends with a dangling escape character")]
    TrailingEscape,
}

/// Token sequence for a single line.
///
/// Indexing past the end yields `""` instead of panicking, which lets the
/// sentence classifier compare keyword positions without bounds checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tokens(Vec<String>);

impl Tokens {
    pub fn new(words: Vec<String>) -> Self {
        Self(words)
    }

    pub fn get(&self, index: usize) -> &str {
        self.0.get(index).map(String::as_str).unwrap_or("")
    }

    /// Case-insensitive keyword comparison at `index`.
    pub fn is(&self, index: usize, keyword: &str) -> bool {
        self.get(index).eq_ignore_ascii_case(keyword)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn single_quoted(input: &str) -> IResult<&str, String> {
    map(
        delimited(pchar('\''), take_while(|c: char| c != '\''), pchar('\'')),
        str::to_string,
    )(input)
}

fn double_quoted(input: &str) -> IResult<&str, String> {
    let piece = alt((
        map(is_not("\\\""), str::to_string),
        map(preceded(pchar('\\'), one_of("\\\"$`")), String::from),
        map(preceded(pchar('\\'), pchar('\n')), |_| String::new()),
        map(pair(pchar('\\'), anychar), |(b, c)| format!("{b}{c}")),
    ));
    delimited(
        pchar('"'),
        fold_many0(piece, String::new, |mut acc, s| {
            acc.push_str(&s);
            acc
        }),
        pchar('"'),
    )(input)
}

fn unquoted(input: &str) -> IResult<&str, String> {
    alt((
        map(is_not(" \t\r\n'\"\\"), str::to_string),
        map(preceded(pchar('\\'), anychar), String::from),
    ))(input)
}

fn word(input: &str) -> IResult<&str, String> {
    fold_many1(
        alt((single_quoted, double_quoted, unquoted)),
        String::new,
        |mut acc, s| {
            acc.push_str(&s);
            acc
        },
    )(input)
}

/// Classify the position where the word parser got stuck.
fn stuck_at(rest: &str) -> TokenizeError {
    match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => TokenizeError::UnterminatedQuote { quote },
        _ => TokenizeError::TrailingEscape,
    }
}

pub fn tokenize(line: &str) -> Result<Tokens, TokenizeError> {
    let mut words = Vec::new();
    let mut rest = line.trim_start_matches(is_blank);

    while !rest.is_empty() {
        match word(rest) {
            Ok((after, w)) if after.is_empty() || after.starts_with(is_blank) => {
                words.push(w);
                rest = after.trim_start_matches(is_blank);
            }
            Ok((after, _)) => return Err(stuck_at(after)),
            Err(_) => return Err(stuck_at(rest)),
        }
    }

    Ok(Tokens(words))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<String> {
        tokenize(line).expect("tokenize").into_inner()
    }

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(words("  Router1   is\ta Router "), ["Router1", "is", "a", "Router"]);
    }

    #[test]
    fn quoted_strings_become_one_token() {
        assert_eq!(
            words(r#"X has a Blurb of "two words" 'and more'"#),
            ["X", "has", "a", "Blurb", "of", "two words", "and more"]
        );
    }

    #[test]
    fn adjacent_segments_join() {
        assert_eq!(words(r#"a"b c"d"#), ["ab cd"]);
        assert_eq!(words("''"), [""]);
    }

    #[test]
    fn double_quote_escapes() {
        assert_eq!(words(r#""say \"hi\"""#), [r#"say "hi""#]);
        // Unknown escapes stay literal inside double quotes.
        assert_eq!(words(r#""line\nbreak""#), [r"line\nbreak"]);
        assert_eq!(words(r#"'no \" escapes'"#), [r#"no \" escapes"#]);
        assert_eq!(words(r#""cost \$5 \`id\` a\\b""#), ["cost $5 `id` a\\b"]);
        assert_eq!(words("\"one\\\ntwo\" three"), ["onetwo", "three"]);
    }

    #[test]
    fn backslash_escapes_outside_quotes() {
        assert_eq!(words(r"two\ words"), ["two words"]);
    }

    #[test]
    fn hash_is_not_a_comment() {
        assert_eq!(words("A has a Tag of #1"), ["A", "has", "a", "Tag", "of", "#1"]);
    }

    #[test]
    fn malformed_quoting_is_an_error() {
        assert_eq!(
            tokenize(r#"X has a Blurb of "oops"#),
            Err(TokenizeError::UnterminatedQuote { quote: '"' })
        );
        assert_eq!(
            tokenize("X is a 'Router"),
            Err(TokenizeError::UnterminatedQuote { quote: '\'' })
        );
        assert_eq!(tokenize("X is a Router\\"), Err(TokenizeError::TrailingEscape));
    }

    #[test]
    fn out_of_range_access_is_empty() {
        let tokens = tokenize("A connects to B").unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens.get(3), "B");
        assert_eq!(tokens.get(4), "");
        assert_eq!(tokens.get(100), "");
        assert!(tokens.is(1, "CONNECTS"));
    }

    #[test]
    fn blank_line_has_no_tokens() {
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
