//! Position-tracking lexer.
//!
//! Turns SQL source text into an ordered sequence of [`Lexeme`]s with
//! positioned comments already folded into the lexeme they belong to
//! (§4.1). The scanner is a single forward pass over a `Vec<char>`; no
//! backtracking is needed because every lexeme shape is determined by its
//! leading character(s).

mod scan;

use crate::error::TokenizeError;
use log::{debug, trace};

/// Byte-offset-based position, also carrying 1-based line/column for
/// diagnostics (§4.1 "Position tracking").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub start_offset: usize,
    pub end_offset: usize,
    pub start_line: usize,
    pub start_column: usize,
}

/// Whether a comment sequence was scanned before or after the lexeme it
/// attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentPosition {
    Before,
    After,
}

/// A run of comments scanned at a single position relative to a lexeme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedComment {
    pub position: CommentPosition,
    pub comments: Vec<String>,
}

/// Punctuation lexeme subtype (§3.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Punctuation {
    Dot,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
}

/// Closed set of lexeme classifications (§3.1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Keyword,
    Identifier,
    QuotedIdentifier,
    Literal,
    StringLiteral,
    NumericLiteral,
    ParameterPlaceholder,
    Operator,
    Punctuation(Punctuation),
    /// `/*+ ... */` — never a comment, survives into the AST as a hint.
    HintBlock,
    CommentOnly,
}

/// A single scanned token, with its source text, position, and any
/// comments attached lexically before/after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lexeme {
    pub kind: TokenKind,
    pub value: String,
    pub position: Option<Position>,
    pub positioned_comments: Vec<PositionedComment>,
    /// Comments that could not be cleanly classified as before/after
    /// (only ever populated for the synthetic EOF lexeme's trailing
    /// comments); kept distinct from `positioned_comments` per §3.1.
    pub legacy_comments: Vec<String>,
}

impl Lexeme {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Lexeme {
            kind,
            value: value.into(),
            position: None,
            positioned_comments: Vec::new(),
            legacy_comments: Vec::new(),
        }
    }

    pub fn comments_before(&self) -> Vec<&str> {
        self.positioned_comments
            .iter()
            .filter(|c| c.position == CommentPosition::Before)
            .flat_map(|c| c.comments.iter().map(String::as_str))
            .collect()
    }

    pub fn comments_after(&self) -> Vec<&str> {
        self.positioned_comments
            .iter()
            .filter(|c| c.position == CommentPosition::After)
            .flat_map(|c| c.comments.iter().map(String::as_str))
            .collect()
    }

    pub fn is_eof(&self) -> bool {
        self.value.is_empty() && matches!(self.kind, TokenKind::CommentOnly)
    }
}

/// Streams [`Lexeme`]s out of raw SQL text.
///
/// A `Tokenizer` instance is stateless between calls to [`Tokenizer::tokenize`]:
/// all scanning state lives in the local [`scan::CharScanner`], so a single
/// `Tokenizer` can be reused (or shared across threads, §5).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    bracket_identifiers: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Tokenizer { bracket_identifiers: false }
    }

    /// A tokenizer that also scans `[bracket quoted identifiers]` (§4.1,
    /// §4.5's `Dialect::sqlserver()` preset declares `[ ]` as its
    /// identifier escape) instead of only ever treating `[`/`]` as
    /// array-index punctuation.
    pub fn with_bracket_identifiers() -> Self {
        Tokenizer { bracket_identifiers: true }
    }

    /// Scan `sql` into an ordered lexeme sequence, folding comments into
    /// the adjacent lexeme they attach to (§4.1). An unterminated block
    /// comment fails soft (returns lexemes produced so far); an
    /// unterminated string/identifier literal fails hard.
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Lexeme>, TokenizeError> {
        let mut scanner = scan::CharScanner::new(sql, self.bracket_identifiers);
        let mut lexemes: Vec<Lexeme> = Vec::new();
        let mut pending_before: Vec<String> = Vec::new();

        loop {
            let comments = match scanner.skip_whitespace_and_comments() {
                Ok(comments) => comments,
                Err(scan::CommentScanOutcome::UnterminatedBlock) => {
                    debug!("unterminated block comment, returning lexemes scanned so far");
                    break;
                }
            };
            if !comments.is_empty() {
                let attached_as_after = lexemes
                    .last_mut()
                    .map(|last| attach_same_line_after(last, &comments, &scanner))
                    .unwrap_or(false);
                if !attached_as_after {
                    pending_before.extend(comments);
                }
            }

            if scanner.is_at_end() {
                break;
            }

            let before_lexeme_offset = scanner.offset();
            let lexeme = match scanner.scan_lexeme()? {
                Some(lexeme) => lexeme,
                None => break,
            };
            trace!(
                "scanned lexeme {:?} at offset {}",
                lexeme.value,
                before_lexeme_offset
            );

            let mut lexeme = lexeme;
            if !pending_before.is_empty() {
                lexeme.positioned_comments.push(PositionedComment {
                    position: CommentPosition::Before,
                    comments: std::mem::take(&mut pending_before),
                });
            }
            lexemes.push(lexeme);
        }

        Ok(lexemes)
    }
}

/// A comment scanned immediately after a lexeme, before any other
/// non-whitespace token, is folded into that lexeme's `after` slot
/// rather than the next lexeme's `before` slot (§4.1).
fn attach_same_line_after(last: &mut Lexeme, comments: &[String], scanner: &scan::CharScanner) -> bool {
    if !scanner.comments_were_same_line() {
        return false;
    }
    if let Some(slot) = last
        .positioned_comments
        .iter_mut()
        .find(|c| c.position == CommentPosition::After)
    {
        slot.comments.extend(comments.iter().cloned());
    } else {
        last.positioned_comments.push(PositionedComment {
            position: CommentPosition::After,
            comments: comments.to_vec(),
        });
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(lexemes: &[Lexeme]) -> Vec<&str> {
        lexemes.iter().map(|l| l.value.as_str()).collect()
    }

    #[test]
    fn tokenizes_simple_select() {
        let lexemes = Tokenizer::new().tokenize("SELECT a, b FROM t").unwrap();
        assert_eq!(
            values(&lexemes),
            vec!["SELECT", "a", ",", "b", "FROM", "t"]
        );
    }

    #[test]
    fn attaches_leading_comment_to_next_lexeme() {
        let lexemes = Tokenizer::new()
            .tokenize("-- pick id\nSELECT id FROM t")
            .unwrap();
        assert_eq!(lexemes[0].value, "SELECT");
        assert_eq!(lexemes[0].comments_before(), vec!["pick id"]);
    }

    #[test]
    fn attaches_trailing_same_line_comment_to_previous_lexeme() {
        let lexemes = Tokenizer::new()
            .tokenize("SELECT id /* the key */ FROM t")
            .unwrap();
        assert_eq!(lexemes[1].value, "id");
        assert_eq!(lexemes[1].comments_after(), vec!["the key"]);
    }

    #[test]
    fn recognizes_hint_block_distinct_from_comment() {
        let lexemes = Tokenizer::new()
            .tokenize("SELECT /*+ INDEX(t idx) */ a FROM t")
            .unwrap();
        assert!(lexemes
            .iter()
            .any(|l| l.kind == TokenKind::HintBlock && l.value.contains("INDEX")));
    }

    #[test]
    fn scans_dollar_quoted_string() {
        let lexemes = Tokenizer::new()
            .tokenize("SELECT $$it's fine$$")
            .unwrap();
        assert_eq!(lexemes[1].kind, TokenKind::StringLiteral);
        assert_eq!(lexemes[1].value, "it's fine");
    }

    #[test]
    fn unterminated_string_literal_fails_hard() {
        let err = Tokenizer::new().tokenize("SELECT 'abc").unwrap_err();
        assert!(matches!(err, TokenizeError::UnterminatedLiteral { .. }));
    }

    #[test]
    fn brackets_are_plain_punctuation_by_default() {
        let lexemes = Tokenizer::new().tokenize("SELECT [id] FROM [t]").unwrap();
        assert_eq!(
            values(&lexemes),
            vec!["SELECT", "[", "id", "]", "FROM", "[", "t", "]"]
        );
        assert_eq!(lexemes[1].kind, TokenKind::Punctuation(Punctuation::LBracket));
    }

    #[test]
    fn with_bracket_identifiers_scans_quoted_identifiers() {
        let lexemes = Tokenizer::with_bracket_identifiers()
            .tokenize("SELECT [id] FROM [t]")
            .unwrap();
        assert_eq!(values(&lexemes), vec!["SELECT", "id", "FROM", "t"]);
        assert_eq!(lexemes[1].kind, TokenKind::QuotedIdentifier);
        assert_eq!(lexemes[3].kind, TokenKind::QuotedIdentifier);
    }

    #[test]
    fn unterminated_block_comment_returns_partial_lexemes() {
        let lexemes = Tokenizer::new()
            .tokenize("SELECT a /* oops FROM t")
            .unwrap();
        assert_eq!(values(&lexemes), vec!["SELECT", "a"]);
    }
}
