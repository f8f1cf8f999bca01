//! Low-level char-source scanning: whitespace, comments, quoted
//! identifiers, string literals, numeric literals, and operators
//! (§2 "Char source + string scanners").

use super::{Lexeme, Position, Punctuation, TokenKind};
use crate::error::TokenizeError;
use crate::keywords;

pub(super) enum CommentScanOutcome {
    UnterminatedBlock,
}

/// Forward-only scanner over the source text's characters, tracking byte
/// offset plus 1-based line/column.
pub(super) struct CharScanner<'a> {
    chars: Vec<char>,
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    last_comment_line: Option<usize>,
    last_token_end_line: Option<usize>,
    /// SQL Server's `[ ]` identifier escape (§4.5 `Dialect::sqlserver()`)
    /// is only scanned as a quoted identifier when this is set — otherwise
    /// `[`/`]` stay plain punctuation for array indexing (§4.1).
    bracket_identifiers: bool,
}

impl<'a> CharScanner<'a> {
    pub(super) fn new(source: &'a str, bracket_identifiers: bool) -> Self {
        CharScanner {
            chars: source.chars().collect(),
            source,
            pos: 0,
            line: 1,
            column: 1,
            last_comment_line: None,
            last_token_end_line: None,
            bracket_identifiers,
        }
    }

    pub(super) fn offset(&self) -> usize {
        self.pos
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn make_position(&self, start_offset: usize, start_line: usize, start_column: usize) -> Position {
        Position {
            start_offset,
            end_offset: self.pos,
            start_line,
            start_column,
        }
    }

    /// True if the comment(s) just scanned ended on the same source line
    /// that the previous lexeme ended on — the "trailing on the same
    /// line" rule from §4.1.
    pub(super) fn comments_were_same_line(&self) -> bool {
        match (self.last_comment_line, self.last_token_end_line) {
            (Some(cl), Some(tl)) => cl == tl,
            _ => false,
        }
    }

    /// Skip whitespace and fold comments into a flat `Vec<String>`,
    /// dropping empty lines *between* comments while preserving empty
    /// lines *within* a single block comment (§4.1).
    pub(super) fn skip_whitespace_and_comments(
        &mut self,
    ) -> Result<Vec<String>, CommentScanOutcome> {
        let mut comments = Vec::new();
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_at(1) == Some('-') => {
                    let text = self.scan_line_comment();
                    self.last_comment_line = Some(self.line);
                    comments.push(text);
                }
                Some('/') if self.peek_at(1) == Some('*') && self.peek_at(2) != Some('+') => {
                    let comment_start_line = self.line;
                    match self.scan_block_comment() {
                        Some(text) => {
                            self.last_comment_line = Some(self.line);
                            comments.push(text);
                        }
                        None => {
                            let _ = comment_start_line;
                            return Err(CommentScanOutcome::UnterminatedBlock);
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(comments)
    }

    fn scan_line_comment(&mut self) -> String {
        self.advance(); // '-'
        self.advance(); // '-'
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        text.trim().to_string()
    }

    /// Scans a `/* ... */` block comment, honoring nesting. Returns
    /// `None` if the input ends before the comment is closed (fail-soft
    /// per §4.1's fail-fast rule on *unterminated block comments*).
    fn scan_block_comment(&mut self) -> Option<String> {
        self.advance(); // '/'
        self.advance(); // '*'
        let mut depth = 1usize;
        let mut text = String::new();
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                    text.push_str("/*");
                }
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Some(normalize_block_comment(&text));
                    }
                    text.push_str("*/");
                }
                (Some(c), _) => {
                    text.push(c);
                    self.advance();
                }
                (None, _) => return None,
            }
        }
    }

    /// Entry point for scanning one non-comment, non-whitespace lexeme.
    pub(super) fn scan_lexeme(&mut self) -> Result<Option<Lexeme>, TokenizeError> {
        let start_offset = self.pos;
        let start_line = self.line;
        let start_column = self.column;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let mut lexeme = if ch == '/' && self.peek_at(1) == Some('*') && self.peek_at(2) == Some('+') {
            self.scan_hint_block()?
        } else if ch == '\'' {
            self.scan_single_quoted_string('\'', false)?
        } else if (ch == 'e' || ch == 'E') && self.peek_at(1) == Some('\'') {
            self.advance();
            let mut lexeme = self.scan_single_quoted_string('\'', true)?;
            lexeme.value = format!("E'{}'", lexeme.value);
            lexeme
        } else if (ch == 'n' || ch == 'N') && self.peek_at(1) == Some('\'') {
            self.advance();
            self.scan_prefixed_string("N")?
        } else if (ch == 'x' || ch == 'X') && self.peek_at(1) == Some('\'') {
            self.advance();
            self.scan_prefixed_string("X")?
        } else if ch == '$' && (self.peek_at(1) == Some('$') || is_ident_start(self.peek_at(1).unwrap_or(' ')) ) && self.looks_like_dollar_quote() {
            self.scan_dollar_quoted_string()?
        } else if ch == '"' {
            self.scan_quoted_identifier('"', '"', start_line, start_column)?
        } else if ch == '[' && self.bracket_identifiers {
            self.scan_quoted_identifier('[', ']', start_line, start_column)?
        } else if ch.is_ascii_digit() || (ch == '.' && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false)) {
            self.scan_number()
        } else if is_ident_start(ch) {
            self.scan_word()
        } else if ch == ':' && self.peek_at(1).map(is_ident_start).unwrap_or(false) {
            self.scan_named_placeholder(':')
        } else if ch == '@' && self.peek_at(1).map(is_ident_start).unwrap_or(false) {
            self.scan_named_placeholder('@')
        } else if ch == '?' {
            self.advance();
            Lexeme::new(TokenKind::ParameterPlaceholder, "?")
        } else if ch == '$' && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.scan_indexed_placeholder()
        } else if let Some(punct) = punctuation_for(ch) {
            self.advance();
            Lexeme::new(TokenKind::Punctuation(punct), ch.to_string())
        } else if is_operator_char(ch) {
            self.scan_operator()
        } else {
            return Err(TokenizeError::InvalidCharacter {
                ch,
                line: start_line,
                column: start_column,
            });
        };

        lexeme.position = Some(self.make_position(start_offset, start_line, start_column));
        self.last_token_end_line = Some(self.line);
        Ok(Some(lexeme))
    }

    fn scan_hint_block(&mut self) -> Result<Lexeme, TokenizeError> {
        let line = self.line;
        let column = self.column;
        self.advance(); // /
        self.advance(); // *
        self.advance(); // +
        let mut text = String::new();
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    return Ok(Lexeme::new(TokenKind::HintBlock, text.trim().to_string()));
                }
                (Some(c), _) => {
                    text.push(c);
                    self.advance();
                }
                (None, _) => {
                    return Err(TokenizeError::UnterminatedLiteral { line, column });
                }
            }
        }
    }

    fn scan_single_quoted_string(&mut self, quote: char, escaped: bool) -> Result<Lexeme, TokenizeError> {
        let line = self.line;
        let column = self.column;
        self.advance(); // opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_at(1) == Some(quote) {
                        text.push(quote);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(Lexeme::new(TokenKind::StringLiteral, text));
                    }
                }
                Some('\\') if escaped => {
                    self.advance();
                    if let Some(next) = self.advance() {
                        text.push(match next {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            other => other,
                        });
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => {
                    return Err(TokenizeError::UnterminatedLiteral { line, column });
                }
            }
        }
    }

    fn scan_prefixed_string(&mut self, prefix: &str) -> Result<Lexeme, TokenizeError> {
        let mut lexeme = self.scan_single_quoted_string('\'', false)?;
        lexeme.value = format!("{}'{}'", prefix, lexeme.value);
        Ok(lexeme)
    }

    fn looks_like_dollar_quote(&self) -> bool {
        let mut i = 1;
        loop {
            match self.peek_at(i) {
                Some('$') => return true,
                Some(c) if c.is_alphanumeric() || c == '_' => i += 1,
                _ => return false,
            }
        }
    }

    fn scan_dollar_quoted_string(&mut self) -> Result<Lexeme, TokenizeError> {
        let line = self.line;
        let column = self.column;
        let mut tag = String::from("$");
        self.advance(); // opening $
        while let Some(c) = self.peek() {
            if c == '$' {
                tag.push('$');
                self.advance();
                break;
            }
            tag.push(c);
            self.advance();
        }
        let mut text = String::new();
        loop {
            if self.source_matches(&tag) {
                for _ in 0..tag.chars().count() {
                    self.advance();
                }
                return Ok(Lexeme::new(TokenKind::StringLiteral, text));
            }
            match self.advance() {
                Some(c) => text.push(c),
                None => return Err(TokenizeError::UnterminatedLiteral { line, column }),
            }
        }
    }

    fn source_matches(&self, needle: &str) -> bool {
        let needle_chars: Vec<char> = needle.chars().collect();
        if self.pos + needle_chars.len() > self.chars.len() {
            return false;
        }
        self.chars[self.pos..self.pos + needle_chars.len()] == needle_chars[..]
    }

    /// Scans a quoted identifier with `open`/`close` delimiters, which
    /// may differ (SQL Server's `[id]`) or match (ANSI `"id"`). A doubled
    /// closing delimiter escapes itself only in the symmetric case, since
    /// `]]`-doubling isn't part of the bracket-escape rule this crate
    /// implements (§4.1).
    fn scan_quoted_identifier(
        &mut self,
        open: char,
        close: char,
        line: usize,
        column: usize,
    ) -> Result<Lexeme, TokenizeError> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek() {
                Some(c) if c == close => {
                    if open == close && self.peek_at(1) == Some(close) {
                        text.push(close);
                        self.advance();
                        self.advance();
                    } else {
                        self.advance();
                        return Ok(Lexeme::new(TokenKind::QuotedIdentifier, text));
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => return Err(TokenizeError::UnterminatedIdentifier { line, column }),
            }
        }
    }

    fn scan_number(&mut self) -> Lexeme {
        let mut text = String::new();
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            text.push(self.advance().unwrap());
        }
        if self.peek() == Some('.') && self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(true) {
            text.push(self.advance().unwrap());
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                text.push(self.advance().unwrap());
            }
        }
        if matches!(self.peek(), Some('e') | Some('E'))
            && (self.peek_at(1).map(|c| c.is_ascii_digit()).unwrap_or(false)
                || (matches!(self.peek_at(1), Some('+') | Some('-'))
                    && self.peek_at(2).map(|c| c.is_ascii_digit()).unwrap_or(false)))
        {
            text.push(self.advance().unwrap());
            if matches!(self.peek(), Some('+') | Some('-')) {
                text.push(self.advance().unwrap());
            }
            while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
                text.push(self.advance().unwrap());
            }
        }
        Lexeme::new(TokenKind::NumericLiteral, text)
    }

    fn scan_word(&mut self) -> Lexeme {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let upper = text.to_uppercase();
        if keywords::is_keyword(&upper) {
            Lexeme::new(TokenKind::Keyword, upper)
        } else if matches!(upper.as_str(), "TRUE" | "FALSE" | "NULL") {
            Lexeme::new(TokenKind::Literal, upper)
        } else {
            Lexeme::new(TokenKind::Identifier, text)
        }
    }

    fn scan_named_placeholder(&mut self, sigil: char) -> Lexeme {
        self.advance(); // sigil
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Lexeme::new(TokenKind::ParameterPlaceholder, format!("{sigil}{text}"))
    }

    fn scan_indexed_placeholder(&mut self) -> Lexeme {
        self.advance(); // $
        let mut digits = String::new();
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            digits.push(self.advance().unwrap());
        }
        Lexeme::new(TokenKind::ParameterPlaceholder, format!("${digits}"))
    }

    fn scan_operator(&mut self) -> Lexeme {
        const MULTI_CHAR: &[&str] = &[
            "<=", ">=", "<>", "!=", "||", "::", "->>", "->", "~*", "!~*", "!~",
        ];
        for op in MULTI_CHAR {
            if self.source_matches(op) {
                for _ in 0..op.chars().count() {
                    self.advance();
                }
                return Lexeme::new(TokenKind::Operator, *op);
            }
        }
        let ch = self.advance().unwrap();
        Lexeme::new(TokenKind::Operator, ch.to_string())
    }
}

fn normalize_block_comment(text: &str) -> String {
    // Drop blank lines *between* paragraphs are preserved inside a single
    // block comment per §4.1; we only trim the outer whitespace here.
    text.trim().to_string()
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_operator_char(c: char) -> bool {
    matches!(
        c,
        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '~' | '|' | '&' | '^' | ':'
    )
}

fn punctuation_for(c: char) -> Option<Punctuation> {
    Some(match c {
        '.' => Punctuation::Dot,
        ',' => Punctuation::Comma,
        '(' => Punctuation::LParen,
        ')' => Punctuation::RParen,
        '[' => Punctuation::LBracket,
        ']' => Punctuation::RBracket,
        ';' => Punctuation::Semicolon,
        _ => return None,
    })
}
