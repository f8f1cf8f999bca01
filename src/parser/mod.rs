//! Recursive-descent parser family (§4.2).
//!
//! Every sub-parser is a free function or small helper on [`Cursor`]
//! rather than a parser-per-production object graph: the teacher crate's
//! `DialectDisplay` trait keeps dispatch flat (one method, matched on
//! node kind) and the parser mirrors that flatness — no parser object
//! implements a shared trait, they just share `Cursor`.

mod ddl;
mod dml;
mod expr;
mod select;

pub use select::parse_select_query;

use crate::ast::statement::Statement;
use crate::error::ParseError;
use crate::keywords;
use crate::tokenizer::{Lexeme, Position, Punctuation, TokenKind, Tokenizer};

/// A read-only cursor over a lexeme slice. All parsers borrow one of
/// these rather than owning the lexeme vector, so `parseFromLexeme`
/// (here: `parse_from`) composes without copying.
pub struct Cursor<'a> {
    lexemes: &'a [Lexeme],
    pub pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(lexemes: &'a [Lexeme], pos: usize) -> Self {
        Cursor { lexemes, pos }
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    pub fn peek(&self) -> Option<&'a Lexeme> {
        self.lexemes.get(self.pos)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&'a Lexeme> {
        self.lexemes.get(self.pos + offset)
    }

    pub fn advance(&mut self) -> Option<&'a Lexeme> {
        let lexeme = self.lexemes.get(self.pos);
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn word_at(&self, offset: usize) -> Option<&'a str> {
        self.peek_at(offset).and_then(|l| match l.kind {
            TokenKind::Keyword | TokenKind::Identifier => Some(l.value.as_str()),
            _ => None,
        })
    }

    /// True if the upcoming lexeme is the keyword `word` (case-insensitive).
    pub fn at_keyword(&self, word: &str) -> bool {
        self.word_at(0)
            .map(|w| w.eq_ignore_ascii_case(word))
            .unwrap_or(false)
    }

    pub fn at_keyword_offset(&self, offset: usize, word: &str) -> bool {
        self.word_at(offset)
            .map(|w| w.eq_ignore_ascii_case(word))
            .unwrap_or(false)
    }

    pub fn at_any_keyword(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.at_keyword(w))
    }

    pub fn at_punct(&self, p: Punctuation) -> bool {
        matches!(&self.peek().map(|l| &l.kind), Some(TokenKind::Punctuation(k)) if *k == p)
    }

    /// Consume the keyword `word` or fail with a `ParseError`.
    pub fn expect_keyword(&mut self, word: &str) -> Result<&'a Lexeme, ParseError> {
        if self.at_keyword(word) {
            Ok(self.advance().unwrap())
        } else {
            Err(self.error(format!("Expected `{}`", word.to_uppercase())))
        }
    }

    /// Consume the keyword `word` if present, report whether it matched.
    pub fn eat_keyword(&mut self, word: &str) -> bool {
        if self.at_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn expect_punct(&mut self, p: Punctuation, label: &str) -> Result<(), ParseError> {
        if self.at_punct(p) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!("Expected `{}`", label)))
        }
    }

    pub fn eat_punct(&mut self, p: Punctuation) -> bool {
        if self.at_punct(p) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse a (possibly dotted) identifier path, rejecting reserved
    /// keywords per §4.2 "Identifier rules".
    pub fn expect_name(&mut self) -> Result<String, ParseError> {
        let lexeme = self
            .peek()
            .ok_or_else(|| self.error("Expected identifier"))?;
        match &lexeme.kind {
            TokenKind::QuotedIdentifier => {
                let value = lexeme.value.clone();
                self.advance();
                Ok(value)
            }
            TokenKind::Identifier => {
                let value = lexeme.value.clone();
                self.advance();
                Ok(value)
            }
            TokenKind::Keyword => {
                let upper = lexeme.value.to_uppercase();
                if keywords::is_non_reserved(&upper) {
                    let value = lexeme.value.clone();
                    self.advance();
                    Ok(value)
                } else {
                    Err(self.error(format!("`{}` is a reserved keyword and cannot be used as an identifier", lexeme.value)))
                }
            }
            _ => Err(self.error(format!("Expected identifier, found `{}`", lexeme.value))),
        }
    }

    /// Build a `ParseError` anchored at the current position, with a
    /// ~5-lexeme context window (§4.6/§7).
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        let index = self.pos.min(self.lexemes.len().saturating_sub(1));
        ParseError::new(message.into()).with_context(index, self.lexemes)
    }

    pub fn position(&self) -> Option<Position> {
        self.peek().and_then(|l| l.position.clone())
    }

    /// Comments lexically `before` the upcoming lexeme, consumed without
    /// advancing the cursor.
    pub fn leading_comments(&self) -> Vec<String> {
        self.peek()
            .map(|l| l.comments_before().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn trailing_comments_of_last(&self) -> Vec<String> {
        if self.pos == 0 {
            return Vec::new();
        }
        self.lexemes[self.pos - 1]
            .comments_after()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

/// Tokenizes `text` then parses a single statement, asserting no
/// unparsed lexemes remain (`parse(text)` mode, §4.2).
pub fn parse_statement(text: &str) -> Result<Statement, ParseError> {
    let lexemes = Tokenizer::new()
        .tokenize(text)
        .map_err(|e| ParseError::new(e.to_string()))?;
    let mut cursor = Cursor::new(&lexemes, 0);
    let header = cursor.leading_comments();
    let mut statement = parse_statement_from(&mut cursor)?;
    if !header.is_empty() {
        if let Some(slots) = statement_comment_slots_mut(&mut statement) {
            slots.set_header(header);
        }
    }
    cursor.eat_punct(Punctuation::Semicolon);
    if !cursor.is_eof() {
        return Err(cursor.error("Unparsed lexeme remains"));
    }
    Ok(statement)
}

/// Semicolon-separated statements; empty statements are skipped while
/// their leading comments are carried forward to the next statement
/// (§6.1 `parseStatements`).
pub fn parse_statements(text: &str) -> Result<Vec<Statement>, ParseError> {
    let lexemes = Tokenizer::new()
        .tokenize(text)
        .map_err(|e| ParseError::new(e.to_string()))?;
    let mut cursor = Cursor::new(&lexemes, 0);
    let mut statements = Vec::new();
    let mut carried_comments: Vec<String> = Vec::new();

    while !cursor.is_eof() {
        carried_comments.extend(cursor.leading_comments());
        if cursor.eat_punct(Punctuation::Semicolon) {
            continue;
        }
        let header = std::mem::take(&mut carried_comments);
        let mut statement = parse_statement_from(&mut cursor).map_err(|e| {
            ParseError::new(format!("statement {}: {}", statements.len(), e.message))
                .with_context(e.token_index.unwrap_or(cursor.pos), &lexemes)
        })?;
        if !header.is_empty() {
            if let Some(slots) = statement_comment_slots_mut(&mut statement) {
                slots.set_header(header);
            }
        }
        statements.push(statement);
        cursor.eat_punct(Punctuation::Semicolon);
    }
    Ok(statements)
}

/// `analyze(text)` (§4.2): never throws, reports structured success/
/// failure for interactive tooling.
pub struct AnalyzeOutcome {
    pub success: bool,
    pub query: Option<crate::ast::statement::SelectQuery>,
    pub error: Option<ParseError>,
    pub error_position: Option<Position>,
    pub remaining_tokens: Vec<Lexeme>,
}

pub fn analyze(text: &str) -> AnalyzeOutcome {
    let lexemes = match Tokenizer::new().tokenize(text) {
        Ok(lexemes) => lexemes,
        Err(e) => {
            let err = ParseError::new(e.to_string());
            return AnalyzeOutcome {
                success: false,
                query: None,
                error: Some(err),
                error_position: None,
                remaining_tokens: Vec::new(),
            };
        }
    };
    let mut cursor = Cursor::new(&lexemes, 0);
    match select::parse_select_query(&mut cursor) {
        Ok(query) => AnalyzeOutcome {
            success: true,
            query: Some(query),
            error: None,
            error_position: None,
            remaining_tokens: lexemes[cursor.pos..].to_vec(),
        },
        Err(e) => {
            let position = e.position.clone();
            AnalyzeOutcome {
                success: false,
                query: None,
                error: Some(e),
                error_position: position,
                remaining_tokens: lexemes[cursor.pos..].to_vec(),
            }
        }
    }
}

pub(crate) fn parse_statement_from(cursor: &mut Cursor) -> Result<Statement, ParseError> {
    if cursor.at_any_keyword(&["SELECT", "WITH", "VALUES"]) {
        return Ok(Statement::Select(select::parse_select_query(cursor)?));
    }
    if cursor.at_keyword("INSERT") {
        return Ok(Statement::Insert(Box::new(dml::parse_insert(cursor)?)));
    }
    if cursor.at_keyword("UPDATE") {
        return Ok(Statement::Update(Box::new(dml::parse_update(cursor)?)));
    }
    if cursor.at_keyword("DELETE") {
        return Ok(Statement::Delete(Box::new(dml::parse_delete(cursor)?)));
    }
    if cursor.at_keyword("MERGE") {
        return Ok(Statement::Merge(Box::new(dml::parse_merge(cursor)?)));
    }
    if cursor.at_keyword("CREATE") || cursor.at_keyword("DROP") || cursor.at_keyword("ALTER") {
        return ddl::parse_ddl(cursor);
    }
    if cursor.at_keyword("COMMENT") {
        return Ok(Statement::CommentOn(Box::new(ddl::parse_comment_on(cursor)?)));
    }
    if cursor.at_keyword("ANALYZE") {
        return Ok(Statement::Analyze(Box::new(ddl::parse_analyze(cursor)?)));
    }
    Err(cursor.error("Expected a statement"))
}

fn statement_comment_slots_mut(statement: &mut Statement) -> Option<&mut crate::ast::comment::CommentSlots> {
    use crate::ast::comment::PositionedCommentCarrier;
    match statement {
        Statement::Select(q) => Some(q.comment_slots_mut()),
        Statement::Insert(q) => Some(q.comment_slots_mut()),
        Statement::Update(q) => Some(q.comment_slots_mut()),
        Statement::Delete(q) => Some(q.comment_slots_mut()),
        Statement::Merge(q) => Some(q.comment_slots_mut()),
        Statement::CreateTable(q) => Some(q.comment_slots_mut()),
        _ => None,
    }
}
