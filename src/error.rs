//! Crate-wide error taxonomy.
//!
//! Each failure domain (tokenizer, parser, identifier rules, AST
//! transformers, printer configuration) gets its own `thiserror` enum so
//! callers can match on the stage that failed; [`SqlKitError`] unions them
//! for facade entry points that span more than one stage.

use crate::tokenizer::{Lexeme, Position};
use thiserror::Error;

/// Failures raised while scanning raw SQL text into lexemes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("unterminated string literal starting at line {line}, column {column}")]
    UnterminatedLiteral { line: usize, column: usize },
    #[error("unterminated quoted identifier starting at line {line}, column {column}")]
    UnterminatedIdentifier { line: usize, column: usize },
    #[error("invalid character {ch:?} at line {line}, column {column}")]
    InvalidCharacter { ch: char, line: usize, column: usize },
}

/// Failures raised by the recursive-descent parser family.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub token_index: Option<usize>,
    pub position: Option<Position>,
    pub context_window: Vec<Lexeme>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            token_index: None,
            position: None,
            context_window: Vec::new(),
        }
    }

    pub fn with_context(mut self, index: usize, lexemes: &[Lexeme]) -> Self {
        self.token_index = Some(index);
        self.position = lexemes.get(index).and_then(|l| l.position.clone());
        let start = index.saturating_sub(2);
        let end = (index + 3).min(lexemes.len());
        self.context_window = lexemes[start..end].to_vec();
        self
    }

    /// Render the `Context: prev prev2 [offender] next next2` window from §7.
    pub fn context_string(&self, offender_index: usize) -> String {
        let mut parts = Vec::new();
        for (i, lex) in self.context_window.iter().enumerate() {
            let global_index = offender_index.saturating_sub(2) + i;
            if Some(global_index) == self.token_index {
                parts.push(format!("[{}]", lex.value));
            } else {
                parts.push(lex.value.clone());
            }
        }
        parts.join(" ")
    }
}

/// Reserved-keyword-as-identifier and empty-identifier failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IdentifierError {
    #[error("`{0}` is a reserved keyword and cannot be used as an identifier")]
    ReservedKeyword(String),
    #[error("identifier is empty")]
    Empty,
}

/// Failures raised by [`crate::transform::param_injector`] and
/// [`crate::transform::sort_injector`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InjectError {
    #[error("column `{name}` was not found among the query's output columns")]
    ColumnNotFound { name: String },
    #[error("unsupported operator `{op}` for column `{key}`")]
    UnsupportedOperator { op: String, key: String },
    #[error("all values in the injection state are undefined and allow_all_undefined is false")]
    AllUndefined,
    #[error("sort options for `{key}` are invalid: {reason}")]
    InvalidSortOptions { key: String, reason: String },
    #[error("sort injection is only supported on SimpleSelectQuery, not {found}")]
    UnsupportedQueryShape { found: &'static str },
    #[error("page must be >= 1, got {0}")]
    InvalidPage(i64),
    #[error("page_size must be between 1 and 1000, got {0}")]
    InvalidPageSize(i64),
}

/// Failures raised by CTE management operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CteError {
    #[error("a CTE named `{0}` already exists")]
    Duplicate(String),
    #[error("no CTE named `{0}` exists")]
    NotFound(String),
    #[error("CTE name must not be empty or whitespace")]
    InvalidName,
}

/// Structural failures raised by the JSON projection builder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingValidationError {
    #[error("mapped column `{0}` is not present in the base query's output columns")]
    MissingColumn(String),
    #[error("entity `{0}` references parent `{1}` which does not exist in the mapping")]
    MissingParent(String, String),
    #[error("entity `{0}` has more than one direct array-relationship child")]
    MultipleArrayChildren(String),
}

/// Raised by the printer for an unrecognized dialect preset name.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("unknown printer preset `{0}`")]
pub struct ConfigError(pub String);

/// Union of every failure domain, returned by facade functions that can
/// fail at more than one stage (tokenize, parse, transform, print).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SqlKitError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Identifier(#[from] IdentifierError),
    #[error(transparent)]
    Inject(#[from] InjectError),
    #[error(transparent)]
    Cte(#[from] CteError),
    #[error(transparent)]
    Mapping(#[from] MappingValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = SqlKitError> = std::result::Result<T, E>;
