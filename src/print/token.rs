//! `PrintToken` tree (§4.4): the intermediate, semantic-layout
//! representation the builder produces and the printer consumes. Kinds
//! are a closed enumeration rather than one struct type per concern, so
//! the printer's tree walk stays a flat match (§9 "do not use virtual
//! dispatch for structural traversal").

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentSide {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Select,
    From,
    Where,
    GroupBy,
    Having,
    Window,
    OrderBy,
    Limit,
    Offset,
    For,
    With,
    Set,
    Using,
    Returning,
    Values,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrintTokenKind {
    Keyword,
    Identifier,
    QuotedIdentifier,
    Literal,
    /// Carries the original binding name; the printer rewrites the
    /// textual form per `parameterStyle` (§4.5 "Parameter substitution").
    ParameterRef { binding_name: Option<String> },
    Operator,
    Punctuation,
    Whitespace,
    Newline,
    IndentIncrement,
    IndentDecrement,
    CommaSeparator,
    AndSeparator,
    Comment(CommentSide),
    HintBlock,
    CTEStart,
    CTEEnd,
    SubQueryStart,
    SubQueryEnd,
    ClauseStart(ClauseKind),
    ClauseEnd(ClauseKind),
    /// A nesting marker with no direct textual output of its own; used to
    /// group children (e.g. a parenthesized expression) without forcing
    /// every group to invent its own `ClauseKind`.
    Group,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintToken {
    pub kind: PrintTokenKind,
    pub text: Option<String>,
    pub children: Vec<PrintToken>,
}

impl PrintToken {
    pub fn leaf(kind: PrintTokenKind, text: impl Into<String>) -> Self {
        PrintToken {
            kind,
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    pub fn marker(kind: PrintTokenKind) -> Self {
        PrintToken {
            kind,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn group(children: Vec<PrintToken>) -> Self {
        PrintToken {
            kind: PrintTokenKind::Group,
            text: None,
            children,
        }
    }

    pub fn keyword(word: &str) -> Self {
        PrintToken::leaf(PrintTokenKind::Keyword, word)
    }

    pub fn punct(text: &str) -> Self {
        PrintToken::leaf(PrintTokenKind::Punctuation, text)
    }

    pub fn operator(text: impl Into<String>) -> Self {
        PrintToken::leaf(PrintTokenKind::Operator, text.into())
    }

    pub fn comma() -> Self {
        PrintToken::marker(PrintTokenKind::CommaSeparator)
    }

    pub fn newline() -> Self {
        PrintToken::marker(PrintTokenKind::Newline)
    }

    pub fn indent_inc() -> Self {
        PrintToken::marker(PrintTokenKind::IndentIncrement)
    }

    pub fn indent_dec() -> Self {
        PrintToken::marker(PrintTokenKind::IndentDecrement)
    }

    pub fn comments(side: CommentSide, comments: &[String]) -> Vec<PrintToken> {
        comments
            .iter()
            .cloned()
            .map(|c| PrintToken::leaf(PrintTokenKind::Comment(side), c))
            .collect()
    }
}
