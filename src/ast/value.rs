//! `Literal` values (§3.2), adapted from the teacher crate's `Value`
//! enum: here a single struct carries a closed `kind` tag plus the raw
//! source text, rather than one enum variant per lexical shape, so the
//! printer (not the AST) owns quoting/escaping decisions.

use crate::ast::comment::CommentSlots;
use crate::impl_comment_carrier;

/// Closed set of literal kinds (§3.2 `Literal { kind: String|Number|
/// Boolean|Null, ... }`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralKind {
    String,
    Number,
    Boolean,
    Null,
}

/// A literal prefix recognized by the scanner: `E'...'` (escaped string)
/// or a dollar-quote tag (`$tag$`, tag possibly empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LiteralPrefix {
    Escaped,
    DollarQuote(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Literal {
    pub kind: LiteralKind,
    /// Raw, unescaped payload: for strings this is the decoded contents
    /// (no surrounding quotes); for numbers it's the literal digits; for
    /// booleans `"true"`/`"false"`; for null it's ignored.
    pub raw: String,
    pub prefix: Option<LiteralPrefix>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}

impl_comment_carrier!(Literal);

impl Literal {
    pub fn string(raw: impl Into<String>) -> Self {
        Literal {
            kind: LiteralKind::String,
            raw: raw.into(),
            prefix: None,
            comments: CommentSlots::default(),
        }
    }

    pub fn escaped_string(raw: impl Into<String>) -> Self {
        Literal {
            kind: LiteralKind::String,
            raw: raw.into(),
            prefix: Some(LiteralPrefix::Escaped),
            comments: CommentSlots::default(),
        }
    }

    pub fn dollar_quoted(raw: impl Into<String>, tag: impl Into<String>) -> Self {
        Literal {
            kind: LiteralKind::String,
            raw: raw.into(),
            prefix: Some(LiteralPrefix::DollarQuote(tag.into())),
            comments: CommentSlots::default(),
        }
    }

    pub fn number(raw: impl Into<String>) -> Self {
        Literal {
            kind: LiteralKind::Number,
            raw: raw.into(),
            prefix: None,
            comments: CommentSlots::default(),
        }
    }

    pub fn boolean(value: bool) -> Self {
        Literal {
            kind: LiteralKind::Boolean,
            raw: value.to_string(),
            prefix: None,
            comments: CommentSlots::default(),
        }
    }

    pub fn null() -> Self {
        Literal {
            kind: LiteralKind::Null,
            raw: String::new(),
            prefix: None,
            comments: CommentSlots::default(),
        }
    }
}

/// Time units recognized inside `EXTRACT(field FROM expr)` (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DateTimeField {
    Year,
    Quarter,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
    Timezone,
    Epoch,
    Dow,
    Doy,
    Isodow,
    Isoyear,
    Microseconds,
    Milliseconds,
    Century,
    Decade,
    Millennium,
}

impl DateTimeField {
    pub fn from_keyword(word: &str) -> Option<Self> {
        use DateTimeField::*;
        Some(match word.to_uppercase().as_str() {
            "YEAR" => Year,
            "QUARTER" => Quarter,
            "MONTH" => Month,
            "WEEK" => Week,
            "DAY" => Day,
            "HOUR" => Hour,
            "MINUTE" => Minute,
            "SECOND" => Second,
            "TIMEZONE" => Timezone,
            "EPOCH" => Epoch,
            "DOW" => Dow,
            "DOY" => Doy,
            "ISODOW" => Isodow,
            "ISOYEAR" => Isoyear,
            "MICROSECONDS" => Microseconds,
            "MILLISECONDS" => Milliseconds,
            "CENTURY" => Century,
            "DECADE" => Decade,
            "MILLENNIUM" => Millennium,
            _ => return None,
        })
    }

    pub fn as_keyword(&self) -> &'static str {
        use DateTimeField::*;
        match self {
            Year => "YEAR",
            Quarter => "QUARTER",
            Month => "MONTH",
            Week => "WEEK",
            Day => "DAY",
            Hour => "HOUR",
            Minute => "MINUTE",
            Second => "SECOND",
            Timezone => "TIMEZONE",
            Epoch => "EPOCH",
            Dow => "DOW",
            Doy => "DOY",
            Isodow => "ISODOW",
            Isoyear => "ISOYEAR",
            Microseconds => "MICROSECONDS",
            Milliseconds => "MILLISECONDS",
            Century => "CENTURY",
            Decade => "DECADE",
            Millennium => "MILLENNIUM",
        }
    }
}
