//! Expression AST (§3.2).

use crate::ast::clause::{OrderByClause, WhereClause, WindowName, WindowSpec};
use crate::ast::comment::CommentSlots;
use crate::ast::ident::{Identifier, ObjectName};
use crate::ast::statement::SelectQuery;
use crate::ast::value::Literal;
use crate::impl_comment_carrier;

/// Every node in the expression sum type (§3.2 "Expression variants").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Identifier(Identifier),
    Literal(Literal),
    Parameter(ParameterRef),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    FunctionCall(Box<FunctionCall>),
    Case(Box<CaseExpr>),
    Between(Box<Between>),
    InList(Box<InList>),
    Cast(Box<Cast>),
    ArrayIndex(Box<ArrayIndex>),
    ArraySlice(Box<ArraySlice>),
    Tuple(Tuple),
    ValueList(ValueList),
    SubQuery(Box<SubQuery>),
    /// `NOT <expr>`, `<expr> IS [NOT] NULL`, `<expr> IS [NOT] TRUE/FALSE/
    /// UNKNOWN`, `<expr> IS [NOT] DISTINCT FROM <expr>` are all
    /// represented through `UnaryOp`/`BinaryOp` with a textual operator;
    /// `Wildcard` covers a bare `*` appearing as an expression operand
    /// (e.g. inside `COUNT(*)`).
    Wildcard,
}

macro_rules! carrier_via_match {
    ($self:ident, $method:ident $(, $arg:ident)*) => {
        match $self {
            Expr::Identifier(e) => e.$method($($arg),*),
            Expr::Literal(e) => e.$method($($arg),*),
            Expr::Parameter(e) => e.$method($($arg),*),
            Expr::BinaryOp(e) => e.$method($($arg),*),
            Expr::UnaryOp(e) => e.$method($($arg),*),
            Expr::FunctionCall(e) => e.$method($($arg),*),
            Expr::Case(e) => e.$method($($arg),*),
            Expr::Between(e) => e.$method($($arg),*),
            Expr::InList(e) => e.$method($($arg),*),
            Expr::Cast(e) => e.$method($($arg),*),
            Expr::ArrayIndex(e) => e.$method($($arg),*),
            Expr::ArraySlice(e) => e.$method($($arg),*),
            Expr::Tuple(e) => e.$method($($arg),*),
            Expr::ValueList(e) => e.$method($($arg),*),
            Expr::SubQuery(e) => e.$method($($arg),*),
            Expr::Wildcard => unreachable!("Wildcard carries no comments"),
        }
    };
}

impl crate::ast::comment::PositionedCommentCarrier for Expr {
    fn comment_slots(&self) -> &CommentSlots {
        static EMPTY: CommentSlots = CommentSlots::empty();
        if matches!(self, Expr::Wildcard) {
            return &EMPTY;
        }
        carrier_via_match!(self, comment_slots)
    }

    fn comment_slots_mut(&mut self) -> &mut CommentSlots {
        carrier_via_match!(self, comment_slots_mut)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterRef {
    pub name: Option<String>,
    pub index: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ParameterRef);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryOp {
    pub op: String,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(BinaryOp);

impl BinaryOp {
    pub fn new(op: impl Into<String>, left: Expr, right: Expr) -> Self {
        BinaryOp {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
            comments: CommentSlots::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnaryOp {
    pub op: String,
    pub operand: Box<Expr>,
    pub prefix: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(UnaryOp);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionCall {
    pub qualified_name: ObjectName,
    /// `None` represents `func(*)` distinct from `func()` with an empty
    /// argument list, matching the teacher's `args: Option<Vec<..>>`
    /// convention on `TableFactor::Table`.
    pub args: Option<Vec<FunctionArg>>,
    pub distinct: bool,
    pub order_by: Option<OrderByClause>,
    pub within_group: Option<OrderByClause>,
    pub over: Option<WindowRef>,
    pub filter: Option<Box<WhereClause>>,
    pub with_ordinality: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(FunctionCall);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionArg {
    Value(Expr),
    /// `EXTRACT(field FROM expr)` renders its `field` as a bare keyword
    /// argument rather than a column expression (§4.2 "EXTRACT").
    DateTimeField(crate::ast::value::DateTimeField),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowRef {
    Spec(WindowSpec),
    Name(WindowName),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseExpr {
    pub discriminant: Option<Expr>,
    pub branches: Vec<CaseBranch>,
    pub else_result: Option<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(CaseExpr);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseBranch {
    pub when: Expr,
    pub then: Expr,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Between {
    pub target: Expr,
    pub low: Expr,
    pub high: Expr,
    pub negated: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(Between);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InListSource {
    Values(Vec<Expr>),
    SubQuery(SelectQuery),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InList {
    pub target: Expr,
    pub list: InListSource,
    pub negated: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(InList);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastType {
    pub namespaces: Vec<crate::ast::ident::Ident>,
    pub name: String,
    /// e.g. `numeric(10, 2)` or array-suffix count for `int[][]`.
    pub args: Vec<String>,
    pub array_suffixes: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cast {
    pub expr: Expr,
    pub target_type: CastType,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(Cast);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrayIndex {
    pub array: Expr,
    pub index: Expr,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ArrayIndex);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArraySlice {
    pub array: Expr,
    pub start: Option<Expr>,
    pub end: Option<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ArraySlice);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tuple {
    pub items: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(Tuple);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueList {
    pub items: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ValueList);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubQuery {
    pub query: SelectQuery,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SubQuery);
