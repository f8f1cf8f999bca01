//! Clause AST (§3.2 "Clause variants").

use crate::ast::comment::CommentSlots;
use crate::ast::expr::Expr;
use crate::ast::ident::{Ident, ObjectName};
use crate::ast::statement::SelectQuery;
use crate::impl_comment_carrier;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distinct {
    None,
    Plain,
    On(Vec<Expr>),
}

/// `/*+ ... */` hint, owned by the enclosing SELECT (§3.1 invariant).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HintClause {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectClause {
    pub items: Vec<SelectItem>,
    pub distinct: Distinct,
    pub hints: Vec<HintClause>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SelectClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectItem {
    pub value: Expr,
    pub alias: Option<Ident>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SelectItem);

impl SelectItem {
    pub fn unnamed(value: Expr) -> Self {
        SelectItem {
            value,
            alias: None,
            comments: CommentSlots::default(),
        }
    }

    /// The name this item exposes to an enclosing query: the alias if
    /// present, otherwise the bare identifier name — used by the
    /// upstream column-resolution search in the parameter injector
    /// (§4.3) and by the sort injector's alias-priority rule.
    pub fn exposed_name(&self) -> Option<&str> {
        if let Some(alias) = &self.alias {
            return Some(alias.value.as_str());
        }
        match &self.value {
            Expr::Identifier(id) => Some(id.bare_name()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FromClause {
    pub sources: Vec<SourceWithJoins>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(FromClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceWithJoins {
    pub source: SourceExpression,
    pub joins: Vec<JoinClause>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableSourceKind {
    Table {
        name: ObjectName,
        args: Option<Vec<Expr>>,
    },
    Paren(Box<SourceWithJoins>),
    SubQuery(Box<SelectQuery>),
    Values(Box<super::statement::ValuesQuery>),
    Function {
        call: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceExpression {
    pub source: TableSourceKind,
    pub alias: Option<Ident>,
    pub column_aliases: Vec<Ident>,
    pub lateral: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SourceExpression);

impl SourceExpression {
    pub fn table(name: ObjectName) -> Self {
        SourceExpression {
            source: TableSourceKind::Table { name, args: None },
            alias: None,
            column_aliases: Vec::new(),
            lateral: false,
            comments: CommentSlots::default(),
        }
    }

    pub fn table_name(&self) -> Option<&ObjectName> {
        match &self.source {
            TableSourceKind::Table { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn effective_alias(&self) -> Option<&str> {
        self.alias
            .as_ref()
            .map(|a| a.value.as_str())
            .or_else(|| self.table_name().map(|n| n.bare_name()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JoinCondition {
    On(Expr),
    Using(Vec<Ident>),
    Natural,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JoinClause {
    pub kind: JoinKind,
    pub lateral: bool,
    pub source: SourceExpression,
    pub condition: Option<JoinCondition>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(JoinClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhereClause {
    pub predicate: Expr,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(WhereClause);

impl WhereClause {
    pub fn new(predicate: Expr) -> Self {
        WhereClause {
            predicate,
            comments: CommentSlots::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupByClause {
    pub items: Vec<Expr>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(GroupByClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HavingClause {
    pub predicate: Expr,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(HavingClause);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SortDirection {
    Asc,
    Desc,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NullsOrder {
    First,
    Last,
    None,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderByItem {
    pub expr: Expr,
    pub direction: SortDirection,
    pub nulls: NullsOrder,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderByClause {
    pub items: Vec<OrderByItem>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(OrderByClause);

impl OrderByClause {
    pub fn empty() -> Self {
        OrderByClause {
            items: Vec::new(),
            comments: CommentSlots::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimitClause {
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetClause {
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForMode {
    Update,
    Share,
    NoKeyUpdate,
    KeyShare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WaitPolicy {
    Default,
    NoWait,
    SkipLocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForClause {
    pub mode: ForMode,
    pub of: Option<Vec<Ident>>,
    pub wait: WaitPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Materialization {
    None,
    Materialized,
    NotMaterialized,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommonTable {
    pub name: Ident,
    pub column_aliases: Vec<Ident>,
    pub materialized: Materialization,
    pub query: SelectQuery,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(CommonTable);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WithClause {
    pub recursive: bool,
    pub tables: Vec<CommonTable>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(WithClause);

impl WithClause {
    pub fn has_cte(&self, name: &str) -> bool {
        self.tables.iter().any(|t| t.name.value == name)
    }

    pub fn cte_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.value.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReturningItem {
    Wildcard,
    Expr { value: Expr, alias: Option<Ident> },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReturningClause {
    pub items: Vec<ReturningItem>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ReturningClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetItem {
    pub column: Ident,
    pub value: Expr,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SetItem);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetClause {
    pub items: Vec<SetItem>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SetClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsingClause {
    pub sources: Vec<SourceExpression>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(UsingClause);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowName(pub Ident);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameUnit {
    Range,
    Rows,
    Groups,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(String),
    Following(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowFrame {
    pub unit: FrameUnit,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSpec {
    pub base: Option<WindowName>,
    pub partition_by: Vec<Expr>,
    pub order_by: Option<OrderByClause>,
    pub frame: Option<WindowFrame>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NamedWindow {
    pub name: Ident,
    pub spec: WindowSpec,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowClause {
    pub windows: Vec<NamedWindow>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(WindowClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuesClause {
    pub tuples: Vec<crate::ast::expr::Tuple>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ValuesClause);
