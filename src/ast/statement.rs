//! Statement AST (§3.2 "Statement variants").

use crate::ast::clause::*;
use crate::ast::comment::CommentSlots;
use crate::ast::expr::{Expr, Tuple};
use crate::ast::ident::{Ident, ObjectName};
use crate::ast::params::ParamBindings;
use crate::impl_comment_carrier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SetOp {
    Union,
    UnionAll,
    Intersect,
    Except,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleSelectQuery {
    pub with: Option<WithClause>,
    pub select: SelectClause,
    pub from: Option<FromClause>,
    pub r#where: Option<WhereClause>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<HavingClause>,
    pub window: Option<WindowClause>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<LimitClause>,
    pub offset: Option<OffsetClause>,
    pub for_clause: Option<ForClause>,
    pub params: ParamBindings,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(SimpleSelectQuery);

impl SimpleSelectQuery {
    pub fn minimal(select: SelectClause) -> Self {
        SimpleSelectQuery {
            with: None,
            select,
            from: None,
            r#where: None,
            group_by: None,
            having: None,
            window: None,
            order_by: None,
            limit: None,
            offset: None,
            for_clause: None,
            params: ParamBindings::new(),
            comments: CommentSlots::default(),
        }
    }

    pub fn order_by_or_init(&mut self) -> &mut OrderByClause {
        self.order_by.get_or_insert_with(OrderByClause::empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinarySelectQuery {
    pub op: SetOp,
    pub left: Box<SelectQuery>,
    pub right: Box<SelectQuery>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<LimitClause>,
    pub offset: Option<OffsetClause>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(BinarySelectQuery);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValuesQuery {
    pub tuples: Vec<Tuple>,
    pub column_aliases: Option<Vec<Ident>>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<LimitClause>,
    pub offset: Option<OffsetClause>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(ValuesQuery);

/// `SELECT | VALUES | WITH`-introduced query (§4.2 SelectQueryParser).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectQuery {
    Simple(Box<SimpleSelectQuery>),
    Binary(Box<BinarySelectQuery>),
    Values(Box<ValuesQuery>),
}

impl SelectQuery {
    pub fn as_simple(&self) -> Option<&SimpleSelectQuery> {
        match self {
            SelectQuery::Simple(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_simple_mut(&mut self) -> Option<&mut SimpleSelectQuery> {
        match self {
            SelectQuery::Simple(s) => Some(s),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            SelectQuery::Simple(_) => "SimpleSelectQuery",
            SelectQuery::Binary(_) => "BinarySelectQuery",
            SelectQuery::Values(_) => "ValuesQuery",
        }
    }

    /// `toSimpleQuery()` (§4.2, §4.3): wraps a binary/values query in a
    /// `SELECT * FROM (...) <alias>` shell so CTE/sort/pagination APIs
    /// become usable uniformly. A no-op on an already-simple query.
    pub fn to_simple_query(self) -> SimpleSelectQuery {
        match self {
            SelectQuery::Simple(s) => *s,
            other => {
                let alias_name = "subquery";
                let source = SourceExpression {
                    source: match other {
                        SelectQuery::Binary(_) | SelectQuery::Values(_) => {
                            TableSourceKind::SubQuery(Box::new(other))
                        }
                        SelectQuery::Simple(_) => unreachable!(),
                    },
                    alias: Some(Ident::new(alias_name)),
                    column_aliases: Vec::new(),
                    lateral: false,
                    comments: CommentSlots::default(),
                };
                let from = FromClause {
                    sources: vec![SourceWithJoins {
                        source,
                        joins: Vec::new(),
                    }],
                    comments: CommentSlots::default(),
                };
                let select = SelectClause {
                    items: vec![SelectItem::unnamed(Expr::Wildcard)],
                    distinct: Distinct::None,
                    hints: Vec::new(),
                    comments: CommentSlots::default(),
                };
                let mut simple = SimpleSelectQuery::minimal(select);
                simple.from = Some(from);
                simple
            }
        }
    }
}

/// `SelectQuery` delegates comment-carrier access to whichever variant is
/// active, same pattern as `Expr`'s delegation macro.
impl crate::ast::comment::PositionedCommentCarrier for SelectQuery {
    fn comment_slots(&self) -> &CommentSlots {
        match self {
            SelectQuery::Simple(s) => s.comment_slots(),
            SelectQuery::Binary(s) => s.comment_slots(),
            SelectQuery::Values(s) => s.comment_slots(),
        }
    }
    fn comment_slots_mut(&mut self) -> &mut CommentSlots {
        match self {
            SelectQuery::Simple(s) => s.comment_slots_mut(),
            SelectQuery::Binary(s) => s.comment_slots_mut(),
            SelectQuery::Values(s) => s.comment_slots_mut(),
        }
    }
}

// --- INSERT / UPDATE / DELETE / MERGE -------------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsertSource {
    Select(SelectQuery),
    Values(ValuesQuery),
    DefaultValues,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnConflict {
    pub target_columns: Vec<Ident>,
    pub do_update: Option<SetClause>,
    pub do_nothing: bool,
    pub where_clause: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsertQuery {
    pub with: Option<WithClause>,
    pub target: SourceExpression,
    pub columns: Option<Vec<Ident>>,
    pub source: InsertSource,
    pub on_conflict: Option<OnConflict>,
    pub returning: Option<ReturningClause>,
    pub params: ParamBindings,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(InsertQuery);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateQuery {
    pub with: Option<WithClause>,
    pub target: SourceExpression,
    pub set: SetClause,
    pub from: Option<FromClause>,
    pub r#where: Option<WhereClause>,
    pub returning: Option<ReturningClause>,
    pub params: ParamBindings,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(UpdateQuery);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeleteQuery {
    pub with: Option<WithClause>,
    pub target: SourceExpression,
    pub using: Option<UsingClause>,
    pub r#where: Option<WhereClause>,
    pub returning: Option<ReturningClause>,
    pub params: ParamBindings,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(DeleteQuery);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeMatchType {
    Matched,
    NotMatchedByTarget,
    NotMatchedBySource,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MergeAction {
    Update {
        set: SetClause,
        r#where: Option<WhereClause>,
    },
    Delete {
        r#where: Option<WhereClause>,
    },
    Insert {
        columns: Option<Vec<Ident>>,
        values: Option<Vec<Expr>>,
        default_values: bool,
    },
    DoNothing,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WhenClause {
    pub match_type: MergeMatchType,
    pub condition: Option<Expr>,
    pub action: MergeAction,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(WhenClause);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeQuery {
    pub with: Option<WithClause>,
    pub into: SourceExpression,
    pub using: SourceExpression,
    pub on: Expr,
    pub when_clauses: Vec<WhenClause>,
    pub params: ParamBindings,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(MergeQuery);

// --- DDL subset (§4.2) -----------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateTableQuery {
    pub name: ObjectName,
    pub is_temporary: bool,
    pub if_not_exists: bool,
    pub as_select: Option<SelectQuery>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}
impl_comment_carrier!(CreateTableQuery);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DropBehavior {
    None,
    Cascade,
    Restrict,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropTableQuery {
    pub names: Vec<ObjectName>,
    pub if_exists: bool,
    pub behavior: DropBehavior,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropIndexQuery {
    pub concurrently: bool,
    pub if_exists: bool,
    pub names: Vec<ObjectName>,
    pub behavior: DropBehavior,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateIndexQuery {
    pub unique: bool,
    pub concurrently: bool,
    pub if_not_exists: bool,
    pub name: Option<Ident>,
    pub table: ObjectName,
    pub using_method: Option<Ident>,
    pub columns: Vec<Expr>,
    pub include: Vec<Ident>,
    pub with_storage_params: Vec<(Ident, Expr)>,
    pub tablespace: Option<Ident>,
    pub r#where: Option<WhereClause>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlterTableAction {
    AddConstraint {
        name: Ident,
        definition: String,
    },
    DropConstraint {
        name: Ident,
        if_exists: bool,
        behavior: DropBehavior,
    },
    DropColumn {
        name: Ident,
        if_exists: bool,
        behavior: DropBehavior,
    },
    AlterColumnSetDefault {
        column: Ident,
        expr: Expr,
    },
    AlterColumnDropDefault {
        column: Ident,
    },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlterTableQuery {
    pub name: ObjectName,
    pub if_exists: bool,
    pub only: bool,
    pub actions: Vec<AlterTableAction>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceOptions {
    pub increment_by: Option<Expr>,
    pub start_with: Option<Expr>,
    pub minvalue: Option<Expr>,
    pub maxvalue: Option<Expr>,
    pub cache: Option<Expr>,
    pub restart_with: Option<Expr>,
    pub owned_by: Option<ObjectName>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateSequenceQuery {
    pub name: ObjectName,
    pub if_not_exists: bool,
    pub options: SequenceOptions,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlterSequenceQuery {
    pub name: ObjectName,
    pub if_exists: bool,
    pub options: SequenceOptions,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateSchemaQuery {
    pub name: Ident,
    pub if_not_exists: bool,
    pub authorization: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DropSchemaQuery {
    pub names: Vec<Ident>,
    pub if_exists: bool,
    pub behavior: DropBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommentTargetKind {
    Table,
    Column,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentOnQuery {
    pub target_kind: CommentTargetKind,
    pub target: ObjectName,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyzeQuery {
    pub verbose: bool,
    pub target: Option<ObjectName>,
    pub columns: Option<Vec<Ident>>,
}

/// Top-level statement sum type (§3.2 "Statement variants").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Select(SelectQuery),
    Insert(Box<InsertQuery>),
    Update(Box<UpdateQuery>),
    Delete(Box<DeleteQuery>),
    Merge(Box<MergeQuery>),
    CreateTable(Box<CreateTableQuery>),
    DropTable(Box<DropTableQuery>),
    CreateIndex(Box<CreateIndexQuery>),
    DropIndex(Box<DropIndexQuery>),
    AlterTable(Box<AlterTableQuery>),
    CreateSequence(Box<CreateSequenceQuery>),
    AlterSequence(Box<AlterSequenceQuery>),
    CreateSchema(Box<CreateSchemaQuery>),
    DropSchema(Box<DropSchemaQuery>),
    CommentOn(Box<CommentOnQuery>),
    Analyze(Box<AnalyzeQuery>),
}

impl Statement {
    pub fn params(&self) -> Option<&ParamBindings> {
        match self {
            Statement::Select(SelectQuery::Simple(s)) => Some(&s.params),
            Statement::Insert(s) => Some(&s.params),
            Statement::Update(s) => Some(&s.params),
            Statement::Delete(s) => Some(&s.params),
            Statement::Merge(s) => Some(&s.params),
            _ => None,
        }
    }

    pub fn params_mut(&mut self) -> Option<&mut ParamBindings> {
        match self {
            Statement::Select(SelectQuery::Simple(s)) => Some(&mut s.params),
            Statement::Insert(s) => Some(&mut s.params),
            Statement::Update(s) => Some(&mut s.params),
            Statement::Delete(s) => Some(&mut s.params),
            Statement::Merge(s) => Some(&mut s.params),
            _ => None,
        }
    }
}
