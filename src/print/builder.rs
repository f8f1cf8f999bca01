//! Print-token builder (§4.4): visits the AST into a [`PrintToken`] tree
//! without mutating carrier nodes — positioned-comment arrays are cloned
//! on read, never moved out of the AST, so the same statement can be
//! formatted repeatedly (§9 "Visitor non-mutation").
//!
//! Dispatch is a flat match per node kind, not a trait object per the
//! teacher's `DialectDisplay` pattern generalized away from virtual
//! dispatch (§9 "do not use virtual dispatch for structural traversal").

use crate::ast::clause::*;
use crate::ast::comment::{CommentPosition, PositionedCommentCarrier};
use crate::ast::expr::*;
use crate::ast::ident::{Ident, Identifier};
use crate::ast::statement::*;
use crate::ast::value::{Literal, LiteralKind, LiteralPrefix};
use crate::print::dialect::Dialect;
use crate::print::token::{ClauseKind, CommentSide, PrintToken, PrintTokenKind};

fn leading_comments(carrier: &impl PositionedCommentCarrier) -> Vec<PrintToken> {
    PrintToken::comments(
        CommentSide::Before,
        carrier.get_positioned_comments(CommentPosition::Before),
    )
}

fn trailing_comments(carrier: &impl PositionedCommentCarrier) -> Vec<PrintToken> {
    PrintToken::comments(
        CommentSide::After,
        carrier.get_positioned_comments(CommentPosition::After),
    )
}

fn with_comments(carrier: &impl PositionedCommentCarrier, mut body: Vec<PrintToken>) -> PrintToken {
    let mut children = leading_comments(carrier);
    children.append(&mut body);
    children.extend(trailing_comments(carrier));
    PrintToken::group(children)
}

pub fn build_statement(statement: &Statement, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if let Some(slots) = statement_comment_slots(statement) {
        children.extend(PrintToken::comments(CommentSide::Before, slots));
    }
    children.push(match statement {
        Statement::Select(q) => build_select_query(q, dialect),
        Statement::Insert(q) => build_insert(q, dialect),
        Statement::Update(q) => build_update(q, dialect),
        Statement::Delete(q) => build_delete(q, dialect),
        Statement::Merge(q) => build_merge(q, dialect),
        Statement::CreateTable(q) => build_create_table(q, dialect),
        Statement::DropTable(q) => build_drop_table(q),
        Statement::CreateIndex(q) => build_create_index(q, dialect),
        Statement::DropIndex(q) => build_drop_index(q),
        Statement::AlterTable(q) => build_alter_table(q, dialect),
        Statement::CreateSequence(q) => build_create_sequence(q),
        Statement::AlterSequence(q) => build_alter_sequence(q),
        Statement::CreateSchema(q) => build_create_schema(q),
        Statement::DropSchema(q) => build_drop_schema(q),
        Statement::CommentOn(q) => build_comment_on(q),
        Statement::Analyze(q) => build_analyze(q),
    });
    PrintToken::group(children)
}

fn statement_comment_slots(statement: &Statement) -> Option<&[String]> {
    match statement {
        Statement::Select(q) => Some(q.comment_slots().header()),
        Statement::Insert(q) => Some(q.comment_slots().header()),
        Statement::Update(q) => Some(q.comment_slots().header()),
        Statement::Delete(q) => Some(q.comment_slots().header()),
        Statement::Merge(q) => Some(q.comment_slots().header()),
        Statement::CreateTable(q) => Some(q.comment_slots().header()),
        _ => None,
    }
}

// --- SELECT family -----------------------------------------------------

pub fn build_select_query(query: &SelectQuery, dialect: &Dialect) -> PrintToken {
    match query {
        SelectQuery::Simple(q) => build_simple_select(q, dialect),
        SelectQuery::Binary(q) => build_binary_select(q, dialect),
        SelectQuery::Values(q) => build_values_query(q, dialect),
    }
}

fn build_simple_select(query: &SimpleSelectQuery, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if let Some(with) = &query.with {
        children.push(build_with_clause(with, dialect));
        children.push(PrintToken::newline());
    }
    children.push(build_select_clause(&query.select, dialect));
    if let Some(from) = &query.from {
        children.push(PrintToken::newline());
        children.push(build_from_clause(from, dialect));
    }
    if let Some(w) = &query.r#where {
        children.push(PrintToken::newline());
        children.push(build_where_clause(w, dialect));
    }
    if let Some(g) = &query.group_by {
        children.push(PrintToken::newline());
        children.push(build_group_by_clause(g, dialect));
    }
    if let Some(h) = &query.having {
        children.push(PrintToken::newline());
        children.push(build_having_clause(h, dialect));
    }
    if let Some(w) = &query.window {
        children.push(PrintToken::newline());
        children.push(build_window_clause(w, dialect));
    }
    if let Some(o) = &query.order_by {
        children.push(PrintToken::newline());
        children.push(build_order_by_clause(o, dialect));
    }
    if let Some(limit) = &query.limit {
        children.push(PrintToken::newline());
        children.push(PrintToken::group(vec![
            PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Limit)),
            PrintToken::keyword("LIMIT"),
            build_expr(&limit.value, dialect),
            PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Limit)),
        ]));
    }
    if let Some(offset) = &query.offset {
        children.push(PrintToken::newline());
        children.push(PrintToken::group(vec![
            PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Offset)),
            PrintToken::keyword("OFFSET"),
            build_expr(&offset.value, dialect),
            PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Offset)),
        ]));
    }
    if let Some(for_clause) = &query.for_clause {
        children.push(PrintToken::newline());
        children.push(build_for_clause(for_clause));
    }
    with_comments(query, children)
}

fn build_binary_select(query: &BinarySelectQuery, dialect: &Dialect) -> PrintToken {
    let op = match query.op {
        SetOp::Union => "UNION",
        SetOp::UnionAll => "UNION ALL",
        SetOp::Intersect => "INTERSECT",
        SetOp::Except => "EXCEPT",
    };
    let mut children = vec![
        build_select_query(&query.left, dialect),
        PrintToken::newline(),
        PrintToken::keyword(op),
        PrintToken::newline(),
        build_select_query(&query.right, dialect),
    ];
    if let Some(o) = &query.order_by {
        children.push(PrintToken::newline());
        children.push(build_order_by_clause(o, dialect));
    }
    if let Some(l) = &query.limit {
        children.push(PrintToken::newline());
        children.push(PrintToken::group(vec![PrintToken::keyword("LIMIT"), build_expr(&l.value, dialect)]));
    }
    if let Some(o) = &query.offset {
        children.push(PrintToken::newline());
        children.push(PrintToken::group(vec![PrintToken::keyword("OFFSET"), build_expr(&o.value, dialect)]));
    }
    with_comments(query, children)
}

fn build_values_query(query: &ValuesQuery, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Values)),
        PrintToken::keyword("VALUES"),
    ];
    children.extend(comma_separated(&query.tuples, dialect, build_tuple));
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Values)));
    if let Some(aliases) = &query.column_aliases {
        children.push(PrintToken::keyword("AS"));
        children.push(PrintToken::punct("("));
        children.extend(comma_separated(aliases, dialect, |i, _| build_ident(i)));
        children.push(PrintToken::punct(")"));
    }
    if let Some(o) = &query.order_by {
        children.push(PrintToken::newline());
        children.push(build_order_by_clause(o, dialect));
    }
    if let Some(l) = &query.limit {
        children.push(PrintToken::newline());
        children.push(PrintToken::group(vec![PrintToken::keyword("LIMIT"), build_expr(&l.value, dialect)]));
    }
    if let Some(o) = &query.offset {
        children.push(PrintToken::newline());
        children.push(PrintToken::group(vec![PrintToken::keyword("OFFSET"), build_expr(&o.value, dialect)]));
    }
    with_comments(query, children)
}

fn build_tuple(tuple: &Tuple, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::punct("(")];
    children.extend(comma_separated(&tuple.items, dialect, build_expr));
    children.push(PrintToken::punct(")"));
    with_comments(tuple, children)
}

fn build_with_clause(with: &WithClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::With))];
    children.push(PrintToken::keyword("WITH"));
    if with.recursive {
        children.push(PrintToken::keyword("RECURSIVE"));
    }
    children.push(PrintToken::indent_inc());
    let mut first = true;
    for table in &with.tables {
        if !first {
            children.push(PrintToken::comma());
        }
        first = false;
        children.push(PrintToken::newline());
        children.push(build_common_table(table, dialect));
    }
    children.push(PrintToken::indent_dec());
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::With)));
    with_comments(with, children)
}

fn build_common_table(table: &CommonTable, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::CTEStart),
        build_ident(&table.name),
    ];
    if !table.column_aliases.is_empty() {
        children.push(PrintToken::punct("("));
        children.extend(comma_separated(&table.column_aliases, dialect, |i, _| build_ident(i)));
        children.push(PrintToken::punct(")"));
    }
    children.push(PrintToken::keyword("AS"));
    match table.materialized {
        Materialization::Materialized => children.push(PrintToken::keyword("MATERIALIZED")),
        Materialization::NotMaterialized => {
            children.push(PrintToken::keyword("NOT"));
            children.push(PrintToken::keyword("MATERIALIZED"));
        }
        Materialization::None => {}
    }
    let header = table.query.comment_slots().header().to_vec();
    children.push(PrintToken::punct("("));
    children.extend(PrintToken::comments(CommentSide::Before, &header));
    children.push(build_select_query(&table.query, dialect));
    children.push(PrintToken::punct(")"));
    children.push(PrintToken::marker(PrintTokenKind::CTEEnd));
    with_comments(table, children)
}

fn build_select_clause(clause: &SelectClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Select))];
    children.push(PrintToken::keyword("SELECT"));
    for hint in &clause.hints {
        children.push(PrintToken::leaf(PrintTokenKind::HintBlock, hint.text.clone()));
    }
    match &clause.distinct {
        Distinct::None => {}
        Distinct::Plain => children.push(PrintToken::keyword("DISTINCT")),
        Distinct::On(exprs) => {
            children.push(PrintToken::keyword("DISTINCT"));
            children.push(PrintToken::keyword("ON"));
            children.push(PrintToken::punct("("));
            children.extend(comma_separated(exprs, dialect, build_expr));
            children.push(PrintToken::punct(")"));
        }
    }
    children.push(PrintToken::indent_inc());
    children.push(PrintToken::newline());
    children.extend(comma_separated(&clause.items, dialect, build_select_item));
    children.push(PrintToken::indent_dec());
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Select)));
    with_comments(clause, children)
}

fn build_select_item(item: &SelectItem, dialect: &Dialect) -> PrintToken {
    let mut children = vec![build_expr(&item.value, dialect)];
    if let Some(alias) = &item.alias {
        children.push(PrintToken::keyword("AS"));
        children.push(build_ident(alias));
    }
    with_comments(item, children)
}

fn build_from_clause(clause: &FromClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::From)),
        PrintToken::keyword("FROM"),
    ];
    children.push(PrintToken::indent_inc());
    children.push(PrintToken::newline());
    children.extend(comma_separated(&clause.sources, dialect, build_source_with_joins));
    children.push(PrintToken::indent_dec());
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::From)));
    with_comments(clause, children)
}

fn build_source_with_joins(swj: &SourceWithJoins, dialect: &Dialect) -> PrintToken {
    let mut children = vec![build_source_expression(&swj.source, dialect)];
    for join in &swj.joins {
        children.push(build_join_clause(join, dialect));
    }
    PrintToken::group(children)
}

fn build_source_expression(source: &SourceExpression, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if source.lateral {
        children.push(PrintToken::keyword("LATERAL"));
    }
    match &source.source {
        TableSourceKind::Table { name, args } => {
            children.push(build_object_name(name));
            if let Some(args) = args {
                children.push(PrintToken::punct("("));
                children.extend(comma_separated(args, dialect, build_expr));
                children.push(PrintToken::punct(")"));
            }
        }
        TableSourceKind::Paren(inner) => {
            children.push(PrintToken::punct("("));
            children.push(build_source_with_joins(inner, dialect));
            children.push(PrintToken::punct(")"));
        }
        TableSourceKind::SubQuery(query) => {
            children.push(PrintToken::marker(PrintTokenKind::SubQueryStart));
            children.push(PrintToken::punct("("));
            children.push(build_select_query(query, dialect));
            children.push(PrintToken::punct(")"));
            children.push(PrintToken::marker(PrintTokenKind::SubQueryEnd));
        }
        TableSourceKind::Values(values) => {
            children.push(PrintToken::punct("("));
            children.push(build_values_query(values, dialect));
            children.push(PrintToken::punct(")"));
        }
        TableSourceKind::Function { call } => {
            children.push(build_expr(call, dialect));
        }
    }
    if let Some(alias) = &source.alias {
        children.push(PrintToken::keyword("AS"));
        children.push(build_ident(alias));
    }
    if !source.column_aliases.is_empty() {
        children.push(PrintToken::punct("("));
        children.extend(comma_separated(&source.column_aliases, dialect, |i, _| build_ident(i)));
        children.push(PrintToken::punct(")"));
    }
    with_comments(source, children)
}

fn build_join_clause(join: &JoinClause, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if matches!(join.condition, Some(JoinCondition::Natural)) {
        children.push(PrintToken::keyword("NATURAL"));
    }
    if join.lateral {
        children.push(PrintToken::keyword("LATERAL"));
    }
    let kind_words: &[&str] = match join.kind {
        JoinKind::Inner => &["INNER", "JOIN"],
        JoinKind::Left => &["LEFT", "JOIN"],
        JoinKind::Right => &["RIGHT", "JOIN"],
        JoinKind::Full => &["FULL", "JOIN"],
        JoinKind::Cross => &["CROSS", "JOIN"],
    };
    for w in kind_words {
        children.push(PrintToken::keyword(w));
    }
    children.push(build_source_expression(&join.source, dialect));
    match &join.condition {
        Some(JoinCondition::On(expr)) => {
            children.push(PrintToken::keyword("ON"));
            children.push(build_expr(expr, dialect));
        }
        Some(JoinCondition::Using(cols)) => {
            children.push(PrintToken::keyword("USING"));
            children.push(PrintToken::punct("("));
            children.extend(comma_separated(cols, dialect, |i, _| build_ident(i)));
            children.push(PrintToken::punct(")"));
        }
        Some(JoinCondition::Natural) | None => {}
    }
    with_comments(join, children)
}

fn build_where_clause(clause: &WhereClause, dialect: &Dialect) -> PrintToken {
    with_comments(
        clause,
        vec![
            PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Where)),
            PrintToken::keyword("WHERE"),
            PrintToken::indent_inc(),
            PrintToken::newline(),
            build_expr(&clause.predicate, dialect),
            PrintToken::indent_dec(),
            PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Where)),
        ],
    )
}

fn build_group_by_clause(clause: &GroupByClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::GroupBy)),
        PrintToken::keyword("GROUP"),
        PrintToken::keyword("BY"),
    ];
    children.push(PrintToken::indent_inc());
    children.push(PrintToken::newline());
    children.extend(comma_separated(&clause.items, dialect, build_expr));
    children.push(PrintToken::indent_dec());
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::GroupBy)));
    with_comments(clause, children)
}

fn build_having_clause(clause: &HavingClause, dialect: &Dialect) -> PrintToken {
    with_comments(
        clause,
        vec![
            PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Having)),
            PrintToken::keyword("HAVING"),
            PrintToken::indent_inc(),
            PrintToken::newline(),
            build_expr(&clause.predicate, dialect),
            PrintToken::indent_dec(),
            PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Having)),
        ],
    )
}

fn build_window_clause(clause: &WindowClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Window)),
        PrintToken::keyword("WINDOW"),
    ];
    children.extend(comma_separated(&clause.windows, dialect, |nw: &NamedWindow, d| {
        let mut inner = vec![build_ident(&nw.name), PrintToken::keyword("AS")];
        inner.push(build_window_spec(&nw.spec, d));
        PrintToken::group(inner)
    }));
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Window)));
    with_comments(clause, children)
}

fn build_order_by_clause(clause: &OrderByClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::OrderBy)),
        PrintToken::keyword("ORDER"),
        PrintToken::keyword("BY"),
    ];
    children.push(PrintToken::indent_inc());
    children.push(PrintToken::newline());
    children.extend(comma_separated(&clause.items, dialect, build_order_by_item));
    children.push(PrintToken::indent_dec());
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::OrderBy)));
    with_comments(clause, children)
}

fn build_order_by_item(item: &OrderByItem, dialect: &Dialect) -> PrintToken {
    let mut children = vec![build_expr(&item.expr, dialect)];
    match item.direction {
        SortDirection::Asc => children.push(PrintToken::keyword("ASC")),
        SortDirection::Desc => children.push(PrintToken::keyword("DESC")),
        SortDirection::None => {}
    }
    match item.nulls {
        NullsOrder::First => {
            children.push(PrintToken::keyword("NULLS"));
            children.push(PrintToken::keyword("FIRST"));
        }
        NullsOrder::Last => {
            children.push(PrintToken::keyword("NULLS"));
            children.push(PrintToken::keyword("LAST"));
        }
        NullsOrder::None => {}
    }
    PrintToken::group(children)
}

fn build_for_clause(clause: &ForClause) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::For)),
        PrintToken::keyword("FOR"),
    ];
    match clause.mode {
        ForMode::Update => children.push(PrintToken::keyword("UPDATE")),
        ForMode::Share => children.push(PrintToken::keyword("SHARE")),
        ForMode::NoKeyUpdate => {
            children.push(PrintToken::keyword("NO"));
            children.push(PrintToken::keyword("KEY"));
            children.push(PrintToken::keyword("UPDATE"));
        }
        ForMode::KeyShare => {
            children.push(PrintToken::keyword("KEY"));
            children.push(PrintToken::keyword("SHARE"));
        }
    }
    if let Some(of) = &clause.of {
        children.push(PrintToken::keyword("OF"));
        for (i, ident) in of.iter().enumerate() {
            if i > 0 {
                children.push(PrintToken::comma());
            }
            children.push(build_ident(ident));
        }
    }
    match clause.wait {
        WaitPolicy::NoWait => {
            children.push(PrintToken::keyword("NOWAIT"));
        }
        WaitPolicy::SkipLocked => {
            children.push(PrintToken::keyword("SKIP"));
            children.push(PrintToken::keyword("LOCKED"));
        }
        WaitPolicy::Default => {}
    }
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::For)));
    PrintToken::group(children)
}

// --- INSERT / UPDATE / DELETE / MERGE -----------------------------------

fn build_insert(query: &InsertQuery, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if let Some(with) = &query.with {
        children.push(build_with_clause(with, dialect));
    }
    children.push(PrintToken::keyword("INSERT"));
    children.push(PrintToken::keyword("INTO"));
    children.push(build_source_expression(&query.target, dialect));
    if let Some(cols) = &query.columns {
        children.push(PrintToken::punct("("));
        children.extend(comma_separated(cols, dialect, |i, _| build_ident(i)));
        children.push(PrintToken::punct(")"));
    }
    match &query.source {
        InsertSource::Select(select) => children.push(build_select_query(select, dialect)),
        InsertSource::Values(values) => children.push(build_values_query(values, dialect)),
        InsertSource::DefaultValues => {
            children.push(PrintToken::keyword("DEFAULT"));
            children.push(PrintToken::keyword("VALUES"));
        }
    }
    if let Some(oc) = &query.on_conflict {
        children.push(PrintToken::keyword("ON"));
        children.push(PrintToken::keyword("CONFLICT"));
        if !oc.target_columns.is_empty() {
            children.push(PrintToken::punct("("));
            children.extend(comma_separated(&oc.target_columns, dialect, |i, _| build_ident(i)));
            children.push(PrintToken::punct(")"));
        }
        children.push(PrintToken::keyword("DO"));
        if oc.do_nothing {
            children.push(PrintToken::keyword("NOTHING"));
        } else if let Some(set) = &oc.do_update {
            children.push(PrintToken::keyword("UPDATE"));
            children.push(PrintToken::keyword("SET"));
            children.push(build_set_clause(set, dialect));
            if let Some(w) = &oc.where_clause {
                children.push(build_where_clause(w, dialect));
            }
        }
    }
    if let Some(ret) = &query.returning {
        children.push(build_returning_clause(ret, dialect));
    }
    with_comments(query, children)
}

fn build_set_clause(clause: &SetClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Set))];
    children.extend(comma_separated(&clause.items, dialect, build_set_item));
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Set)));
    with_comments(clause, children)
}

fn build_set_item(item: &SetItem, dialect: &Dialect) -> PrintToken {
    with_comments(
        item,
        vec![
            build_ident(&item.column),
            PrintToken::operator("="),
            build_expr(&item.value, dialect),
        ],
    )
}

fn build_returning_clause(clause: &ReturningClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![
        PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Returning)),
        PrintToken::keyword("RETURNING"),
    ];
    children.extend(comma_separated(&clause.items, dialect, build_returning_item));
    children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Returning)));
    with_comments(clause, children)
}

fn build_returning_item(item: &ReturningItem, dialect: &Dialect) -> PrintToken {
    match item {
        ReturningItem::Wildcard => PrintToken::punct("*"),
        ReturningItem::Expr { value, alias } => {
            let mut children = vec![build_expr(value, dialect)];
            if let Some(alias) = alias {
                children.push(PrintToken::keyword("AS"));
                children.push(build_ident(alias));
            }
            PrintToken::group(children)
        }
    }
}

fn build_update(query: &UpdateQuery, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if let Some(with) = &query.with {
        children.push(build_with_clause(with, dialect));
    }
    children.push(PrintToken::keyword("UPDATE"));
    children.push(build_source_expression(&query.target, dialect));
    children.push(PrintToken::keyword("SET"));
    children.push(build_set_clause(&query.set, dialect));
    if let Some(from) = &query.from {
        children.push(build_from_clause(from, dialect));
    }
    if let Some(w) = &query.r#where {
        children.push(build_where_clause(w, dialect));
    }
    if let Some(ret) = &query.returning {
        children.push(build_returning_clause(ret, dialect));
    }
    with_comments(query, children)
}

fn build_delete(query: &DeleteQuery, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if let Some(with) = &query.with {
        children.push(build_with_clause(with, dialect));
    }
    children.push(PrintToken::keyword("DELETE"));
    children.push(PrintToken::keyword("FROM"));
    children.push(build_source_expression(&query.target, dialect));
    if let Some(using) = &query.using {
        children.push(PrintToken::marker(PrintTokenKind::ClauseStart(ClauseKind::Using)));
        children.push(PrintToken::keyword("USING"));
        children.extend(comma_separated(&using.sources, dialect, build_source_expression));
        children.push(PrintToken::marker(PrintTokenKind::ClauseEnd(ClauseKind::Using)));
    }
    if let Some(w) = &query.r#where {
        children.push(build_where_clause(w, dialect));
    }
    if let Some(ret) = &query.returning {
        children.push(build_returning_clause(ret, dialect));
    }
    with_comments(query, children)
}

fn build_merge(query: &MergeQuery, dialect: &Dialect) -> PrintToken {
    let mut children = Vec::new();
    if let Some(with) = &query.with {
        children.push(build_with_clause(with, dialect));
    }
    children.push(PrintToken::keyword("MERGE"));
    children.push(PrintToken::keyword("INTO"));
    children.push(build_source_expression(&query.into, dialect));
    children.push(PrintToken::keyword("USING"));
    children.push(build_source_expression(&query.using, dialect));
    children.push(PrintToken::keyword("ON"));
    children.push(build_expr(&query.on, dialect));
    for when in &query.when_clauses {
        children.push(PrintToken::newline());
        children.push(build_when_clause(when, dialect));
    }
    with_comments(query, children)
}

fn build_when_clause(when: &WhenClause, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::keyword("WHEN")];
    match when.match_type {
        MergeMatchType::Matched => children.push(PrintToken::keyword("MATCHED")),
        MergeMatchType::NotMatchedByTarget => {
            children.push(PrintToken::keyword("NOT"));
            children.push(PrintToken::keyword("MATCHED"));
        }
        MergeMatchType::NotMatchedBySource => {
            children.push(PrintToken::keyword("NOT"));
            children.push(PrintToken::keyword("MATCHED"));
            children.push(PrintToken::keyword("BY"));
            children.push(PrintToken::keyword("SOURCE"));
        }
    }
    if let Some(cond) = &when.condition {
        children.push(PrintToken::keyword("AND"));
        children.push(build_expr(cond, dialect));
    }
    children.push(PrintToken::keyword("THEN"));
    children.extend(PrintToken::comments(CommentSide::Before, when.comment_slots().then_leading()));
    children.push(build_merge_action(&when.action, dialect));
    with_comments(when, children)
}

fn build_merge_action(action: &MergeAction, dialect: &Dialect) -> PrintToken {
    match action {
        MergeAction::Update { set, r#where } => {
            let mut children = vec![
                PrintToken::keyword("UPDATE"),
                PrintToken::keyword("SET"),
                build_set_clause(set, dialect),
            ];
            if let Some(w) = r#where {
                children.push(build_where_clause(w, dialect));
            }
            PrintToken::group(children)
        }
        MergeAction::Delete { r#where } => {
            let mut children = vec![PrintToken::keyword("DELETE")];
            if let Some(w) = r#where {
                children.push(build_where_clause(w, dialect));
            }
            PrintToken::group(children)
        }
        MergeAction::Insert { columns, values, default_values } => {
            let mut children = vec![PrintToken::keyword("INSERT")];
            if *default_values {
                children.push(PrintToken::keyword("DEFAULT"));
                children.push(PrintToken::keyword("VALUES"));
                return PrintToken::group(children);
            }
            if let Some(cols) = columns {
                children.push(PrintToken::punct("("));
                children.extend(comma_separated(cols, dialect, |i, _| build_ident(i)));
                children.push(PrintToken::punct(")"));
            }
            children.push(PrintToken::keyword("VALUES"));
            children.push(PrintToken::punct("("));
            if let Some(values) = values {
                children.extend(comma_separated(values, dialect, build_expr));
            }
            children.push(PrintToken::punct(")"));
            PrintToken::group(children)
        }
        MergeAction::DoNothing => PrintToken::group(vec![PrintToken::keyword("DO"), PrintToken::keyword("NOTHING")]),
    }
}

// --- DDL -----------------------------------------------------------------

fn build_create_table(query: &CreateTableQuery, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::keyword("CREATE")];
    if query.is_temporary {
        children.push(PrintToken::keyword("TEMPORARY"));
    }
    children.push(PrintToken::keyword("TABLE"));
    if query.if_not_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("NOT"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    children.push(build_object_name(&query.name));
    if let Some(select) = &query.as_select {
        children.push(PrintToken::keyword("AS"));
        children.push(build_select_query(select, dialect));
    }
    with_comments(query, children)
}

fn build_drop_behavior(behavior: DropBehavior) -> Option<PrintToken> {
    match behavior {
        DropBehavior::Cascade => Some(PrintToken::keyword("CASCADE")),
        DropBehavior::Restrict => Some(PrintToken::keyword("RESTRICT")),
        DropBehavior::None => None,
    }
}

fn build_drop_table(query: &DropTableQuery) -> PrintToken {
    let mut children = vec![PrintToken::keyword("DROP"), PrintToken::keyword("TABLE")];
    if query.if_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    for (i, name) in query.names.iter().enumerate() {
        if i > 0 {
            children.push(PrintToken::comma());
        }
        children.push(build_object_name(name));
    }
    if let Some(b) = build_drop_behavior(query.behavior) {
        children.push(b);
    }
    PrintToken::group(children)
}

fn build_create_index(query: &CreateIndexQuery, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::keyword("CREATE")];
    if query.unique {
        children.push(PrintToken::keyword("UNIQUE"));
    }
    children.push(PrintToken::keyword("INDEX"));
    if query.concurrently {
        children.push(PrintToken::keyword("CONCURRENTLY"));
    }
    if query.if_not_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("NOT"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    if let Some(name) = &query.name {
        children.push(build_ident(name));
    }
    children.push(PrintToken::keyword("ON"));
    children.push(build_object_name(&query.table));
    if let Some(method) = &query.using_method {
        children.push(PrintToken::keyword("USING"));
        children.push(build_ident(method));
    }
    children.push(PrintToken::punct("("));
    children.extend(comma_separated(&query.columns, dialect, build_expr));
    children.push(PrintToken::punct(")"));
    if !query.include.is_empty() {
        children.push(PrintToken::keyword("INCLUDE"));
        children.push(PrintToken::punct("("));
        children.extend(comma_separated(&query.include, dialect, |i, _| build_ident(i)));
        children.push(PrintToken::punct(")"));
    }
    if !query.with_storage_params.is_empty() {
        children.push(PrintToken::keyword("WITH"));
        children.push(PrintToken::punct("("));
        children.extend(comma_separated(&query.with_storage_params, dialect, |(k, v), d| {
            PrintToken::group(vec![build_ident(k), PrintToken::operator("="), build_expr(v, d)])
        }));
        children.push(PrintToken::punct(")"));
    }
    if let Some(tablespace) = &query.tablespace {
        children.push(PrintToken::keyword("TABLESPACE"));
        children.push(build_ident(tablespace));
    }
    if let Some(w) = &query.r#where {
        children.push(build_where_clause(w, dialect));
    }
    PrintToken::group(children)
}

fn build_drop_index(query: &DropIndexQuery) -> PrintToken {
    let mut children = vec![PrintToken::keyword("DROP"), PrintToken::keyword("INDEX")];
    if query.concurrently {
        children.push(PrintToken::keyword("CONCURRENTLY"));
    }
    if query.if_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    for (i, name) in query.names.iter().enumerate() {
        if i > 0 {
            children.push(PrintToken::comma());
        }
        children.push(build_object_name(name));
    }
    if let Some(b) = build_drop_behavior(query.behavior) {
        children.push(b);
    }
    PrintToken::group(children)
}

fn build_alter_table(query: &AlterTableQuery, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::keyword("ALTER"), PrintToken::keyword("TABLE")];
    if query.if_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    if query.only {
        children.push(PrintToken::keyword("ONLY"));
    }
    children.push(build_object_name(&query.name));
    children.extend(comma_separated(&query.actions, dialect, build_alter_table_action));
    PrintToken::group(children)
}

fn build_alter_table_action(action: &AlterTableAction, dialect: &Dialect) -> PrintToken {
    match action {
        AlterTableAction::AddConstraint { name, definition } => PrintToken::group(vec![
            PrintToken::keyword("ADD"),
            PrintToken::keyword("CONSTRAINT"),
            build_ident(name),
            PrintToken::leaf(PrintTokenKind::Identifier, definition.clone()),
        ]),
        AlterTableAction::DropConstraint { name, if_exists, behavior } => {
            let mut children = vec![PrintToken::keyword("DROP"), PrintToken::keyword("CONSTRAINT")];
            if *if_exists {
                children.push(PrintToken::keyword("IF"));
                children.push(PrintToken::keyword("EXISTS"));
            }
            children.push(build_ident(name));
            if let Some(b) = build_drop_behavior(*behavior) {
                children.push(b);
            }
            PrintToken::group(children)
        }
        AlterTableAction::DropColumn { name, if_exists, behavior } => {
            let mut children = vec![PrintToken::keyword("DROP"), PrintToken::keyword("COLUMN")];
            if *if_exists {
                children.push(PrintToken::keyword("IF"));
                children.push(PrintToken::keyword("EXISTS"));
            }
            children.push(build_ident(name));
            if let Some(b) = build_drop_behavior(*behavior) {
                children.push(b);
            }
            PrintToken::group(children)
        }
        AlterTableAction::AlterColumnSetDefault { column, expr } => PrintToken::group(vec![
            PrintToken::keyword("ALTER"),
            PrintToken::keyword("COLUMN"),
            build_ident(column),
            PrintToken::keyword("SET"),
            PrintToken::keyword("DEFAULT"),
            build_expr(expr, dialect),
        ]),
        AlterTableAction::AlterColumnDropDefault { column } => PrintToken::group(vec![
            PrintToken::keyword("ALTER"),
            PrintToken::keyword("COLUMN"),
            build_ident(column),
            PrintToken::keyword("DROP"),
            PrintToken::keyword("DEFAULT"),
        ]),
    }
}

fn build_sequence_options(options: &SequenceOptions, dialect: &Dialect) -> Vec<PrintToken> {
    let mut children = Vec::new();
    if let Some(e) = &options.increment_by {
        children.push(PrintToken::keyword("INCREMENT"));
        children.push(PrintToken::keyword("BY"));
        children.push(build_expr(e, dialect));
    }
    if let Some(e) = &options.start_with {
        children.push(PrintToken::keyword("START"));
        children.push(PrintToken::keyword("WITH"));
        children.push(build_expr(e, dialect));
    }
    if let Some(e) = &options.minvalue {
        children.push(PrintToken::keyword("MINVALUE"));
        children.push(build_expr(e, dialect));
    }
    if let Some(e) = &options.maxvalue {
        children.push(PrintToken::keyword("MAXVALUE"));
        children.push(build_expr(e, dialect));
    }
    if let Some(e) = &options.cache {
        children.push(PrintToken::keyword("CACHE"));
        children.push(build_expr(e, dialect));
    }
    if let Some(e) = &options.restart_with {
        children.push(PrintToken::keyword("RESTART"));
        children.push(PrintToken::keyword("WITH"));
        children.push(build_expr(e, dialect));
    }
    if let Some(owner) = &options.owned_by {
        children.push(PrintToken::keyword("OWNED"));
        children.push(PrintToken::keyword("BY"));
        children.push(build_object_name(owner));
    }
    children
}

fn build_create_sequence(query: &CreateSequenceQuery) -> PrintToken {
    let dialect = Dialect::postgres();
    let mut children = vec![PrintToken::keyword("CREATE"), PrintToken::keyword("SEQUENCE")];
    if query.if_not_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("NOT"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    children.push(build_object_name(&query.name));
    children.extend(build_sequence_options(&query.options, &dialect));
    PrintToken::group(children)
}

fn build_alter_sequence(query: &AlterSequenceQuery) -> PrintToken {
    let dialect = Dialect::postgres();
    let mut children = vec![PrintToken::keyword("ALTER"), PrintToken::keyword("SEQUENCE")];
    if query.if_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    children.push(build_object_name(&query.name));
    children.extend(build_sequence_options(&query.options, &dialect));
    PrintToken::group(children)
}

fn build_create_schema(query: &CreateSchemaQuery) -> PrintToken {
    let mut children = vec![PrintToken::keyword("CREATE"), PrintToken::keyword("SCHEMA")];
    if query.if_not_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("NOT"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    children.push(build_ident(&query.name));
    if let Some(role) = &query.authorization {
        children.push(PrintToken::keyword("AUTHORIZATION"));
        children.push(build_ident(role));
    }
    PrintToken::group(children)
}

fn build_drop_schema(query: &DropSchemaQuery) -> PrintToken {
    let mut children = vec![PrintToken::keyword("DROP"), PrintToken::keyword("SCHEMA")];
    if query.if_exists {
        children.push(PrintToken::keyword("IF"));
        children.push(PrintToken::keyword("EXISTS"));
    }
    for (i, name) in query.names.iter().enumerate() {
        if i > 0 {
            children.push(PrintToken::comma());
        }
        children.push(build_ident(name));
    }
    if let Some(b) = build_drop_behavior(query.behavior) {
        children.push(b);
    }
    PrintToken::group(children)
}

fn build_comment_on(query: &CommentOnQuery) -> PrintToken {
    let mut children = vec![PrintToken::keyword("COMMENT"), PrintToken::keyword("ON")];
    match query.target_kind {
        CommentTargetKind::Table => children.push(PrintToken::keyword("TABLE")),
        CommentTargetKind::Column => children.push(PrintToken::keyword("COLUMN")),
    }
    children.push(build_object_name(&query.target));
    children.push(PrintToken::keyword("IS"));
    match &query.text {
        Some(text) => children.push(PrintToken::leaf(PrintTokenKind::Literal, format!("'{}'", text.replace('\'', "''")))),
        None => children.push(PrintToken::keyword("NULL")),
    }
    PrintToken::group(children)
}

fn build_analyze(query: &AnalyzeQuery) -> PrintToken {
    let mut children = vec![PrintToken::keyword("ANALYZE")];
    if query.verbose {
        children.push(PrintToken::keyword("VERBOSE"));
    }
    if let Some(target) = &query.target {
        children.push(build_object_name(target));
        if let Some(cols) = &query.columns {
            children.push(PrintToken::punct("("));
            children.extend(cols.iter().enumerate().flat_map(|(i, c)| {
                let mut v = Vec::new();
                if i > 0 {
                    v.push(PrintToken::comma());
                }
                v.push(build_ident(c));
                v
            }));
            children.push(PrintToken::punct(")"));
        }
    }
    PrintToken::group(children)
}

// --- Expressions -----------------------------------------------------------

fn build_expr(expr: &Expr, dialect: &Dialect) -> PrintToken {
    match expr {
        Expr::Identifier(id) => build_identifier(id),
        Expr::Literal(lit) => build_literal(lit),
        Expr::Parameter(p) => with_comments(
            p,
            vec![PrintToken::leaf(
                PrintTokenKind::ParameterRef { binding_name: p.name.clone() },
                p.name.clone().unwrap_or_default(),
            )],
        ),
        Expr::BinaryOp(op) => with_comments(
            op,
            vec![
                build_expr(&op.left, dialect),
                PrintToken::operator(op.op.clone()),
                build_expr(&op.right, dialect),
            ],
        ),
        Expr::UnaryOp(op) => {
            let operand = build_expr(&op.operand, dialect);
            let children = if op.prefix {
                vec![PrintToken::operator(op.op.clone()), operand]
            } else {
                vec![operand, PrintToken::operator(op.op.clone())]
            };
            with_comments(op, children)
        }
        Expr::FunctionCall(call) => build_function_call(call, dialect),
        Expr::Case(case) => build_case(case, dialect),
        Expr::Between(b) => {
            let mut children = vec![build_expr(&b.target, dialect)];
            if b.negated {
                children.push(PrintToken::keyword("NOT"));
            }
            children.push(PrintToken::keyword("BETWEEN"));
            children.push(build_expr(&b.low, dialect));
            children.push(PrintToken::keyword("AND"));
            children.push(build_expr(&b.high, dialect));
            with_comments(b.as_ref(), children)
        }
        Expr::InList(in_list) => {
            let mut children = vec![build_expr(&in_list.target, dialect)];
            if in_list.negated {
                children.push(PrintToken::keyword("NOT"));
            }
            children.push(PrintToken::keyword("IN"));
            children.push(PrintToken::punct("("));
            match &in_list.list {
                InListSource::Values(values) => children.extend(comma_separated(values, dialect, build_expr)),
                InListSource::SubQuery(query) => children.push(build_select_query(query, dialect)),
            }
            children.push(PrintToken::punct(")"));
            with_comments(in_list.as_ref(), children)
        }
        Expr::Cast(cast) => {
            let mut type_text = String::new();
            for ns in &cast.target_type.namespaces {
                type_text.push_str(&ns.value);
                type_text.push('.');
            }
            type_text.push_str(&cast.target_type.name);
            if !cast.target_type.args.is_empty() {
                type_text.push('(');
                type_text.push_str(&cast.target_type.args.join(", "));
                type_text.push(')');
            }
            for _ in 0..cast.target_type.array_suffixes {
                type_text.push_str("[]");
            }
            with_comments(
                cast.as_ref(),
                vec![
                    build_expr(&cast.expr, dialect),
                    PrintToken::operator("::"),
                    PrintToken::leaf(PrintTokenKind::Identifier, type_text),
                ],
            )
        }
        Expr::ArrayIndex(idx) => with_comments(
            idx.as_ref(),
            vec![
                build_expr(&idx.array, dialect),
                PrintToken::punct("["),
                build_expr(&idx.index, dialect),
                PrintToken::punct("]"),
            ],
        ),
        Expr::ArraySlice(slice) => {
            let mut children = vec![build_expr(&slice.array, dialect), PrintToken::punct("[")];
            if let Some(start) = &slice.start {
                children.push(build_expr(start, dialect));
            }
            children.push(PrintToken::punct(":"));
            if let Some(end) = &slice.end {
                children.push(build_expr(end, dialect));
            }
            children.push(PrintToken::punct("]"));
            with_comments(slice.as_ref(), children)
        }
        Expr::Tuple(tuple) => build_tuple(tuple, dialect),
        Expr::ValueList(list) => {
            let mut children = vec![PrintToken::punct("(")];
            children.extend(comma_separated(&list.items, dialect, build_expr));
            children.push(PrintToken::punct(")"));
            with_comments(list, children)
        }
        Expr::SubQuery(sub) => with_comments(
            sub.as_ref(),
            vec![
                PrintToken::marker(PrintTokenKind::SubQueryStart),
                PrintToken::punct("("),
                build_select_query(&sub.query, dialect),
                PrintToken::punct(")"),
                PrintToken::marker(PrintTokenKind::SubQueryEnd),
            ],
        ),
        Expr::Wildcard => PrintToken::punct("*"),
    }
}

fn build_function_call(call: &FunctionCall, dialect: &Dialect) -> PrintToken {
    let mut children = vec![build_object_name(&call.qualified_name), PrintToken::punct("(")];
    if call.distinct {
        children.push(PrintToken::keyword("DISTINCT"));
    }
    match &call.args {
        None => children.push(PrintToken::punct("*")),
        Some(args) => children.extend(comma_separated(args, dialect, build_function_arg)),
    }
    if let Some(order_by) = &call.order_by {
        children.push(build_order_by_clause(order_by, dialect));
    }
    children.push(PrintToken::punct(")"));
    if call.with_ordinality {
        children.push(PrintToken::keyword("WITH"));
        children.push(PrintToken::keyword("ORDINALITY"));
    }
    if let Some(within_group) = &call.within_group {
        children.push(PrintToken::keyword("WITHIN"));
        children.push(PrintToken::keyword("GROUP"));
        children.push(PrintToken::punct("("));
        children.push(build_order_by_clause(within_group, dialect));
        children.push(PrintToken::punct(")"));
    }
    if let Some(filter) = &call.filter {
        children.push(PrintToken::keyword("FILTER"));
        children.push(PrintToken::punct("("));
        children.push(build_where_clause(filter, dialect));
        children.push(PrintToken::punct(")"));
    }
    if let Some(over) = &call.over {
        children.push(PrintToken::keyword("OVER"));
        match over {
            WindowRef::Spec(spec) => children.push(build_window_spec(spec, dialect)),
            WindowRef::Name(name) => children.push(build_ident(&name.0)),
        }
    }
    with_comments(call, children)
}

fn build_function_arg(arg: &FunctionArg, dialect: &Dialect) -> PrintToken {
    match arg {
        FunctionArg::Value(expr) => build_expr(expr, dialect),
        FunctionArg::DateTimeField(field) => PrintToken::keyword(field.as_keyword()),
    }
}

fn build_window_spec(spec: &WindowSpec, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::punct("(")];
    if let Some(base) = &spec.base {
        children.push(build_ident(&base.0));
    }
    if !spec.partition_by.is_empty() {
        children.push(PrintToken::keyword("PARTITION"));
        children.push(PrintToken::keyword("BY"));
        children.extend(comma_separated(&spec.partition_by, dialect, build_expr));
    }
    if let Some(order_by) = &spec.order_by {
        children.push(build_order_by_clause(order_by, dialect));
    }
    if let Some(frame) = &spec.frame {
        children.push(build_window_frame(frame));
    }
    children.push(PrintToken::punct(")"));
    PrintToken::group(children)
}

fn build_window_frame(frame: &WindowFrame) -> PrintToken {
    let unit = match frame.unit {
        FrameUnit::Range => "RANGE",
        FrameUnit::Rows => "ROWS",
        FrameUnit::Groups => "GROUPS",
    };
    let mut children = vec![PrintToken::keyword(unit)];
    if let Some(end) = &frame.end {
        children.push(PrintToken::keyword("BETWEEN"));
        children.push(build_frame_bound(&frame.start));
        children.push(PrintToken::keyword("AND"));
        children.push(build_frame_bound(end));
    } else {
        children.push(build_frame_bound(&frame.start));
    }
    PrintToken::group(children)
}

fn build_frame_bound(bound: &FrameBound) -> PrintToken {
    match bound {
        FrameBound::UnboundedPreceding => PrintToken::group(vec![
            PrintToken::keyword("UNBOUNDED"),
            PrintToken::keyword("PRECEDING"),
        ]),
        FrameBound::UnboundedFollowing => PrintToken::group(vec![
            PrintToken::keyword("UNBOUNDED"),
            PrintToken::keyword("FOLLOWING"),
        ]),
        FrameBound::CurrentRow => PrintToken::group(vec![PrintToken::keyword("CURRENT"), PrintToken::keyword("ROW")]),
        FrameBound::Preceding(n) => {
            PrintToken::group(vec![PrintToken::leaf(PrintTokenKind::Literal, n.clone()), PrintToken::keyword("PRECEDING")])
        }
        FrameBound::Following(n) => {
            PrintToken::group(vec![PrintToken::leaf(PrintTokenKind::Literal, n.clone()), PrintToken::keyword("FOLLOWING")])
        }
    }
}

fn build_case(case: &CaseExpr, dialect: &Dialect) -> PrintToken {
    let mut children = vec![PrintToken::keyword("CASE")];
    if let Some(discriminant) = &case.discriminant {
        children.push(build_expr(discriminant, dialect));
    }
    for branch in &case.branches {
        children.push(PrintToken::keyword("WHEN"));
        children.push(build_expr(&branch.when, dialect));
        children.push(PrintToken::keyword("THEN"));
        children.push(build_expr(&branch.then, dialect));
    }
    if let Some(else_result) = &case.else_result {
        children.push(PrintToken::keyword("ELSE"));
        children.push(build_expr(else_result, dialect));
    }
    children.push(PrintToken::keyword("END"));
    with_comments(case, children)
}

fn build_literal(literal: &Literal) -> PrintToken {
    let text = match literal.kind {
        LiteralKind::Null => "NULL".to_string(),
        LiteralKind::Boolean => literal.raw.to_uppercase(),
        LiteralKind::Number => literal.raw.clone(),
        LiteralKind::String => match &literal.prefix {
            Some(LiteralPrefix::Escaped) => format!("E'{}'", literal.raw.replace('\'', "''")),
            Some(LiteralPrefix::DollarQuote(tag)) => format!("${0}${1}${0}$", tag, literal.raw),
            None => format!("'{}'", literal.raw.replace('\'', "''")),
        },
    };
    with_comments(literal, vec![PrintToken::leaf(PrintTokenKind::Literal, text)])
}

fn build_identifier(id: &Identifier) -> PrintToken {
    with_comments(id, vec![build_object_name(id)])
}

fn build_object_name(id: &Identifier) -> PrintToken {
    let mut children = Vec::new();
    for (i, ns) in id.namespaces.iter().enumerate() {
        if i > 0 {
            children.push(PrintToken::punct("."));
        }
        children.push(build_ident(ns));
    }
    if !id.namespaces.is_empty() {
        children.push(PrintToken::punct("."));
    }
    children.push(build_ident(&id.name));
    PrintToken::group(children)
}

fn build_ident(ident: &Ident) -> PrintToken {
    let kind = if ident.quoted {
        PrintTokenKind::QuotedIdentifier
    } else {
        PrintTokenKind::Identifier
    };
    with_comments(ident, vec![PrintToken::leaf(kind, ident.value.clone())])
}

fn comma_separated<T>(
    items: &[T],
    dialect: &Dialect,
    build: impl Fn(&T, &Dialect) -> PrintToken,
) -> Vec<PrintToken> {
    let mut children = Vec::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            children.push(PrintToken::comma());
        }
        children.push(build(item, dialect));
    }
    children
}
