//! `SelectQueryParser` (§4.2): SELECT/VALUES/WITH-introduced queries,
//! set operations, and every clause that hangs off a `SimpleSelectQuery`.

use super::expr::{parse_expr, parse_window_spec};
use super::Cursor;
use crate::ast::clause::*;
use crate::ast::comment::CommentSlots;
use crate::ast::expr::Tuple;
use crate::ast::ident::{Ident, Identifier};
use crate::ast::statement::{BinarySelectQuery, SelectQuery, SetOp, SimpleSelectQuery, ValuesQuery};
use crate::error::ParseError;
use crate::tokenizer::Punctuation;

pub fn parse_select_query(cursor: &mut Cursor) -> Result<SelectQuery, ParseError> {
    let left = parse_select_query_primary(cursor)?;
    parse_set_operations(cursor, left)
}

fn parse_set_operations(cursor: &mut Cursor, mut left: SelectQuery) -> Result<SelectQuery, ParseError> {
    loop {
        let op = if cursor.eat_keyword("UNION") {
            if cursor.eat_keyword("ALL") {
                SetOp::UnionAll
            } else {
                cursor.eat_keyword("DISTINCT");
                SetOp::Union
            }
        } else if cursor.eat_keyword("INTERSECT") {
            cursor.eat_keyword("DISTINCT");
            SetOp::Intersect
        } else if cursor.eat_keyword("EXCEPT") {
            cursor.eat_keyword("DISTINCT");
            SetOp::Except
        } else {
            break;
        };
        let right = parse_select_query_primary(cursor)?;
        left = SelectQuery::Binary(Box::new(BinarySelectQuery {
            op,
            left: Box::new(left),
            right: Box::new(right),
            order_by: None,
            limit: None,
            offset: None,
            comments: Default::default(),
        }));
    }

    if let SelectQuery::Binary(binary) = &mut left {
        if cursor.eat_keyword("ORDER") {
            cursor.expect_keyword("BY")?;
            binary.order_by = Some(parse_order_by_items(cursor)?);
        }
        binary.limit = parse_limit(cursor)?;
        binary.offset = parse_offset(cursor)?;
    }
    Ok(left)
}

fn parse_select_query_primary(cursor: &mut Cursor) -> Result<SelectQuery, ParseError> {
    if cursor.at_punct(Punctuation::LParen) {
        cursor.advance();
        let inner = parse_select_query(cursor)?;
        cursor.expect_punct(Punctuation::RParen, ")")?;
        return Ok(inner);
    }
    if cursor.at_keyword("WITH") {
        return parse_with_select(cursor);
    }
    if cursor.at_keyword("VALUES") {
        return Ok(SelectQuery::Values(Box::new(parse_values(cursor)?)));
    }
    if cursor.at_keyword("SELECT") {
        return Ok(SelectQuery::Simple(Box::new(parse_simple_select(cursor, None)?)));
    }
    Err(cursor.error("Expected SELECT, VALUES, or WITH"))
}

fn parse_with_select(cursor: &mut Cursor) -> Result<SelectQuery, ParseError> {
    cursor.expect_keyword("WITH")?;
    let recursive = cursor.eat_keyword("RECURSIVE");
    let mut tables = Vec::new();
    loop {
        let before = cursor.leading_comments();
        let name = Ident::new(cursor.expect_name()?);
        let mut column_aliases = Vec::new();
        if cursor.eat_punct(Punctuation::LParen) {
            column_aliases.push(Ident::new(cursor.expect_name()?));
            while cursor.eat_punct(Punctuation::Comma) {
                column_aliases.push(Ident::new(cursor.expect_name()?));
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
        }
        cursor.expect_keyword("AS")?;
        let materialized = if cursor.eat_keyword("MATERIALIZED") {
            Materialization::Materialized
        } else if cursor.eat_keyword("NOT") {
            cursor.expect_keyword("MATERIALIZED")?;
            Materialization::NotMaterialized
        } else {
            Materialization::None
        };
        cursor.expect_punct(Punctuation::LParen, "(")?;
        let inner_header = cursor.leading_comments();
        let mut query = parse_select_query(cursor)?;
        if !inner_header.is_empty() {
            use crate::ast::comment::PositionedCommentCarrier;
            query.comment_slots_mut().set_header(inner_header);
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        let mut comments = CommentSlots::default();
        if !before.is_empty() {
            comments.add(crate::ast::comment::CommentPosition::Before, before);
        }
        tables.push(CommonTable {
            name,
            column_aliases,
            materialized,
            query,
            comments,
        });
        if !cursor.eat_punct(Punctuation::Comma) {
            break;
        }
    }
    let outer_select_leading = cursor.leading_comments();
    let mut simple = parse_simple_select(cursor, Some(WithClause {
        recursive,
        tables,
        comments: Default::default(),
    }))?;
    if !outer_select_leading.is_empty() {
        use crate::ast::comment::PositionedCommentCarrier;
        simple.add_positioned_comments(crate::ast::comment::CommentPosition::Before, outer_select_leading);
    }
    Ok(SelectQuery::Simple(Box::new(simple)))
}

fn parse_values(cursor: &mut Cursor) -> Result<ValuesQuery, ParseError> {
    cursor.expect_keyword("VALUES")?;
    let mut tuples = Vec::new();
    loop {
        cursor.expect_punct(Punctuation::LParen, "(")?;
        let mut items = vec![parse_expr(cursor)?];
        while cursor.eat_punct(Punctuation::Comma) {
            items.push(parse_expr(cursor)?);
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        tuples.push(Tuple {
            items,
            comments: Default::default(),
        });
        if !cursor.eat_punct(Punctuation::Comma) {
            break;
        }
    }
    let order_by = if cursor.eat_keyword("ORDER") {
        cursor.expect_keyword("BY")?;
        Some(parse_order_by_items(cursor)?)
    } else {
        None
    };
    let limit = parse_limit(cursor)?;
    let offset = parse_offset(cursor)?;
    Ok(ValuesQuery {
        tuples,
        column_aliases: None,
        order_by,
        limit,
        offset,
        comments: Default::default(),
    })
}

fn parse_simple_select(cursor: &mut Cursor, with: Option<WithClause>) -> Result<SimpleSelectQuery, ParseError> {
    cursor.expect_keyword("SELECT")?;

    let mut hints = Vec::new();
    while let Some(lexeme) = cursor.peek() {
        if lexeme.kind == crate::tokenizer::TokenKind::HintBlock {
            hints.push(HintClause {
                text: lexeme.value.clone(),
            });
            cursor.advance();
        } else {
            break;
        }
    }

    let distinct = if cursor.eat_keyword("DISTINCT") {
        if cursor.eat_keyword("ON") {
            cursor.expect_punct(Punctuation::LParen, "(")?;
            let mut items = vec![parse_expr(cursor)?];
            while cursor.eat_punct(Punctuation::Comma) {
                items.push(parse_expr(cursor)?);
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
            Distinct::On(items)
        } else {
            Distinct::Plain
        }
    } else {
        cursor.eat_keyword("ALL");
        Distinct::None
    };

    let select_leading = cursor.leading_comments();
    let mut items = vec![parse_select_item(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        items.push(parse_select_item(cursor)?);
    }
    let mut select_comments = CommentSlots::default();
    if !select_leading.is_empty() {
        select_comments.add(crate::ast::comment::CommentPosition::Before, select_leading);
    }
    let select = SelectClause {
        items,
        distinct,
        hints,
        comments: select_comments,
    };

    let from = if cursor.eat_keyword("FROM") {
        Some(parse_from_clause(cursor)?)
    } else {
        None
    };

    let r#where = if cursor.eat_keyword("WHERE") {
        Some(WhereClause::new(parse_expr(cursor)?))
    } else {
        None
    };

    let group_by = if cursor.eat_keyword("GROUP") {
        cursor.expect_keyword("BY")?;
        let mut items = vec![parse_expr(cursor)?];
        while cursor.eat_punct(Punctuation::Comma) {
            items.push(parse_expr(cursor)?);
        }
        Some(GroupByClause {
            items,
            comments: Default::default(),
        })
    } else {
        None
    };

    let having = if cursor.eat_keyword("HAVING") {
        Some(HavingClause {
            predicate: parse_expr(cursor)?,
            comments: Default::default(),
        })
    } else {
        None
    };

    let window = if cursor.eat_keyword("WINDOW") {
        let mut windows = vec![parse_named_window(cursor)?];
        while cursor.eat_punct(Punctuation::Comma) {
            windows.push(parse_named_window(cursor)?);
        }
        Some(WindowClause {
            windows,
            comments: Default::default(),
        })
    } else {
        None
    };

    let order_by = if cursor.eat_keyword("ORDER") {
        cursor.expect_keyword("BY")?;
        Some(parse_order_by_items(cursor)?)
    } else {
        None
    };

    let limit = parse_limit(cursor)?;
    let offset = parse_offset(cursor)?;
    let for_clause = parse_for_clause(cursor)?;

    Ok(SimpleSelectQuery {
        with,
        select,
        from,
        r#where,
        group_by,
        having,
        window,
        order_by,
        limit,
        offset,
        for_clause,
        params: Default::default(),
        comments: Default::default(),
    })
}

fn parse_named_window(cursor: &mut Cursor) -> Result<NamedWindow, ParseError> {
    let name = Ident::new(cursor.expect_name()?);
    cursor.expect_keyword("AS")?;
    let spec = parse_window_spec(cursor)?;
    Ok(NamedWindow { name, spec })
}

fn parse_select_item(cursor: &mut Cursor) -> Result<SelectItem, ParseError> {
    let before = cursor.leading_comments();
    let value = parse_expr(cursor)?;
    let alias = if cursor.eat_keyword("AS") {
        Some(Ident::new(cursor.expect_name()?))
    } else if !cursor.at_any_keyword(&[
        "FROM", "WHERE", "GROUP", "HAVING", "WINDOW", "ORDER", "LIMIT", "OFFSET", "FOR", "UNION", "INTERSECT", "EXCEPT",
    ]) && matches!(
        cursor.peek().map(|l| &l.kind),
        Some(crate::tokenizer::TokenKind::Identifier) | Some(crate::tokenizer::TokenKind::QuotedIdentifier)
    ) {
        Some(Ident::new(cursor.expect_name()?))
    } else {
        None
    };
    let after = cursor.trailing_comments_of_last();
    let mut comments = CommentSlots::default();
    if !before.is_empty() {
        comments.add(crate::ast::comment::CommentPosition::Before, before);
    }
    if !after.is_empty() {
        comments.add(crate::ast::comment::CommentPosition::After, after);
    }
    Ok(SelectItem {
        value,
        alias,
        comments,
    })
}

pub fn parse_from_clause(cursor: &mut Cursor) -> Result<FromClause, ParseError> {
    let mut sources = vec![parse_source_with_joins(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        sources.push(parse_source_with_joins(cursor)?);
    }
    Ok(FromClause {
        sources,
        comments: Default::default(),
    })
}

fn parse_source_with_joins(cursor: &mut Cursor) -> Result<SourceWithJoins, ParseError> {
    let source = parse_source_expression(cursor)?;
    let mut joins = Vec::new();
    while let Some(kind) = peek_join_kind(cursor) {
        let (lateral, natural) = consume_join_keywords(cursor, kind)?;
        let join_source = parse_source_expression(cursor)?;
        let condition = if natural {
            Some(JoinCondition::Natural)
        } else if kind == JoinKind::Cross {
            None
        } else if cursor.eat_keyword("ON") {
            Some(JoinCondition::On(parse_expr(cursor)?))
        } else if cursor.eat_keyword("USING") {
            cursor.expect_punct(Punctuation::LParen, "(")?;
            let mut cols = vec![Ident::new(cursor.expect_name()?)];
            while cursor.eat_punct(Punctuation::Comma) {
                cols.push(Ident::new(cursor.expect_name()?));
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
            Some(JoinCondition::Using(cols))
        } else {
            None
        };
        joins.push(JoinClause {
            kind,
            lateral,
            source: join_source,
            condition,
            comments: Default::default(),
        });
    }
    Ok(SourceWithJoins { source, joins })
}

fn peek_join_kind(cursor: &Cursor) -> Option<JoinKind> {
    if cursor.at_keyword("JOIN") || cursor.at_keyword("INNER") {
        Some(JoinKind::Inner)
    } else if cursor.at_keyword("LEFT") {
        Some(JoinKind::Left)
    } else if cursor.at_keyword("RIGHT") {
        Some(JoinKind::Right)
    } else if cursor.at_keyword("FULL") {
        Some(JoinKind::Full)
    } else if cursor.at_keyword("CROSS") {
        Some(JoinKind::Cross)
    } else if cursor.at_keyword("NATURAL") {
        Some(JoinKind::Inner)
    } else {
        None
    }
}

fn consume_join_keywords(cursor: &mut Cursor, kind: JoinKind) -> Result<(bool, bool), ParseError> {
    let natural = cursor.eat_keyword("NATURAL");
    match kind {
        JoinKind::Inner => {
            cursor.eat_keyword("INNER");
        }
        JoinKind::Left => {
            cursor.expect_keyword("LEFT")?;
            cursor.eat_keyword("OUTER");
        }
        JoinKind::Right => {
            cursor.expect_keyword("RIGHT")?;
            cursor.eat_keyword("OUTER");
        }
        JoinKind::Full => {
            cursor.expect_keyword("FULL")?;
            cursor.eat_keyword("OUTER");
        }
        JoinKind::Cross => {
            cursor.expect_keyword("CROSS")?;
        }
    }
    cursor.expect_keyword("JOIN")?;
    let lateral = cursor.eat_keyword("LATERAL");
    Ok((lateral, natural))
}

pub(super) fn parse_source_expression(cursor: &mut Cursor) -> Result<SourceExpression, ParseError> {
    let lateral = cursor.eat_keyword("LATERAL");

    let source = if cursor.at_punct(Punctuation::LParen) {
        cursor.advance();
        if cursor.at_any_keyword(&["SELECT", "WITH", "VALUES"]) {
            let inner = parse_select_query(cursor)?;
            cursor.expect_punct(Punctuation::RParen, ")")?;
            match inner {
                SelectQuery::Values(values) => TableSourceKind::Values(values),
                other => TableSourceKind::SubQuery(Box::new(other)),
            }
        } else {
            let swj = parse_source_with_joins(cursor)?;
            cursor.expect_punct(Punctuation::RParen, ")")?;
            TableSourceKind::Paren(Box::new(swj))
        }
    } else {
        let mut parts = vec![Ident::new(cursor.expect_name()?)];
        while cursor.eat_punct(Punctuation::Dot) {
            parts.push(Ident::new(cursor.expect_name()?));
        }
        if cursor.at_punct(Punctuation::LParen) {
            cursor.advance();
            let mut args = Vec::new();
            if !cursor.at_punct(Punctuation::RParen) {
                args.push(parse_expr(cursor)?);
                while cursor.eat_punct(Punctuation::Comma) {
                    args.push(parse_expr(cursor)?);
                }
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
            let name_part = parts.pop().unwrap();
            TableSourceKind::Table {
                name: Identifier::qualified(parts, name_part),
                args: Some(args),
            }
        } else {
            let name_part = parts.pop().unwrap();
            TableSourceKind::Table {
                name: Identifier::qualified(parts, name_part),
                args: None,
            }
        }
    };

    let alias = if cursor.eat_keyword("AS") {
        Some(Ident::new(cursor.expect_name()?))
    } else if matches!(
        cursor.peek().map(|l| &l.kind),
        Some(crate::tokenizer::TokenKind::Identifier) | Some(crate::tokenizer::TokenKind::QuotedIdentifier)
    ) {
        Some(Ident::new(cursor.expect_name()?))
    } else {
        None
    };

    let mut column_aliases = Vec::new();
    if alias.is_some() && cursor.eat_punct(Punctuation::LParen) {
        column_aliases.push(Ident::new(cursor.expect_name()?));
        while cursor.eat_punct(Punctuation::Comma) {
            column_aliases.push(Ident::new(cursor.expect_name()?));
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
    }

    Ok(SourceExpression {
        source,
        alias,
        column_aliases,
        lateral,
        comments: Default::default(),
    })
}

pub fn parse_order_by_items(cursor: &mut Cursor) -> Result<OrderByClause, ParseError> {
    let mut items = vec![parse_order_by_item(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        items.push(parse_order_by_item(cursor)?);
    }
    Ok(OrderByClause {
        items,
        comments: Default::default(),
    })
}

fn parse_order_by_item(cursor: &mut Cursor) -> Result<OrderByItem, ParseError> {
    let expr = parse_expr(cursor)?;
    let direction = if cursor.eat_keyword("ASC") {
        SortDirection::Asc
    } else if cursor.eat_keyword("DESC") {
        SortDirection::Desc
    } else {
        SortDirection::None
    };
    let nulls = if cursor.eat_keyword("NULLS") {
        if cursor.eat_keyword("FIRST") {
            NullsOrder::First
        } else {
            cursor.expect_keyword("LAST")?;
            NullsOrder::Last
        }
    } else {
        NullsOrder::None
    };
    Ok(OrderByItem {
        expr,
        direction,
        nulls,
    })
}

fn parse_limit(cursor: &mut Cursor) -> Result<Option<LimitClause>, ParseError> {
    if cursor.eat_keyword("LIMIT") {
        Ok(Some(LimitClause {
            value: parse_expr(cursor)?,
        }))
    } else {
        Ok(None)
    }
}

fn parse_offset(cursor: &mut Cursor) -> Result<Option<OffsetClause>, ParseError> {
    if cursor.eat_keyword("OFFSET") {
        let value = parse_expr(cursor)?;
        cursor.eat_keyword("ROW");
        cursor.eat_keyword("ROWS");
        Ok(Some(OffsetClause { value }))
    } else {
        Ok(None)
    }
}

fn parse_for_clause(cursor: &mut Cursor) -> Result<Option<ForClause>, ParseError> {
    if !cursor.eat_keyword("FOR") {
        return Ok(None);
    }
    let mode = if cursor.eat_keyword("UPDATE") {
        ForMode::Update
    } else if cursor.eat_keyword("SHARE") {
        ForMode::Share
    } else if cursor.eat_keyword("NO") {
        cursor.expect_keyword("KEY")?;
        cursor.expect_keyword("UPDATE")?;
        ForMode::NoKeyUpdate
    } else if cursor.eat_keyword("KEY") {
        cursor.expect_keyword("SHARE")?;
        ForMode::KeyShare
    } else {
        return Err(cursor.error("Expected UPDATE, SHARE, NO KEY UPDATE, or KEY SHARE after FOR"));
    };
    let of = if cursor.eat_keyword("OF") {
        let mut names = vec![Ident::new(cursor.expect_name()?)];
        while cursor.eat_punct(Punctuation::Comma) {
            names.push(Ident::new(cursor.expect_name()?));
        }
        Some(names)
    } else {
        None
    };
    let wait = if cursor.eat_keyword("NOWAIT") {
        WaitPolicy::NoWait
    } else if cursor.eat_keyword("SKIP") {
        cursor.expect_keyword("LOCKED")?;
        WaitPolicy::SkipLocked
    } else {
        WaitPolicy::Default
    };
    Ok(Some(ForClause { mode, of, wait }))
}

pub fn parse_returning_clause(cursor: &mut Cursor) -> Result<Option<ReturningClause>, ParseError> {
    if !cursor.eat_keyword("RETURNING") {
        return Ok(None);
    }
    let mut items = Vec::new();
    loop {
        if cursor.peek().map(|l| l.kind == crate::tokenizer::TokenKind::Operator && l.value == "*").unwrap_or(false) {
            cursor.advance();
            items.push(ReturningItem::Wildcard);
        } else {
            let value = parse_expr(cursor)?;
            let alias = if cursor.eat_keyword("AS") {
                Some(Ident::new(cursor.expect_name()?))
            } else {
                None
            };
            items.push(ReturningItem::Expr { value, alias });
        }
        if !cursor.eat_punct(Punctuation::Comma) {
            break;
        }
    }
    Ok(Some(ReturningClause {
        items,
        comments: Default::default(),
    }))
}
