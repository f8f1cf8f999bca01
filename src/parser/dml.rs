//! `InsertQueryParser`, `UpdateQueryParser`, `DeleteQueryParser`,
//! `MergeQueryParser` (§4.2).

use super::expr::parse_expr;
use super::select::{parse_from_clause, parse_returning_clause, parse_select_query, parse_source_expression};
use super::Cursor;
use crate::ast::clause::*;
use crate::ast::ident::Ident;
use crate::ast::statement::*;
use crate::error::ParseError;
use crate::tokenizer::Punctuation;

/// Parses a bare `[WITH ...]` prefix shared by INSERT/UPDATE/DELETE/MERGE,
/// without consuming the statement's own leading keyword.
fn parse_optional_with(cursor: &mut Cursor) -> Result<Option<WithClause>, ParseError> {
    if !cursor.eat_keyword("WITH") {
        return Ok(None);
    }
    let recursive = cursor.eat_keyword("RECURSIVE");
    let mut tables = Vec::new();
    loop {
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
        let query = parse_select_query(cursor)?;
        cursor.expect_punct(Punctuation::RParen, ")")?;
        tables.push(CommonTable {
            name,
            column_aliases,
            materialized,
            query,
            comments: Default::default(),
        });
        if !cursor.eat_punct(Punctuation::Comma) {
            break;
        }
    }
    Ok(Some(WithClause {
        recursive,
        tables,
        comments: Default::default(),
    }))
}

fn parse_target(cursor: &mut Cursor) -> Result<SourceExpression, ParseError> {
    let mut parts = vec![Ident::new(cursor.expect_name()?)];
    while cursor.eat_punct(Punctuation::Dot) {
        parts.push(Ident::new(cursor.expect_name()?));
    }
    let name_part = parts.pop().unwrap();
    let name = crate::ast::ident::Identifier::qualified(parts, name_part);
    let mut source = SourceExpression::table(name);
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
    source.alias = alias;
    Ok(source)
}

pub fn parse_insert(cursor: &mut Cursor) -> Result<InsertQuery, ParseError> {
    let with = parse_optional_with(cursor)?;
    cursor.expect_keyword("INSERT")?;
    cursor.expect_keyword("INTO")?;
    let target = parse_target(cursor)?;

    let columns = if cursor.at_punct(Punctuation::LParen) {
        cursor.advance();
        let mut cols = vec![Ident::new(cursor.expect_name()?)];
        while cursor.eat_punct(Punctuation::Comma) {
            cols.push(Ident::new(cursor.expect_name()?));
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        Some(cols)
    } else {
        None
    };

    let source = if cursor.eat_keyword("DEFAULT") {
        cursor.expect_keyword("VALUES")?;
        InsertSource::DefaultValues
    } else if cursor.at_keyword("VALUES") {
        let query = parse_select_query(cursor)?;
        match query {
            crate::ast::statement::SelectQuery::Values(v) => InsertSource::Values(*v),
            other => InsertSource::Select(other),
        }
    } else {
        InsertSource::Select(parse_select_query(cursor)?)
    };

    let on_conflict = if cursor.eat_keyword("ON") {
        cursor.expect_keyword("CONFLICT")?;
        let mut target_columns = Vec::new();
        if cursor.eat_punct(Punctuation::LParen) {
            target_columns.push(Ident::new(cursor.expect_name()?));
            while cursor.eat_punct(Punctuation::Comma) {
                target_columns.push(Ident::new(cursor.expect_name()?));
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
        }
        cursor.expect_keyword("DO")?;
        let (do_update, do_nothing, where_clause) = if cursor.eat_keyword("NOTHING") {
            (None, true, None)
        } else {
            cursor.expect_keyword("UPDATE")?;
            cursor.expect_keyword("SET")?;
            let set = parse_set_items(cursor)?;
            let wc = if cursor.eat_keyword("WHERE") {
                Some(WhereClause::new(parse_expr(cursor)?))
            } else {
                None
            };
            (Some(set), false, wc)
        };
        Some(OnConflict {
            target_columns,
            do_update,
            do_nothing,
            where_clause,
        })
    } else {
        None
    };

    let returning = parse_returning_clause(cursor)?;

    Ok(InsertQuery {
        with,
        target,
        columns,
        source,
        on_conflict,
        returning,
        params: Default::default(),
        comments: Default::default(),
    })
}

fn parse_set_items(cursor: &mut Cursor) -> Result<SetClause, ParseError> {
    let mut items = vec![parse_set_item(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        items.push(parse_set_item(cursor)?);
    }
    Ok(SetClause {
        items,
        comments: Default::default(),
    })
}

fn parse_set_item(cursor: &mut Cursor) -> Result<SetItem, ParseError> {
    let column = Ident::new(cursor.expect_name()?);
    let after_column = cursor.trailing_comments_of_last();
    if !cursor
        .peek()
        .map(|l| l.kind == crate::tokenizer::TokenKind::Operator && l.value == "=")
        .unwrap_or(false)
    {
        return Err(cursor.error("Expected `=` in SET clause"));
    }
    cursor.advance();
    let value = parse_expr(cursor)?;
    let mut comments = crate::ast::comment::CommentSlots::default();
    if !after_column.is_empty() {
        comments.add(crate::ast::comment::CommentPosition::After, after_column);
    }
    Ok(SetItem {
        column,
        value,
        comments,
    })
}

pub fn parse_update(cursor: &mut Cursor) -> Result<UpdateQuery, ParseError> {
    let with = parse_optional_with(cursor)?;
    cursor.expect_keyword("UPDATE")?;
    let target = parse_target(cursor)?;
    cursor.expect_keyword("SET")?;
    let set = parse_set_items(cursor)?;
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
    let returning = parse_returning_clause(cursor)?;
    Ok(UpdateQuery {
        with,
        target,
        set,
        from,
        r#where,
        returning,
        params: Default::default(),
        comments: Default::default(),
    })
}

pub fn parse_delete(cursor: &mut Cursor) -> Result<DeleteQuery, ParseError> {
    let with = parse_optional_with(cursor)?;
    cursor.expect_keyword("DELETE")?;
    cursor.expect_keyword("FROM")?;
    let target = parse_target(cursor)?;
    let using = if cursor.eat_keyword("USING") {
        let mut sources = vec![parse_source_expression(cursor)?];
        while cursor.eat_punct(Punctuation::Comma) {
            sources.push(parse_source_expression(cursor)?);
        }
        Some(UsingClause {
            sources,
            comments: Default::default(),
        })
    } else {
        None
    };
    let r#where = if cursor.eat_keyword("WHERE") {
        Some(WhereClause::new(parse_expr(cursor)?))
    } else {
        None
    };
    let returning = parse_returning_clause(cursor)?;
    Ok(DeleteQuery {
        with,
        target,
        using,
        r#where,
        returning,
        params: Default::default(),
        comments: Default::default(),
    })
}

pub fn parse_merge(cursor: &mut Cursor) -> Result<MergeQuery, ParseError> {
    let with = parse_optional_with(cursor)?;
    cursor.expect_keyword("MERGE")?;
    cursor.expect_keyword("INTO")?;
    let into = parse_target(cursor)?;
    cursor.expect_keyword("USING")?;
    let using = parse_target(cursor)?;
    cursor.expect_keyword("ON")?;
    let on = parse_expr(cursor)?;

    let mut when_clauses = Vec::new();
    while cursor.eat_keyword("WHEN") {
        let match_type = if cursor.eat_keyword("MATCHED") {
            MergeMatchType::Matched
        } else {
            cursor.expect_keyword("NOT")?;
            cursor.expect_keyword("MATCHED")?;
            if cursor.eat_keyword("BY") {
                if cursor.eat_keyword("SOURCE") {
                    MergeMatchType::NotMatchedBySource
                } else {
                    cursor.expect_keyword("TARGET")?;
                    MergeMatchType::NotMatchedByTarget
                }
            } else {
                MergeMatchType::NotMatchedByTarget
            }
        };
        let condition = if cursor.eat_keyword("AND") {
            Some(parse_expr(cursor)?)
        } else {
            None
        };
        cursor.expect_keyword("THEN")?;
        let then_leading = cursor.leading_comments();
        let action = parse_merge_action(cursor)?;
        let mut comments = crate::ast::comment::CommentSlots::default();
        if !then_leading.is_empty() {
            comments.set_then_leading(then_leading);
        }
        when_clauses.push(WhenClause {
            match_type,
            condition,
            action,
            comments,
        });
    }

    Ok(MergeQuery {
        with,
        into,
        using,
        on,
        when_clauses,
        params: Default::default(),
        comments: Default::default(),
    })
}

fn parse_merge_action(cursor: &mut Cursor) -> Result<MergeAction, ParseError> {
    if cursor.eat_keyword("DO") {
        cursor.expect_keyword("NOTHING")?;
        return Ok(MergeAction::DoNothing);
    }
    if cursor.eat_keyword("UPDATE") {
        cursor.expect_keyword("SET")?;
        let set = parse_set_items(cursor)?;
        let r#where = if cursor.eat_keyword("WHERE") {
            Some(WhereClause::new(parse_expr(cursor)?))
        } else {
            None
        };
        return Ok(MergeAction::Update { set, r#where });
    }
    if cursor.eat_keyword("DELETE") {
        let r#where = if cursor.eat_keyword("WHERE") {
            Some(WhereClause::new(parse_expr(cursor)?))
        } else {
            None
        };
        return Ok(MergeAction::Delete { r#where });
    }
    if cursor.eat_keyword("INSERT") {
        if cursor.eat_keyword("DEFAULT") {
            cursor.expect_keyword("VALUES")?;
            return Ok(MergeAction::Insert {
                columns: None,
                values: None,
                default_values: true,
            });
        }
        let columns = if cursor.at_punct(Punctuation::LParen) {
            cursor.advance();
            let mut cols = vec![Ident::new(cursor.expect_name()?)];
            while cursor.eat_punct(Punctuation::Comma) {
                cols.push(Ident::new(cursor.expect_name()?));
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
            Some(cols)
        } else {
            None
        };
        cursor.expect_keyword("VALUES")?;
        cursor.expect_punct(Punctuation::LParen, "(")?;
        let mut values = vec![parse_expr(cursor)?];
        while cursor.eat_punct(Punctuation::Comma) {
            values.push(parse_expr(cursor)?);
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        return Ok(MergeAction::Insert {
            columns,
            values: Some(values),
            default_values: false,
        });
    }
    Err(cursor.error("Expected UPDATE, DELETE, INSERT, or DO NOTHING after THEN"))
}
