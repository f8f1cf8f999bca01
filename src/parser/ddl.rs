//! DDL subset parsers (§4.2): CREATE/DROP TABLE, CREATE/DROP INDEX,
//! ALTER TABLE, CREATE/ALTER SEQUENCE, CREATE/DROP SCHEMA, COMMENT ON,
//! ANALYZE.

use super::expr::parse_expr;
use super::select::parse_select_query;
use super::Cursor;
use crate::ast::expr::Expr;
use crate::ast::ident::{Ident, Identifier};
use crate::ast::statement::*;
use crate::error::ParseError;
use crate::tokenizer::Punctuation;

fn parse_object_name(cursor: &mut Cursor) -> Result<Identifier, ParseError> {
    let mut parts = vec![Ident::new(cursor.expect_name()?)];
    while cursor.eat_punct(Punctuation::Dot) {
        parts.push(Ident::new(cursor.expect_name()?));
    }
    let name = parts.pop().unwrap();
    Ok(Identifier::qualified(parts, name))
}

fn parse_behavior(cursor: &mut Cursor) -> DropBehavior {
    if cursor.eat_keyword("CASCADE") {
        DropBehavior::Cascade
    } else if cursor.eat_keyword("RESTRICT") {
        DropBehavior::Restrict
    } else {
        DropBehavior::None
    }
}

pub fn parse_ddl(cursor: &mut Cursor) -> Result<Statement, ParseError> {
    if cursor.eat_keyword("CREATE") {
        if cursor.at_keyword("UNIQUE") || cursor.at_keyword("INDEX") {
            return Ok(Statement::CreateIndex(Box::new(parse_create_index(cursor)?)));
        }
        if cursor.at_keyword("SEQUENCE") {
            return Ok(Statement::CreateSequence(Box::new(parse_create_sequence(cursor)?)));
        }
        if cursor.at_keyword("SCHEMA") {
            return Ok(Statement::CreateSchema(Box::new(parse_create_schema(cursor)?)));
        }
        let is_temporary = cursor.eat_keyword("TEMPORARY") || cursor.eat_keyword("TEMP");
        return Ok(Statement::CreateTable(Box::new(parse_create_table(cursor, is_temporary)?)));
    }
    if cursor.eat_keyword("DROP") {
        if cursor.at_keyword("INDEX") || cursor.at_keyword("CONCURRENTLY") {
            return Ok(Statement::DropIndex(Box::new(parse_drop_index(cursor)?)));
        }
        if cursor.at_keyword("SCHEMA") {
            cursor.advance();
            let if_exists = parse_if_exists(cursor);
            let mut names = vec![Ident::new(cursor.expect_name()?)];
            while cursor.eat_punct(Punctuation::Comma) {
                names.push(Ident::new(cursor.expect_name()?));
            }
            let behavior = parse_behavior(cursor);
            return Ok(Statement::DropSchema(Box::new(DropSchemaQuery { names, if_exists, behavior })));
        }
        cursor.expect_keyword("TABLE")?;
        let (names, if_exists, behavior) = parse_drop_names_statement(cursor)?;
        return Ok(Statement::DropTable(Box::new(DropTableQuery { names, if_exists, behavior })));
    }
    if cursor.eat_keyword("ALTER") {
        if cursor.at_keyword("SEQUENCE") {
            return Ok(Statement::AlterSequence(Box::new(parse_alter_sequence(cursor)?)));
        }
        return Ok(Statement::AlterTable(Box::new(parse_alter_table(cursor)?)));
    }
    Err(cursor.error("Expected CREATE, DROP, or ALTER"))
}

fn parse_if_exists(cursor: &mut Cursor) -> bool {
    if cursor.eat_keyword("IF") {
        let _ = cursor.expect_keyword("EXISTS");
        true
    } else {
        false
    }
}

fn parse_if_not_exists(cursor: &mut Cursor) -> bool {
    if cursor.eat_keyword("IF") {
        let _ = cursor.expect_keyword("NOT");
        let _ = cursor.expect_keyword("EXISTS");
        true
    } else {
        false
    }
}

/// `DROP TABLE [IF EXISTS] names... [CASCADE|RESTRICT]` — names then behavior.
fn parse_drop_names_statement(cursor: &mut Cursor) -> Result<(Vec<Identifier>, bool, DropBehavior), ParseError> {
    let if_exists = parse_if_exists(cursor);
    let mut names = vec![parse_object_name(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        names.push(parse_object_name(cursor)?);
    }
    let behavior = parse_behavior(cursor);
    Ok((names, if_exists, behavior))
}

fn parse_create_table(cursor: &mut Cursor, is_temporary: bool) -> Result<CreateTableQuery, ParseError> {
    cursor.expect_keyword("TABLE")?;
    let if_not_exists = parse_if_not_exists(cursor);
    let name = parse_object_name(cursor)?;
    if cursor.at_punct(Punctuation::LParen) {
        return Err(cursor.error("inline column definitions in CREATE TABLE are not supported"));
    }
    cursor.expect_keyword("AS")?;
    let as_select = Some(parse_select_query(cursor)?);
    Ok(CreateTableQuery {
        name,
        is_temporary,
        if_not_exists,
        as_select,
        comments: Default::default(),
    })
}

fn parse_create_index(cursor: &mut Cursor) -> Result<CreateIndexQuery, ParseError> {
    let unique = cursor.eat_keyword("UNIQUE");
    cursor.expect_keyword("INDEX")?;
    let concurrently = cursor.eat_keyword("CONCURRENTLY");
    let if_not_exists = parse_if_not_exists(cursor);
    let name = if cursor.at_keyword("ON") {
        None
    } else {
        Some(Ident::new(cursor.expect_name()?))
    };
    cursor.expect_keyword("ON")?;
    let table = parse_object_name(cursor)?;
    let using_method = if cursor.eat_keyword("USING") {
        Some(Ident::new(cursor.expect_name()?))
    } else {
        None
    };
    cursor.expect_punct(Punctuation::LParen, "(")?;
    let mut columns = vec![parse_expr(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        columns.push(parse_expr(cursor)?);
    }
    cursor.expect_punct(Punctuation::RParen, ")")?;

    let include = if cursor.eat_keyword("INCLUDE") {
        cursor.expect_punct(Punctuation::LParen, "(")?;
        let mut cols = vec![Ident::new(cursor.expect_name()?)];
        while cursor.eat_punct(Punctuation::Comma) {
            cols.push(Ident::new(cursor.expect_name()?));
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        cols
    } else {
        Vec::new()
    };

    let with_storage_params = if cursor.eat_keyword("WITH") {
        cursor.expect_punct(Punctuation::LParen, "(")?;
        let mut params = vec![parse_storage_param(cursor)?];
        while cursor.eat_punct(Punctuation::Comma) {
            params.push(parse_storage_param(cursor)?);
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        params
    } else {
        Vec::new()
    };

    let tablespace = if cursor.eat_keyword("TABLESPACE") {
        Some(Ident::new(cursor.expect_name()?))
    } else {
        None
    };

    let r#where = if cursor.eat_keyword("WHERE") {
        Some(crate::ast::clause::WhereClause::new(parse_expr(cursor)?))
    } else {
        None
    };

    Ok(CreateIndexQuery {
        unique,
        concurrently,
        if_not_exists,
        name,
        table,
        using_method,
        columns,
        include,
        with_storage_params,
        tablespace,
        r#where,
    })
}

fn parse_storage_param(cursor: &mut Cursor) -> Result<(Ident, Expr), ParseError> {
    let key = Ident::new(cursor.expect_name()?);
    if !cursor
        .peek()
        .map(|l| l.kind == crate::tokenizer::TokenKind::Operator && l.value == "=")
        .unwrap_or(false)
    {
        return Err(cursor.error("Expected `=` in storage parameter"));
    }
    cursor.advance();
    let value = parse_expr(cursor)?;
    Ok((key, value))
}

fn parse_drop_index(cursor: &mut Cursor) -> Result<DropIndexQuery, ParseError> {
    let concurrently = cursor.eat_keyword("CONCURRENTLY");
    cursor.expect_keyword("INDEX")?;
    let if_exists = parse_if_exists(cursor);
    let mut names = vec![parse_object_name(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        names.push(parse_object_name(cursor)?);
    }
    let behavior = parse_behavior(cursor);
    Ok(DropIndexQuery {
        concurrently,
        if_exists,
        names,
        behavior,
    })
}

fn parse_alter_table(cursor: &mut Cursor) -> Result<AlterTableQuery, ParseError> {
    cursor.expect_keyword("TABLE")?;
    let if_exists = parse_if_exists(cursor);
    let only = cursor.eat_keyword("ONLY");
    let name = parse_object_name(cursor)?;
    let mut actions = vec![parse_alter_table_action(cursor)?];
    while cursor.eat_punct(Punctuation::Comma) {
        actions.push(parse_alter_table_action(cursor)?);
    }
    Ok(AlterTableQuery {
        name,
        if_exists,
        only,
        actions,
    })
}

fn parse_alter_table_action(cursor: &mut Cursor) -> Result<AlterTableAction, ParseError> {
    if cursor.eat_keyword("ADD") {
        cursor.expect_keyword("CONSTRAINT")?;
        let name = Ident::new(cursor.expect_name()?);
        let mut definition = String::new();
        while !cursor.at_punct(Punctuation::Comma) && !cursor.is_eof() {
            if let Some(lexeme) = cursor.peek() {
                if !definition.is_empty() {
                    definition.push(' ');
                }
                definition.push_str(&lexeme.value);
            }
            cursor.advance();
        }
        return Ok(AlterTableAction::AddConstraint { name, definition });
    }
    if cursor.eat_keyword("DROP") {
        if cursor.eat_keyword("CONSTRAINT") {
            let if_exists = parse_if_exists(cursor);
            let name = Ident::new(cursor.expect_name()?);
            let behavior = parse_behavior(cursor);
            return Ok(AlterTableAction::DropConstraint { name, if_exists, behavior });
        }
        cursor.expect_keyword("COLUMN")?;
        let if_exists = parse_if_exists(cursor);
        let name = Ident::new(cursor.expect_name()?);
        let behavior = parse_behavior(cursor);
        return Ok(AlterTableAction::DropColumn { name, if_exists, behavior });
    }
    if cursor.eat_keyword("ALTER") {
        cursor.eat_keyword("COLUMN");
        let column = Ident::new(cursor.expect_name()?);
        if cursor.eat_keyword("SET") {
            cursor.expect_keyword("DEFAULT")?;
            let expr = parse_expr(cursor)?;
            return Ok(AlterTableAction::AlterColumnSetDefault { column, expr });
        }
        cursor.expect_keyword("DROP")?;
        cursor.expect_keyword("DEFAULT")?;
        return Ok(AlterTableAction::AlterColumnDropDefault { column });
    }
    Err(cursor.error("Expected ADD CONSTRAINT, DROP CONSTRAINT, DROP COLUMN, or ALTER COLUMN"))
}

fn parse_sequence_options(cursor: &mut Cursor) -> Result<SequenceOptions, ParseError> {
    let mut options = SequenceOptions {
        increment_by: None,
        start_with: None,
        minvalue: None,
        maxvalue: None,
        cache: None,
        restart_with: None,
        owned_by: None,
    };
    loop {
        if cursor.eat_keyword("INCREMENT") {
            cursor.eat_keyword("BY");
            options.increment_by = Some(parse_expr(cursor)?);
        } else if cursor.eat_keyword("START") {
            cursor.eat_keyword("WITH");
            options.start_with = Some(parse_expr(cursor)?);
        } else if cursor.eat_keyword("MINVALUE") {
            options.minvalue = Some(parse_expr(cursor)?);
        } else if cursor.eat_keyword("MAXVALUE") {
            options.maxvalue = Some(parse_expr(cursor)?);
        } else if cursor.eat_keyword("CACHE") {
            options.cache = Some(parse_expr(cursor)?);
        } else if cursor.eat_keyword("RESTART") {
            cursor.eat_keyword("WITH");
            options.restart_with = Some(parse_expr(cursor)?);
        } else if cursor.eat_keyword("OWNED") {
            cursor.expect_keyword("BY")?;
            options.owned_by = Some(parse_object_name(cursor)?);
        } else {
            break;
        }
    }
    Ok(options)
}

fn parse_create_sequence(cursor: &mut Cursor) -> Result<CreateSequenceQuery, ParseError> {
    cursor.expect_keyword("SEQUENCE")?;
    let if_not_exists = parse_if_not_exists(cursor);
    let name = parse_object_name(cursor)?;
    let options = parse_sequence_options(cursor)?;
    Ok(CreateSequenceQuery {
        name,
        if_not_exists,
        options,
    })
}

fn parse_alter_sequence(cursor: &mut Cursor) -> Result<AlterSequenceQuery, ParseError> {
    cursor.expect_keyword("SEQUENCE")?;
    let if_exists = parse_if_exists(cursor);
    let name = parse_object_name(cursor)?;
    let options = parse_sequence_options(cursor)?;
    Ok(AlterSequenceQuery {
        name,
        if_exists,
        options,
    })
}

fn parse_create_schema(cursor: &mut Cursor) -> Result<CreateSchemaQuery, ParseError> {
    cursor.expect_keyword("SCHEMA")?;
    let if_not_exists = parse_if_not_exists(cursor);
    let name = Ident::new(cursor.expect_name()?);
    let authorization = if cursor.eat_keyword("AUTHORIZATION") {
        Some(Ident::new(cursor.expect_name()?))
    } else {
        None
    };
    Ok(CreateSchemaQuery {
        name,
        if_not_exists,
        authorization,
    })
}

pub fn parse_comment_on(cursor: &mut Cursor) -> Result<CommentOnQuery, ParseError> {
    cursor.expect_keyword("COMMENT")?;
    cursor.expect_keyword("ON")?;
    let target_kind = if cursor.eat_keyword("TABLE") {
        CommentTargetKind::Table
    } else {
        cursor.expect_keyword("COLUMN")?;
        CommentTargetKind::Column
    };
    let target = parse_object_name(cursor)?;
    cursor.expect_keyword("IS")?;
    let text = if cursor.eat_keyword("NULL") {
        None
    } else {
        let lexeme = cursor
            .peek()
            .ok_or_else(|| cursor.error("Expected a string literal or NULL"))?;
        if lexeme.kind != crate::tokenizer::TokenKind::StringLiteral {
            return Err(cursor.error("Expected a string literal or NULL"));
        }
        let value = lexeme.value.clone();
        cursor.advance();
        Some(value)
    };
    Ok(CommentOnQuery {
        target_kind,
        target,
        text,
    })
}

pub fn parse_analyze(cursor: &mut Cursor) -> Result<AnalyzeQuery, ParseError> {
    cursor.expect_keyword("ANALYZE")?;
    let verbose = cursor.eat_keyword("VERBOSE");
    if cursor.is_eof() || cursor.at_punct(Punctuation::Semicolon) {
        return Ok(AnalyzeQuery {
            verbose,
            target: None,
            columns: None,
        });
    }
    let target = Some(parse_object_name(cursor)?);
    let columns = if cursor.eat_punct(Punctuation::LParen) {
        let mut cols = vec![Ident::new(cursor.expect_name()?)];
        while cursor.eat_punct(Punctuation::Comma) {
            cols.push(Ident::new(cursor.expect_name()?));
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
        Some(cols)
    } else {
        None
    };
    Ok(AnalyzeQuery {
        verbose,
        target,
        columns,
    })
}
