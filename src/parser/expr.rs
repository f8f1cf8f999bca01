//! Expression parsing: precedence climbing over SQL's operator table
//! (§4.2 "Expression parsing").

use super::select::parse_select_query;
use super::Cursor;
use crate::ast::expr::*;
use crate::ast::ident::{Ident, Identifier};
use crate::ast::value::{DateTimeField, Literal, LiteralKind, LiteralPrefix};
use crate::ast::{OrderByClause, WhereClause, WindowName, WindowSpec};
use crate::error::ParseError;
use crate::tokenizer::{Punctuation, TokenKind};

pub fn parse_expr(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    parse_or(cursor)
}

fn parse_or(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = parse_and(cursor)?;
    while cursor.eat_keyword("OR") {
        let right = parse_and(cursor)?;
        left = Expr::BinaryOp(BinaryOp::new("OR", left, right));
    }
    Ok(left)
}

fn parse_and(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = parse_not(cursor)?;
    while cursor.eat_keyword("AND") {
        let right = parse_not(cursor)?;
        left = Expr::BinaryOp(BinaryOp::new("AND", left, right));
    }
    Ok(left)
}

fn parse_not(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    if cursor.eat_keyword("NOT") {
        let operand = parse_not(cursor)?;
        return Ok(Expr::UnaryOp(UnaryOp {
            op: "NOT".to_string(),
            operand: Box::new(operand),
            prefix: true,
            comments: Default::default(),
        }));
    }
    parse_comparison(cursor)
}

fn parse_comparison(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = parse_additive(cursor)?;
    loop {
        let negated = cursor.at_keyword("NOT")
            && (cursor.at_keyword_offset(1, "BETWEEN")
                || cursor.at_keyword_offset(1, "IN")
                || cursor.at_keyword_offset(1, "LIKE")
                || cursor.at_keyword_offset(1, "ILIKE"));
        if negated {
            cursor.advance();
        }

        if cursor.eat_keyword("BETWEEN") {
            let low = parse_additive(cursor)?;
            cursor.expect_keyword("AND")?;
            let high = parse_additive(cursor)?;
            left = Expr::Between(Box::new(Between {
                target: left,
                low,
                high,
                negated,
                comments: Default::default(),
            }));
            continue;
        }

        if cursor.eat_keyword("IN") {
            cursor.expect_punct(Punctuation::LParen, "(")?;
            let list = if cursor.at_any_keyword(&["SELECT", "WITH", "VALUES"]) {
                InListSource::SubQuery(parse_select_query(cursor)?)
            } else {
                let mut items = Vec::new();
                if !cursor.at_punct(Punctuation::RParen) {
                    items.push(parse_expr(cursor)?);
                    while cursor.eat_punct(Punctuation::Comma) {
                        items.push(parse_expr(cursor)?);
                    }
                }
                InListSource::Values(items)
            };
            cursor.expect_punct(Punctuation::RParen, ")")?;
            left = Expr::InList(Box::new(InList {
                target: left,
                list,
                negated,
                comments: Default::default(),
            }));
            continue;
        }

        if cursor.at_keyword("LIKE") || cursor.at_keyword("ILIKE") {
            let op_word = if cursor.eat_keyword("LIKE") {
                "LIKE"
            } else {
                cursor.advance();
                "ILIKE"
            };
            let pattern = parse_additive(cursor)?;
            let op = if negated {
                format!("NOT {}", op_word)
            } else {
                op_word.to_string()
            };
            let mut node = Expr::BinaryOp(BinaryOp::new(op, left, pattern));
            if cursor.eat_keyword("ESCAPE") {
                let escape = parse_additive(cursor)?;
                node = Expr::FunctionCall(Box::new(FunctionCall {
                    qualified_name: Identifier::unqualified("__like_escape"),
                    args: Some(vec![FunctionArg::Value(node), FunctionArg::Value(escape)]),
                    distinct: false,
                    order_by: None,
                    within_group: None,
                    over: None,
                    filter: None,
                    with_ordinality: false,
                    comments: Default::default(),
                }));
            }
            left = node;
            continue;
        }

        if cursor.eat_keyword("IS") {
            let is_not = cursor.eat_keyword("NOT");
            let op = if is_not { "IS NOT" } else { "IS" };
            if cursor.eat_keyword("NULL") {
                left = Expr::UnaryOp(UnaryOp {
                    op: format!("{} NULL", op),
                    operand: Box::new(left),
                    prefix: false,
                    comments: Default::default(),
                });
            } else if cursor.eat_keyword("TRUE") {
                left = Expr::UnaryOp(UnaryOp {
                    op: format!("{} TRUE", op),
                    operand: Box::new(left),
                    prefix: false,
                    comments: Default::default(),
                });
            } else if cursor.eat_keyword("FALSE") {
                left = Expr::UnaryOp(UnaryOp {
                    op: format!("{} FALSE", op),
                    operand: Box::new(left),
                    prefix: false,
                    comments: Default::default(),
                });
            } else if cursor.at_keyword("UNKNOWN") {
                cursor.advance();
                left = Expr::UnaryOp(UnaryOp {
                    op: format!("{} UNKNOWN", op),
                    operand: Box::new(left),
                    prefix: false,
                    comments: Default::default(),
                });
            } else if cursor.eat_keyword("DISTINCT") {
                cursor.expect_keyword("FROM")?;
                let right = parse_additive(cursor)?;
                left = Expr::BinaryOp(BinaryOp::new(format!("{} DISTINCT FROM", op), left, right));
            } else {
                return Err(cursor.error("Expected NULL, TRUE, FALSE, UNKNOWN or DISTINCT FROM after IS"));
            }
            continue;
        }

        if let Some(op) = comparison_operator(cursor) {
            cursor.advance();
            let right = parse_additive(cursor)?;
            left = Expr::BinaryOp(BinaryOp::new(op, left, right));
            continue;
        }

        break;
    }
    Ok(left)
}

fn comparison_operator(cursor: &Cursor) -> Option<&'static str> {
    let lexeme = cursor.peek()?;
    if lexeme.kind != TokenKind::Operator {
        return None;
    }
    Some(match lexeme.value.as_str() {
        "=" => "=",
        "!=" => "!=",
        "<>" => "<>",
        "<" => "<",
        ">" => ">",
        "<=" => "<=",
        ">=" => ">=",
        _ => return None,
    })
}

fn parse_additive(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = parse_multiplicative(cursor)?;
    loop {
        let op = match cursor.peek() {
            Some(l) if l.kind == TokenKind::Operator && (l.value == "+" || l.value == "-" || l.value == "||") => {
                l.value.clone()
            }
            _ => break,
        };
        cursor.advance();
        let right = parse_multiplicative(cursor)?;
        left = Expr::BinaryOp(BinaryOp::new(op, left, right));
    }
    Ok(left)
}

fn parse_multiplicative(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = parse_unary(cursor)?;
    loop {
        let op = match cursor.peek() {
            Some(l) if l.kind == TokenKind::Operator && (l.value == "*" || l.value == "/" || l.value == "%") => {
                l.value.clone()
            }
            _ => break,
        };
        cursor.advance();
        let right = parse_unary(cursor)?;
        left = Expr::BinaryOp(BinaryOp::new(op, left, right));
    }
    Ok(left)
}

fn parse_unary(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    if let Some(l) = cursor.peek() {
        if l.kind == TokenKind::Operator && (l.value == "-" || l.value == "+" || l.value == "~") {
            let op = l.value.clone();
            cursor.advance();
            let operand = parse_unary(cursor)?;
            return Ok(Expr::UnaryOp(UnaryOp {
                op,
                operand: Box::new(operand),
                prefix: true,
                comments: Default::default(),
            }));
        }
    }
    parse_postfix(cursor)
}

fn parse_postfix(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut expr = parse_primary(cursor)?;
    loop {
        if cursor.peek().map(|l| l.kind == TokenKind::Operator && l.value == "::").unwrap_or(false) {
            cursor.advance();
            let target_type = parse_cast_type(cursor)?;
            expr = Expr::Cast(Box::new(Cast {
                expr,
                target_type,
                comments: Default::default(),
            }));
            continue;
        }
        if cursor.at_punct(Punctuation::LBracket) {
            cursor.advance();
            expr = parse_array_access(cursor, expr)?;
            continue;
        }
        break;
    }
    Ok(expr)
}

fn parse_array_access(cursor: &mut Cursor, array: Expr) -> Result<Expr, ParseError> {
    if cursor.peek().map(|l| l.kind == TokenKind::Operator && l.value == ":").unwrap_or(false) {
        cursor.advance();
        let end = if cursor.at_punct(Punctuation::RBracket) {
            None
        } else {
            Some(parse_expr(cursor)?)
        };
        cursor.expect_punct(Punctuation::RBracket, "]")?;
        return Ok(Expr::ArraySlice(Box::new(ArraySlice {
            array,
            start: None,
            end,
            comments: Default::default(),
        })));
    }

    let first = parse_expr(cursor)?;
    if cursor.peek().map(|l| l.kind == TokenKind::Operator && l.value == ":").unwrap_or(false) {
        cursor.advance();
        let end = if cursor.at_punct(Punctuation::RBracket) {
            None
        } else {
            Some(parse_expr(cursor)?)
        };
        cursor.expect_punct(Punctuation::RBracket, "]")?;
        return Ok(Expr::ArraySlice(Box::new(ArraySlice {
            array,
            start: Some(first),
            end,
            comments: Default::default(),
        })));
    }

    cursor.expect_punct(Punctuation::RBracket, "]")?;
    Ok(Expr::ArrayIndex(Box::new(ArrayIndex {
        array,
        index: first,
        comments: Default::default(),
    })))
}

fn parse_cast_type(cursor: &mut Cursor) -> Result<CastType, ParseError> {
    let mut namespaces = Vec::new();
    let mut name = cursor.expect_name()?;
    while cursor.at_punct(Punctuation::Dot) {
        cursor.advance();
        namespaces.push(Ident::new(name));
        name = cursor.expect_name()?;
    }
    let mut args = Vec::new();
    if cursor.eat_punct(Punctuation::LParen) {
        loop {
            let lexeme = cursor
                .peek()
                .ok_or_else(|| cursor.error("Expected type argument"))?;
            args.push(lexeme.value.clone());
            cursor.advance();
            if !cursor.eat_punct(Punctuation::Comma) {
                break;
            }
        }
        cursor.expect_punct(Punctuation::RParen, ")")?;
    }
    let mut array_suffixes = 0;
    while cursor.at_punct(Punctuation::LBracket) {
        cursor.advance();
        cursor.expect_punct(Punctuation::RBracket, "]")?;
        array_suffixes += 1;
    }
    Ok(CastType {
        namespaces,
        name,
        args,
        array_suffixes,
    })
}

fn parse_primary(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let lexeme = cursor
        .peek()
        .ok_or_else(|| cursor.error("Unexpected end of input"))?
        .clone();

    match lexeme.kind {
        TokenKind::Punctuation(Punctuation::LParen) => {
            cursor.advance();
            if cursor.at_any_keyword(&["SELECT", "WITH", "VALUES"]) {
                let query = parse_select_query(cursor)?;
                cursor.expect_punct(Punctuation::RParen, ")")?;
                return Ok(Expr::SubQuery(Box::new(SubQuery {
                    query,
                    comments: Default::default(),
                })));
            }
            let mut items = vec![parse_expr(cursor)?];
            while cursor.eat_punct(Punctuation::Comma) {
                items.push(parse_expr(cursor)?);
            }
            cursor.expect_punct(Punctuation::RParen, ")")?;
            if items.len() == 1 {
                Ok(items.pop().unwrap())
            } else {
                Ok(Expr::Tuple(Tuple {
                    items,
                    comments: Default::default(),
                }))
            }
        }
        TokenKind::Operator if lexeme.value == "*" => {
            cursor.advance();
            Ok(Expr::Wildcard)
        }
        TokenKind::StringLiteral => {
            cursor.advance();
            let literal = match &lexeme.value {
                v if v.starts_with("E'") && v.ends_with('\'') => {
                    Literal::escaped_string(v[2..v.len() - 1].to_string())
                }
                v => Literal::string(v.clone()),
            };
            Ok(Expr::Literal(literal))
        }
        TokenKind::NumericLiteral => {
            cursor.advance();
            Ok(Expr::Literal(Literal::number(lexeme.value.clone())))
        }
        TokenKind::ParameterPlaceholder => {
            cursor.advance();
            Ok(Expr::Parameter(parse_parameter_ref(&lexeme.value)))
        }
        TokenKind::Keyword if lexeme.value.eq_ignore_ascii_case("TRUE") => {
            cursor.advance();
            Ok(Expr::Literal(Literal::boolean(true)))
        }
        TokenKind::Keyword if lexeme.value.eq_ignore_ascii_case("FALSE") => {
            cursor.advance();
            Ok(Expr::Literal(Literal::boolean(false)))
        }
        TokenKind::Keyword | TokenKind::Literal if lexeme.value.eq_ignore_ascii_case("NULL") => {
            cursor.advance();
            Ok(Expr::Literal(Literal::null()))
        }
        TokenKind::Keyword if lexeme.value.eq_ignore_ascii_case("CASE") => parse_case(cursor),
        TokenKind::Keyword if lexeme.value.eq_ignore_ascii_case("CAST") => parse_cast_fn(cursor),
        TokenKind::Keyword if lexeme.value.eq_ignore_ascii_case("EXTRACT") => parse_extract(cursor),
        TokenKind::Keyword | TokenKind::Identifier | TokenKind::QuotedIdentifier => parse_identifier_or_call(cursor),
        _ => Err(cursor.error(format!("Unexpected token `{}`", lexeme.value))),
    }
}

fn parse_parameter_ref(raw: &str) -> ParameterRef {
    if let Some(rest) = raw.strip_prefix(':') {
        return ParameterRef {
            name: Some(rest.to_string()),
            index: None,
            comments: Default::default(),
        };
    }
    if let Some(rest) = raw.strip_prefix('@') {
        return ParameterRef {
            name: Some(rest.to_string()),
            index: None,
            comments: Default::default(),
        };
    }
    if let Some(rest) = raw.strip_prefix('$') {
        if let Ok(index) = rest.parse::<u32>() {
            return ParameterRef {
                name: None,
                index: Some(index),
                comments: Default::default(),
            };
        }
    }
    ParameterRef {
        name: None,
        index: None,
        comments: Default::default(),
    }
}

fn parse_case(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    cursor.expect_keyword("CASE")?;
    let discriminant = if cursor.at_keyword("WHEN") {
        None
    } else {
        Some(parse_expr(cursor)?)
    };
    let mut branches = Vec::new();
    while cursor.eat_keyword("WHEN") {
        let when = parse_expr(cursor)?;
        cursor.expect_keyword("THEN")?;
        let then = parse_expr(cursor)?;
        branches.push(CaseBranch { when, then });
    }
    if branches.is_empty() {
        return Err(cursor.error("Expected `WHEN` in CASE expression"));
    }
    let else_result = if cursor.eat_keyword("ELSE") {
        Some(parse_expr(cursor)?)
    } else {
        None
    };
    cursor.expect_keyword("END")?;
    Ok(Expr::Case(Box::new(CaseExpr {
        discriminant,
        branches,
        else_result,
        comments: Default::default(),
    })))
}

fn parse_cast_fn(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    cursor.expect_keyword("CAST")?;
    cursor.expect_punct(Punctuation::LParen, "(")?;
    let expr = parse_expr(cursor)?;
    cursor.expect_keyword("AS")?;
    let target_type = parse_cast_type(cursor)?;
    cursor.expect_punct(Punctuation::RParen, ")")?;
    Ok(Expr::Cast(Box::new(Cast {
        expr,
        target_type,
        comments: Default::default(),
    })))
}

fn parse_extract(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    cursor.expect_keyword("EXTRACT")?;
    cursor.expect_punct(Punctuation::LParen, "(")?;
    let field_lexeme = cursor
        .peek()
        .ok_or_else(|| cursor.error("Expected a datetime field in EXTRACT"))?
        .value
        .clone();
    let field = DateTimeField::from_keyword(&field_lexeme)
        .ok_or_else(|| cursor.error(format!("Unrecognized EXTRACT field `{}`", field_lexeme)))?;
    cursor.advance();
    cursor.expect_keyword("FROM")?;
    let source = parse_expr(cursor)?;
    cursor.expect_punct(Punctuation::RParen, ")")?;
    Ok(Expr::FunctionCall(Box::new(FunctionCall {
        qualified_name: Identifier::unqualified("EXTRACT"),
        args: Some(vec![FunctionArg::DateTimeField(field), FunctionArg::Value(source)]),
        distinct: false,
        order_by: None,
        within_group: None,
        over: None,
        filter: None,
        with_ordinality: false,
        comments: Default::default(),
    })))
}

fn parse_identifier_or_call(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut parts = vec![Ident::new_maybe_quoted(cursor)?];
    while cursor.at_punct(Punctuation::Dot) {
        cursor.advance();
        parts.push(Ident::new_maybe_quoted(cursor)?);
    }

    if cursor.at_punct(Punctuation::LParen) {
        return parse_function_call(cursor, parts);
    }

    let name = parts.pop().unwrap();
    Ok(Expr::Identifier(Identifier {
        namespaces: parts,
        name,
        comments: Default::default(),
    }))
}

impl Ident {
    fn new_maybe_quoted(cursor: &mut Cursor) -> Result<Ident, ParseError> {
        let lexeme = cursor
            .peek()
            .ok_or_else(|| cursor.error("Expected identifier"))?
            .clone();
        match lexeme.kind {
            TokenKind::QuotedIdentifier => {
                cursor.advance();
                Ok(Ident::quoted(lexeme.value))
            }
            TokenKind::Identifier => {
                cursor.advance();
                Ok(Ident::new(lexeme.value))
            }
            TokenKind::Keyword if crate::keywords::is_non_reserved(&lexeme.value.to_uppercase()) => {
                cursor.advance();
                Ok(Ident::new(lexeme.value))
            }
            _ => Err(cursor.error(format!("Expected identifier, found `{}`", lexeme.value))),
        }
    }
}

fn parse_function_call(cursor: &mut Cursor, parts: Vec<Ident>) -> Result<Expr, ParseError> {
    let name = parts.last().unwrap().value.clone();
    cursor.expect_punct(Punctuation::LParen, "(")?;

    let distinct = cursor.eat_keyword("DISTINCT");
    let mut args = Vec::new();
    let mut order_by = None;
    let mut with_ordinality = false;

    if cursor.at_punct(Punctuation::RParen) {
        // func() — empty argument list, distinct from func(*)
    } else if cursor.peek().map(|l| l.kind == TokenKind::Operator && l.value == "*").unwrap_or(false)
        && cursor.peek_at(1).map(|l| matches!(&l.kind, TokenKind::Punctuation(Punctuation::RParen))).unwrap_or(false)
    {
        cursor.advance();
        args.push(FunctionArg::Value(Expr::Wildcard));
    } else {
        args.push(FunctionArg::Value(parse_expr(cursor)?));
        while cursor.eat_punct(Punctuation::Comma) {
            args.push(FunctionArg::Value(parse_expr(cursor)?));
        }
        if cursor.eat_keyword("ORDER") {
            cursor.expect_keyword("BY")?;
            order_by = Some(super::select::parse_order_by_items(cursor)?);
        }
    }
    cursor.expect_punct(Punctuation::RParen, ")")?;

    if cursor.eat_keyword("WITHIN") {
        cursor.expect_keyword("GROUP")?;
        cursor.expect_punct(Punctuation::LParen, "(")?;
        cursor.expect_keyword("ORDER")?;
        cursor.expect_keyword("BY")?;
        let within_group = Some(super::select::parse_order_by_items(cursor)?);
        cursor.expect_punct(Punctuation::RParen, ")")?;
        return finish_function_call(cursor, parts, name, Some(args), distinct, order_by, within_group, with_ordinality);
    }

    if cursor.eat_keyword("WITH") {
        cursor.expect_keyword("ORDINALITY")?;
        with_ordinality = true;
    }

    finish_function_call(cursor, parts, name, Some(args), distinct, order_by, None, with_ordinality)
}

fn finish_function_call(
    cursor: &mut Cursor,
    parts: Vec<Ident>,
    _name: String,
    args: Option<Vec<FunctionArg>>,
    distinct: bool,
    order_by: Option<OrderByClause>,
    within_group: Option<OrderByClause>,
    with_ordinality: bool,
) -> Result<Expr, ParseError> {
    let mut namespaces = parts;
    let last = namespaces.pop().unwrap();
    let qualified_name = Identifier {
        namespaces,
        name: last,
        comments: Default::default(),
    };

    let filter = if cursor.eat_keyword("FILTER") {
        cursor.expect_punct(Punctuation::LParen, "(")?;
        cursor.expect_keyword("WHERE")?;
        let predicate = parse_expr(cursor)?;
        cursor.expect_punct(Punctuation::RParen, ")")?;
        Some(Box::new(WhereClause::new(predicate)))
    } else {
        None
    };

    let over = if cursor.eat_keyword("OVER") {
        if cursor.at_punct(Punctuation::LParen) {
            Some(crate::ast::expr::WindowRef::Spec(parse_window_spec(cursor)?))
        } else {
            let window_name = cursor.expect_name()?;
            Some(crate::ast::expr::WindowRef::Name(WindowName(Ident::new(window_name))))
        }
    } else {
        None
    };

    Ok(Expr::FunctionCall(Box::new(FunctionCall {
        qualified_name,
        args,
        distinct,
        order_by,
        within_group,
        over,
        filter,
        with_ordinality,
        comments: Default::default(),
    })))
}

pub fn parse_window_spec(cursor: &mut Cursor) -> Result<WindowSpec, ParseError> {
    cursor.expect_punct(Punctuation::LParen, "(")?;
    let base = if !cursor.at_any_keyword(&["PARTITION", "ORDER", "RANGE", "ROWS", "GROUPS"])
        && !cursor.at_punct(Punctuation::RParen)
    {
        Some(WindowName(Ident::new(cursor.expect_name()?)))
    } else {
        None
    };

    let mut partition_by = Vec::new();
    if cursor.eat_keyword("PARTITION") {
        cursor.expect_keyword("BY")?;
        partition_by.push(parse_expr(cursor)?);
        while cursor.eat_punct(Punctuation::Comma) {
            partition_by.push(parse_expr(cursor)?);
        }
    }

    let order_by = if cursor.eat_keyword("ORDER") {
        cursor.expect_keyword("BY")?;
        Some(super::select::parse_order_by_items(cursor)?)
    } else {
        None
    };

    let frame = if cursor.at_any_keyword(&["RANGE", "ROWS", "GROUPS"]) {
        Some(parse_window_frame(cursor)?)
    } else {
        None
    };

    cursor.expect_punct(Punctuation::RParen, ")")?;
    Ok(WindowSpec {
        base,
        partition_by,
        order_by,
        frame,
    })
}

fn parse_window_frame(cursor: &mut Cursor) -> Result<crate::ast::clause::WindowFrame, ParseError> {
    use crate::ast::clause::{FrameBound, FrameUnit, WindowFrame};
    let unit = if cursor.eat_keyword("RANGE") {
        FrameUnit::Range
    } else if cursor.eat_keyword("ROWS") {
        FrameUnit::Rows
    } else {
        cursor.expect_keyword("GROUPS")?;
        FrameUnit::Groups
    };

    if cursor.eat_keyword("BETWEEN") {
        let start = parse_frame_bound(cursor)?;
        cursor.expect_keyword("AND")?;
        let end = Some(parse_frame_bound(cursor)?);
        Ok(WindowFrame { unit, start, end })
    } else {
        let start = parse_frame_bound(cursor)?;
        Ok(WindowFrame { unit, start, end: None })
    }
}

fn parse_frame_bound(cursor: &mut Cursor) -> Result<crate::ast::clause::FrameBound, ParseError> {
    use crate::ast::clause::FrameBound;
    if cursor.eat_keyword("UNBOUNDED") {
        return if cursor.eat_keyword("PRECEDING") {
            Ok(FrameBound::UnboundedPreceding)
        } else {
            cursor.expect_keyword("FOLLOWING")?;
            Ok(FrameBound::UnboundedFollowing)
        };
    }
    if cursor.eat_keyword("CURRENT") {
        cursor.expect_keyword("ROW")?;
        return Ok(FrameBound::CurrentRow);
    }
    let lexeme = cursor
        .peek()
        .ok_or_else(|| cursor.error("Expected frame bound"))?
        .value
        .clone();
    cursor.advance();
    if cursor.eat_keyword("PRECEDING") {
        Ok(FrameBound::Preceding(lexeme))
    } else {
        cursor.expect_keyword("FOLLOWING")?;
        Ok(FrameBound::Following(lexeme))
    }
}
