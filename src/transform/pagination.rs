//! PaginationInjector (§4.3 "PaginationInjector"): sets LIMIT/OFFSET from
//! a page number and page size, replacing any existing values.

use crate::ast::clause::{LimitClause, OffsetClause};
use crate::ast::value::Literal;
use crate::ast::expr::Expr;
use crate::ast::statement::{SelectQuery, SimpleSelectQuery};
use crate::error::InjectError;

const MAX_PAGE_SIZE: i64 = 1000;

/// `OFFSET = (page-1) * pageSize`, `LIMIT = pageSize` (§4.3).
pub fn inject_paging(query: &mut SelectQuery, page: i64, page_size: i64) -> Result<(), InjectError> {
    if page < 1 {
        return Err(InjectError::InvalidPage(page));
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(InjectError::InvalidPageSize(page_size));
    }
    let offset = (page - 1) * page_size;

    apply_to_shape(query, page_size, offset)
}

fn apply_to_shape(query: &mut SelectQuery, page_size: i64, offset: i64) -> Result<(), InjectError> {
    match query {
        SelectQuery::Simple(s) => set_limit_offset(s, page_size, offset),
        SelectQuery::Binary(b) => {
            b.limit = Some(LimitClause { value: Expr::Literal(Literal::number(page_size.to_string())) });
            b.offset = Some(OffsetClause { value: Expr::Literal(Literal::number(offset.to_string())) });
            Ok(())
        }
        SelectQuery::Values(v) => {
            v.limit = Some(LimitClause { value: Expr::Literal(Literal::number(page_size.to_string())) });
            v.offset = Some(OffsetClause { value: Expr::Literal(Literal::number(offset.to_string())) });
            Ok(())
        }
    }
}

fn set_limit_offset(query: &mut SimpleSelectQuery, page_size: i64, offset: i64) -> Result<(), InjectError> {
    query.limit = Some(LimitClause { value: Expr::Literal(Literal::number(page_size.to_string())) });
    query.offset = Some(OffsetClause { value: Expr::Literal(Literal::number(offset.to_string())) });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::parse_select;

    #[test]
    fn computes_offset_from_page_and_size() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        inject_paging(&mut query, 3, 25).unwrap();
        let SelectQuery::Simple(simple) = &query else { panic!("expected Simple") };
        assert_eq!(simple.limit.as_ref().unwrap().value, Expr::Literal(Literal::number("25")));
        assert_eq!(simple.offset.as_ref().unwrap().value, Expr::Literal(Literal::number("50")));
    }

    #[test]
    fn first_page_has_zero_offset() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        inject_paging(&mut query, 1, 10).unwrap();
        let SelectQuery::Simple(simple) = &query else { panic!("expected Simple") };
        assert_eq!(simple.offset.as_ref().unwrap().value, Expr::Literal(Literal::number("0")));
    }

    #[test]
    fn rejects_page_below_one() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        assert!(matches!(inject_paging(&mut query, 0, 10), Err(InjectError::InvalidPage(0))));
    }

    #[test]
    fn rejects_page_size_outside_bounds() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        assert!(matches!(inject_paging(&mut query, 1, 0), Err(InjectError::InvalidPageSize(0))));
        assert!(matches!(inject_paging(&mut query, 1, 1001), Err(InjectError::InvalidPageSize(1001))));
    }
}
