//! SortInjector (§4.3 "SortInjector"): appends to the *existing* ORDER BY
//! of a `SimpleSelectQuery`. Column resolution is current-query-only,
//! with aliases taking priority over physical names (§4.3, using
//! [`SelectItem::exposed_name`]).

use crate::ast::clause::{NullsOrder, OrderByItem, SortDirection};
use crate::ast::expr::Expr;
use crate::ast::ident::Identifier;
use crate::ast::statement::{SelectQuery, SimpleSelectQuery};
use crate::error::InjectError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOptions {
    pub asc: bool,
    pub desc: bool,
    pub nulls_first: bool,
    pub nulls_last: bool,
}

impl SortOptions {
    fn validate(&self, key: &str) -> Result<(), InjectError> {
        if self.asc && self.desc {
            return Err(InjectError::InvalidSortOptions {
                key: key.to_string(),
                reason: "cannot set both asc and desc".to_string(),
            });
        }
        if self.nulls_first && self.nulls_last {
            return Err(InjectError::InvalidSortOptions {
                key: key.to_string(),
                reason: "cannot set both nullsFirst and nullsLast".to_string(),
            });
        }
        if !self.asc && !self.desc && !self.nulls_first && !self.nulls_last {
            return Err(InjectError::InvalidSortOptions {
                key: key.to_string(),
                reason: "options must set at least one of asc/desc/nullsFirst/nullsLast".to_string(),
            });
        }
        Ok(())
    }
}

fn query_shape(query: &SelectQuery) -> &'static str {
    query.kind_name()
}

/// Appends one [`OrderByItem`] per `(column_or_alias, options)` pair.
/// Refuses anything but `SimpleSelectQuery` (§4.3).
pub fn inject_sort(query: &mut SelectQuery, sorts: &[(String, SortOptions)]) -> Result<(), InjectError> {
    let shape = query_shape(query);
    let simple = query
        .as_simple_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: shape })?;

    for (key, options) in sorts {
        options.validate(key)?;
        let expr = resolve_column(simple, key)?;
        let direction = if options.desc {
            SortDirection::Desc
        } else if options.asc {
            SortDirection::Asc
        } else {
            SortDirection::None
        };
        let nulls = if options.nulls_first {
            NullsOrder::First
        } else if options.nulls_last {
            NullsOrder::Last
        } else {
            NullsOrder::None
        };
        simple.order_by_or_init().items.push(OrderByItem { expr, direction, nulls });
    }
    Ok(())
}

/// Aliases take priority over physical names (§4.3): if `key` matches a
/// `SelectItem`'s exposed name, the sort references that projected name
/// directly — which is what a bare identifier does either way, since the
/// alias and the physical column share the same textual form at the
/// ORDER BY position. A bare `SELECT *` exposes no names we can check
/// statically, so any key is accepted in that shape (§7 "ColumnNotFound"
/// only fires when the query's own projection rules a key out).
fn resolve_column(query: &SimpleSelectQuery, key: &str) -> Result<Expr, InjectError> {
    let has_wildcard = query.select.items.iter().any(|item| matches!(item.value, Expr::Wildcard));
    let exposes_key = query.select.items.iter().any(|item| item.exposed_name() == Some(key));
    if has_wildcard || exposes_key {
        Ok(Expr::Identifier(Identifier::unqualified(key)))
    } else {
        Err(InjectError::ColumnNotFound { name: key.to_string() })
    }
}

/// Pure helper that clears a query's ORDER BY (§4.3 "removeOrderBy").
pub fn remove_order_by(query: &mut SelectQuery) -> Result<(), InjectError> {
    let shape = query_shape(query);
    let simple = query
        .as_simple_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: shape })?;
    simple.order_by = None;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::parse_select;

    #[test]
    fn appends_to_existing_order_by() {
        let mut query = parse_select("SELECT id, last_login FROM users ORDER BY id ASC").unwrap();
        let sorts = vec![("last_login".to_string(), SortOptions { desc: true, ..SortOptions::default() })];
        inject_sort(&mut query, &sorts).unwrap();
        let simple = query.as_simple().unwrap();
        let order_by = simple.order_by.as_ref().unwrap();
        assert_eq!(order_by.items.len(), 2);
        assert_eq!(order_by.items[1].direction, SortDirection::Desc);
    }

    #[test]
    fn initializes_order_by_when_absent() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        let sorts = vec![("id".to_string(), SortOptions { asc: true, ..SortOptions::default() })];
        inject_sort(&mut query, &sorts).unwrap();
        assert!(query.as_simple().unwrap().order_by.is_some());
    }

    #[test]
    fn rejects_both_asc_and_desc() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        let sorts = vec![("id".to_string(), SortOptions { asc: true, desc: true, ..SortOptions::default() })];
        assert!(matches!(inject_sort(&mut query, &sorts), Err(InjectError::InvalidSortOptions { .. })));
    }

    #[test]
    fn rejects_empty_options() {
        let mut query = parse_select("SELECT id FROM users").unwrap();
        let sorts = vec![("id".to_string(), SortOptions::default())];
        assert!(matches!(inject_sort(&mut query, &sorts), Err(InjectError::InvalidSortOptions { .. })));
    }

    #[test]
    fn rejects_a_key_not_in_the_projection() {
        let mut query = parse_select("SELECT id, last_login FROM users").unwrap();
        let sorts = vec![("nonexistent".to_string(), SortOptions { asc: true, ..SortOptions::default() })];
        assert!(matches!(inject_sort(&mut query, &sorts), Err(InjectError::ColumnNotFound { .. })));
    }

    #[test]
    fn accepts_any_key_under_a_wildcard_projection() {
        let mut query = parse_select("SELECT * FROM users").unwrap();
        let sorts = vec![("last_login".to_string(), SortOptions { asc: true, ..SortOptions::default() })];
        inject_sort(&mut query, &sorts).unwrap();
        assert_eq!(query.as_simple().unwrap().order_by.as_ref().unwrap().items.len(), 1);
    }

    #[test]
    fn remove_order_by_clears_existing_sort() {
        let mut query = parse_select("SELECT id FROM users ORDER BY id").unwrap();
        remove_order_by(&mut query).unwrap();
        assert!(query.as_simple().unwrap().order_by.is_none());
    }
}
