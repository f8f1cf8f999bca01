//! CTE management (§4.3 "CTE management (on SimpleSelectQuery)"):
//! add/remove/replace/query operations over a query's WITH clause.
//! `hasCTE` and `getCTENames` are already O(1)/O(n)-in-result-size via
//! [`WithClause::has_cte`]/[`WithClause::cte_names`], so this module adds
//! only the mutating operations plus `toSimpleQuery` reuse at call sites.

use crate::ast::clause::{CommonTable, Materialization, WithClause};
use crate::ast::statement::{SelectQuery, SimpleSelectQuery};
use crate::error::CteError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CteOptions {
    pub materialized: Option<bool>,
}

fn materialization(options: CteOptions) -> Materialization {
    match options.materialized {
        Some(true) => Materialization::Materialized,
        Some(false) => Materialization::NotMaterialized,
        None => Materialization::None,
    }
}

fn validate_name(name: &str) -> Result<(), CteError> {
    if name.trim().is_empty() {
        return Err(CteError::InvalidName);
    }
    Ok(())
}

fn with_clause_mut(query: &mut SimpleSelectQuery) -> &mut WithClause {
    query.with.get_or_insert_with(|| WithClause {
        recursive: false,
        tables: Vec::new(),
        comments: Default::default(),
    })
}

/// `addCTE(name, query, options)` (§4.3).
pub fn add_cte(
    target: &mut SimpleSelectQuery,
    name: impl Into<String>,
    query: SelectQuery,
    options: CteOptions,
) -> Result<(), CteError> {
    let name = name.into();
    validate_name(&name)?;
    if target.with.as_ref().map_or(false, |w| w.has_cte(&name)) {
        return Err(CteError::Duplicate(name));
    }
    let table = CommonTable {
        name: crate::ast::ident::Ident::new(name),
        column_aliases: Vec::new(),
        materialized: materialization(options),
        query,
        comments: Default::default(),
    };
    with_clause_mut(target).tables.push(table);
    Ok(())
}

/// `removeCTE(name)` (§4.3).
pub fn remove_cte(target: &mut SimpleSelectQuery, name: &str) -> Result<(), CteError> {
    let with = target.with.as_mut().ok_or_else(|| CteError::NotFound(name.to_string()))?;
    let index = with
        .tables
        .iter()
        .position(|t| t.name.value == name)
        .ok_or_else(|| CteError::NotFound(name.to_string()))?;
    with.tables.remove(index);
    Ok(())
}

/// `replaceCTE(name, query, options)` (§4.3).
pub fn replace_cte(
    target: &mut SimpleSelectQuery,
    name: &str,
    query: SelectQuery,
    options: CteOptions,
) -> Result<(), CteError> {
    let with = target.with.as_mut().ok_or_else(|| CteError::NotFound(name.to_string()))?;
    let index = with
        .tables
        .iter()
        .position(|t| t.name.value == name)
        .ok_or_else(|| CteError::NotFound(name.to_string()))?;
    with.tables[index].query = query;
    with.tables[index].materialized = materialization(options);
    Ok(())
}

/// `hasCTE(name)` (§4.3).
pub fn has_cte(query: &SimpleSelectQuery, name: &str) -> bool {
    query.with.as_ref().map_or(false, |w| w.has_cte(name))
}

/// `getCTENames()`, insertion order preserved (§4.3).
pub fn get_cte_names(query: &SimpleSelectQuery) -> Vec<String> {
    query
        .with
        .as_ref()
        .map(|w| w.cte_names().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::statement::SelectQuery;
    use crate::facade::parse_select;

    fn simple(sql: &str) -> SimpleSelectQuery {
        let SelectQuery::Simple(s) = parse_select(sql).unwrap() else { panic!("expected Simple") };
        *s
    }

    #[test]
    fn add_then_has_then_remove() {
        let mut target = simple("SELECT * FROM t");
        add_cte(&mut target, "x", SelectQuery::Simple(Box::new(simple("SELECT 1 AS v"))), CteOptions::default())
            .unwrap();
        assert!(has_cte(&target, "x"));
        assert_eq!(get_cte_names(&target), vec!["x".to_string()]);
        remove_cte(&mut target, "x").unwrap();
        assert!(!has_cte(&target, "x"));
    }

    #[test]
    fn add_rejects_duplicate_name() {
        let mut target = simple("SELECT * FROM t");
        add_cte(&mut target, "x", SelectQuery::Simple(Box::new(simple("SELECT 1 AS v"))), CteOptions::default())
            .unwrap();
        let err = add_cte(
            &mut target,
            "x",
            SelectQuery::Simple(Box::new(simple("SELECT 2 AS v"))),
            CteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CteError::Duplicate(name) if name == "x"));
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut target = simple("SELECT * FROM t");
        let err = add_cte(
            &mut target,
            "   ",
            SelectQuery::Simple(Box::new(simple("SELECT 1 AS v"))),
            CteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CteError::InvalidName));
    }

    #[test]
    fn remove_missing_cte_errors() {
        let mut target = simple("SELECT * FROM t");
        assert!(matches!(remove_cte(&mut target, "ghost"), Err(CteError::NotFound(_))));
    }

    #[test]
    fn replace_swaps_query_and_materialization() {
        let mut target = simple("SELECT * FROM t");
        add_cte(&mut target, "x", SelectQuery::Simple(Box::new(simple("SELECT 1 AS v"))), CteOptions::default())
            .unwrap();
        replace_cte(
            &mut target,
            "x",
            SelectQuery::Simple(Box::new(simple("SELECT 2 AS v"))),
            CteOptions { materialized: Some(true) },
        )
        .unwrap();
        let with = target.with.as_ref().unwrap();
        assert_eq!(with.tables[0].materialized, Materialization::Materialized);
    }
}
