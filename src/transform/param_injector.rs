//! ParamInjector (§4.3 "ParamInjector (WHERE injection)"): adds WHERE
//! predicates to a previously parsed `SimpleSelectQuery`, resolving each
//! target column upstream along the FROM tree so that filters are pushed
//! into the subquery/CTE that actually produces the column rather than
//! bolted onto the outermost query.

use indexmap::IndexMap;

use crate::ast::clause::{FromClause, TableSourceKind, WhereClause};
use crate::ast::expr::{BinaryOp, Expr, InList, InListSource, ValueList};
use crate::ast::params::ParamValue;
use crate::ast::statement::{SelectQuery, SimpleSelectQuery};
use crate::error::InjectError;

/// Resolves the column names exposed by a physical table, since the AST
/// alone cannot know a table's schema (§4.3, §6.2 "Extension interfaces").
pub trait TableColumnResolver {
    fn columns(&self, table_name: &str) -> Vec<String>;
}

/// A resolver that never matches any physical table — useful when every
/// injected key targets a subquery/CTE column or the caller has no
/// schema catalog available.
pub struct NoTableColumns;

impl TableColumnResolver for NoTableColumns {
    fn columns(&self, _table_name: &str) -> Vec<String> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Diamond,
    Lt,
    Gt,
    Le,
    Ge,
    /// Alias for `>=` (§4.3 "min→>=").
    Min,
    /// Alias for `<=` (§4.3 "max→<=").
    Max,
    Like,
    ILike,
    In,
    Any,
}

impl Operator {
    fn sql_text(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Diamond => "<>",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Le | Operator::Max => "<=",
            Operator::Ge | Operator::Min => ">=",
            Operator::Like => "LIKE",
            Operator::ILike => "ILIKE",
            Operator::In => "IN",
            Operator::Any => "= ANY",
        }
    }

    fn name_suffix(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::NotEq | Operator::Diamond => "ne",
            Operator::Lt => "lt",
            Operator::Gt => "gt",
            Operator::Le | Operator::Max => "lte",
            Operator::Ge | Operator::Min => "gte",
            Operator::Like => "like",
            Operator::ILike => "ilike",
            Operator::In => "in",
            Operator::Any => "any",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Maps the logical key to a different physical column (§4.3
    /// "explicit `column: ..." field").
    pub column: Option<String>,
    pub operators: Vec<(Operator, ParamValue)>,
}

impl Condition {
    pub fn new() -> Self {
        Condition { column: None, operators: Vec::new() }
    }

    pub fn with(mut self, op: Operator, value: ParamValue) -> Self {
        self.operators.push((op, value));
        self
    }

    pub fn on_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// One entry of the injection state mapping (§4.3 `key → value|
/// condition|undefined`).
#[derive(Debug, Clone, PartialEq)]
pub enum InjectEntry {
    Undefined,
    Value(ParamValue),
    Condition(Condition),
    /// Parenthesized OR across arbitrary columns.
    Or(Vec<(String, InjectEntry)>),
    /// Explicit AND counterpart to `Or`.
    And(Vec<(String, InjectEntry)>),
}

pub type InjectState = IndexMap<String, InjectEntry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectOptions {
    pub allow_all_undefined: bool,
    pub ignore_case_and_underscore: bool,
}

impl Default for InjectOptions {
    fn default() -> Self {
        InjectOptions { allow_all_undefined: false, ignore_case_and_underscore: false }
    }
}

fn normalize_key(key: &str, ignore_case_and_underscore: bool) -> String {
    if ignore_case_and_underscore {
        key.chars()
            .filter(|c| *c != '_')
            .flat_map(|c| c.to_lowercase())
            .collect()
    } else {
        key.to_string()
    }
}

/// Injects every defined entry of `state` as an additional WHERE
/// predicate on `query` (§4.3 "ParamInjector").
pub fn inject_params(
    query: &mut SimpleSelectQuery,
    state: &InjectState,
    resolver: &dyn TableColumnResolver,
    options: InjectOptions,
) -> Result<(), InjectError> {
    if state.is_empty() {
        return Ok(());
    }
    let any_defined = state.values().any(|e| !matches!(e, InjectEntry::Undefined));
    if !any_defined && !options.allow_all_undefined {
        return Err(InjectError::AllUndefined);
    }

    for (key, entry) in state.iter() {
        if matches!(entry, InjectEntry::Undefined) {
            continue;
        }
        inject_entry(query, key, entry, resolver, options)?;
    }
    Ok(())
}

fn inject_entry(
    query: &mut SimpleSelectQuery,
    key: &str,
    entry: &InjectEntry,
    resolver: &dyn TableColumnResolver,
    options: InjectOptions,
) -> Result<(), InjectError> {
    let path = locate(query, key, resolver, options)?;
    let target = descend(query, &path);
    let expr = build_entry_expr(target, key, entry, options)?;
    add_predicate(target, expr);
    Ok(())
}

fn add_predicate(query: &mut SimpleSelectQuery, expr: Expr) {
    match &mut query.r#where {
        Some(w) => {
            let existing = std::mem::replace(&mut w.predicate, Expr::Wildcard);
            w.predicate = Expr::BinaryOp(BinaryOp::new("AND", existing, expr));
        }
        None => query.r#where = Some(WhereClause::new(expr)),
    }
}

/// Path of descent steps into nested subqueries/CTEs reached while
/// resolving a column (§4.3 "upstream search rule").
#[derive(Debug, Clone)]
enum Step {
    SubQuery(usize),
    Cte(usize),
}

fn matches_output_column(query: &SimpleSelectQuery, norm_key: &str, options: InjectOptions) -> bool {
    query.select.items.iter().any(|item| {
        item.exposed_name()
            .map(|name| normalize_key(name, options.ignore_case_and_underscore) == norm_key)
            .unwrap_or(false)
    })
}

fn locate(
    query: &SimpleSelectQuery,
    key: &str,
    resolver: &dyn TableColumnResolver,
    options: InjectOptions,
) -> Result<Vec<Step>, InjectError> {
    let norm_key = normalize_key(key, options.ignore_case_and_underscore);
    let from: &FromClause = match &query.from {
        Some(f) => f,
        None => return Ok(Vec::new()),
    };

    // Matching order (§4.3): root tables first.
    for swj in &from.sources {
        if let TableSourceKind::Table { name, .. } = &swj.source.source {
            let is_cte = query.with.as_ref().map_or(false, |w| w.has_cte(name.bare_name()));
            if is_cte {
                continue;
            }
            let cols = resolver.columns(&name.dotted());
            if cols.iter().any(|c| normalize_key(c, options.ignore_case_and_underscore) == norm_key) {
                return Ok(Vec::new());
            }
        }
    }

    // Then inline subqueries.
    for (i, swj) in from.sources.iter().enumerate() {
        if let TableSourceKind::SubQuery(inner) = &swj.source.source {
            if let SelectQuery::Simple(inner_simple) = inner.as_ref() {
                if matches_output_column(inner_simple, &norm_key, options) {
                    let mut path = vec![Step::SubQuery(i)];
                    path.extend(locate(inner_simple, key, resolver, options)?);
                    return Ok(path);
                }
            }
        }
    }

    // Then CTEs reachable from this level's WITH clause.
    if let Some(with) = &query.with {
        for swj in &from.sources {
            if let TableSourceKind::Table { name, .. } = &swj.source.source {
                if let Some(cte_index) = with.tables.iter().position(|t| t.name.value == name.bare_name()) {
                    if let SelectQuery::Simple(inner_simple) = &with.tables[cte_index].query {
                        if matches_output_column(inner_simple, &norm_key, options) {
                            let mut path = vec![Step::Cte(cte_index)];
                            path.extend(locate(inner_simple, key, resolver, options)?);
                            return Ok(path);
                        }
                    }
                }
            }
        }
    }

    Err(InjectError::ColumnNotFound { name: key.to_string() })
}

fn descend<'q>(query: &'q mut SimpleSelectQuery, path: &[Step]) -> &'q mut SimpleSelectQuery {
    let mut current = query;
    for step in path {
        current = match step {
            Step::SubQuery(i) => {
                let from = current.from.as_mut().expect("locate() verified this FROM exists");
                let source = &mut from.sources[*i].source.source;
                match source {
                    TableSourceKind::SubQuery(inner) => match inner.as_mut() {
                        SelectQuery::Simple(s) => s.as_mut(),
                        _ => unreachable!("locate() only descends into SelectQuery::Simple"),
                    },
                    _ => unreachable!("path step does not match source kind"),
                }
            }
            Step::Cte(i) => {
                let with = current.with.as_mut().expect("locate() verified this WITH exists");
                match &mut with.tables[*i].query {
                    SelectQuery::Simple(s) => s.as_mut(),
                    _ => unreachable!("locate() only descends into SelectQuery::Simple"),
                }
            }
        };
    }
    current
}

fn build_entry_expr(
    target: &mut SimpleSelectQuery,
    key: &str,
    entry: &InjectEntry,
    options: InjectOptions,
) -> Result<Expr, InjectError> {
    match entry {
        InjectEntry::Undefined => unreachable!("callers filter out Undefined entries"),
        InjectEntry::Value(value) => {
            let binding = format!("{key}_eq");
            target.params.set(binding.clone(), value.clone());
            Ok(Expr::BinaryOp(BinaryOp::new("=", column_expr(key), param_expr(&binding))))
        }
        InjectEntry::Condition(condition) => build_condition_expr(target, key, condition),
        InjectEntry::Or(parts) => build_group_expr(target, "OR", parts, options, 0),
        InjectEntry::And(parts) => build_group_expr(target, "AND", parts, options, 0),
    }
}

fn build_condition_expr(
    target: &mut SimpleSelectQuery,
    key: &str,
    condition: &Condition,
) -> Result<Expr, InjectError> {
    if condition.operators.is_empty() {
        return Err(InjectError::UnsupportedOperator { op: String::new(), key: key.to_string() });
    }
    let column = condition.column.clone().unwrap_or_else(|| key.to_string());
    let mut combined: Option<Expr> = None;
    for (op, value) in &condition.operators {
        let binding_stem = format!("{key}_{}", op.name_suffix());
        let clause = if *op == Operator::In {
            let bindings = bind_in_list(target, &binding_stem, value);
            build_in_list_expr(&column, &bindings)
        } else {
            target.params.set(binding_stem.clone(), value.clone());
            build_operator_expr(&column, *op, &binding_stem)
        };
        combined = Some(match combined {
            Some(existing) => Expr::BinaryOp(BinaryOp::new("AND", existing, clause)),
            None => clause,
        });
    }
    Ok(combined.expect("checked non-empty above"))
}

/// Binds one parameter per list element under `{binding_stem}_{i}` (§8
/// Scenario 2, §9 "`column_in_i` convention") rather than one parameter
/// holding the whole list, since a single placeholder can't expand into
/// a comma-separated `IN (...)` list at the driver layer.
fn bind_in_list(target: &mut SimpleSelectQuery, binding_stem: &str, value: &ParamValue) -> Vec<String> {
    let items: Vec<ParamValue> = match value {
        ParamValue::List(items) => items.clone(),
        other => vec![other.clone()],
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let binding = format!("{binding_stem}_{i}");
            target.params.set(binding.clone(), item);
            binding
        })
        .collect()
}

fn build_in_list_expr(column: &str, bindings: &[String]) -> Expr {
    Expr::InList(Box::new(InList {
        target: column_expr(column),
        list: InListSource::Values(bindings.iter().map(|b| param_expr(b)).collect()),
        negated: false,
        comments: Default::default(),
    }))
}

fn build_operator_expr(column: &str, op: Operator, binding: &str) -> Expr {
    match op {
        Operator::In => unreachable!("Operator::In is expanded via bind_in_list/build_in_list_expr"),
        Operator::Any => Expr::BinaryOp(BinaryOp::new(
            op.sql_text(),
            column_expr(column),
            Expr::ValueList(ValueList { items: vec![param_expr(binding)], comments: Default::default() }),
        )),
        _ => Expr::BinaryOp(BinaryOp::new(op.sql_text(), column_expr(column), param_expr(binding))),
    }
}

fn build_group_expr(
    target: &mut SimpleSelectQuery,
    joiner: &str,
    parts: &[(String, InjectEntry)],
    options: InjectOptions,
    depth: usize,
) -> Result<Expr, InjectError> {
    let mut combined: Option<Expr> = None;
    for (j, (sub_key, sub_entry)) in parts.iter().enumerate() {
        if matches!(sub_entry, InjectEntry::Undefined) {
            continue;
        }
        let expr = build_group_member_expr(target, sub_key, sub_entry, options, j, depth)?;
        combined = Some(match combined {
            Some(existing) => Expr::BinaryOp(BinaryOp::new(joiner, existing, expr)),
            None => expr,
        });
    }
    combined.ok_or_else(|| InjectError::UnsupportedOperator { op: joiner.to_string(), key: String::new() })
}

fn build_group_member_expr(
    target: &mut SimpleSelectQuery,
    key: &str,
    entry: &InjectEntry,
    options: InjectOptions,
    j: usize,
    depth: usize,
) -> Result<Expr, InjectError> {
    match entry {
        InjectEntry::Undefined => unreachable!("build_group_expr filters out Undefined entries"),
        InjectEntry::Value(value) => {
            let binding = format!("{key}_or_{depth}_{j}_eq");
            target.params.set(binding.clone(), value.clone());
            Ok(Expr::BinaryOp(BinaryOp::new("=", column_expr(key), param_expr(&binding))))
        }
        InjectEntry::Condition(condition) => {
            let column = condition.column.clone().unwrap_or_else(|| key.to_string());
            let mut combined: Option<Expr> = None;
            for (op, value) in &condition.operators {
                let binding_stem = format!("{key}_or_{depth}_{j}_{}", op.name_suffix());
                let clause = if *op == Operator::In {
                    let bindings = bind_in_list(target, &binding_stem, value);
                    build_in_list_expr(&column, &bindings)
                } else {
                    target.params.set(binding_stem.clone(), value.clone());
                    build_operator_expr(&column, *op, &binding_stem)
                };
                combined = Some(match combined {
                    Some(existing) => Expr::BinaryOp(BinaryOp::new("AND", existing, clause)),
                    None => clause,
                });
            }
            combined.ok_or_else(|| InjectError::UnsupportedOperator { op: String::new(), key: key.to_string() })
        }
        InjectEntry::Or(nested) => build_group_expr(target, "OR", nested, options, depth + 1),
        InjectEntry::And(nested) => build_group_expr(target, "AND", nested, options, depth + 1),
    }
}

fn column_expr(name: &str) -> Expr {
    Expr::Identifier(crate::ast::ident::Identifier::unqualified(name))
}

fn param_expr(binding_name: &str) -> Expr {
    Expr::Parameter(crate::ast::expr::ParameterRef {
        name: Some(binding_name.to_string()),
        index: None,
        comments: Default::default(),
    })
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

    struct Articles;
    impl TableColumnResolver for Articles {
        fn columns(&self, table_name: &str) -> Vec<String> {
            if table_name == "articles" {
                vec!["price".to_string(), "category_id".to_string()]
            } else {
                Vec::new()
            }
        }
    }

    #[test]
    fn min_max_use_gte_lte_suffixes() {
        assert_eq!(Operator::Min.name_suffix(), "gte");
        assert_eq!(Operator::Max.name_suffix(), "lte");
        assert_eq!(Operator::NotEq.name_suffix(), "ne");
        assert_eq!(Operator::Diamond.name_suffix(), "ne");
    }

    #[test]
    fn value_entry_binds_eq_predicate() {
        let mut query = simple("SELECT * FROM articles");
        let mut state = InjectState::new();
        state.insert("category_id".to_string(), InjectEntry::Value(ParamValue::Number("7".to_string())));
        inject_params(&mut query, &state, &Articles, InjectOptions::default()).unwrap();
        assert_eq!(query.params.get("category_id_eq"), Some(&ParamValue::Number("7".to_string())));
    }

    #[test]
    fn and_group_bindings_still_carry_the_or_infix() {
        // build_group_member_expr's binding format is shared between the
        // OR and AND code paths, so AND-group members also land on
        // "{key}_or_{depth}_{j}_{suffix}" bindings.
        let mut query = simple("SELECT * FROM articles");
        let mut state = InjectState::new();
        state.insert(
            "group".to_string(),
            InjectEntry::And(vec![(
                "price".to_string(),
                InjectEntry::Condition(Condition::new().with(Operator::Min, ParamValue::Number("5".to_string()))),
            )]),
        );
        inject_params(&mut query, &state, &Articles, InjectOptions::default()).unwrap();
        assert!(query.params.get("price_or_0_0_gte").is_some());
    }

    #[test]
    fn all_undefined_fails_fast_unless_allowed() {
        let mut query = simple("SELECT * FROM articles");
        let mut state = InjectState::new();
        state.insert("price".to_string(), InjectEntry::Undefined);
        assert!(matches!(
            inject_params(&mut query, &state, &Articles, InjectOptions::default()),
            Err(InjectError::AllUndefined)
        ));
        inject_params(
            &mut query,
            &state,
            &Articles,
            InjectOptions { allow_all_undefined: true, ..InjectOptions::default() },
        )
        .unwrap();
    }

    #[test]
    fn unresolvable_column_errors() {
        let mut query = simple("SELECT * FROM articles");
        let mut state = InjectState::new();
        state.insert("nonexistent".to_string(), InjectEntry::Value(ParamValue::Number("1".to_string())));
        assert!(matches!(
            inject_params(&mut query, &state, &Articles, InjectOptions::default()),
            Err(InjectError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn resolves_into_enclosing_cte_before_inline_subquery() {
        let mut query = simple(
            "WITH cte_users AS (SELECT id, name FROM users WHERE active = true) \
             SELECT * FROM (SELECT id AS user_id, name AS user_name FROM cte_users) sub",
        );
        let mut state = InjectState::new();
        state.insert("id".to_string(), InjectEntry::Value(ParamValue::Number("42".to_string())));
        inject_params(&mut query, &state, &NoTableColumns, InjectOptions::default()).unwrap();

        let with = query.with.as_ref().expect("CTE survives injection");
        let SelectQuery::Simple(cte_simple) = &with.tables[0].query else { panic!("expected Simple") };
        assert!(cte_simple.params.get("id_eq").is_some());
        assert!(query.params.is_empty());
    }
}
