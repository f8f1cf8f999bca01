//! JSON projection builder (§4.3 "JSON projection builder (hard-
//! engineering AST transform)"): turns a base SELECT plus a hierarchical
//! entity mapping into a SELECT that returns a JSON structure, emitting
//! one CTE per non-root entity in decreasing-depth order.

use indexmap::IndexMap;

use crate::ast::clause::{
    CommonTable, Distinct, FromClause, GroupByClause, JoinClause, JoinCondition, JoinKind,
    Materialization, SelectClause, SelectItem, SourceExpression, SourceWithJoins, WithClause,
};
use crate::ast::expr::{Expr, FunctionArg, FunctionCall};
use crate::ast::ident::{Ident, Identifier};
use crate::ast::statement::{SelectQuery, SimpleSelectQuery};
use crate::error::MappingValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultFormat {
    Object,
    Array,
}

/// One entity in the hierarchical mapping (§4.3 "root entity + nested
/// entities with object/array relationships and snake_case→property
/// column maps").
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMapping {
    pub name: String,
    pub parent: Option<String>,
    pub relationship: Relationship,
    /// Column the array-relationship CTE groups by; unused for the root
    /// and for object relationships, which join one row to one row.
    pub group_by_column: Option<String>,
    /// `property name -> SQL column` projected by this entity.
    pub columns: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonBuildOptions {
    pub result_format: ResultFormat,
    pub use_jsonb: bool,
}

impl Default for JsonBuildOptions {
    fn default() -> Self {
        JsonBuildOptions { result_format: ResultFormat::Object, use_jsonb: false }
    }
}

struct DepthEntity<'a> {
    mapping: &'a EntityMapping,
    depth: u32,
}

fn output_columns(base: &SimpleSelectQuery) -> Vec<&str> {
    base.select.items.iter().filter_map(|item| item.exposed_name()).collect()
}

fn validate_columns(base: &SimpleSelectQuery, entities: &[EntityMapping]) -> Result<(), MappingValidationError> {
    let available = output_columns(base);
    for entity in entities {
        for sql_column in entity.columns.values() {
            if !available.contains(&sql_column.as_str()) {
                return Err(MappingValidationError::MissingColumn(sql_column.clone()));
            }
        }
    }
    Ok(())
}

fn compute_depths(entities: &[EntityMapping]) -> Result<Vec<DepthEntity<'_>>, MappingValidationError> {
    let mut depths: IndexMap<&str, u32> = IndexMap::new();
    // Resolve iteratively; entity ordering in the mapping is not assumed
    // to be depth-sorted.
    let mut remaining: Vec<&EntityMapping> = entities.iter().collect();
    let mut progressed = true;
    while !remaining.is_empty() && progressed {
        progressed = false;
        remaining.retain(|entity| match &entity.parent {
            None => {
                depths.insert(entity.name.as_str(), 0);
                progressed = true;
                false
            }
            Some(parent) => {
                if let Some(parent_depth) = depths.get(parent.as_str()) {
                    depths.insert(entity.name.as_str(), parent_depth + 1);
                    progressed = true;
                    false
                } else {
                    true
                }
            }
        });
    }
    if let Some(unresolved) = remaining.first() {
        let parent = unresolved.parent.clone().unwrap_or_default();
        return Err(MappingValidationError::MissingParent(unresolved.name.clone(), parent));
    }

    // At most one array-relationship direct child per entity.
    for entity in entities {
        let array_children = entities
            .iter()
            .filter(|e| e.parent.as_deref() == Some(entity.name.as_str()) && e.relationship == Relationship::Array)
            .count();
        if array_children > 1 {
            return Err(MappingValidationError::MultipleArrayChildren(entity.name.clone()));
        }
    }

    let mut result: Vec<DepthEntity> = entities
        .iter()
        .map(|mapping| DepthEntity { mapping, depth: depths[mapping.name.as_str()] })
        .collect();
    result.sort_by(|a, b| b.depth.cmp(&a.depth));
    Ok(result)
}

fn agg_fn(base_name: &str, use_jsonb: bool) -> String {
    if use_jsonb {
        format!("jsonb_{base_name}")
    } else {
        format!("json_{base_name}")
    }
}

fn column_reference(column: &str) -> Expr {
    match column.split_once('.') {
        Some((table, name)) => qualified_column(table, name),
        None => column_expr(column),
    }
}

fn json_build_object_call(columns: &IndexMap<String, String>, use_jsonb: bool) -> Expr {
    let mut args = Vec::new();
    for (property, column) in columns {
        args.push(FunctionArg::Value(Expr::Literal(crate::ast::value::Literal::string(property.clone()))));
        args.push(FunctionArg::Value(column_reference(column)));
    }
    Expr::FunctionCall(Box::new(FunctionCall {
        qualified_name: Identifier::unqualified(agg_fn("build_object", use_jsonb)),
        args: Some(args),
        distinct: false,
        order_by: None,
        within_group: None,
        over: None,
        filter: None,
        with_ordinality: false,
        comments: Default::default(),
    }))
}

fn column_expr(name: &str) -> Expr {
    Expr::Identifier(Identifier::unqualified(name))
}

fn qualified_column(table: &str, column: &str) -> Expr {
    Expr::Identifier(Identifier::qualified(vec![Ident::new(table)], Ident::new(column)))
}

fn base_source(alias: &str) -> SourceExpression {
    SourceExpression::table(Identifier::unqualified(alias))
}

/// Builds the array/object CTE for one non-root entity, selecting from
/// the `base` CTE that wraps the caller's query unchanged.
fn build_entity_cte(entity: &EntityMapping, use_jsonb: bool) -> CommonTable {
    let json_expr = json_build_object_call(&entity.columns, use_jsonb);
    let (select_items, group_by) = match entity.relationship {
        Relationship::Array => {
            let group_column = entity.group_by_column.clone().unwrap_or_default();
            let agg = Expr::FunctionCall(Box::new(FunctionCall {
                qualified_name: Identifier::unqualified(agg_fn("agg", use_jsonb)),
                args: Some(vec![FunctionArg::Value(json_expr)]),
                distinct: false,
                order_by: None,
                within_group: None,
                over: None,
                filter: None,
                with_ordinality: false,
                comments: Default::default(),
            }));
            (
                vec![
                    SelectItem::unnamed(column_expr(&group_column)),
                    SelectItem { value: agg, alias: Some(Ident::new("data")), comments: Default::default() },
                ],
                Some(GroupByClause { items: vec![column_expr(&group_column)], comments: Default::default() }),
            )
        }
        Relationship::Object => {
            let group_column = entity.group_by_column.clone().unwrap_or_default();
            (
                vec![
                    SelectItem::unnamed(column_expr(&group_column)),
                    SelectItem { value: json_expr, alias: Some(Ident::new("data")), comments: Default::default() },
                ],
                None,
            )
        }
    };

    let select = SelectClause { items: select_items, distinct: Distinct::None, hints: Vec::new(), comments: Default::default() };
    let from = FromClause {
        sources: vec![SourceWithJoins { source: base_source("base"), joins: Vec::new() }],
        comments: Default::default(),
    };
    let mut inner = SimpleSelectQuery::minimal(select);
    inner.from = Some(from);
    inner.group_by = group_by;

    CommonTable {
        name: Ident::new(format!("{}_json", entity.name)),
        column_aliases: Vec::new(),
        materialized: Materialization::None,
        query: SelectQuery::Simple(Box::new(inner)),
        comments: Default::default(),
    }
}

/// `buildJson(base, entities, options)` (§4.3 "JSON projection builder").
pub fn build_json(
    base: SimpleSelectQuery,
    root: &EntityMapping,
    entities: &[EntityMapping],
    options: JsonBuildOptions,
) -> Result<SimpleSelectQuery, MappingValidationError> {
    let mut all = vec![root.clone()];
    all.extend(entities.iter().cloned());
    validate_columns(&base, &all)?;
    let ordered = compute_depths(&all)?;

    let base_cte = CommonTable {
        name: Ident::new("base"),
        column_aliases: Vec::new(),
        materialized: Materialization::None,
        query: SelectQuery::Simple(Box::new(base)),
        comments: Default::default(),
    };

    let mut tables = vec![base_cte];
    let mut joins = Vec::new();
    let mut root_columns = root.columns.clone();

    for entity in &ordered {
        if entity.mapping.name == root.name {
            continue;
        }
        let cte = build_entity_cte(entity.mapping, options.use_jsonb);
        let cte_name = cte.name.value.clone();
        let group_column = entity.mapping.group_by_column.clone().unwrap_or_default();
        if entity.mapping.parent.as_deref() == Some(root.name.as_str()) {
            joins.push(JoinClause {
                kind: JoinKind::Left,
                lateral: false,
                source: SourceExpression::table(Identifier::unqualified(cte_name.clone())),
                condition: Some(JoinCondition::On(Expr::BinaryOp(crate::ast::expr::BinaryOp::new(
                    "=",
                    qualified_column("base", &group_column),
                    qualified_column(&cte_name, &group_column),
                )))),
                comments: Default::default(),
            });
            root_columns.insert(entity.mapping.name.clone(), format!("{cte_name}.data"));
        }
        tables.push(cte);
    }

    let root_json = json_build_object_call(&root_columns, options.use_jsonb);
    let projected = match options.result_format {
        ResultFormat::Object => root_json,
        ResultFormat::Array => Expr::FunctionCall(Box::new(FunctionCall {
            qualified_name: Identifier::unqualified(agg_fn("agg", options.use_jsonb)),
            args: Some(vec![FunctionArg::Value(root_json)]),
            distinct: false,
            order_by: None,
            within_group: None,
            over: None,
            filter: None,
            with_ordinality: false,
            comments: Default::default(),
        })),
    };

    let select = SelectClause {
        items: vec![SelectItem { value: projected, alias: Some(Ident::new("result")), comments: Default::default() }],
        distinct: Distinct::None,
        hints: Vec::new(),
        comments: Default::default(),
    };
    let from = FromClause {
        sources: vec![SourceWithJoins { source: base_source("base"), joins }],
        comments: Default::default(),
    };
    let mut query = SimpleSelectQuery::minimal(select);
    query.from = Some(from);
    query.with = Some(WithClause { recursive: false, tables, comments: Default::default() });
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::parse_select;

    fn base(sql: &str) -> SimpleSelectQuery {
        let SelectQuery::Simple(s) = parse_select(sql).unwrap() else { panic!("expected Simple") };
        *s
    }

    fn mapping(name: &str, parent: Option<&str>, relationship: Relationship, group_by: Option<&str>, cols: &[(&str, &str)]) -> EntityMapping {
        EntityMapping {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            relationship,
            group_by_column: group_by.map(str::to_string),
            columns: cols.iter().map(|(p, c)| (p.to_string(), c.to_string())).collect(),
        }
    }

    #[test]
    fn missing_column_is_rejected_before_depth_resolution() {
        let root = mapping("order", None, Relationship::Object, None, &[("id", "missing_column")]);
        let err = build_json(
            base("SELECT order_id, customer_id FROM orders"),
            &root,
            &[],
            JsonBuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MappingValidationError::MissingColumn(c) if c == "missing_column"));
    }

    #[test]
    fn unresolvable_parent_is_rejected() {
        let root = mapping("order", None, Relationship::Object, None, &[("id", "order_id")]);
        let orphan = mapping("item", Some("ghost"), Relationship::Array, Some("order_id"), &[("id", "order_id")]);
        let err =
            build_json(base("SELECT order_id FROM orders"), &root, &[orphan], JsonBuildOptions::default())
                .unwrap_err();
        assert!(matches!(err, MappingValidationError::MissingParent(child, parent) if child == "item" && parent == "ghost"));
    }

    #[test]
    fn more_than_one_array_child_per_parent_is_rejected() {
        let root = mapping("order", None, Relationship::Object, None, &[("id", "order_id")]);
        let items = mapping("items", Some("order"), Relationship::Array, Some("order_id"), &[("id", "order_id")]);
        let notes = mapping("notes", Some("order"), Relationship::Array, Some("order_id"), &[("id", "order_id")]);
        let err = build_json(
            base("SELECT order_id FROM orders"),
            &root,
            &[items, notes],
            JsonBuildOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, MappingValidationError::MultipleArrayChildren(name) if name == "order"));
    }

    #[test]
    fn builds_one_cte_per_non_root_entity_plus_base() {
        // `root`'s mapping never names the nested entity's own key up
        // front — `build_json` adds it to the final projection once the
        // child's CTE is built, keyed by `entity.name`.
        let root = mapping("order", None, Relationship::Object, None, &[("id", "order_id")]);
        let items =
            mapping("items", Some("order"), Relationship::Array, Some("order_id"), &[("sku", "order_id")]);
        let result = build_json(
            base("SELECT order_id FROM orders"),
            &root,
            &[items],
            JsonBuildOptions::default(),
        )
        .unwrap();
        let with = result.with.as_ref().unwrap();
        assert_eq!(with.tables.len(), 2);
        assert_eq!(with.tables[0].name.value, "base");
        assert_eq!(with.tables[1].name.value, "items_json");
    }

    #[test]
    fn array_result_format_wraps_root_in_an_aggregate() {
        let root = mapping("order", None, Relationship::Object, None, &[("id", "order_id")]);
        let options = JsonBuildOptions { result_format: ResultFormat::Array, use_jsonb: true };
        let result = base("SELECT order_id FROM orders");
        let query = build_json(result, &root, &[], options).unwrap();
        let Expr::FunctionCall(call) = &query.select.items[0].value else { panic!("expected a function call") };
        assert_eq!(call.qualified_name.bare_name(), "jsonb_agg");
    }
}
