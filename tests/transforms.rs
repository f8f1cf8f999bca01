//! End-to-end coverage for the public facade and the AST transformers
//! (spec §8's concrete scenarios and quantified invariants).

use sqlkit_core::ast::params::ParamValue;
use sqlkit_core::ast::statement::{SelectQuery, Statement};
use sqlkit_core::print::{Dialect, KeywordCase, PrinterConfig, WithClauseStyle};
use sqlkit_core::transform::{
    add_cte, get_cte_names, has_cte, inject_sort, remove_cte, Condition, CteOptions, InjectEntry,
    InjectOptions, InjectState, NoTableColumns, Operator, SortOptions, TableColumnResolver,
};
use sqlkit_core::{format, inject_paging, inject_params, parse_select, parse_statement, validate_sql};

struct FixedColumns(Vec<(&'static str, &'static [&'static str])>);

impl TableColumnResolver for FixedColumns {
    fn columns(&self, table_name: &str) -> Vec<String> {
        self.0
            .iter()
            .find(|(name, _)| *name == table_name)
            .map(|(_, cols)| cols.iter().map(|c| c.to_string()).collect())
            .unwrap_or_default()
    }
}

fn simple_mut(query: &mut SelectQuery) -> &mut sqlkit_core::ast::statement::SimpleSelectQuery {
    query.as_simple_mut().expect("expected a SimpleSelectQuery")
}

#[test]
fn parses_and_reformats_a_simple_select() {
    let query = parse_select("SELECT id, name FROM users WHERE active = true").unwrap();
    let statement = Statement::Select(query);
    let config = PrinterConfig { dialect: Dialect::postgres(), ..PrinterConfig::default() };
    let output = format(&statement, &config).unwrap();
    assert!(output.formatted_sql.contains("users"));
    assert!(output.formatted_sql.to_uppercase().contains("SELECT"));
    assert!(output.formatted_sql.to_uppercase().contains("WHERE"));
}

#[test]
fn format_is_deterministic_across_repeated_calls() {
    let query = parse_select("SELECT a, b FROM t ORDER BY a").unwrap();
    let statement = Statement::Select(query);
    let config = PrinterConfig::default();
    let first = format(&statement, &config).unwrap();
    let second = format(&statement, &config).unwrap();
    assert_eq!(first.formatted_sql, second.formatted_sql);
}

#[test]
fn cte_oneline_keeps_the_outer_clauses_on_their_own_indented_lines() {
    let query = parse_select(
        "WITH user_summary AS ( SELECT id, name, COUNT(*) FROM users WHERE active = true \
         GROUP BY id, name ) SELECT * FROM user_summary ORDER BY name",
    )
    .unwrap();
    let statement = Statement::Select(query);
    let config = PrinterConfig {
        dialect: Dialect::postgres(),
        keyword_case: KeywordCase::Upper,
        indent_size: 2,
        with_clause_style: WithClauseStyle::CteOneline,
        ..PrinterConfig::default()
    };
    let output = format(&statement, &config).unwrap();
    let sql = output.formatted_sql;

    // The CTE body collapses onto the `WITH` line (§6.3 "cte-oneline"):
    // everything through its closing paren is one line, no embedded newline.
    let with_line = sql.lines().nth(0).unwrap();
    assert_eq!(with_line, "WITH");
    let cte_line = sql.lines().nth(1).unwrap();
    assert!(cte_line.starts_with("  \"user_summary\""));
    assert!(cte_line.contains("SELECT"));
    assert!(cte_line.contains("WHERE"));
    assert!(cte_line.contains("GROUP"));
    assert!(cte_line.ends_with(')'));

    // The outer SELECT/FROM/ORDER BY clauses each get their own unindented
    // keyword line with an indented body line below it (the fix for the
    // FROM/WHERE/GROUP BY/HAVING/ORDER BY builders lacking the indent
    // wrapping that SELECT already had).
    assert!(sql.contains("\nSELECT\n  *\n"));
    assert!(sql.contains("\nFROM\n  \"user_summary\"\n"));
    assert!(sql.contains("\nORDER BY\n  \"name\""));
}

#[test]
fn param_injection_builds_range_and_set_predicates() {
    let mut query = parse_select("SELECT * FROM articles a").unwrap();
    let resolver = FixedColumns(vec![("articles", &["price", "article_name", "category_id", "tags"])]);

    let mut state: InjectState = InjectState::new();
    state.insert(
        "price".to_string(),
        InjectEntry::Condition(
            Condition::new()
                .with(Operator::Min, ParamValue::Number("10".to_string()))
                .with(Operator::Max, ParamValue::Number("100".to_string()))
                .with(Operator::NotEq, ParamValue::Number("50".to_string())),
        ),
    );
    state.insert(
        "article_name".to_string(),
        InjectEntry::Condition(Condition::new().with(Operator::ILike, ParamValue::Text("%premium%".to_string()))),
    );
    state.insert(
        "category_id".to_string(),
        InjectEntry::Condition(Condition::new().with(
            Operator::In,
            ParamValue::List(vec![
                ParamValue::Number("1".to_string()),
                ParamValue::Number("2".to_string()),
                ParamValue::Number("3".to_string()),
                ParamValue::Number("4".to_string()),
            ]),
        )),
    );
    state.insert(
        "tags".to_string(),
        InjectEntry::Condition(Condition::new().with(
            Operator::Any,
            ParamValue::List(vec![
                ParamValue::Number("100".to_string()),
                ParamValue::Number("200".to_string()),
                ParamValue::Number("300".to_string()),
            ]),
        )),
    );

    inject_params(&mut query, &state, &resolver, InjectOptions::default()).unwrap();

    {
        let simple = simple_mut(&mut query);
        assert!(simple.r#where.is_some());
        assert_eq!(simple.params.get("price_gte"), Some(&ParamValue::Number("10".to_string())));
        assert_eq!(simple.params.get("price_lte"), Some(&ParamValue::Number("100".to_string())));
        assert_eq!(simple.params.get("price_ne"), Some(&ParamValue::Number("50".to_string())));
        assert!(simple.params.get("article_name_ilike").is_some());
        // `in` binds one parameter per list element (§8 Scenario 2, §9
        // "column_in_i"), not a single parameter holding the whole list.
        assert!(simple.params.get("category_id_in").is_none());
        for (i, expected) in ["1", "2", "3", "4"].iter().enumerate() {
            assert_eq!(
                simple.params.get(&format!("category_id_in_{i}")),
                Some(&ParamValue::Number(expected.to_string()))
            );
        }
        assert!(simple.params.get("tags_any").is_some());
    }

    let statement = Statement::Select(query);
    let output = format(&statement, &PrinterConfig::default()).unwrap();
    assert!(output.formatted_sql.contains(
        "category_id IN( :category_id_in_0, :category_id_in_1, :category_id_in_2, :category_id_in_3)"
    ));
}

#[test]
fn param_injection_fails_fast_when_all_undefined() {
    let mut query = parse_select("SELECT * FROM articles a").unwrap();
    let mut state: InjectState = InjectState::new();
    state.insert("price".to_string(), InjectEntry::Undefined);
    let err = inject_params(&mut query, &state, &NoTableColumns, InjectOptions::default()).unwrap_err();
    assert!(matches!(err, sqlkit_core::error::SqlKitError::Inject(sqlkit_core::error::InjectError::AllUndefined)));
}

#[test]
fn param_injection_resolves_upstream_into_cte_before_inline_subquery() {
    let mut query = parse_select(
        "WITH cte_users AS (SELECT id, name FROM users WHERE active = true) \
         SELECT * FROM (SELECT id AS user_id, name AS user_name FROM cte_users) sub",
    )
    .unwrap();

    let mut state: InjectState = InjectState::new();
    state.insert("id".to_string(), InjectEntry::Value(ParamValue::Number("42".to_string())));
    state.insert("user_id".to_string(), InjectEntry::Value(ParamValue::Number("100".to_string())));

    inject_params(&mut query, &state, &NoTableColumns, InjectOptions::default()).unwrap();

    let simple = simple_mut(&mut query);
    // `user_id` only exists on the inline subquery's output list, so its
    // predicate lands there.
    let with = simple.with.as_ref().expect("CTE survives injection");
    let cte = &with.tables[0];
    let SelectQuery::Simple(cte_simple) = &cte.query else { panic!("cte should stay Simple") };
    assert!(cte_simple.params.get("id_eq").is_some());
    assert!(cte_simple.r#where.is_some());
}

#[test]
fn sort_injection_appends_to_existing_order_by_with_nulls() {
    let mut query = parse_select("SELECT id, last_login FROM users ORDER BY id ASC").unwrap();
    let sorts = vec![
        ("last_login".to_string(), SortOptions { desc: true, nulls_last: true, ..SortOptions::default() }),
    ];
    inject_sort(&mut query, &sorts).unwrap();

    let simple = simple_mut(&mut query);
    let order_by = simple.order_by.as_ref().unwrap();
    assert_eq!(order_by.items.len(), 2);
    assert_eq!(order_by.items[0].expr, sqlkit_core::ast::expr::Expr::Identifier(
        sqlkit_core::ast::ident::Identifier::unqualified("id"),
    ));
    assert_eq!(order_by.items[1].direction, sqlkit_core::ast::clause::SortDirection::Desc);
    assert_eq!(order_by.items[1].nulls, sqlkit_core::ast::clause::NullsOrder::Last);
}

#[test]
fn sort_injection_rejects_conflicting_options() {
    let mut query = parse_select("SELECT id FROM users").unwrap();
    let sorts = vec![("id".to_string(), SortOptions { asc: true, desc: true, ..SortOptions::default() })];
    assert!(inject_sort(&mut query, &sorts).is_err());
}

#[test]
fn pagination_algebra_computes_offset_from_page() {
    let mut query = parse_select("SELECT id FROM users").unwrap();
    inject_paging(&mut query, 3, 25).unwrap();
    let simple = simple_mut(&mut query);
    assert_eq!(
        simple.limit.as_ref().unwrap().value,
        sqlkit_core::ast::expr::Expr::Literal(sqlkit_core::ast::value::Literal::number("25"))
    );
    assert_eq!(
        simple.offset.as_ref().unwrap().value,
        sqlkit_core::ast::expr::Expr::Literal(sqlkit_core::ast::value::Literal::number("50"))
    );
}

#[test]
fn pagination_rejects_invalid_page_and_size() {
    let mut query = parse_select("SELECT id FROM users").unwrap();
    assert!(inject_paging(&mut query, 0, 25).is_err());
    assert!(inject_paging(&mut query, 1, 0).is_err());
    assert!(inject_paging(&mut query, 1, 1001).is_err());
}

#[test]
fn cte_set_law_holds_for_add_remove() {
    let mut query = parse_select("SELECT * FROM t").unwrap();
    let simple = simple_mut(&mut query);
    let sub = parse_select("SELECT 1 AS v").unwrap();

    add_cte(simple, "x", sub, CteOptions { materialized: Some(true) }).unwrap();
    assert!(has_cte(simple, "x"));
    assert_eq!(get_cte_names(simple), vec!["x".to_string()]);

    remove_cte(simple, "x").unwrap();
    assert!(!has_cte(simple, "x"));
}

#[test]
fn cte_add_rejects_duplicate_name() {
    let mut query = parse_select("SELECT * FROM t").unwrap();
    let simple = simple_mut(&mut query);
    let first = parse_select("SELECT 1 AS v").unwrap();
    let second = parse_select("SELECT 2 AS v").unwrap();
    add_cte(simple, "x", first, CteOptions::default()).unwrap();
    let err = add_cte(simple, "x", second, CteOptions::default()).unwrap_err();
    assert!(matches!(err, sqlkit_core::error::CteError::Duplicate(_)));
}

#[test]
fn merge_statement_parses_conditional_delete_and_do_nothing() {
    let statement = parse_statement(
        "MERGE INTO target t USING incoming s ON t.id = s.id \
         WHEN MATCHED AND s.should_delete = true THEN DELETE WHERE t.active = true \
         WHEN NOT MATCHED BY SOURCE THEN DO NOTHING \
         WHEN NOT MATCHED BY TARGET THEN INSERT DEFAULT VALUES",
    )
    .unwrap();

    let Statement::Merge(merge) = statement else { panic!("expected a MERGE statement") };
    assert_eq!(merge.when_clauses.len(), 3);
}

#[test]
fn validate_sql_reports_parse_failures_without_panicking() {
    assert!(validate_sql("SELECT id FROM users"));
    assert!(!validate_sql("SELECT FROM WHERE"));
}
