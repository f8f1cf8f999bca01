//! Public, language-neutral API surface (§6.1). Every entry point here
//! is a thin wrapper over `parser`/`print`/`transform` — the facade's
//! only job is gluing text in, AST through, and `{sql, params}` out.

use crate::ast::params::ParamValue;
use crate::ast::statement::{SelectQuery, Statement};
use crate::error::{InjectError, Result, SqlKitError};
use crate::parser::{self, AnalyzeOutcome};
use crate::print::{self, PrinterConfig, PrintOutput};
use crate::transform::{
    self, CteOptions, EntityMapping, InjectOptions, InjectState, JsonBuildOptions,
    SortOptions, TableColumnResolver,
};

/// `parseSelect(text)` (§6.1): a single SELECT/WITH/VALUES query, no
/// other statement kinds accepted.
pub fn parse_select(text: &str) -> Result<SelectQuery> {
    let lexemes = crate::tokenizer::Tokenizer::new().tokenize(text)?;
    let mut cursor = parser::Cursor::new(&lexemes, 0);
    let query = parser::parse_select_query(&mut cursor)?;
    cursor.eat_punct(crate::tokenizer::Punctuation::Semicolon);
    if !cursor.is_eof() {
        return Err(cursor.error("Unparsed lexeme remains").into());
    }
    Ok(query)
}

/// `parseStatement(text)` (§6.1).
pub fn parse_statement(text: &str) -> Result<Statement> {
    Ok(parser::parse_statement(text)?)
}

/// `parseStatements(text)` (§6.1).
pub fn parse_statements(text: &str) -> Result<Vec<Statement>> {
    Ok(parser::parse_statements(text)?)
}

/// `analyze(text)` (§6.1): never throws, reports structured success or
/// failure for interactive tooling.
pub fn analyze(text: &str) -> AnalyzeOutcome {
    parser::analyze(text)
}

/// `format(ast, config)` (§6.1).
pub fn format(statement: &Statement, config: &PrinterConfig) -> Result<PrintOutput> {
    Ok(print::format(statement, config)?)
}

/// `setParameter(ast, name, value)` (§6.1). Only the statement kinds
/// that carry a `ParamBindings` table accept a binding; anything else
/// (DDL, a binary/values top-level query) has nowhere to put it.
pub fn set_parameter(statement: &mut Statement, name: &str, value: ParamValue) -> Result<()> {
    let params = statement
        .params_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: "DDL or non-Simple query" })?;
    params.set(name, value);
    Ok(())
}

/// `injectParams(ast, state, options?)` (§6.1): requires a
/// `SimpleSelectQuery` somewhere at the top of `query` — binary/values
/// top-level shapes are rejected since there is no single predicate to
/// attach to.
pub fn inject_params(
    query: &mut SelectQuery,
    state: &InjectState,
    resolver: &dyn TableColumnResolver,
    options: InjectOptions,
) -> Result<()> {
    let shape = query.kind_name();
    let simple = query
        .as_simple_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: shape })?;
    transform::param_injector::inject_params(simple, state, resolver, options)?;
    Ok(())
}

/// `injectSort(ast, sortMap)` (§6.1).
pub fn inject_sort(query: &mut SelectQuery, sorts: &[(String, SortOptions)]) -> Result<()> {
    transform::inject_sort(query, sorts)?;
    Ok(())
}

/// `injectPaging(ast, {page, pageSize})` (§6.1).
pub fn inject_paging(query: &mut SelectQuery, page: i64, page_size: i64) -> Result<()> {
    transform::inject_paging(query, page, page_size)?;
    Ok(())
}

/// `addCTE(ast, name, cteQuery, options?)` (§6.1).
pub fn add_cte(
    target: &mut SelectQuery,
    name: impl Into<String>,
    cte_query: SelectQuery,
    options: CteOptions,
) -> Result<()> {
    let shape = target.kind_name();
    let simple = target
        .as_simple_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: shape })?;
    transform::add_cte(simple, name, cte_query, options)?;
    Ok(())
}

/// `removeCTE` (§6.1).
pub fn remove_cte(target: &mut SelectQuery, name: &str) -> Result<()> {
    let shape = target.kind_name();
    let simple = target
        .as_simple_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: shape })?;
    transform::remove_cte(simple, name)?;
    Ok(())
}

/// `replaceCTE` (§6.1).
pub fn replace_cte(
    target: &mut SelectQuery,
    name: &str,
    cte_query: SelectQuery,
    options: CteOptions,
) -> Result<()> {
    let shape = target.kind_name();
    let simple = target
        .as_simple_mut()
        .ok_or(InjectError::UnsupportedQueryShape { found: shape })?;
    transform::replace_cte(simple, name, cte_query, options)?;
    Ok(())
}

/// `hasCTE` (§6.1).
pub fn has_cte(query: &SelectQuery, name: &str) -> bool {
    query.as_simple().map_or(false, |s| transform::has_cte(s, name))
}

/// `getCTENames` (§6.1).
pub fn get_cte_names(query: &SelectQuery) -> Vec<String> {
    query.as_simple().map(transform::get_cte_names).unwrap_or_default()
}

/// `buildJson(ast, mapping)` (§6.1).
pub fn build_json(
    base: SelectQuery,
    root: &EntityMapping,
    entities: &[EntityMapping],
    options: JsonBuildOptions,
) -> Result<SelectQuery> {
    let simple = base.to_simple_query();
    let result = transform::build_json(simple, root, entities, options)?;
    Ok(SelectQuery::Simple(Box::new(result)))
}

/// `validateSql(text)` (§6.1): true if `text` parses as a single
/// statement, false on any parse failure. Never panics.
pub fn validate_sql(text: &str) -> bool {
    parser::parse_statement(text).is_ok()
}

/// `parseAsync(text)` (§5): a convenience entry point for async call
/// sites; performs no actual asynchrony, matching the spec's note that
/// the core is a synchronous, CPU-bound library.
pub async fn parse_async(text: &str) -> Result<Statement> {
    parse_statement(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::params::ParamValue;

    #[test]
    fn parse_select_rejects_trailing_garbage() {
        assert!(parse_select("SELECT 1; garbage").is_err());
    }

    #[test]
    fn parse_select_rejects_non_select_statements() {
        assert!(parse_select("DELETE FROM t").is_err());
    }

    #[test]
    fn set_parameter_writes_into_a_simple_select() {
        let mut statement = Statement::Select(parse_select("SELECT 1 WHERE id = :id").unwrap());
        set_parameter(&mut statement, "id", ParamValue::Number("7".to_string())).unwrap();
        let params = statement.params().unwrap();
        assert_eq!(params.get("id"), Some(&ParamValue::Number("7".to_string())));
    }

    #[test]
    fn inject_params_rejects_binary_query_shape() {
        let mut query = parse_select("SELECT 1 UNION SELECT 2").unwrap();
        let state = InjectState::new();
        let err = inject_params(&mut query, &state, &crate::transform::NoTableColumns, InjectOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            SqlKitError::Inject(InjectError::UnsupportedQueryShape { .. })
        ));
    }

    #[test]
    fn validate_sql_accepts_valid_and_rejects_invalid_text() {
        assert!(validate_sql("SELECT 1"));
        assert!(!validate_sql("SELECT FROM"));
    }
}
