//! Print-token builder + printer (§4.4, §4.5): a two-stage formatter.
//! The builder visits the AST into a [`token::PrintToken`] tree without
//! mutating carrier nodes; the printer renders that tree into SQL text
//! plus the extracted parameter bindings, honoring a [`dialect::Dialect`]
//! preset.

pub mod builder;
pub mod dialect;
pub mod printer;
pub mod token;

pub use dialect::Dialect;
pub use printer::{CommaBreak, KeywordCase, ParamStyle, ParamsOutput, PrinterConfig, PrintOutput, WithClauseStyle};
pub use token::{PrintToken, PrintTokenKind};

use crate::ast::params::ParamBindings;
use crate::ast::statement::Statement;
use crate::error::ConfigError;

/// `format(ast, config) -> {formattedSql, params}` (§6.1).
pub fn format(statement: &Statement, config: &PrinterConfig) -> Result<PrintOutput, ConfigError> {
    let tree = builder::build_statement(statement, &config.dialect);
    let empty = ParamBindings::new();
    let params = statement.params().unwrap_or(&empty);
    printer::render_with_params(&tree, config, params)
}
