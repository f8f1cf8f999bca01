//! Printer (§4.5): renders a [`PrintToken`] tree into SQL text plus the
//! extracted parameter bindings, honoring a dialect preset and layout
//! options. Printing is a single depth-first tree walk that maintains an
//! indentation counter and a current-line accumulator, mirroring the
//! teacher's `DialectDisplay::fmt(&self, f: &mut dyn fmt::Write, dialect)`
//! contract but operating over the pre-built token tree instead of the
//! AST directly (§4.4's two-stage split).

use indexmap::IndexMap;

use crate::ast::params::{ParamBindings, ParamValue};
use crate::error::ConfigError;
use crate::print::dialect::Dialect;
use crate::print::token::{ClauseKind, PrintToken, PrintTokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamStyle {
    Named,
    Indexed,
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCase {
    None,
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommaBreak {
    None,
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WithClauseStyle {
    Standard,
    CteOneline,
    FullOneline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrinterConfig {
    pub dialect: Dialect,
    pub indent_size: usize,
    pub indent_char: char,
    pub newline: String,
    pub keyword_case: KeywordCase,
    pub comma_break: CommaBreak,
    pub values_comma_break: Option<CommaBreak>,
    pub and_break: CommaBreak,
    pub with_clause_style: WithClauseStyle,
    pub export_comment: bool,
    pub strict_comment_placement: bool,
}

impl PrinterConfig {
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let dialect = Dialect::by_name(name).ok_or_else(|| ConfigError(name.to_string()))?;
        Ok(PrinterConfig {
            dialect,
            ..PrinterConfig::default()
        })
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            dialect: Dialect::postgres(),
            indent_size: 2,
            indent_char: ' ',
            newline: "\n".to_string(),
            keyword_case: KeywordCase::Upper,
            comma_break: CommaBreak::None,
            values_comma_break: None,
            and_break: CommaBreak::None,
            with_clause_style: WithClauseStyle::Standard,
            export_comment: true,
            strict_comment_placement: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamsOutput {
    Named(IndexMap<String, ParamValue>),
    List(Vec<ParamValue>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrintOutput {
    pub formatted_sql: String,
    pub params: ParamsOutput,
}

struct RenderState<'a> {
    config: &'a PrinterConfig,
    params: &'a ParamBindings,
    out: String,
    line: String,
    /// Indent level captured when `line` received its first character since
    /// the last flush. A clause's `indent_inc()`/`indent_dec()` markers can
    /// land on either side of the newline that actually commits a given
    /// line's text, so `flush_line` must use the level that was active when
    /// the line started, not whatever `indent` has drifted to by the time
    /// the next newline flushes it.
    line_indent: Option<usize>,
    indent: usize,
    in_values: usize,
    suppress_newline: usize,
    named_out: IndexMap<String, ParamValue>,
    indexed_names: IndexMap<String, u32>,
    list_out: Vec<ParamValue>,
}

impl<'a> RenderState<'a> {
    fn new(config: &'a PrinterConfig, params: &'a ParamBindings) -> Self {
        RenderState {
            config,
            params,
            out: String::new(),
            line: String::new(),
            line_indent: None,
            indent: 0,
            in_values: 0,
            suppress_newline: 0,
            named_out: IndexMap::new(),
            indexed_names: IndexMap::new(),
            list_out: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.line.is_empty() && self.line_indent.is_none() {
            self.line_indent = Some(self.indent);
        }
        self.line.push_str(text);
    }

    fn push_space_if_needed(&mut self) {
        if let Some(last) = self.line.chars().last() {
            if !last.is_whitespace() {
                self.line.push(' ');
            }
        }
    }

    fn flush_line(&mut self) {
        if !self.out.is_empty() {
            self.out.push_str(&self.config.newline);
        }
        let level = self.line_indent.take().unwrap_or(self.indent);
        let indent_str: String = std::iter::repeat(self.config.indent_char)
            .take(level * self.config.indent_size)
            .collect();
        self.out.push_str(&indent_str);
        self.out.push_str(self.line.trim_end());
        self.line.clear();
    }

    fn newline(&mut self) {
        if self.suppress_newline > 0 {
            self.push_space_if_needed();
            return;
        }
        self.flush_line();
    }

    fn finish(mut self) -> String {
        self.flush_line();
        self.out
    }

    fn keyword_text(&self, word: &str) -> String {
        match self.config.keyword_case {
            KeywordCase::None => word.to_string(),
            KeywordCase::Upper => word.to_uppercase(),
            KeywordCase::Lower => word.to_lowercase(),
        }
    }

    fn quote_identifier(&self, raw: &str) -> String {
        let escape = self.config.dialect.identifier_escape;
        format!("{}{}{}", escape.start, raw, escape.end)
    }

    fn active_comma_break(&self) -> CommaBreak {
        if self.in_values > 0 {
            self.config.values_comma_break.unwrap_or(self.config.comma_break)
        } else {
            self.config.comma_break
        }
    }

    fn emit_separator(&mut self, text: &str, break_mode: CommaBreak) {
        match break_mode {
            CommaBreak::None => {
                self.push_text(text);
                self.push_text(" ");
            }
            CommaBreak::Before => {
                self.newline();
                self.push_text(text);
                self.push_text(" ");
            }
            CommaBreak::After => {
                self.push_text(text);
                self.newline();
            }
        }
    }

    fn param_text(&mut self, binding_name: Option<&str>) -> String {
        match self.config.dialect.parameter_style {
            ParamStyle::Named => {
                let name = binding_name.unwrap_or("");
                if let Some(value) = binding_name.and_then(|n| self.params.get(n)) {
                    self.named_out.insert(name.to_string(), value.clone());
                }
                format!("{}{}", self.config.dialect.parameter_symbol, name)
            }
            ParamStyle::Indexed => {
                let name = binding_name.unwrap_or("").to_string();
                let next_index = self.indexed_names.len() as u32 + 1;
                let index = *self.indexed_names.entry(name.clone()).or_insert(next_index);
                if self.indexed_names.len() as u32 == index {
                    if let Some(value) = binding_name.and_then(|n| self.params.get(n)) {
                        self.list_out.push(value.clone());
                    }
                }
                format!("{}{}", self.config.dialect.parameter_symbol, index)
            }
            ParamStyle::Anonymous => {
                if let Some(value) = binding_name.and_then(|n| self.params.get(n)) {
                    self.list_out.push(value.clone());
                }
                self.config.dialect.parameter_symbol.clone()
            }
        }
    }

    fn visit(&mut self, token: &PrintToken) {
        match &token.kind {
            PrintTokenKind::Keyword => {
                self.push_space_if_needed();
                self.push_text(&self.keyword_text(token.text.as_deref().unwrap_or("")));
            }
            PrintTokenKind::Identifier => {
                self.push_space_if_needed();
                self.push_text(token.text.as_deref().unwrap_or(""));
            }
            PrintTokenKind::QuotedIdentifier => {
                self.push_space_if_needed();
                let quoted = self.quote_identifier(token.text.as_deref().unwrap_or(""));
                self.push_text(&quoted);
            }
            PrintTokenKind::Literal => {
                self.push_space_if_needed();
                self.push_text(token.text.as_deref().unwrap_or(""));
            }
            PrintTokenKind::ParameterRef { binding_name } => {
                self.push_space_if_needed();
                let text = self.param_text(binding_name.as_deref());
                self.push_text(&text);
            }
            PrintTokenKind::Operator => {
                self.push_space_if_needed();
                self.push_text(token.text.as_deref().unwrap_or(""));
            }
            PrintTokenKind::Punctuation => {
                self.push_text(token.text.as_deref().unwrap_or(""));
            }
            PrintTokenKind::Whitespace => {
                self.push_text(" ");
            }
            PrintTokenKind::Newline => {
                self.newline();
            }
            PrintTokenKind::IndentIncrement => {
                self.indent += 1;
            }
            PrintTokenKind::IndentDecrement => {
                self.indent = self.indent.saturating_sub(1);
            }
            PrintTokenKind::CommaSeparator => {
                let mode = self.active_comma_break();
                self.emit_separator(",", mode);
            }
            PrintTokenKind::AndSeparator => {
                let mode = self.config.and_break;
                self.emit_separator(&self.keyword_text("AND"), mode);
            }
            PrintTokenKind::Comment(side) => {
                if !self.config.export_comment {
                    return;
                }
                let text = token.text.as_deref().unwrap_or("");
                self.push_space_if_needed();
                self.push_text(&format!("/* {} */", text));
                let _ = side;
            }
            PrintTokenKind::HintBlock => {
                self.push_space_if_needed();
                self.push_text(&format!("/*+ {} */", token.text.as_deref().unwrap_or("")));
            }
            PrintTokenKind::CTEStart => {
                let oneline = matches!(
                    self.config.with_clause_style,
                    WithClauseStyle::CteOneline | WithClauseStyle::FullOneline
                );
                if oneline {
                    self.suppress_newline += 1;
                }
            }
            PrintTokenKind::CTEEnd => {
                let oneline = matches!(
                    self.config.with_clause_style,
                    WithClauseStyle::CteOneline | WithClauseStyle::FullOneline
                );
                if oneline {
                    self.suppress_newline = self.suppress_newline.saturating_sub(1);
                }
            }
            PrintTokenKind::SubQueryStart | PrintTokenKind::SubQueryEnd => {}
            PrintTokenKind::ClauseStart(kind) => {
                if *kind == ClauseKind::With
                    && self.config.with_clause_style == WithClauseStyle::FullOneline
                {
                    self.suppress_newline += 1;
                }
                if *kind == ClauseKind::Values {
                    self.in_values += 1;
                }
            }
            PrintTokenKind::ClauseEnd(kind) => {
                if *kind == ClauseKind::With
                    && self.config.with_clause_style == WithClauseStyle::FullOneline
                {
                    self.suppress_newline = self.suppress_newline.saturating_sub(1);
                }
                if *kind == ClauseKind::Values {
                    self.in_values = self.in_values.saturating_sub(1);
                }
            }
            PrintTokenKind::Group => {}
        }
        for child in &token.children {
            self.visit(child);
        }
    }
}

/// Renders `tree` into SQL text, collecting parameters from `params`
/// (§4.5 "Parameter substitution", §6.4 "Formatted SQL — layout
/// contract"). Deterministic: the same tree + config always produce the
/// same output (§4.5 "Output contract").
pub fn render_with_params(
    tree: &PrintToken,
    config: &PrinterConfig,
    params: &ParamBindings,
) -> Result<PrintOutput, ConfigError> {
    let mut state = RenderState::new(config, params);
    state.visit(tree);
    let param_style = config.dialect.parameter_style;
    let named_out = std::mem::take(&mut state.named_out);
    let list_out = std::mem::take(&mut state.list_out);
    let formatted_sql = state.finish();
    let params_out = match param_style {
        ParamStyle::Named => ParamsOutput::Named(named_out),
        ParamStyle::Indexed | ParamStyle::Anonymous => ParamsOutput::List(list_out),
    };
    Ok(PrintOutput {
        formatted_sql,
        params: params_out,
    })
}
