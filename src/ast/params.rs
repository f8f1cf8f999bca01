//! Per-statement parameter binding table (§3.2 "Parameter binding
//! table"), carried unchanged through transformers and consumed only by
//! the printer (§4.5 "Parameter substitution").

use indexmap::IndexMap;

/// An opaque bound value. The crate never inspects these beyond passing
/// them through to the printer's output map/list — "values are opaque"
/// per §3.2.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(String),
    Text(String),
    List(Vec<ParamValue>),
}

/// Insertion-order-preserving `name -> value` map owned by every
/// [`crate::ast::statement::Statement`].
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamBindings(IndexMap<String, ParamValue>);

impl ParamBindings {
    pub fn new() -> Self {
        ParamBindings(IndexMap::new())
    }

    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
