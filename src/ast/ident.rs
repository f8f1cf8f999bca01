//! Identifiers and qualified names.

use crate::ast::comment::CommentSlots;
use crate::impl_comment_carrier;

/// A single, possibly-quoted identifier component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ident {
    pub value: String,
    pub quoted: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}

impl_comment_carrier!(Ident);

impl Ident {
    pub fn new(value: impl Into<String>) -> Self {
        Ident {
            value: value.into(),
            quoted: false,
            comments: CommentSlots::default(),
        }
    }

    pub fn quoted(value: impl Into<String>) -> Self {
        Ident {
            value: value.into(),
            quoted: true,
            comments: CommentSlots::default(),
        }
    }
}

/// `Identifier { namespaces: [string]?, name: {value, quoted} }` (§3.2).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    pub namespaces: Vec<Ident>,
    pub name: Ident,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub comments: CommentSlots,
}

impl_comment_carrier!(Identifier);

impl Identifier {
    pub fn unqualified(name: impl Into<String>) -> Self {
        Identifier {
            namespaces: Vec::new(),
            name: Ident::new(name),
            comments: CommentSlots::default(),
        }
    }

    pub fn qualified(namespaces: Vec<Ident>, name: Ident) -> Self {
        Identifier {
            namespaces,
            name,
            comments: CommentSlots::default(),
        }
    }

    /// Dotted textual form, ignoring quoting (used for column-name
    /// resolution by the transformers, §4.3).
    pub fn dotted(&self) -> String {
        let mut parts: Vec<&str> = self.namespaces.iter().map(|n| n.value.as_str()).collect();
        parts.push(self.name.value.as_str());
        parts.join(".")
    }

    pub fn bare_name(&self) -> &str {
        &self.name.value
    }
}

/// Alias for an `ObjectName`-shaped identifier used by table/type
/// references (kept distinct from [`Identifier`] so transformers can
/// distinguish "a column/expression identifier" from "a table/type
/// name" at the type level, matching the teacher's `ObjectName`).
pub type ObjectName = Identifier;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_joins_namespaces_and_name() {
        let id = Identifier::qualified(vec![Ident::new("a")], Ident::new("price"));
        assert_eq!(id.dotted(), "a.price");
    }
}
