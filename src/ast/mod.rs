//! Typed AST (§3).
//!
//! Nodes are plain structs/enums tagged by a closed `kind`, never a
//! trait object — per §9's note against virtual dispatch for structural
//! data. Comment-carrying nodes embed a [`comment::CommentSlots`] and
//! implement [`comment::PositionedCommentCarrier`] via
//! [`crate::impl_comment_carrier`].

pub mod clause;
pub mod comment;
pub mod expr;
pub mod ident;
pub mod params;
pub mod statement;
pub mod value;

pub use clause::*;
pub use comment::{CommentPosition, CommentSlots, PositionedCommentCarrier};
pub use expr::*;
pub use ident::{Ident, Identifier, ObjectName};
pub use params::{ParamBindings, ParamValue};
pub use statement::*;
pub use value::{DateTimeField, Literal, LiteralKind, LiteralPrefix};
