//! The `PositionedCommentCarrier` capability (§3.2), realized as a small
//! embedded struct rather than a trait object — per §9's guidance against
//! virtual dispatch for structural AST data.

/// Embedded on every AST node that can carry comments. Cloned, never
/// mutated, by read-only visitors such as the print-token builder
/// (§4.4's non-mutation invariant; §9 "Visitor non-mutation").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentSlots {
    pub(crate) before: Vec<String>,
    pub(crate) after: Vec<String>,
    /// The comment sequence leading a *statement's* first keyword
    /// (§3.2 rule 1). Only ever populated on statement-level nodes.
    pub(crate) header: Vec<String>,
    /// `thenLeadingComments` from §3.2 rule 6 — comments between `THEN`
    /// and its action, distinct from the action's own `before` slot.
    pub(crate) then_leading: Vec<String>,
}

impl CommentSlots {
    pub const fn empty() -> Self {
        CommentSlots {
            before: Vec::new(),
            after: Vec::new(),
            header: Vec::new(),
            then_leading: Vec::new(),
        }
    }
}

/// Which comment slot an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentPosition {
    Before,
    After,
}

impl CommentSlots {
    pub fn add(&mut self, position: CommentPosition, comments: Vec<String>) {
        match position {
            CommentPosition::Before => self.before.extend(comments),
            CommentPosition::After => self.after.extend(comments),
        }
    }

    pub fn get(&self, position: CommentPosition) -> &[String] {
        match position {
            CommentPosition::Before => &self.before,
            CommentPosition::After => &self.after,
        }
    }

    pub fn set_header(&mut self, comments: Vec<String>) {
        self.header = comments;
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn set_then_leading(&mut self, comments: Vec<String>) {
        self.then_leading = comments;
    }

    pub fn then_leading(&self) -> &[String] {
        &self.then_leading
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_empty()
            && self.after.is_empty()
            && self.header.is_empty()
            && self.then_leading.is_empty()
    }
}

/// Convenience trait implemented by every carrier node so callers can
/// write `node.add_positioned_comments(...)` generically; the trait
/// forwards to the embedded [`CommentSlots`] field, never does dynamic
/// dispatch over the node's structural shape.
pub trait PositionedCommentCarrier {
    fn comment_slots(&self) -> &CommentSlots;
    fn comment_slots_mut(&mut self) -> &mut CommentSlots;

    fn add_positioned_comments(&mut self, position: CommentPosition, comments: Vec<String>) {
        self.comment_slots_mut().add(position, comments);
    }

    fn get_positioned_comments(&self, position: CommentPosition) -> &[String] {
        self.comment_slots().get(position)
    }
}

/// Implements [`PositionedCommentCarrier`] by delegating to a
/// `comments: CommentSlots` field on `$ty`.
#[macro_export]
macro_rules! impl_comment_carrier {
    ($ty:ty) => {
        impl $crate::ast::comment::PositionedCommentCarrier for $ty {
            fn comment_slots(&self) -> &$crate::ast::comment::CommentSlots {
                &self.comments
            }
            fn comment_slots_mut(&mut self) -> &mut $crate::ast::comment::CommentSlots {
                &mut self.comments
            }
        }
    };
}
