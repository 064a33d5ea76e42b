pub mod target;

pub use target::LinkTarget;

use std::ops::Range;

use crate::element::{Inline, inline_text};
use crate::link::target::classify;

/// A reference from one document to another location.
/// Built for both `[text](dest)` links and `![alt](dest)` images.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    /// Display content (alt content for images). Nested inlines are kept so
    /// a badge image inside a link is still discovered by traversal.
    pub content: Vec<Inline>,
    /// The destination exactly as written in the source.
    pub raw_target: String,
    /// The classified destination.
    pub target: LinkTarget,
    /// Byte span of the whole link in source, for error reporting.
    pub span: Range<usize>,
}

impl Link {
    pub fn new(content: Vec<Inline>, raw_target: String, span: Range<usize>) -> Self {
        let target = classify(&raw_target);
        Link {
            content,
            raw_target,
            target,
            span,
        }
    }

    /// Flattened display text.
    pub fn text(&self) -> String {
        inline_text(&self.content)
    }
}
