pub mod anchor;
pub mod element;
pub mod link;
pub mod scanner;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::element::{CodeBlock, Element, Heading, Visit};
use crate::link::Link;

/// A scanned Markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the validated root.
    pub path: PathBuf,
    /// Top-level elements in source order.
    pub elements: Vec<Element>,
    /// The source file ID (for error reporting with codespan-reporting).
    pub source_id: usize,
}

impl Document {
    /// Every link and image in the document, in source order.
    pub fn links(&self) -> Vec<&Link> {
        let mut links = Vec::new();
        element::walk(&self.elements, &mut |visit| {
            if let Visit::Link(link) = visit {
                links.push(link);
            }
        });
        links
    }

    /// Every code block in the document, in source order.
    pub fn code_blocks(&self) -> Vec<&CodeBlock> {
        let mut blocks = Vec::new();
        element::walk(&self.elements, &mut |visit| {
            if let Visit::CodeBlock(block) = visit {
                blocks.push(block);
            }
        });
        blocks
    }

    /// Every heading in the document, in source order.
    pub fn headings(&self) -> Vec<&Heading> {
        let mut headings = Vec::new();
        element::walk(&self.elements, &mut |visit| {
            if let Visit::Heading(heading) = visit {
                headings.push(heading);
            }
        });
        headings
    }

    /// The fragment targets this document exposes: heading anchors plus any
    /// `id=` or `name=` attribute in raw HTML.
    pub fn anchor_targets(&self) -> HashSet<String> {
        let mut targets = HashSet::new();
        element::walk(&self.elements, &mut |visit| match visit {
            Visit::Heading(heading) => {
                targets.insert(heading.anchor.clone());
            }
            Visit::Html(html) => {
                targets.extend(anchor::html_anchor_ids(html));
            }
            _ => {}
        });
        targets
    }
}
