use std::ops::Range;

use crate::link::Link;

/// A heading together with the anchor it exposes.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Heading level: 1 (#) through 6 (######).
    pub level: u8,
    /// Display text, flattened from the inline content and trimmed.
    pub text: String,
    /// The anchor slug assigned in document order (duplicates suffixed).
    pub anchor: String,
    /// Inline content; links inside headings are validated like any other.
    pub content: Vec<Inline>,
    /// Byte span in source for error reporting.
    pub span: Range<usize>,
}

/// A code block. Only fenced blocks can declare a language tag, so only
/// fenced blocks participate in the untagged-block check.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeBlock {
    /// The fence info string, None when absent or indented.
    pub language: Option<String>,
    /// Literal content of the block.
    pub content: String,
    /// True for ``` fences, false for indented blocks.
    pub fenced: bool,
    /// Byte span in source for error reporting.
    pub span: Range<usize>,
}

impl CodeBlock {
    /// A fenced block that never declared a language tag.
    pub fn is_untagged(&self) -> bool {
        self.fenced && self.language.is_none()
    }
}

/// A single block-level node in a scanned document.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Heading(Heading),
    Paragraph(Vec<Inline>),
    CodeBlock(CodeBlock),
    Blockquote(Vec<Element>),
    Table {
        alignments: Vec<ColumnAlignment>,
        headers: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    OrderedList {
        start: u64,
        items: Vec<Vec<Element>>,
    },
    UnorderedList {
        items: Vec<Vec<Element>>,
    },
    /// Raw HTML block, kept verbatim so anchor definitions inside it
    /// (`<a name="...">`) stay discoverable.
    Html(String),
    HorizontalRule,
}

/// Inline elements that appear within a line of text.
/// Inline types nest freely within one another.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    CodeSpan(String),
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link(Link),
    Image(Link),
    Html(String),
    SoftBreak,
    HardBreak,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnAlignment {
    None,
    Left,
    Center,
    Right,
}

/// One stop on a document traversal. Traversal order is source order, which
/// the report ordering guarantee depends on.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    Heading(&'a Heading),
    CodeBlock(&'a CodeBlock),
    Link(&'a Link),
    Html(&'a str),
}

/// Walk every element (and nested inline content) in source order.
pub fn walk<'a, F: FnMut(Visit<'a>)>(elements: &'a [Element], f: &mut F) {
    for element in elements {
        match element {
            Element::Heading(heading) => {
                f(Visit::Heading(heading));
                walk_inlines(&heading.content, f);
            }
            Element::Paragraph(inlines) => walk_inlines(inlines, f),
            Element::CodeBlock(block) => f(Visit::CodeBlock(block)),
            Element::Blockquote(inner) => walk(inner, f),
            Element::Table { headers, rows, .. } => {
                for cell in headers {
                    walk_inlines(cell, f);
                }
                for row in rows {
                    for cell in row {
                        walk_inlines(cell, f);
                    }
                }
            }
            Element::OrderedList { items, .. } | Element::UnorderedList { items } => {
                for item in items {
                    walk(item, f);
                }
            }
            Element::Html(html) => f(Visit::Html(html)),
            Element::HorizontalRule => {}
        }
    }
}

fn walk_inlines<'a, F: FnMut(Visit<'a>)>(inlines: &'a [Inline], f: &mut F) {
    for inline in inlines {
        match inline {
            Inline::Link(link) | Inline::Image(link) => {
                f(Visit::Link(link));
                // Links can carry nested images (badges); visit those too.
                walk_inlines(&link.content, f);
            }
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children) => walk_inlines(children, f),
            Inline::Html(html) => f(Visit::Html(html)),
            Inline::Text(_) | Inline::CodeSpan(_) | Inline::SoftBreak | Inline::HardBreak => {}
        }
    }
}

/// Flatten inline content to plain text (what a reader sees).
pub fn inline_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    push_inline_text(inlines, &mut text);
    text
}

fn push_inline_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text(s) | Inline::CodeSpan(s) => out.push_str(s),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children) => push_inline_text(children, out),
            Inline::Link(link) | Inline::Image(link) => push_inline_text(&link.content, out),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html(_) => {}
        }
    }
}
