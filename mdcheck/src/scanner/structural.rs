use std::cell::RefCell;
use std::ops::Range;

use pulldown_cmark::{
    BrokenLink, CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser as CmarkParser, Tag,
    TagEnd,
};

use crate::anchor::AnchorSet;
use crate::element::{CodeBlock, ColumnAlignment, Element, Heading, Inline};
use crate::link::Link;
use crate::scanner::error::SyntaxWarning;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Scan Markdown source text into a list of top-level elements, along with
/// any warnings for reference links that never resolve to a definition.
pub fn scan_elements(source: &str, file_id: usize) -> (Vec<Element>, Vec<SyntaxWarning>) {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES;

    // Reference-style links without a matching definition disappear from the
    // event stream entirely; the callback is the only place they surface.
    let unresolved: RefCell<Vec<(String, Range<usize>)>> = RefCell::new(Vec::new());
    let events: Vec<(Event<'_>, Range<usize>)> = {
        let mut callback = |link: BrokenLink<'_>| {
            if matches!(link.link_type, LinkType::Reference | LinkType::Collapsed) {
                unresolved
                    .borrow_mut()
                    .push((link.reference.to_string(), link.span.clone()));
            }
            None
        };
        CmarkParser::new_with_broken_link_callback(source, options, Some(&mut callback))
            .into_offset_iter()
            .collect()
    };

    let mut state = ScanState::new();
    let mut i = 0;
    let elements = state.collect_elements(&events, &mut i, None);

    let warnings = unresolved
        .into_inner()
        .into_iter()
        .map(|(reference, span)| {
            SyntaxWarning::new(
                format!("unresolved link reference '{reference}'"),
                span,
                file_id,
            )
        })
        .collect();

    (elements, warnings)
}

// ---------------------------------------------------------------------------
// Scan state
// ---------------------------------------------------------------------------

struct ScanState {
    /// Anchor assignment is document-wide: duplicate heading titles get
    /// numbered suffixes in order of appearance.
    anchors: AnchorSet,
}

impl ScanState {
    fn new() -> Self {
        ScanState {
            anchors: AnchorSet::new(),
        }
    }

    /// Collect elements until the end of the event stream, or until `until`
    /// matches an End tag (which is consumed).
    fn collect_elements(
        &mut self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        until: Option<&dyn Fn(&TagEnd) -> bool>,
    ) -> Vec<Element> {
        let mut elements = Vec::new();

        while *i < events.len() {
            let (ref ev, ref range) = events[*i];

            match ev {
                Event::End(tag_end) if until.is_some_and(|f| f(tag_end)) => {
                    *i += 1;
                    break;
                }

                Event::Start(Tag::Heading { level, .. }) => {
                    let level = heading_level_to_u8(level);
                    let span = range.clone();
                    *i += 1;
                    let content =
                        self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Heading(_)));
                    let text = crate::element::inline_text(&content).trim().to_string();
                    let anchor = self.anchors.assign(&text);
                    elements.push(Element::Heading(Heading {
                        level,
                        text,
                        anchor,
                        content,
                        span,
                    }));
                }

                Event::Start(Tag::Paragraph) => {
                    *i += 1;
                    let inlines =
                        self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Paragraph));
                    elements.push(Element::Paragraph(inlines));
                }

                Event::Start(Tag::CodeBlock(kind)) => {
                    let (language, fenced) = match kind {
                        CodeBlockKind::Fenced(info) => {
                            let info = info.trim().to_string();
                            (if info.is_empty() { None } else { Some(info) }, true)
                        }
                        CodeBlockKind::Indented => (None, false),
                    };
                    let span = range.clone();
                    *i += 1;
                    let content =
                        collect_text_until(events, i, |e| matches!(e, TagEnd::CodeBlock));
                    elements.push(Element::CodeBlock(CodeBlock {
                        language,
                        content,
                        fenced,
                        span,
                    }));
                }

                Event::Start(Tag::Table(alignments)) => {
                    let alignments: Vec<ColumnAlignment> = alignments
                        .iter()
                        .map(|a| match a {
                            pulldown_cmark::Alignment::None => ColumnAlignment::None,
                            pulldown_cmark::Alignment::Left => ColumnAlignment::Left,
                            pulldown_cmark::Alignment::Center => ColumnAlignment::Center,
                            pulldown_cmark::Alignment::Right => ColumnAlignment::Right,
                        })
                        .collect();
                    *i += 1;
                    let (headers, rows) = self.collect_table(events, i);
                    elements.push(Element::Table {
                        alignments,
                        headers,
                        rows,
                    });
                }

                Event::Start(Tag::BlockQuote(_)) => {
                    *i += 1;
                    let inner = self.collect_elements(
                        events,
                        i,
                        Some(&|e| matches!(e, TagEnd::BlockQuote(_))),
                    );
                    elements.push(Element::Blockquote(inner));
                }

                Event::Start(Tag::List(Some(start))) => {
                    let start = *start;
                    *i += 1;
                    let items = self.collect_list_items(events, i);
                    elements.push(Element::OrderedList { start, items });
                }

                Event::Start(Tag::List(None)) => {
                    *i += 1;
                    let items = self.collect_list_items(events, i);
                    elements.push(Element::UnorderedList { items });
                }

                Event::Start(Tag::HtmlBlock) => {
                    *i += 1;
                    let html = collect_html(events, i);
                    elements.push(Element::Html(html));
                }

                Event::Rule => {
                    elements.push(Element::HorizontalRule);
                    *i += 1;
                }

                // Tight list items carry their inline content bare, without
                // a wrapping Paragraph.
                _ => match self.collect_one_inline(events, i) {
                    Some(first) => {
                        let mut inlines = vec![first];
                        while *i < events.len() {
                            match self.collect_one_inline(events, i) {
                                Some(inline) => inlines.push(inline),
                                None => break,
                            }
                        }
                        elements.push(Element::Paragraph(inlines));
                    }
                    None => *i += 1,
                },
            }
        }

        elements
    }

    /// Build a single inline node from the event at `*i`, advancing past it.
    /// Returns None (without advancing) when the event is not inline content.
    fn collect_one_inline(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
    ) -> Option<Inline> {
        let (ref ev, ref range) = events[*i];

        match ev {
            Event::Text(s) => {
                *i += 1;
                Some(Inline::Text(s.to_string()))
            }
            Event::Code(s) => {
                *i += 1;
                Some(Inline::CodeSpan(s.to_string()))
            }
            Event::InlineHtml(s) | Event::Html(s) => {
                *i += 1;
                Some(Inline::Html(s.to_string()))
            }
            Event::SoftBreak => {
                *i += 1;
                Some(Inline::SoftBreak)
            }
            Event::HardBreak => {
                *i += 1;
                Some(Inline::HardBreak)
            }
            Event::Start(Tag::Strong) => {
                *i += 1;
                let children = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Strong));
                Some(Inline::Strong(children))
            }
            Event::Start(Tag::Emphasis) => {
                *i += 1;
                let children = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                Some(Inline::Emphasis(children))
            }
            Event::Start(Tag::Strikethrough) => {
                *i += 1;
                let children =
                    self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Strikethrough));
                Some(Inline::Strikethrough(children))
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                let raw_target = dest_url.to_string();
                let span = range.clone();
                *i += 1;
                let content = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                Some(Inline::Link(Link::new(content, raw_target, span)))
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                let raw_target = dest_url.to_string();
                let span = range.clone();
                *i += 1;
                let content = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Image));
                Some(Inline::Image(Link::new(content, raw_target, span)))
            }
            _ => None,
        }
    }

    /// Collect inline nodes until a matching End tag (which is consumed).
    fn collect_inlines(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> Vec<Inline> {
        let mut inlines = Vec::new();

        while *i < events.len() {
            if let (Event::End(tag_end), _) = &events[*i] {
                if is_end(tag_end) {
                    *i += 1;
                    break;
                }
            }
            match self.collect_one_inline(events, i) {
                Some(inline) => inlines.push(inline),
                None => *i += 1,
            }
        }

        inlines
    }

    /// Collect table headers and rows.
    fn collect_table(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
    ) -> (Vec<Vec<Inline>>, Vec<Vec<Vec<Inline>>>) {
        let mut headers: Vec<Vec<Inline>> = Vec::new();
        let mut rows: Vec<Vec<Vec<Inline>>> = Vec::new();
        let mut in_head = false;
        let mut current_row: Vec<Vec<Inline>> = Vec::new();

        while *i < events.len() {
            let (ref ev, _) = events[*i];
            match ev {
                Event::End(TagEnd::Table) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::TableHead) => {
                    in_head = true;
                    *i += 1;
                }
                Event::End(TagEnd::TableHead) => {
                    in_head = false;
                    headers = std::mem::take(&mut current_row);
                    *i += 1;
                }
                Event::Start(Tag::TableRow) => {
                    current_row = Vec::new();
                    *i += 1;
                }
                Event::End(TagEnd::TableRow) => {
                    if !in_head {
                        rows.push(std::mem::take(&mut current_row));
                    }
                    *i += 1;
                }
                Event::Start(Tag::TableCell) => {
                    *i += 1;
                    let cell =
                        self.collect_inlines(events, i, &|e| matches!(e, TagEnd::TableCell));
                    current_row.push(cell);
                }
                _ => {
                    *i += 1;
                }
            }
        }

        (headers, rows)
    }

    /// Collect the items of a list, each as its own element sequence.
    fn collect_list_items(
        &mut self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
    ) -> Vec<Vec<Element>> {
        let mut items = Vec::new();

        while *i < events.len() {
            let (ref ev, _) = events[*i];
            match ev {
                Event::End(TagEnd::List(_)) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::Item) => {
                    *i += 1;
                    let item =
                        self.collect_elements(events, i, Some(&|e| matches!(e, TagEnd::Item)));
                    items.push(item);
                }
                _ => {
                    *i += 1;
                }
            }
        }

        items
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn heading_level_to_u8(level: &HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Collect all text content until a matching End tag.
fn collect_text_until(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: impl Fn(&TagEnd) -> bool,
) -> String {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}

/// Collect the raw text of an HTML block.
fn collect_html(events: &[(Event<'_>, Range<usize>)], i: &mut usize) -> String {
    let mut html = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(TagEnd::HtmlBlock) => {
                *i += 1;
                break;
            }
            Event::Html(s) | Event::Text(s) => {
                html.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    html
}
