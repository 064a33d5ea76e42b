use std::iter::Peekable;

use crate::scanner::error::SyntaxWarning;

// ---------------------------------------------------------------------------
// Raw-source link syntax check
// ---------------------------------------------------------------------------

/// Scan the raw source for malformed link syntax the event stream would
/// silently swallow: a `](` with no closing `)`, or a `[` that never
/// finds its `]`. Fenced code regions and inline code spans are skipped.
pub fn check(source: &str, file_id: usize) -> Vec<SyntaxWarning> {
    let lines = lines_with_offsets(source);
    let fenced = fence_flags(&lines);
    let mut warnings = Vec::new();

    // Brackets and destinations may close on a later line, so paragraphs
    // are scanned whole.
    let mut start = 0;
    while start < lines.len() {
        if fenced[start] || is_blank(&lines[start]) {
            start += 1;
            continue;
        }
        let mut end = start + 1;
        while end < lines.len() && !fenced[end] && !is_blank(&lines[end]) {
            end += 1;
        }
        scan_paragraph(&lines[start..end], file_id, &mut warnings);
        start = end;
    }

    warnings
}

// ---------------------------------------------------------------------------
// Line bookkeeping
// ---------------------------------------------------------------------------

struct Line<'a> {
    start: usize,
    text: &'a str,
}

fn lines_with_offsets(source: &str) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, b) in source.bytes().enumerate() {
        if b == b'\n' {
            lines.push(Line {
                start,
                text: &source[start..i],
            });
            start = i + 1;
        }
    }
    lines.push(Line {
        start,
        text: &source[start..],
    });

    lines
}

/// Blockquote depth of a line, and its content after the `>` markers.
fn strip_quote_markers(text: &str) -> (usize, &str) {
    let mut depth = 0;
    let mut rest = text.trim_start();
    while let Some(after) = rest.strip_prefix('>') {
        depth += 1;
        rest = after.trim_start();
    }
    (depth, rest)
}

fn is_blank(line: &Line<'_>) -> bool {
    strip_quote_markers(line.text).1.is_empty()
}

/// Mark every line that is part of a fenced code block, fence markers
/// included. A fence closes on its own marker kind, and a fence opened
/// inside a blockquote ends when the quote does.
fn fence_flags(lines: &[Line<'_>]) -> Vec<bool> {
    let mut flags = vec![false; lines.len()];
    let mut open: Option<(char, usize)> = None;

    for (i, line) in lines.iter().enumerate() {
        let (depth, content) = strip_quote_markers(line.text);

        // A line outside the quote that held the fence is ordinary
        // content again.
        if open.is_some_and(|(_, at)| depth < at) {
            open = None;
        }

        let marker = if content.starts_with("```") {
            Some('`')
        } else if content.starts_with("~~~") {
            Some('~')
        } else {
            None
        };

        match (open, marker) {
            (None, Some(m)) => {
                open = Some((m, depth));
                flags[i] = true;
            }
            (Some((o, _)), Some(m)) if o == m => {
                open = None;
                flags[i] = true;
            }
            (Some(_), _) => flags[i] = true,
            (None, None) => {}
        }
    }

    flags
}

// ---------------------------------------------------------------------------
// Paragraph scan
// ---------------------------------------------------------------------------

/// Scan one paragraph. A single bracket stack spans all of its lines, so
/// a closer pairs with its own opener and never excuses an earlier one.
fn scan_paragraph(lines: &[Line<'_>], file_id: usize, warnings: &mut Vec<SyntaxWarning>) {
    let mut chars: Vec<(usize, char)> = Vec::new();
    for line in lines {
        for (pos, c) in line.text.char_indices() {
            chars.push((line.start + pos, c));
        }
        // Line ends are ordinary whitespace here, but they do cut
        // backtick runs.
        chars.push((line.start + line.text.len(), '\n'));
    }

    let mut iter = chars.into_iter().peekable();
    let mut open_brackets: Vec<usize> = Vec::new();
    let mut code_open: Option<usize> = None;

    while let Some((at, c)) = iter.next() {
        match c {
            '`' => {
                let mut run = 1;
                while iter.peek().is_some_and(|&(_, next)| next == '`') {
                    iter.next();
                    run += 1;
                }
                // A code span closes only on a backtick run as long as
                // the one that opened it; shorter or longer runs are
                // literal content.
                code_open = match code_open {
                    None => Some(run),
                    Some(len) if len == run => None,
                    open => open,
                };
            }
            _ if code_open.is_some() => {}
            '\\' => {
                iter.next();
            }
            '[' => open_brackets.push(at),
            ']' => {
                let opened = open_brackets.pop().unwrap_or(at);
                if let Some(&(paren_at, '(')) = iter.peek() {
                    iter.next();
                    if !consume_destination(&mut iter) {
                        warnings.push(
                            SyntaxWarning::new(
                                "unterminated link destination",
                                opened..paren_at + 1,
                                file_id,
                            )
                            .with_note("expected ')' to close the link destination"),
                        );
                        return;
                    }
                }
            }
            _ => {}
        }
    }

    for &at in &open_brackets {
        warnings.push(SyntaxWarning::new(
            "unterminated link bracket",
            at..at + 1,
            file_id,
        ));
    }
}

/// Advance past a link destination opened by `](`. Returns false when the
/// paragraph ends before the parentheses balance out.
fn consume_destination(iter: &mut Peekable<impl Iterator<Item = (usize, char)>>) -> bool {
    let mut depth = 1usize;

    while let Some((_, c)) = iter.next() {
        match c {
            '\\' => {
                iter.next();
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }

    false
}
