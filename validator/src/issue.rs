use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub enum IssueKind {
    BrokenLink { target: String },
    EscapesRoot { target: String },
    MissingAnchor { target: String, anchor: String },
    UntaggedCodeBlock,
    LinkSyntax(String),
    Unreadable(String),
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::BrokenLink { target } => {
                write!(f, "broken link: '{}' does not resolve to a file", target)
            }
            IssueKind::EscapesRoot { target } => {
                write!(f, "broken link: '{}' escapes the document root", target)
            }
            IssueKind::MissingAnchor { target, anchor } => {
                write!(f, "broken link: no anchor '{}' in '{}'", anchor, target)
            }
            IssueKind::UntaggedCodeBlock => {
                write!(f, "untagged code block: fenced block has no language tag")
            }
            IssueKind::LinkSyntax(msg) => write!(f, "link syntax: {}", msg),
            IssueKind::Unreadable(msg) => write!(f, "unreadable file: {}", msg),
        }
    }
}

impl std::error::Error for IssueKind {}

/// An issue enriched with source location information.
#[derive(Debug, Clone)]
pub struct Issue {
    pub kind: IssueKind,
    /// Byte span in the document source, when the issue points at one.
    pub span: Option<Range<usize>>,
    /// 1-based source line, filled in once the document text is known.
    pub line: Option<usize>,
    pub is_warning: bool,
}

impl Issue {
    pub fn error(kind: IssueKind, span: Range<usize>) -> Self {
        Issue {
            kind,
            span: Some(span),
            line: None,
            is_warning: false,
        }
    }

    pub fn warning(kind: IssueKind, span: Range<usize>) -> Self {
        Issue {
            kind,
            span: Some(span),
            line: None,
            is_warning: true,
        }
    }

    /// An issue that concerns the document as a whole.
    pub fn spanless(kind: IssueKind) -> Self {
        Issue {
            kind,
            span: None,
            line: None,
            is_warning: false,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl std::error::Error for Issue {}
