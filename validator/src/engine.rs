use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mdcheck::Document;
use mdcheck::scanner::{Scanner, SyntaxWarning};

use crate::index::DocumentIndex;
use crate::issue::{Issue, IssueKind};
use crate::report::{DocumentReport, Report, SourceMap, display_path};
use crate::resolver::Resolver;
use crate::walker;

// ---------------------------------------------------------------------------
// Options and errors
// ---------------------------------------------------------------------------

/// Validation options. The ignore list is the only knob.
#[derive(Debug, Default, Clone)]
pub struct ValidateOptions {
    /// Root-relative files or directories to leave unscanned.
    pub ignore: Vec<String>,
}

/// A failure that prevents validation from running at all. Anything that
/// concerns a single document lands in the report instead.
#[derive(Debug)]
pub enum ValidateError {
    NotADirectory(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ValidateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidateError::NotADirectory(path) => {
                write!(f, "not a directory: {}", path.display())
            }
            ValidateError::Io { path, source } => {
                write!(f, "cannot read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ValidateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ValidateError::Io { source, .. } => Some(source),
            ValidateError::NotADirectory(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate every Markdown document under `root` with default options.
pub fn validate(root: &Path) -> Result<Report, ValidateError> {
    validate_with(root, &ValidateOptions::default())
}

/// Validate every Markdown document under `root`: internal links must
/// resolve, and fenced code blocks must carry a language tag.
pub fn validate_with(root: &Path, options: &ValidateOptions) -> Result<Report, ValidateError> {
    if !root.is_dir() {
        return Err(ValidateError::NotADirectory(root.to_path_buf()));
    }

    let paths = walker::discover(root, &options.ignore).map_err(|source| ValidateError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    // First pass: read and scan everything, so every document's anchors
    // are known before any link is judged.
    let mut entries = Vec::new();
    let mut sources = SourceMap::default();
    let mut index = DocumentIndex::new();

    for path in paths {
        match fs::read_to_string(root.join(&path)) {
            Ok(text) => {
                let source_id = sources.add(display_path(&path), text.clone());
                let outcome = Scanner::new(text, source_id).scan();
                let document = Document {
                    path,
                    elements: outcome.elements,
                    source_id,
                };
                index.insert(&document);
                entries.push(ScanEntry::Scanned {
                    document,
                    warnings: outcome.warnings,
                });
            }
            Err(err) => entries.push(ScanEntry::Unreadable {
                path,
                error: err.to_string(),
            }),
        }
    }

    // Second pass: judge links and code blocks per document.
    let resolver = Resolver::new(root.to_path_buf(), index);
    let mut documents = Vec::new();

    for entry in &entries {
        match entry {
            ScanEntry::Unreadable { path, error } => documents.push(DocumentReport {
                path: path.clone(),
                source_id: None,
                issues: vec![Issue::spanless(IssueKind::Unreadable(error.clone()))],
            }),
            ScanEntry::Scanned { document, warnings } => {
                let issues = check_document(document, warnings, &resolver, &sources);
                documents.push(DocumentReport {
                    path: document.path.clone(),
                    source_id: Some(document.source_id),
                    issues,
                });
            }
        }
    }

    Ok(Report { documents, sources })
}

enum ScanEntry {
    Scanned {
        document: Document,
        warnings: Vec<SyntaxWarning>,
    },
    Unreadable {
        path: PathBuf,
        error: String,
    },
}

fn check_document(
    document: &Document,
    warnings: &[SyntaxWarning],
    resolver: &Resolver,
    sources: &SourceMap,
) -> Vec<Issue> {
    let mut issues = Vec::new();

    for warning in warnings {
        issues.push(Issue::warning(
            IssueKind::LinkSyntax(warning.message.clone()),
            warning.span.clone(),
        ));
    }

    for link in document.links() {
        if let Some(kind) = resolver.resolve(document, link) {
            issues.push(Issue::error(kind, link.span.clone()));
        }
    }

    for block in document.code_blocks() {
        if block.is_untagged() {
            issues.push(Issue::warning(IssueKind::UntaggedCodeBlock, block.span.clone()));
        }
    }

    // Interleave link and code-block findings by position in the source.
    issues.sort_by_key(|issue| issue.span.as_ref().map_or(0, |span| span.start));

    if let Some(text) = sources.text(document.source_id) {
        for issue in &mut issues {
            issue.line = issue
                .span
                .as_ref()
                .map(|span| byte_offset_to_line(text, span.start));
        }
    }

    issues
}

/// 1-based line number of a byte offset.
fn byte_offset_to_line(text: &str, offset: usize) -> usize {
    text.bytes().take(offset).filter(|&b| b == b'\n').count() + 1
}
