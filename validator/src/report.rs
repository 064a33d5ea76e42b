use std::path::{Path, PathBuf};

use crate::issue::Issue;

/// Root-relative path with forward slashes, as shown in report lines.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// The raw text of every document that was read, in validation order.
/// Positions match the `source_id` stored on each scanned document, so a
/// display layer can rebuild its own file table from this.
#[derive(Debug, Default)]
pub struct SourceMap {
    entries: Vec<(String, String)>,
}

impl SourceMap {
    pub fn add(&mut self, name: String, text: String) -> usize {
        self.entries.push((name, text));
        self.entries.len() - 1
    }

    pub fn text(&self, id: usize) -> Option<&str> {
        self.entries.get(id).map(|(_, text)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str()))
    }
}

/// All issues found in one document. Present for every discovered
/// document, issues or not.
#[derive(Debug)]
pub struct DocumentReport {
    /// Root-relative path.
    pub path: PathBuf,
    /// Position in the report's sources; None when the file never read.
    pub source_id: Option<usize>,
    /// Issues in order of appearance.
    pub issues: Vec<Issue>,
}

/// The outcome of validating a directory tree.
#[derive(Debug, Default)]
pub struct Report {
    /// One entry per discovered document, in lexical path order.
    pub documents: Vec<DocumentReport>,
    pub sources: SourceMap,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.documents.iter().all(|d| d.issues.is_empty())
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn error_count(&self) -> usize {
        self.issues().filter(|issue| !issue.is_warning).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues().filter(|issue| issue.is_warning).count()
    }

    fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.documents.iter().flat_map(|d| d.issues.iter())
    }

    /// One formatted line per issue: `path:line: description`. Documents
    /// keep their validation order, issues their order of appearance.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for document in &self.documents {
            let path = display_path(&document.path);
            for issue in &document.issues {
                match issue.line {
                    Some(line) => lines.push(format!("{}:{}: {}", path, line, issue)),
                    None => lines.push(format!("{}: {}", path, issue)),
                }
            }
        }
        lines
    }
}
