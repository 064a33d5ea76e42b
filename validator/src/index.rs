use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use mdcheck::Document;

/// Anchor targets of every successfully scanned document, keyed by
/// root-relative path.
#[derive(Debug, Default)]
pub struct DocumentIndex {
    anchors: HashMap<PathBuf, HashSet<String>>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        DocumentIndex::default()
    }

    pub fn insert(&mut self, document: &Document) {
        self.anchors
            .insert(document.path.clone(), document.anchor_targets());
    }

    /// True when a scanned document exists at this root-relative path.
    pub fn contains_document(&self, path: &Path) -> bool {
        self.anchors.contains_key(path)
    }

    /// Whether the document at `path` exposes `anchor`. None when the path
    /// was never scanned, so nothing can be said about its anchors.
    pub fn has_anchor(&self, path: &Path, anchor: &str) -> Option<bool> {
        self.anchors.get(path).map(|set| set.contains(anchor))
    }
}
