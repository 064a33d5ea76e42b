use std::path::{Component, PathBuf};

use mdcheck::Document;
use mdcheck::link::target::percent_decode;
use mdcheck::link::{Link, LinkTarget};

use crate::index::DocumentIndex;
use crate::issue::IssueKind;
use crate::report::display_path;

/// Judges links against the document index and the filesystem.
pub struct Resolver {
    root: PathBuf,
    index: DocumentIndex,
}

impl Resolver {
    pub fn new(root: PathBuf, index: DocumentIndex) -> Self {
        Resolver { root, index }
    }

    /// Check a single link found in `document`. Returns the issue to
    /// report, or None when the link is fine or cannot be judged.
    pub fn resolve(&self, document: &Document, link: &Link) -> Option<IssueKind> {
        match &link.target {
            LinkTarget::External(_) => None,
            LinkTarget::Fragment(fragment) => {
                let anchor = normalize_fragment(fragment);
                if anchor.is_empty() {
                    // A bare `#` points at the top of the page.
                    return None;
                }
                match self.index.has_anchor(&document.path, &anchor) {
                    Some(false) => Some(IssueKind::MissingAnchor {
                        target: display_path(&document.path),
                        anchor,
                    }),
                    _ => None,
                }
            }
            LinkTarget::Path { path, fragment } => {
                self.check_path(document, path, fragment.as_deref())
            }
        }
    }

    fn check_path(
        &self,
        document: &Document,
        raw: &str,
        fragment: Option<&str>,
    ) -> Option<IssueKind> {
        let target = if raw.is_empty() {
            // An empty destination is a link to the page itself.
            document.path.clone()
        } else {
            match self.resolve_path(document, raw) {
                Ok(target) => target,
                Err(kind) => return Some(kind),
            }
        };

        if !self.index.contains_document(&target) && !self.root.join(&target).exists() {
            return Some(IssueKind::BrokenLink {
                target: raw.to_string(),
            });
        }

        if let Some(fragment) = fragment {
            let anchor = normalize_fragment(fragment);
            if anchor.is_empty() {
                return None;
            }
            // Only documents we actually scanned can vouch for anchors;
            // anything else (assets, ignored files) is left unjudged.
            if self.index.has_anchor(&target, &anchor) == Some(false) {
                return Some(IssueKind::MissingAnchor {
                    target: display_path(&target),
                    anchor,
                });
            }
        }

        None
    }

    /// Resolve a relative destination to a root-relative path, purely
    /// lexically. A destination starting with `/` is taken from the root;
    /// anything else starts at the linking document's directory.
    fn resolve_path(&self, document: &Document, raw: &str) -> Result<PathBuf, IssueKind> {
        let decoded = percent_decode(raw);
        let mut stack: Vec<String> = Vec::new();

        if !decoded.starts_with('/') {
            if let Some(parent) = document.path.parent() {
                for component in parent.components() {
                    if let Component::Normal(part) = component {
                        stack.push(part.to_string_lossy().into_owned());
                    }
                }
            }
        }

        for part in decoded.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    if stack.pop().is_none() {
                        return Err(IssueKind::EscapesRoot {
                            target: raw.to_string(),
                        });
                    }
                }
                other => stack.push(other.to_string()),
            }
        }

        Ok(stack.iter().collect())
    }
}

fn normalize_fragment(fragment: &str) -> String {
    percent_decode(fragment).to_lowercase()
}
