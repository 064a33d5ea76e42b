pub mod error;
mod structural;
mod syntax;

pub use error::SyntaxWarning;

use crate::element::Element;

/// Scanner entry point.
pub struct Scanner {
    source: String,
    file_id: usize,
}

/// Everything a scan produces. Scanning never fails outright; malformed
/// link syntax is reported as warnings alongside the elements.
pub struct ScanOutcome {
    pub elements: Vec<Element>,
    pub warnings: Vec<SyntaxWarning>,
}

impl Scanner {
    pub fn new(source: String, file_id: usize) -> Self {
        Scanner { source, file_id }
    }

    /// Scan the source Markdown into a complete element tree.
    pub fn scan(&self) -> ScanOutcome {
        let mut warnings = syntax::check(&self.source, self.file_id);
        let (elements, unresolved) = structural::scan_elements(&self.source, self.file_id);

        warnings.extend(unresolved);
        warnings.sort_by_key(|w| w.span.start);

        ScanOutcome { elements, warnings }
    }
}
