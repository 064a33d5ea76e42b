/// Where a link points, as classified from its raw destination string.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// Scheme-qualified or protocol-relative URL: https://host/page, mailto:x.
    /// Outside the validation scope; never checked.
    External(String),
    /// Fragment within the same document: #section-name
    Fragment(String),
    /// File path within the repository, optionally with a fragment:
    /// ./guide.md, ../img/fig.png, /docs/setup.md#install
    Path {
        path: String,
        fragment: Option<String>,
    },
}

impl LinkTarget {
    pub fn is_external(&self) -> bool {
        matches!(self, LinkTarget::External(_))
    }
}

/// Classify a raw link destination.
pub fn classify(raw: &str) -> LinkTarget {
    if raw.starts_with("//") || has_scheme(raw) {
        return LinkTarget::External(raw.to_string());
    }

    if let Some(fragment) = raw.strip_prefix('#') {
        return LinkTarget::Fragment(fragment.to_string());
    }

    match raw.split_once('#') {
        Some((path, fragment)) => LinkTarget::Path {
            path: path.to_string(),
            // A trailing bare '#' scrolls to the top of the target; treat it
            // as no fragment at all.
            fragment: if fragment.is_empty() {
                None
            } else {
                Some(fragment.to_string())
            },
        },
        None => LinkTarget::Path {
            path: raw.to_string(),
            fragment: None,
        },
    }
}

/// True when the destination starts with a URL scheme (http:, mailto:, ...).
/// The scheme must come before any path or fragment character.
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once(':') else {
        return false;
    };
    scheme.len() >= 2
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '+' || c == '-' || c == '.')
}

/// Decode %XX escapes; anything malformed passes through unchanged.
/// Link destinations in rendered markdown are frequently percent-encoded
/// ("My%20Notes.md") while the files on disk are not.
pub fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if let (Some(hi), Some(lo)) = (
                bytes.get(i + 1).and_then(|b| (*b as char).to_digit(16)),
                bytes.get(i + 2).and_then(|b| (*b as char).to_digit(16)),
            ) {
                out.push((hi * 16 + lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| s.to_string())
}
