use std::collections::HashMap;

/// Turn heading text into its rendered anchor slug.
///
/// Follows the hosting-platform convention: lowercase, alphanumerics and
/// `-`/`_` kept, whitespace mapped to `-`, all other punctuation dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else if ch.is_whitespace() {
            slug.push('-');
        }
    }
    slug
}

/// Assigns anchors to headings in document order.
/// Repeated slugs get `-1`, `-2`, ... suffixes, matching rendered output.
#[derive(Debug, Default)]
pub struct AnchorSet {
    seen: HashMap<String, usize>,
}

impl AnchorSet {
    pub fn new() -> Self {
        AnchorSet::default()
    }

    /// Compute the anchor for the next heading with the given text.
    pub fn assign(&mut self, text: &str) -> String {
        let slug = slugify(text);
        let count = self.seen.entry(slug.clone()).or_insert(0);
        let anchor = if *count == 0 {
            slug.clone()
        } else {
            format!("{}-{}", slug, count)
        };
        *count += 1;
        anchor
    }
}

/// Extract `id="..."` and `name="..."` attribute values from a raw HTML
/// fragment. Hand-written docs use `<a name="top">`-style anchors, and those
/// are valid fragment targets alongside heading slugs.
pub fn html_anchor_ids(html: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for attr in ["id=", "name="] {
        let mut rest = html;
        while let Some(pos) = rest.find(attr) {
            // Require a non-alphanumeric character before the attribute name
            // so `data-name=` and friends don't match.
            let preceded_ok = pos == 0
                || !rest[..pos]
                    .chars()
                    .next_back()
                    .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_');
            let after = &rest[pos + attr.len()..];
            if preceded_ok {
                if let Some(value) = quoted_value(after) {
                    if !value.is_empty() {
                        ids.push(value.to_lowercase());
                    }
                }
            }
            rest = after;
        }
    }
    ids
}

/// Read a `"..."` or `'...'` quoted value at the start of `s`.
fn quoted_value(s: &str) -> Option<&str> {
    let mut chars = s.chars();
    let quote = chars.next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let rest = &s[quote.len_utf8()..];
    let end = rest.find(quote)?;
    Some(&rest[..end])
}
