use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Find every Markdown file under `root`, as root-relative paths in
/// lexical order. Hidden entries (leading `.`) are skipped, as is
/// anything on the ignore list.
pub fn discover(root: &Path, ignore: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    // An unlistable root is fatal; errors deeper down just prune the walk.
    walk_entries(fs::read_dir(root)?, Path::new(""), ignore, &mut found);
    found.sort();
    Ok(found)
}

fn walk_entries(entries: fs::ReadDir, prefix: &Path, ignore: &[String], found: &mut Vec<PathBuf>) {
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        let relative = prefix.join(name);
        if is_ignored(&relative, ignore) {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            if let Ok(nested) = fs::read_dir(&path) {
                walk_entries(nested, &relative, ignore, found);
            }
        } else if is_markdown(name) {
            found.push(relative);
        }
    }
}

fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Ignore entries name root-relative files or directories; a directory
/// entry covers everything beneath it.
fn is_ignored(relative: &Path, ignore: &[String]) -> bool {
    if ignore.is_empty() {
        return false;
    }
    let name = relative.to_string_lossy().replace('\\', "/");
    ignore.iter().any(|entry| {
        let entry = entry.trim_end_matches('/');
        name == entry || name.starts_with(&format!("{entry}/"))
    })
}
