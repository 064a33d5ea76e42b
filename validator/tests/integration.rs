use std::fs;
use std::path::Path;

use validator::{Report, ValidateError, ValidateOptions, validate, validate_with};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn check(root: &Path) -> Report {
    validate(root).expect("validation failed")
}

#[test]
fn clean_tree_reports_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\nplain text, no links at all.\n");
    write(dir.path(), "b.md", "# B\n\n```rust\nfn x() {}\n```\n");

    let report = check(dir.path());
    assert!(report.is_clean());
    assert_eq!(report.document_count(), 2);
    assert!(report.lines().is_empty());
}

#[test]
fn missing_link_target_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\n[see b](b.md)\n");

    let report = check(dir.path());
    assert!(!report.is_clean());
    assert_eq!(
        report.lines(),
        ["a.md:3: broken link: 'b.md' does not resolve to a file"]
    );
}

#[test]
fn existing_target_resolves() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\n[see b](b.md)\n");
    write(dir.path(), "b.md", "# B\n");

    assert!(check(dir.path()).is_clean());
}

#[test]
fn untagged_fenced_block_is_warned() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\n```\ncode\n```\n");
    write(dir.path(), "b.md", "```rust\nok\n```\n\n    indented, exempt\n");

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:3: untagged code block: fenced block has no language tag"]
    );
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.error_count(), 0);
    assert!(!report.is_clean());
}

#[test]
fn fragments_within_the_same_document() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# Intro\n\n[ok](#intro)\n[bad](#missing)\n");

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:4: broken link: no anchor 'missing' in 'a.md'"]
    );
}

#[test]
fn fragments_across_documents_with_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "guide.md", "# Guide\n\n## Setup\n\n## Setup\n");
    write(
        dir.path(),
        "a.md",
        "[one](guide.md#setup)\n[two](guide.md#setup-1)\n[three](guide.md#setup-2)\n",
    );

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:3: broken link: no anchor 'setup-2' in 'guide.md'"]
    );
}

#[test]
fn self_link_with_fragment() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# Intro\n\n[s](a.md#intro)\n[g](a.md#gone)\n");

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:4: broken link: no anchor 'gone' in 'a.md'"]
    );
}

#[test]
fn html_anchors_resolve() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t.md", "# T\n\n<a name=\"legacy-anchor\"></a>\n");
    write(dir.path(), "a.md", "[x](t.md#legacy-anchor)\n");

    assert!(check(dir.path()).is_clean());
}

#[test]
fn external_links_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.md",
        "[w](https://example.com/x)\n[m](mailto:docs@example.com)\n[p](//cdn.example.com/a.js)\n",
    );

    assert!(check(dir.path()).is_clean());
}

#[test]
fn documents_in_lexical_order_and_issues_in_source_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "z.md", "[1](nope1.md)\n");
    write(dir.path(), "a.md", "```\nx\n```\n\n[2](nope2.md)\n");
    write(dir.path(), "sub/m.md", "[3](gone.md)\n");

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        [
            "a.md:1: untagged code block: fenced block has no language tag",
            "a.md:5: broken link: 'nope2.md' does not resolve to a file",
            "sub/m.md:1: broken link: 'gone.md' does not resolve to a file",
            "z.md:1: broken link: 'nope1.md' does not resolve to a file",
        ]
    );
}

#[test]
fn repeated_runs_agree() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "[x](gone.md)\n\n```\nbare\n```\n");
    write(dir.path(), "b.md", "# B\n\n[y](#nowhere)\n");

    let first = check(dir.path()).lines();
    let second = check(dir.path()).lines();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}

#[test]
fn unreadable_file_is_reported_but_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.md", "# G\n\n[b](bad.md)\n");
    fs::write(dir.path().join("bad.md"), b"# B\n\xff\xfe not utf-8\n").unwrap();

    let report = check(dir.path());
    assert_eq!(report.document_count(), 2);

    let lines = report.lines();
    assert_eq!(lines.len(), 1, "got: {:?}", lines);
    assert!(
        lines[0].starts_with("bad.md: unreadable file:"),
        "got: {}",
        lines[0]
    );
    // good.md's link still resolves: the file exists even if unreadable.
    assert_eq!(report.error_count(), 1);
}

#[test]
fn ignore_list_skips_documents() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\n[d](drafts/wip.md)\n");
    write(dir.path(), "drafts/wip.md", "[broken](nothing.md)\n");

    let options = ValidateOptions {
        ignore: vec!["drafts".to_string()],
    };
    let report = validate_with(dir.path(), &options).unwrap();

    // wip.md is never scanned, and the link to it still resolves through
    // the filesystem.
    assert_eq!(report.document_count(), 1);
    assert!(report.is_clean());
}

#[test]
fn missing_root_is_fatal() {
    let err = validate(Path::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(err, ValidateError::NotADirectory(_)));
}

#[test]
fn malformed_link_syntax_is_recoverable() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\nsee [docs](broken\n\n[fine](#a)\n");

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:3: link syntax: unterminated link destination"]
    );
}

#[test]
fn code_regions_never_count_as_issues() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "a.md",
        "# A\n\nuse `` [x]( `` inline\n\n> ```text\n> [y](\n> ```\n",
    );

    assert!(check(dir.path()).is_clean());
}

#[test]
fn relative_and_root_relative_paths_resolve() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "docs/guide/deep.md",
        "[up](../intro.md)\n[root](/docs/intro.md)\n[sib](./more.md)\n",
    );
    write(dir.path(), "docs/intro.md", "# I\n");
    write(dir.path(), "docs/guide/more.md", "# M\n");

    assert!(check(dir.path()).is_clean());
}

#[test]
fn escaping_the_root_is_broken() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "[out](../outside.md)\n");

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:1: broken link: '../outside.md' escapes the document root"]
    );
}

#[test]
fn non_markdown_assets_resolve_by_existence() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "![d](img/diagram.png)\n[m](img/missing.png)\n");
    fs::create_dir_all(dir.path().join("img")).unwrap();
    fs::write(dir.path().join("img/diagram.png"), [0u8; 4]).unwrap();

    let report = check(dir.path());
    assert_eq!(
        report.lines(),
        ["a.md:2: broken link: 'img/missing.png' does not resolve to a file"]
    );
}

#[test]
fn directory_targets_resolve_by_existence() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "[d](sub)\n");
    write(dir.path(), "sub/x.md", "# X\n");

    assert!(check(dir.path()).is_clean());
}

#[test]
fn empty_directory_is_clean() {
    let dir = tempfile::tempdir().unwrap();
    let report = check(dir.path());
    assert!(report.is_clean());
    assert_eq!(report.document_count(), 0);
}

#[test]
fn hidden_entries_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".hidden.md", "[x](gone.md)\n");
    write(dir.path(), ".stash/notes.md", "[y](gone.md)\n");

    let report = check(dir.path());
    assert_eq!(report.document_count(), 0);
    assert!(report.is_clean());
}

#[test]
fn fragment_matching_is_case_insensitive_and_decoded() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "t.md", "# My Notes\n");
    write(
        dir.path(),
        "a.md",
        "[x](t.md#My-Notes)\n[y](t.md#my%2Dnotes)\n",
    );

    assert!(check(dir.path()).is_clean());
}

#[test]
fn percent_encoded_paths_resolve() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "my notes.md", "# N\n");
    write(dir.path(), "a.md", "[n](my%20notes.md)\n");

    assert!(check(dir.path()).is_clean());
}
