use std::path::Path;
use std::process::Command;

fn mdcheck() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mdcheck"))
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn clean_directory_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "# A\n\nplain text\n");

    let output = mdcheck().arg("check").arg(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn issues_print_lines_and_exit_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "[b](gone.md)\n");

    let output = mdcheck()
        .args(["check", "--no-color"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("a.md:1: broken link: 'gone.md' does not resolve to a file"),
        "stdout was: {}",
        stdout
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 error(s)"), "stderr was: {}", stderr);
}

#[test]
fn quiet_reports_through_exit_status_alone() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "[b](gone.md)\n");

    let output = mdcheck()
        .args(["check", "--quiet"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty(), "stdout not empty");
    assert!(output.stderr.is_empty(), "stderr not empty");

    let clean = tempfile::tempdir().unwrap();
    write(clean.path(), "a.md", "# A\n");

    let output = mdcheck()
        .args(["check", "--quiet"])
        .arg(clean.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty(), "stdout not empty");
    assert!(output.stderr.is_empty(), "stderr not empty");
}

#[test]
fn bare_directory_argument_means_check() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "a.md", "[b](gone.md)\n");

    let output = mdcheck().arg(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_directory_is_fatal() {
    let output = mdcheck()
        .args(["check", "/definitely/not/here"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a directory"), "stderr was: {}", stderr);
}
