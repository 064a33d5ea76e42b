mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use mdcheck::Document;
use mdcheck::scanner::Scanner;
use validator::report::display_path;
use validator::{Issue, Report, ValidateOptions};

const SUBCOMMANDS: &[&str] = &["check", "outline", "help"];

#[derive(Parser)]
#[command(name = "mdcheck", version, about = "Markdown documentation checker")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check every Markdown document under a directory
    Check(CheckArgs),

    /// Print the heading outline of a single document
    Outline(OutlineArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Directory containing the documentation
    dir: String,

    /// Render issues as full diagnostics with source excerpts
    #[arg(long)]
    pretty: bool,

    /// Root-relative file or directory to skip. Repeatable.
    #[arg(short, long)]
    ignore: Vec<String>,

    /// Config file to use instead of <dir>/mdcheck.toml
    #[arg(long)]
    config: Option<String>,

    /// No output, report through the exit status only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args)]
struct OutlineArgs {
    /// Markdown file to outline
    file: String,
}

fn main() {
    // Convenience: if the first positional arg is not a known subcommand,
    // inject "check" so `mdcheck docs/` works like `mdcheck check docs/`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "check".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Check(check_args) => do_check(check_args, cli.no_color),
        Command::Outline(outline_args) => do_outline(outline_args, cli.no_color),
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let root = Path::new(&args.dir);

    // Config file first, command line on top.
    let file_config = match &args.config {
        Some(path) => config::load(Path::new(path)),
        None => config::discover(root),
    };
    let file_config = match file_config {
        Ok(c) => c,
        Err(message) => {
            eprintln!("error: {}", message);
            process::exit(2);
        }
    };

    let mut ignore = file_config.ignore;
    ignore.extend(args.ignore);
    let options = ValidateOptions { ignore };

    let report = match validator::validate_with(root, &options) {
        Ok(report) => report,
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(2);
        }
    };

    if !args.quiet {
        if args.pretty {
            emit_pretty(&report, color_choice);
        } else {
            for line in report.lines() {
                println!("{}", line);
            }
        }
        print_summary(&report, no_color);
    }

    if !report.is_clean() {
        process::exit(1);
    }
}

fn do_outline(args: OutlineArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    let outcome = Scanner::new(source, file_id).scan();

    if !outcome.warnings.is_empty() {
        let writer = StandardStream::stderr(color_choice);
        let config = term::Config::default();
        for warning in &outcome.warnings {
            let diagnostic = warning.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
        }
    }

    let document = Document {
        path: PathBuf::from(&args.file),
        elements: outcome.elements,
        source_id: file_id,
    };

    for heading in document.headings() {
        let prefix = "#".repeat(heading.level as usize);
        let pad = "  ".repeat(heading.level.saturating_sub(1) as usize);
        println!("{}{} {}  #{}", pad, prefix, heading.text, heading.anchor);
    }

    let links = document.links();
    let external = links.iter().filter(|l| l.target.is_external()).count();
    let blocks = document.code_blocks();
    let untagged = blocks.iter().filter(|b| b.is_untagged()).count();

    println!();
    println!(
        "{} links ({} external), {} code blocks ({} untagged)",
        links.len(),
        external,
        blocks.len(),
        untagged
    );
}

/// Re-render the report as codespan diagnostics with source excerpts.
fn emit_pretty(report: &Report, color_choice: ColorChoice) {
    let mut files = SimpleFiles::new();
    for (name, text) in report.sources.iter() {
        files.add(name.to_string(), text.to_string());
    }

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    for document in &report.documents {
        let path = display_path(&document.path);
        for issue in &document.issues {
            emit_issue(&writer, &config, &files, &path, document.source_id, issue);
        }
    }
}

fn emit_issue(
    writer: &StandardStream,
    config: &term::Config,
    files: &SimpleFiles<String, String>,
    path: &str,
    source_id: Option<usize>,
    issue: &Issue,
) {
    match (source_id, &issue.span) {
        (Some(id), Some(span)) => {
            let severity = if issue.is_warning {
                Severity::Warning
            } else {
                Severity::Error
            };
            let diagnostic = Diagnostic::new(severity)
                .with_message(issue.to_string())
                .with_labels(vec![Label::primary(id, span.clone())]);
            let _ = term::emit_to_write_style(&mut writer.lock(), config, files, &diagnostic);
        }
        _ => {
            let prefix = if issue.is_warning { "warning" } else { "error" };
            eprintln!("{}: {}: {}", prefix, path, issue);
        }
    }
}

fn print_summary(report: &Report, no_color: bool) {
    let documents = report.document_count();
    let errors = report.error_count();
    let warnings = report.warning_count();

    if errors == 0 && warnings == 0 {
        eprintln!(
            "checked {} document(s): {}",
            documents,
            if no_color { "ok" } else { "\x1b[32mok\x1b[0m" }
        );
    } else {
        eprintln!(
            "checked {} document(s): {} error(s), {} warning(s)",
            documents,
            paint_count(errors, "\x1b[31m", no_color),
            paint_count(warnings, "\x1b[33m", no_color),
        );
    }
}

fn paint_count(count: usize, color: &str, no_color: bool) -> String {
    if no_color || count == 0 {
        count.to_string()
    } else {
        format!("{}{}\x1b[0m", color, count)
    }
}
