// CLI output formatting with consistent styling using colored.
// User-facing output goes through println!/eprintln!; tracing is for diagnostics.

use colored::Colorize as _;
use std::path::Path;
use ts_catalogue_core::{ContextCoverage, Coverage, LookupError};
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber filtered by `RUST_LOG`, falling back to
/// `debug` with `-v` and `warn` otherwise.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init();
}

pub fn print_check_header() {
    println!("{}", "Qt TS Catalogue Checker".dimmed());
}

pub fn print_checking(path: &Path) {
    println!("{} {}", "Checking".dimmed(), path.display().to_string().green());
}

pub fn print_check_success() {
    println!("{}", "No issues found!".green());
}

pub fn print_check_warnings(count: usize) {
    println!(
        "{} {} warning(s), no errors",
        "Done:".yellow(),
        count
    );
}

pub fn print_lookup_fallback(error: &LookupError) {
    eprintln!("{} {}, showing source text", "Not translated:".yellow(), error);
}

pub fn print_stats_header(path: &Path, coverage: &Coverage) {
    println!(
        "{} {}",
        path.display().to_string().bold(),
        format!("({})", coverage.language.as_deref().unwrap_or("und")).dimmed()
    );
}

pub fn print_context_stats(coverage: &ContextCoverage) {
    let line = format!(
        "  {:<32} {:>4}/{:<4} {:>5.1}%",
        coverage.name,
        coverage.finished,
        coverage.active(),
        coverage.percent_finished()
    );
    if coverage.is_complete() {
        println!("{}", line.green());
    } else {
        println!(
            "{} {}",
            line.yellow(),
            format!(
                "{} unfinished, {} untranslated",
                coverage.unfinished, coverage.untranslated
            )
            .dimmed()
        );
    }
}

pub fn print_stats_total(total: &ContextCoverage) {
    println!(
        "  {} {:>4}/{:<4} {:>5.1}%",
        format!("{:<32}", "Total").bold(),
        total.finished,
        total.active(),
        total.percent_finished()
    );
    if total.inactive > 0 {
        println!("  {}", format!("{} obsolete or vanished", total.inactive).dimmed());
    }
}

pub fn print_format_header() {
    println!("{}", "Qt TS Catalogue Formatter".dimmed());
}

pub fn print_would_format(path: &Path) {
    println!("{} {}", "Would format:".yellow(), path.display());
}

pub fn print_formatted(path: &Path) {
    println!("{} {}", "Formatted:".green(), path.display());
}

pub fn print_format_check_summary(count: usize) {
    println!(
        "{} {} file(s) would be formatted",
        "Check:".yellow(),
        count
    );
}

pub fn print_format_summary(formatted: usize, unchanged: usize) {
    println!(
        "{} {} formatted, {} unchanged",
        "Done:".green(),
        formatted,
        unchanged
    );
}

pub fn print_diff(old: &str, new: &str) {
    use similar::{ChangeTag, TextDiff};

    let diff = TextDiff::from_lines(old, new);

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            println!("{}", "  ...".dimmed());
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                let line = format!("{} {}", sign, change);
                match change.tag() {
                    ChangeTag::Delete => print!("{}", line.red()),
                    ChangeTag::Insert => print!("{}", line.green()),
                    ChangeTag::Equal => print!("{}", line.dimmed()),
                }
            }
        }
    }
}
