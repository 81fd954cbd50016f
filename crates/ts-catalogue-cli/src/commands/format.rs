//! Format command: rewrites catalogues in the normalized serialization.
//!
//! Formatting only changes layout, such as indentation, attribute order and
//! escaping. XML comments have no place in the catalogue model, so files that
//! contain them are refused rather than rewritten without them.

use crate::commands::CatalogueArgs;
use crate::core::{CliError, FormatError, FormatReport, UnformattedError};
use crate::utils::{LoadedCatalogue, ui};
use clap::Parser;
use fs_err as fs;
use std::path::{Path, PathBuf};

/// Arguments for the format command.
#[derive(Debug, Parser)]
pub struct FormatArgs {
    #[command(flatten)]
    pub catalogues: CatalogueArgs,

    /// Only report files that would change, showing a diff.
    #[arg(long)]
    pub check: bool,
}

/// Result of formatting a single file.
#[derive(Debug)]
pub struct FormatResult {
    pub path: PathBuf,
    pub changed: bool,
    pub error: Option<String>,
}

/// Run the format command.
pub fn run_format(args: FormatArgs) -> Result<(), CliError> {
    let resolved = args.catalogues.resolve()?;
    ui::print_format_header();

    let mut total_formatted = 0;
    let mut total_unchanged = 0;
    let mut errors: Vec<FormatError> = Vec::new();

    for path in &resolved.files {
        let loaded = LoadedCatalogue::read(path, resolved.options)?;
        let result = format_catalogue(path, loaded, args.check);

        if let Some(error) = result.error {
            errors.push(FormatError {
                path: result.path,
                help: error,
            });
        } else if result.changed {
            total_formatted += 1;
            if !args.check {
                ui::print_formatted(&result.path);
            }
        } else {
            total_unchanged += 1;
        }
    }

    if !errors.is_empty() {
        return Err(CliError::Format(FormatReport {
            formatted_count: total_formatted,
            error_count: errors.len(),
            errors,
        }));
    }

    if args.check && total_formatted > 0 {
        ui::print_format_check_summary(total_formatted);
        return Err(UnformattedError {
            count: total_formatted,
        }
        .into());
    }

    ui::print_format_summary(total_formatted, total_unchanged);
    Ok(())
}

fn format_catalogue(path: &Path, loaded: LoadedCatalogue, check_only: bool) -> FormatResult {
    let fail = |error: String| FormatResult {
        path: path.to_path_buf(),
        changed: false,
        error: Some(error),
    };

    let catalogue = match loaded.result {
        Ok(catalogue) => catalogue,
        Err(err) => return fail(err.to_string()),
    };
    let comments = catalogue.discarded_comments();
    if comments > 0 {
        return fail(format!(
            "File contains {} XML comment(s) that formatting would remove. Move them into \
             <translatorcomment> or <extracomment> elements first.",
            comments
        ));
    }
    let formatted = match catalogue.to_xml() {
        Ok(xml) => xml,
        Err(err) => return fail(err.to_string()),
    };

    let changed = loaded.content != formatted;
    if changed {
        if check_only {
            ui::print_would_format(path);
            ui::print_diff(&loaded.content, &formatted);
        } else if let Err(err) = fs::write(path, &formatted) {
            return fail(format!("Failed to write file: {}", err));
        }
    }

    FormatResult {
        path: path.to_path_buf(),
        changed,
        error: None,
    }
}
