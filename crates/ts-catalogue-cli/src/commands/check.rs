//! Check command: loads each catalogue and reports what is wrong with it.
//!
//! Files that fail to load are errors. Translations whose `%N` placeholders
//! disagree with the source are warnings, or errors under `--strict`.

use crate::commands::CatalogueArgs;
use crate::core::{CliError, PlaceholderError, ValidationIssue, ValidationReport};
use crate::utils::{LoadedCatalogue, malformed_diagnostic, ui};
use clap::Parser;

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub catalogues: CatalogueArgs,

    /// Treat placeholder mismatches as errors.
    #[arg(long)]
    pub strict: bool,
}

/// Run the check command.
pub fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let resolved = args.catalogues.resolve()?;
    ui::print_check_header();

    let mut issues: Vec<ValidationIssue> = Vec::new();

    for path in &resolved.files {
        ui::print_checking(path);
        let loaded = LoadedCatalogue::read(path, resolved.options)?;

        match &loaded.result {
            Ok(catalogue) => {
                for located in catalogue.placeholder_issues() {
                    let warning = loaded.placeholder_warning(&located);
                    issues.push(if args.strict {
                        PlaceholderError::from(warning).into()
                    } else {
                        warning.into()
                    });
                }
            },
            Err(err) => {
                issues.push(malformed_diagnostic(path, loaded.content.clone(), err).into());
            },
        }
    }

    let error_count = issues.iter().filter(|issue| issue.is_error()).count();
    let warning_count = issues.len() - error_count;

    if issues.is_empty() {
        ui::print_check_success();
        return Ok(());
    }

    let report = ValidationReport {
        error_count,
        warning_count,
        issues,
    };

    if error_count == 0 {
        eprintln!("{:?}", miette::Report::new(report));
        ui::print_check_warnings(warning_count);
        Ok(())
    } else {
        Err(CliError::Validation(report))
    }
}
