//! Stats command: translation coverage per context.

use crate::commands::CatalogueArgs;
use crate::core::CliError;
use crate::utils::{LoadedCatalogue, ui};
use clap::Parser;
use serde::Serialize;
use ts_catalogue_core::Coverage;

/// Arguments for the stats command.
#[derive(Debug, Parser)]
pub struct StatsArgs {
    #[command(flatten)]
    pub catalogues: CatalogueArgs,

    /// Print machine-readable JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct FileCoverage {
    file: String,
    #[serde(flatten)]
    coverage: Coverage,
}

/// Run the stats command.
pub fn run_stats(args: StatsArgs) -> Result<(), CliError> {
    let resolved = args.catalogues.resolve()?;

    let mut report = Vec::with_capacity(resolved.files.len());
    for path in &resolved.files {
        let catalogue = LoadedCatalogue::read(path, resolved.options)?.into_catalogue()?;
        report.push(FileCoverage {
            file: path.display().to_string(),
            coverage: catalogue.coverage(),
        });
    }

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|err| CliError::Other(err.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    for (path, entry) in resolved.files.iter().zip(&report) {
        ui::print_stats_header(path, &entry.coverage);
        for context in &entry.coverage.contexts {
            ui::print_context_stats(context);
        }
        ui::print_stats_total(&entry.coverage.total());
    }
    Ok(())
}
