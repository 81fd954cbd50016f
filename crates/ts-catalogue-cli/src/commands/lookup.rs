//! Lookup command: renders one message the way an application would.

use crate::core::CliError;
use crate::utils::{LoadedCatalogue, read_config, ui};
use clap::Parser;
use std::fmt::Display;
use std::path::PathBuf;
use ts_catalogue_core::Lookup;

/// Arguments for the lookup command.
#[derive(Debug, Parser)]
pub struct LookupArgs {
    /// The catalogue file.
    pub file: PathBuf,

    /// Context (UI component) the message belongs to.
    #[arg(short, long)]
    pub context: String,

    /// Untranslated source text.
    #[arg(short, long)]
    pub source: String,

    /// Tells apart messages with the same source text.
    #[arg(short, long)]
    pub disambiguation: Option<String>,

    /// Plural count; selects the plural form and fills `%n`.
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Directory whose i18n.toml supplies the load options.
    #[arg(long, default_value = ".")]
    pub config_dir: PathBuf,

    /// Values for `%1`, `%2`, ...
    pub args: Vec<String>,
}

/// Run the lookup command.
pub fn run_lookup(args: LookupArgs) -> Result<(), CliError> {
    let options = read_config(&args.config_dir)?
        .map(|config| config.load_options())
        .unwrap_or_default();
    let catalogue = LoadedCatalogue::read(&args.file, options)?.into_catalogue()?;

    let query = Lookup {
        context: &args.context,
        source: &args.source,
        disambiguation: args.disambiguation.as_deref(),
        count: args.count,
    };

    if let Err(err) = catalogue.lookup(&query) {
        ui::print_lookup_fallback(&err);
    }

    let values: Vec<&dyn Display> = args.args.iter().map(|arg| arg as &dyn Display).collect();
    println!("{}", catalogue.translate(&query, &values));
    Ok(())
}
