use clap::{Parser, Subcommand};
use miette::Result as MietteResult;
use ts_catalogue_cli::commands::{
    CheckArgs, FormatArgs, LookupArgs, StatsArgs, run_check, run_format, run_lookup, run_stats,
};

#[derive(Parser)]
#[command(name = "ts-catalogue")]
#[command(about = "Check, inspect and format Qt Linguist TS catalogues")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load catalogues and report malformed files and placeholder mismatches
    Check(CheckArgs),

    /// Print the translation of one message
    Lookup(LookupArgs),

    /// Show translation coverage per context
    Stats(StatsArgs),

    /// Rewrite catalogues in the normalized layout
    Format(FormatArgs),
}

fn main() -> MietteResult<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))
    .ok();

    let cli = Cli::parse();

    ts_catalogue_cli::utils::ui::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Lookup(args) => run_lookup(args),
        Commands::Stats(args) => run_stats(args),
        Commands::Format(args) => run_format(args),
    };

    result.map_err(miette::Report::new)
}
