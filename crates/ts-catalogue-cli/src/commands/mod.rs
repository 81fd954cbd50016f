//! CLI command implementations.

mod check;
mod common;
mod format;
mod lookup;
mod stats;

pub use check::{CheckArgs, run_check};
pub use common::CatalogueArgs;
pub use format::{FormatArgs, run_format};
pub use lookup::{LookupArgs, run_lookup};
pub use stats::{StatsArgs, run_stats};
