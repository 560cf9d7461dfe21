//! Command implementations for the fixed-width loader CLI
//!
//! Each command is implemented in its own module:
//! - `load`: parse, persist and route data files
//! - `check`: parse data files without loading or moving them

pub mod check;
pub mod load;
pub mod shared;

use crate::app::services::file_handler::{CheckReport, LoadSummary};
use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Result of a completed command
#[derive(Debug)]
pub enum CommandOutcome {
    Load(LoadSummary),
    Check(Vec<CheckReport>),
}

impl CommandOutcome {
    /// Every file was archived (load) or parsed cleanly (check)
    pub fn succeeded(&self) -> bool {
        match self {
            CommandOutcome::Load(summary) => summary.all_succeeded(),
            CommandOutcome::Check(reports) => reports.iter().all(CheckReport::is_success),
        }
    }
}

/// Main command runner
pub fn run(args: Args) -> Result<CommandOutcome> {
    match args.command {
        Some(Commands::Load(load_args)) => load::run_load(load_args).map(CommandOutcome::Load),
        Some(Commands::Check(check_args)) => {
            check::run_check(check_args).map(CommandOutcome::Check)
        }
        None => Err(Error::configuration("No command given")),
    }
}
