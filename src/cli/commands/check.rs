//! Check command implementation
//!
//! Resolves names and schemas and parses every line of the selected files
//! without touching the backend or moving files.

use super::shared::{create_progress_bar, load_configuration, select_files, setup_logging};
use crate::app::services::file_handler::{CheckReport, FileHandler, ParserCache};
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::{Error, Result};
use colored::*;
use tracing::{debug, info};

/// Check command runner
pub fn run_check(args: CheckArgs) -> Result<Vec<CheckReport>> {
    args.validate()?;

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config.logging)?;

    info!("Checking data files in {}", config.paths.data_dir.display());
    debug!("Loaded configuration: {:?}", config);

    let handler = FileHandler::new(&config)?;
    let files = select_files(&args.selection, &config)?;

    let progress = (args.common.show_progress() && files.len() > 1)
        .then(|| create_progress_bar(files.len() as u64, "Checking"));

    let mut cache = ParserCache::new();
    let mut reports = Vec::with_capacity(files.len());
    for file_name in &files {
        let report = handler.check_file(file_name, &mut cache);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
        reports.push(report?);
    }

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    match args.common.output_format {
        OutputFormat::Human => generate_human_report(&reports),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|e| Error::io("Failed to serialize report", e.into()))?;
            println!("{}", json);
        }
    }

    Ok(reports)
}

fn generate_human_report(reports: &[CheckReport]) {
    let failed = reports.iter().filter(|r| !r.is_success()).count();

    println!("\n{}", "Check complete".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for report in reports {
        match (&report.rows, &report.error) {
            (Some(rows), None) => println!(
                "   {} {}: {} rows -> {}",
                "✓".green(),
                report.file_name,
                rows,
                report.table_name.as_deref().unwrap_or("?")
            ),
            (_, error) => println!(
                "   {} {}: {}",
                "✗".red(),
                report.file_name,
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    println!(
        "\n   {} passed, {} failed\n",
        reports.len() - failed,
        failed
    );
}
