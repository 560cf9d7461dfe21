//! Load command implementation
//!
//! Loads the selected data files into the configured backend and routes
//! each one to the archive or failure directory.

use super::shared::{
    create_progress_bar, load_configuration, prepare_directories, select_files, setup_logging,
};
use crate::app::services::file_handler::{FileHandler, LoadSummary};
use crate::cli::args::{LoadArgs, OutputFormat};
use crate::{Error, LoadOutcome, Result};
use colored::*;
use indicatif::HumanDuration;
use tracing::{debug, info, warn};

/// Load command runner
///
/// 1. Load configuration and set up logging
/// 2. Resolve backend and parser keys (fails fast on unknown keys)
/// 3. Process every selected file with progress reporting
/// 4. Print the summary
pub fn run_load(args: LoadArgs) -> Result<LoadSummary> {
    args.validate()?;

    let config = load_configuration(&args.common)?;
    setup_logging(&args.common, &config.logging)?;

    info!("Starting fixed-width loader");
    debug!("Command line arguments: {:?}", args);
    debug!("Loaded configuration: {:?}", config);

    let handler = FileHandler::new(&config)?;
    prepare_directories(&config)?;

    let files = select_files(&args.selection, &config)?;
    if files.is_empty() {
        warn!(
            "No data files found in {}",
            config.paths.data_dir.display()
        );
    }

    let progress = (args.common.show_progress() && files.len() > 1)
        .then(|| create_progress_bar(files.len() as u64, "Loading"));

    let summary = handler.run_with(&files, |report| {
        if let Some(pb) = &progress {
            pb.set_message(report.file_name.clone());
            pb.inc(1);
        }
    });

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let summary = summary?;

    generate_final_report(args.common.output_format, &summary)?;

    Ok(summary)
}

/// Generate final load report
fn generate_final_report(format: OutputFormat, summary: &LoadSummary) -> Result<()> {
    match format {
        OutputFormat::Human => {
            generate_human_report(summary);
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&json_report(summary))
                .map_err(|e| Error::io("Failed to serialize report", e.into()))?;
            println!("{}", json);
            Ok(())
        }
    }
}

/// Generate human-readable report
fn generate_human_report(summary: &LoadSummary) {
    println!("\n{}", "Load complete".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "   • Started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("   • Files processed: {}", summary.files.len());
    println!(
        "   • Archived: {}",
        summary.archived_count().to_string().green()
    );
    if summary.failed_count() > 0 {
        println!("   • Failed: {}", summary.failed_count().to_string().red());
    } else {
        println!("   • Failed: 0");
    }
    println!("   • Rows inserted: {}", summary.rows_inserted());
    println!(
        "   • Processing time: {}",
        HumanDuration(summary.processing_time)
    );

    if !summary.files.is_empty() {
        println!("\n{}", "Files:".bold());
        for report in &summary.files {
            let outcome = match report.outcome {
                LoadOutcome::Archived => report.outcome.to_string().green(),
                LoadOutcome::Failed => report.outcome.to_string().red(),
            };
            println!(
                "   • {} [{}] {} rows",
                report.file_name, outcome, report.rows_inserted
            );
            if let Some(error) = &report.error {
                println!("     {}", error.dimmed());
            }
        }
    }

    println!();
}

/// Summary as JSON for machine consumption
fn json_report(summary: &LoadSummary) -> serde_json::Value {
    serde_json::json!({
        "started_at": summary.started_at.to_rfc3339(),
        "processing_time_seconds": summary.processing_time.as_secs_f64(),
        "files_processed": summary.files.len(),
        "archived": summary.archived_count(),
        "failed": summary.failed_count(),
        "rows_inserted": summary.rows_inserted(),
        "files": summary.files,
    })
}
