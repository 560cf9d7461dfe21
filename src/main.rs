use anyhow::Context;
use clap::{CommandFactory, Parser};
use fixed_width_loader::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match run(args) {
        Ok(true) => process::exit(0),
        Ok(false) => {
            // Failures have already been reported by the command
            process::exit(1);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Run the selected command; `Ok(false)` when any file failed
fn run(args: Args) -> anyhow::Result<bool> {
    let outcome = commands::run(args).context("fixed-width-loader failed")?;
    Ok(outcome.succeeded())
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Fixed-Width Loader - schema-driven loading of fixed-width drop files");
    println!("====================================================================");
    println!();
    println!("EXAMPLES:");
    println!("    # Load every file in ./data using specs from ./specs:");
    println!("    fixed-width-loader load");
    println!();
    println!("    # Load one file into a specific database:");
    println!("    fixed-width-loader load --file orders_2016-10-13.txt --database /srv/load.db");
    println!();
    println!("    # Parse files without loading or moving them:");
    println!("    fixed-width-loader check --all --output-format json");
    println!();

    if Args::command().print_help().is_err() {
        eprintln!("Run with --help for usage");
    }
}
