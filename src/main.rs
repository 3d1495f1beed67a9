//! Scrivener Vault - convert Scrivener projects into Markdown vaults.
//!
//! Mirrors a `.scriv` binder as folders and Markdown notes with frontmatter,
//! then prints a report of what was converted, skipped, or failed.
//!
//!   scrivener-vault convert Novel.scriv ~/Vault/Novel
//!   scrivener-vault convert Novel.scriv out --format json
//!   scrivener-vault tree Novel.scriv
//!   scrivener-vault init-config

mod cli;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use scrivener_vault::application::{
    convert_with, format_outline_table, format_report_json, format_report_text, OutputFormat,
};
use scrivener_vault::domain::{self, ConversionResult, ConvertError, ItemStatus};
use scrivener_vault::infrastructure::{
    ensure_config_exists, find_descriptor, load_config, project_name, read_binder,
};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

/// Main application logic. Returns whether the command succeeded.
fn run(cli: Cli) -> domain::Result<bool> {
    match cli.command {
        Commands::Convert {
            source,
            destination,
            prefix_positions,
            include_trash,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let mut options = config.conversion;
            options.prefix_positions |= prefix_positions;
            options.include_trash |= include_trash;

            let format: OutputFormat = format
                .as_deref()
                .unwrap_or(&config.output.format)
                .parse()
                .map_err(|message| ConvertError::Config { message })?;

            cmd_convert(&source, &destination, options, format)
        }
        Commands::Tree { source } => {
            cmd_tree(&source)?;
            Ok(true)
        }
        Commands::InitConfig => {
            cmd_init_config(cli.config.as_deref())?;
            Ok(true)
        }
    }
}

/// Convert command.
fn cmd_convert(
    source: &Path,
    destination: &Path,
    options: domain::ConvertOptions,
    format: OutputFormat,
) -> domain::Result<bool> {
    let show_progress = format == OutputFormat::Text;
    let mut progress = |result: &ConversionResult| {
        if !show_progress {
            return;
        }
        let marker = match result.status {
            ItemStatus::Converted => "✓".green(),
            ItemStatus::Skipped => "-".dimmed(),
            ItemStatus::Failed => "✗".red(),
        };
        println!(
            "{} {} → {}",
            marker,
            result.title.cyan(),
            result.output_path.display()
        );
    };

    let report = convert_with(source, destination, options, Some(&mut progress));

    let output = match format {
        OutputFormat::Text => format_report_text(&report),
        OutputFormat::Json => format_report_json(&report).map_err(|e| ConvertError::Config {
            message: format!("Failed to serialize report: {e}"),
        })?,
    };
    if show_progress && !report.results.is_empty() {
        println!();
    }
    println!("{}", output.trim_end());

    Ok(report.success)
}

/// Print the binder outline.
fn cmd_tree(source: &Path) -> domain::Result<()> {
    let descriptor = find_descriptor(source)?;
    let root = read_binder(&descriptor, &project_name(source))?;

    println!("{}", format!("📚 {}", root.title).bold());
    println!("{}", format_outline_table(&root));
    println!();
    println!("Documents: {}", root.document_count());

    Ok(())
}

/// Create the configuration file.
fn cmd_init_config(path: Option<&Path>) -> domain::Result<()> {
    let path = ensure_config_exists(path)?;
    println!("{} Configuration at {}", "✓".green().bold(), path.display());
    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).without_time())
        .with(filter)
        .init();
}
