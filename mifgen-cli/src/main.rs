//! mifgen CLI — CSV to memory-initialization-file conversion.
//!
//! Commands:
//! - `convert` — read a (date, close) CSV and write one 64-bit record per
//!   row as a MIF file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mifgen_core::{convert, default_output_path, ConvertConfig, ConvertOptions, ConvertSummary};

#[derive(Parser)]
#[command(
    name = "mifgen",
    about = "mifgen — CSV to memory-initialization-file converter"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a (date, close) CSV into a MIF file.
    Convert {
        /// Input CSV path.
        input: PathBuf,

        /// Output MIF path. Defaults to the input path with an `.mif` extension.
        #[arg(long)]
        output: Option<PathBuf>,

        /// TOML config file with column names.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Header name of the date column (overrides config).
        #[arg(long)]
        date_column: Option<String>,

        /// Header name of the close column (overrides config).
        #[arg(long)]
        close_column: Option<String>,

        /// Also write the conversion summary as JSON to this path.
        #[arg(long)]
        summary_json: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            date_column,
            close_column,
            summary_json,
        } => run_convert(input, output, config, date_column, close_column, summary_json),
    }
}

fn run_convert(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    date_column: Option<String>,
    close_column: Option<String>,
    summary_json: Option<PathBuf>,
) -> Result<()> {
    // Precedence: flags override the config file, the config file overrides
    // the defaults.
    let mut config = match config_path {
        Some(path) => ConvertConfig::from_file(&path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ConvertConfig::default(),
    };
    if let Some(name) = date_column {
        config.date_column = name;
    }
    if let Some(name) = close_column {
        config.close_column = name;
    }

    let output = output.unwrap_or_else(|| default_output_path(&input));
    let opts = ConvertOptions {
        input,
        output,
        config,
    };

    let summary = convert(&opts)?;

    print_summary(&summary);

    if let Some(path) = summary_json {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }

    println!("MIF file saved: {}", summary.output.display());

    Ok(())
}

fn print_summary(summary: &ConvertSummary) {
    println!();
    println!("=== Conversion ===");
    println!("Input:          {}", summary.input.display());
    println!("Rows read:      {}", summary.rows_read);
    println!("Rows dropped:   {}", summary.rows_dropped);
    println!("Records:        {}", summary.records_written);
    println!("Width:          {} bits", summary.width_bits);
    println!("Content hash:   {}", summary.content_hash);
    println!();
}
