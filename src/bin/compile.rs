//! Compile a contradiction matrix spreadsheet into JSON
//!
//! Usage: cargo run --bin triz-compile -- triz21.xlsx --header-row 1

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use triz_solver::compiler::{compile_file, CompileSummary, SourceOptions};
use triz_solver::config::DEFAULT_MATRIX_PATH;

/// Flatten a TRIZ contradiction matrix (xlsx, xls, ods or csv) into JSON
#[derive(Parser, Debug)]
#[command(name = "triz-compile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Matrix spreadsheet: header row of improving parameters, first column of
    /// worsening parameters, comma-separated principle numbers in the cells
    source: PathBuf,

    /// Output JSON file; defaults to where triz-solver looks for it
    #[arg(short, long, default_value = DEFAULT_MATRIX_PATH)]
    output: PathBuf,

    /// Worksheet name (first sheet by default)
    #[arg(long)]
    sheet: Option<String>,

    /// Zero-based index of the header row
    #[arg(long, default_value_t = 0)]
    header_row: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let options = SourceOptions {
        sheet: cli.sheet.clone(),
        header_row: cli.header_row,
    };

    let matrix = compile_file(&cli.source, &options)
        .with_context(|| format!("Failed to compile {:?}", cli.source))?;
    matrix.save(&cli.output)?;

    let summary = CompileSummary::of(&matrix);
    tracing::info!(
        records = summary.records,
        improving = summary.improving,
        worsening = summary.worsening,
        "Matrix compiled"
    );

    println!("JSON file saved as: {}", cli.output.display());
    println!("  Records:    {}", summary.records);
    println!("  Improving:  {}", summary.improving);
    println!("  Worsening:  {}", summary.worsening);
    if summary.empty_cells > 0 {
        println!("  Cells with no valid principle numbers: {}", summary.empty_cells);
    }

    Ok(())
}
