//! Recipe dataset preparation tool
//!
//! Turns the raw food.com export into the processed catalog the API loads,
//! and prints Nutri-Score statistics for a processed catalog.
//!
//! Usage:
//! ```bash
//! # Score, categorize and sort the raw export
//! cargo run --bin prepare-recipes -- prepare --input data/RAW_recipes.csv \
//!     --output data/processed_recipes_with_categories.csv
//!
//! # Score statistics and grade distribution
//! cargo run --bin prepare-recipes -- analyze --input data/processed_recipes_with_categories.csv
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nutri_coach_backend::catalog::dataset;
use nutri_coach_shared::recipes::{grade_distribution, score_statistics, Recipe};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "prepare-recipes",
    about = "Nutri Coach recipe dataset tool",
    long_about = "Compute Nutri-Scores and ingredient categories for the raw recipe export, or analyze a processed catalog"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Score, categorize and sort the raw export
    Prepare {
        #[arg(long, default_value = "data/RAW_recipes.csv")]
        input: PathBuf,
        #[arg(long, default_value = "data/processed_recipes_with_categories.csv")]
        output: PathBuf,
    },
    /// Print score statistics and the grade distribution
    Analyze {
        #[arg(long, default_value = "data/processed_recipes_with_categories.csv")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .init();

    match args.command {
        Command::Prepare { input, output } => prepare(&input, &output),
        Command::Analyze { input } => analyze(&input),
    }
}

fn prepare(input: &Path, output: &Path) -> Result<()> {
    let raw = File::open(input).with_context(|| format!("Cannot open {}", input.display()))?;
    let (recipes, report) = dataset::prepare(BufReader::new(raw))?;

    let out = File::create(output).with_context(|| format!("Cannot create {}", output.display()))?;
    dataset::write_catalog(BufWriter::new(out), &recipes)?;

    info!(
        read = report.read,
        unnamed = report.unnamed,
        unscored = report.unscored,
        uncategorized = report.uncategorized,
        kept = report.kept,
        output = %output.display(),
        "Recipe catalog written"
    );
    print_analysis(&recipes);
    Ok(())
}

fn analyze(input: &Path) -> Result<()> {
    let file = File::open(input).with_context(|| format!("Cannot open {}", input.display()))?;
    let recipes = dataset::read_catalog(BufReader::new(file))?;
    info!(recipes = recipes.len(), input = %input.display(), "Catalog read");

    print_analysis(&recipes);
    Ok(())
}

fn print_analysis(recipes: &[Recipe]) {
    println!("Recipes: {}", recipes.len());

    match score_statistics(recipes) {
        Some(stats) => {
            println!("Nutri-Score statistics");
            println!("  count   {}", stats.count);
            println!("  mean    {:.2}", stats.mean);
            match stats.std {
                Some(std) => println!("  std     {:.2}", std),
                None => println!("  std     -"),
            }
            println!("  min     {}", stats.min);
            println!("  25%     {:.2}", stats.q1);
            println!("  50%     {:.2}", stats.median);
            println!("  75%     {:.2}", stats.q3);
            println!("  max     {}", stats.max);
        }
        None => println!("No scored recipes"),
    }

    println!("Grade distribution");
    for entry in grade_distribution(recipes) {
        println!("  {}  {}", entry.grade, entry.count);
    }
}
