//! SMOTEWB CLI Module
//!
//! Command-line interface for oversampling CSV datasets and inspecting how
//! SMOTEWB sees their minority class.

use clap::{Parser, Subcommand};
use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::neighbors::NeighborParams;
use crate::synthetic::{class_counts, ResampleOutcome, Sampler, SmoteWB, SmoteWBConfig};
use crate::utils::{DataLoader, DataSaver};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<22} {}", muted(key), val.white());
}

fn counts_line(counts: &BTreeMap<i64, usize>) -> String {
    counts
        .iter()
        .map(|(label, n)| format!("{}: {}", label, n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "smotewb")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Noise-aware SMOTE oversampling for imbalanced binary datasets")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Sampler options shared by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct SamplerArgs {
    /// Fraction of the class-size gap to fill (1.0 balances the classes)
    #[arg(long, default_value = "1.0")]
    pub proportion: f64,

    /// Boosting rounds used for noise detection
    #[arg(long, default_value = "100")]
    pub n_iters: usize,

    /// Neighbors used by the plain SMOTE fallback
    #[arg(long, default_value = "5")]
    pub n_neighbors: usize,

    /// Worker threads
    #[arg(long, default_value = "1")]
    pub n_jobs: usize,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SamplerArgs {
    pub fn to_config(&self) -> SmoteWBConfig {
        SmoteWBConfig {
            proportion: self.proportion,
            n_iters: self.n_iters,
            nn_params: NeighborParams::new().with_n_neighbors(self.n_neighbors),
            n_jobs: self.n_jobs,
            random_state: self.seed,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Oversample the minority class of a CSV file
    Resample {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Label column name
        #[arg(short, long)]
        target: String,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Field separator of the input file
        #[arg(long, default_value = ",")]
        separator: char,

        #[command(flatten)]
        sampler: SamplerArgs,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show class statistics, noise and neighborhood categories
    Inspect {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Label column name
        #[arg(short, long)]
        target: String,

        /// Field separator of the input file
        #[arg(long, default_value = ",")]
        separator: char,

        #[command(flatten)]
        sampler: SamplerArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

// ─── Reports ───────────────────────────────────────────────────────────────────

/// What a resample run did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResampleSummary {
    pub input: String,
    pub output: String,
    pub rows_before: usize,
    pub rows_after: usize,
    pub n_synthetic: usize,
    pub outcome: ResampleOutcome,
    pub counts_before: BTreeMap<i64, usize>,
    pub counts_after: BTreeMap<i64, usize>,
    pub elapsed_secs: f64,
}

/// Per-stage breakdown of a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    pub counts: BTreeMap<i64, usize>,
    pub minority_label: Option<i64>,
    pub n_to_sample: usize,
    pub k_max: usize,
    pub noisy_minority: usize,
    pub noisy_majority: usize,
    pub good: usize,
    pub lonely: usize,
    pub bad: usize,
    pub fallback: bool,
}

fn path_str(path: &Path) -> anyhow::Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("path is not valid UTF-8: {}", path.display()))
}

/// CSV reader splitting fields on `separator`
pub fn csv_loader(separator: char) -> anyhow::Result<DataLoader> {
    anyhow::ensure!(
        separator.is_ascii(),
        "separator must be a single ASCII character, got {:?}",
        separator
    );
    Ok(DataLoader::new().with_separator(separator as u8))
}

/// Load, oversample and save; no console output
pub fn run_resample(
    loader: &DataLoader,
    data_path: &Path,
    target: &str,
    output_path: &Path,
    config: SmoteWBConfig,
) -> anyhow::Result<ResampleSummary> {
    let start = Instant::now();
    let data = loader.load_labelled(path_str(data_path)?, target)?;

    let sampler = SmoteWB::new(config)?;
    let result = sampler.sample(&data.x, &data.y)?;

    let counts_after = class_counts(&result.y);
    let resampled = data.with_data(result.x, result.y);
    let mut df = resampled.to_dataframe()?;
    DataSaver::save_csv(&mut df, path_str(output_path)?)?;

    Ok(ResampleSummary {
        input: data_path.display().to_string(),
        output: output_path.display().to_string(),
        rows_before: data.n_samples(),
        rows_after: resampled.n_samples(),
        n_synthetic: result.n_synthetic,
        outcome: result.outcome,
        counts_before: class_counts(&data.y),
        counts_after,
        elapsed_secs: start.elapsed().as_secs_f64(),
    })
}

/// Load and analyze; no console output
pub fn run_inspect(
    loader: &DataLoader,
    data_path: &Path,
    target: &str,
    config: SmoteWBConfig,
) -> anyhow::Result<InspectReport> {
    let data = loader.load_labelled(path_str(data_path)?, target)?;
    let counts = class_counts(&data.y);

    let sampler = SmoteWB::new(config)?;
    let report = match sampler.analyze(&data.x, &data.y)? {
        Some(analysis) => InspectReport {
            counts,
            minority_label: Some(analysis.stats.min_label),
            n_to_sample: analysis.n_to_sample,
            k_max: analysis.neighborhood.k_max,
            noisy_minority: analysis.noise.n_noisy_minority(),
            noisy_majority: analysis.noise.n_noisy_majority(),
            good: analysis.n_good(),
            lonely: analysis.n_lonely(),
            bad: analysis.n_bad(),
            fallback: analysis.allocation.is_fallback(),
        },
        None => InspectReport {
            counts,
            minority_label: None,
            n_to_sample: 0,
            k_max: 0,
            noisy_minority: 0,
            noisy_majority: 0,
            good: 0,
            lonely: 0,
            bad: 0,
            fallback: false,
        },
    };
    Ok(report)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_resample(
    data_path: &Path,
    target: &str,
    output_path: &Path,
    separator: char,
    args: &SamplerArgs,
    json: bool,
) -> anyhow::Result<()> {
    let loader = csv_loader(separator)?;
    if json {
        let summary = run_resample(&loader, data_path, target, output_path, args.to_config())?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    section("Resample");
    step_run(&format!("Oversampling {}", data_path.display()));
    let summary = run_resample(&loader, data_path, target, output_path, args.to_config())?;
    step_done(&format!("{:.3}s", summary.elapsed_secs));

    println!();
    kv("Rows", &format!("{} → {}", summary.rows_before, summary.rows_after));
    kv("Synthetic", &summary.n_synthetic.to_string());
    kv("Classes before", &counts_line(&summary.counts_before));
    kv("Classes after", &counts_line(&summary.counts_after));
    let outcome = match summary.outcome {
        ResampleOutcome::Oversampled => ok("oversampled").to_string(),
        ResampleOutcome::Fallback => "fell back to SMOTE".yellow().to_string(),
        ResampleOutcome::Unchanged(reason) => format!("unchanged ({:?})", reason).yellow().to_string(),
    };
    kv("Outcome", &outcome);
    kv("Output", &summary.output);
    println!();

    Ok(())
}

pub fn cmd_inspect(
    data_path: &Path,
    target: &str,
    separator: char,
    args: &SamplerArgs,
    json: bool,
) -> anyhow::Result<()> {
    let report = run_inspect(&csv_loader(separator)?, data_path, target, args.to_config())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    section("Inspect");
    kv("Classes", &counts_line(&report.counts));
    let Some(min_label) = report.minority_label else {
        println!("  {}", "Not a binary dataset with two or more minority samples".yellow());
        println!();
        return Ok(());
    };

    kv("Minority label", &min_label.to_string());
    kv("Samples to generate", &report.n_to_sample.to_string());
    kv("k_max", &report.k_max.to_string());
    kv("Noisy minority", &report.noisy_minority.to_string());
    kv("Noisy majority", &report.noisy_majority.to_string());

    section("Minority neighborhoods");
    kv("good", &report.good.to_string().green().to_string());
    kv("lonely", &report.lonely.to_string());
    kv("bad", &report.bad.to_string().red().to_string());
    if report.fallback {
        println!();
        println!("  {}", "No good or lonely sample: resampling falls back to SMOTE".yellow());
    }
    println!();

    Ok(())
}
