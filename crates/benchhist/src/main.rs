//! Benchmark history tool for the CI `data.js` artifact.
//!
//! Summarises, appends to and compares the runs recorded per benchmark group.

use anyhow::{Result, anyhow};
use benchhist::history::{append_run, compare_latest, load, save};
use benchhist::model::RunRecord;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use log::{error, info};
use serde_json::from_str;
use std::fs::read_to_string;
use std::io::{Write as _, stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "benchhist")]
#[command(about = "Inspect and extend the benchmark history artifact", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the newest run of every benchmark group
    Summary {
        #[arg(long = "data", value_name = "FILE")]
        data: PathBuf,
    },
    /// Append one run record (JSON) to a group
    Append {
        #[arg(long = "data", value_name = "FILE")]
        data: PathBuf,
        #[arg(long = "group", value_name = "NAME", default_value = "Benchmark")]
        group: String,
        #[arg(long = "run", value_name = "RUN_JSON")]
        run: PathBuf,
    },
    /// Compare the two newest runs of a group; fails on regressions
    Compare {
        #[arg(long = "data", value_name = "FILE")]
        data: PathBuf,
        #[arg(long = "group", value_name = "NAME", default_value = "Benchmark")]
        group: String,
        /// Allowed throughput drop in percent
        #[arg(long = "threshold", value_name = "PERCENT", default_value_t = 5.0)]
        threshold: f64,
    },
}

/// Print the newest run per group.
///
/// # Errors
/// Returns an error if the data cannot be loaded or stdout fails.
fn cmd_summary(path: &Path) -> Result<()> {
    let data = load(path)?;
    let mut out = stdout().lock();
    writeln!(out, "{} (last update {})", data.repo_url, data.last_update)?;
    for (group, runs) in &data.entries {
        let Some(latest) = runs.last() else {
            writeln!(out, "{group}: no runs")?;
            continue;
        };
        let short_id = latest.commit.id.get(..7).unwrap_or(&latest.commit.id);
        writeln!(
            out,
            "{group}: {} runs, latest {short_id} \"{}\" ({})",
            runs.len(),
            latest.commit.message.lines().next().unwrap_or_default(),
            latest.tool
        )?;
        for bench in &latest.benches {
            writeln!(
                out,
                "  {:<48} {:>14} {} {}",
                bench.name,
                bench.value.to_string(),
                bench.unit,
                bench.range
            )?;
        }
    }
    Ok(())
}

/// Append a run record read from `run_path`.
///
/// # Errors
/// Returns an error if either file is invalid or the run breaks append order.
fn cmd_append(path: &Path, group: &str, run_path: &Path) -> Result<()> {
    let mut data = load(path)?;
    let text = read_to_string(run_path)
        .map_err(|err| anyhow!("failed to read {}: {err}", run_path.display()))?;
    let run: RunRecord = from_str(&text)?;
    let commit = run.commit.id.clone();
    append_run(&mut data, group, run)?;
    save(path, &data)?;
    info!("appended {commit} to '{group}' in {}", path.display());
    Ok(())
}

/// Compare the newest two runs and report regressions.
///
/// # Errors
/// Returns an error if the data cannot be loaded or stdout fails.
fn cmd_compare(path: &Path, group: &str, threshold: f64) -> Result<bool> {
    let data = load(path)?;
    let deltas = compare_latest(&data, group)?;
    let mut out = stdout().lock();
    let mut regressions = 0usize;
    for delta in &deltas {
        let marker = if delta.is_regression(threshold) {
            regressions += 1;
            "REGRESSION"
        } else {
            "ok"
        };
        writeln!(
            out,
            "{:<48} {:>14.0} -> {:>14.0} {:>+8.2}% {marker}",
            delta.name, delta.previous, delta.current, delta.change_pct
        )?;
    }
    writeln!(
        out,
        "{regressions} of {} benches regressed more than {threshold}%",
        deltas.len()
    )?;
    Ok(regressions == 0)
}

fn main() -> ExitCode {
    let _log_init: Result<(), _> = Builder::from_env(Env::default().filter_or("RUST_LOG", "warn"))
        .is_test(false)
        .try_init();
    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Summary { data } => cmd_summary(data).map(|()| true),
        Command::Append { data, group, run } => cmd_append(data, group, run).map(|()| true),
        Command::Compare {
            data,
            group,
            threshold,
        } => cmd_compare(data, group, *threshold),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
