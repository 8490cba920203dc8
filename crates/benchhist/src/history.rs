use crate::model::{BenchmarkData, RunRecord};
use anyhow::{Result, anyhow, bail};
use serde_json::{from_str, to_string_pretty};
use std::collections::HashMap;
use std::fs::{read_to_string, write};
use std::path::Path;

/// Assignment prefix CI writes in front of the JSON document.
pub const DATA_PREFIX: &str = "window.BENCHMARK_DATA = ";

/// Parse a `data.js` file, or the bare JSON document.
///
/// # Errors
/// Returns an error if the JSON does not match [`BenchmarkData`].
pub fn parse_data_js(text: &str) -> Result<BenchmarkData> {
    let trimmed = text.trim();
    let json = trimmed.strip_prefix(DATA_PREFIX).unwrap_or(trimmed);
    let json = json.strip_suffix(';').unwrap_or(json);
    from_str(json).map_err(|err| anyhow!("invalid benchmark data: {err}"))
}

/// Render `data` in the same shape CI writes it.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render_data_js(data: &BenchmarkData) -> Result<String> {
    Ok(format!("{DATA_PREFIX}{}", to_string_pretty(data)?))
}

/// Load `path` as benchmark data.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<BenchmarkData> {
    let text = read_to_string(path)
        .map_err(|err| anyhow!("failed to read {}: {err}", path.display()))?;
    parse_data_js(&text)
}

/// Write `data` to `path`.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn save(path: &Path, data: &BenchmarkData) -> Result<()> {
    write(path, render_data_js(data)?)?;
    Ok(())
}

/// Append `run` to `group`, creating the group when missing.
///
/// History is append-only: a run older than the group's newest run is rejected.
///
/// # Errors
/// Returns an error if `run.date` precedes the last recorded run.
pub fn append_run(data: &mut BenchmarkData, group: &str, run: RunRecord) -> Result<()> {
    let runs = data.entries.entry(group.to_owned()).or_default();
    if let Some(last) = runs.last()
        && run.date < last.date
    {
        bail!(
            "run dated {} is older than the last '{group}' run ({})",
            run.date,
            last.date
        );
    }
    data.last_update = data.last_update.max(run.date);
    runs.push(run);
    Ok(())
}

/// Change of one bench between the two newest runs of a group.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchDelta {
    pub name: String,
    pub previous: f64,
    pub current: f64,
    /// Relative change in percent; negative means slower.
    pub change_pct: f64,
}

impl BenchDelta {
    /// Whether throughput dropped by more than `threshold_pct`.
    pub fn is_regression(&self, threshold_pct: f64) -> bool {
        self.change_pct < -threshold_pct
    }
}

/// Compare the two newest runs of `group`, bench by bench.
///
/// Benches missing from either run are skipped.
///
/// # Errors
/// Returns an error if the group is unknown or has fewer than two runs.
pub fn compare_latest(data: &BenchmarkData, group: &str) -> Result<Vec<BenchDelta>> {
    let runs = data
        .entries
        .get(group)
        .ok_or_else(|| anyhow!("benchmark group '{group}' not found"))?;
    let [.., previous, current] = runs.as_slice() else {
        bail!("benchmark group '{group}' needs at least two runs to compare");
    };

    let before: HashMap<&str, f64> = previous
        .benches
        .iter()
        .map(|bench| (bench.name.as_str(), bench.value_f64()))
        .collect();

    Ok(current
        .benches
        .iter()
        .filter_map(|bench| {
            let old = *before.get(bench.name.as_str())?;
            let new = bench.value_f64();
            let change_pct = if old == 0.0 { 0.0 } else { (new - old) / old * 100.0 };
            Some(BenchDelta {
                name: bench.name.clone(),
                previous: old,
                current: new,
                change_pct,
            })
        })
        .collect())
}
