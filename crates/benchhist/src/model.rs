//! Serde model of the benchmark-history artifact.
//!
//! Field order follows the file as written by CI so that a load/save cycle
//! reproduces it byte for byte.

use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::BTreeMap;

/// Whole `window.BENCHMARK_DATA` document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkData {
    /// Timestamp in milliseconds since epoch of the last append.
    pub last_update: u64,
    pub repo_url: String,
    /// Runs per benchmark group, oldest first.
    pub entries: BTreeMap<String, Vec<RunRecord>>,
}

/// One CI run of a benchmark group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub commit: Commit,
    /// Timestamp in milliseconds since epoch of the run.
    pub date: u64,
    /// Harness that produced the samples, e.g. `benchmarkjs`.
    pub tool: String,
    pub benches: Vec<Bench>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Commit {
    pub author: Person,
    pub committer: Person,
    pub id: String,
    pub message: String,
    pub timestamp: String,
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub name: String,
    pub username: String,
}

/// A single benchmark sample.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Bench {
    pub name: String,
    /// Throughput, kept as the original JSON number.
    pub value: Number,
    /// Error margin, e.g. `±1.52%`.
    pub range: String,
    /// Unit label, e.g. `ops/sec`.
    pub unit: String,
    /// Sample count annotation, e.g. `92 samples`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

impl Bench {
    pub fn value_f64(&self) -> f64 {
        self.value.as_f64().unwrap_or(0.0)
    }
}
