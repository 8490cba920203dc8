//! Benchmark history kept by CI in `dev/bench/data.js`.
//!
//! The file is append-only: every CI run adds one [`model::RunRecord`] to its
//! benchmark group. This crate loads, extends and compares it.

/// Loading, appending and comparing runs
pub mod history;
pub mod model;
