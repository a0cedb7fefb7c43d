// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Summary statistics over repeated simulator runs.
//!
//! A Monte Carlo experiment runs the same problem with different seeds and
//! writes one results file per run. Only the first entry of each file is
//! considered, and only its `result`; runs need not be named.

use crate::normalize;
use crate::record::Field;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Minimum, average and maximum of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spread {
    /// Smallest observation.
    pub min: f64,
    /// Arithmetic mean.
    pub avg: f64,
    /// Largest observation.
    pub max: f64,
}

impl Spread {
    /// Spread of a non-empty sample.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { min, avg, max })
    }
}

/// Summary of the optimal value and state count across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of runs that contributed.
    pub runs: usize,
    /// Spread of the optimal value.
    pub value: Spread,
    /// Spread of the state count.
    pub states: Spread,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Runs: {}", self.runs)?;
        writeln!(f, "Minimum Value: {}", self.value.min)?;
        writeln!(f, "Average Value: {}", self.value.avg)?;
        writeln!(f, "Maximum Value: {}", self.value.max)?;
        writeln!(f, "Minimum States: {}", self.states.min)?;
        writeln!(f, "Average States: {}", self.states.avg)?;
        write!(f, "Maximum States: {}", self.states.max)
    }
}

/// Summarize run documents. Runs whose first entry did not succeed, or lacks
/// `value` or `states`, are skipped with a warning. Returns `None` when no
/// run contributed.
pub fn summarize_runs<'a>(documents: impl IntoIterator<Item = &'a Value>) -> Option<RunSummary> {
    let mut values = Vec::new();
    let mut states = Vec::new();

    for (run, document) in documents.into_iter().enumerate() {
        let Some(first) = document.as_array().and_then(|entries| entries.first()) else {
            warn!(run, "Run has no entries, skipping");
            continue;
        };
        let record = match normalize::normalize_with_name(0, first, &format!("run {run}")) {
            Ok(record) if !record.is_error() => record,
            Ok(record) => {
                warn!(run, error = ?record.error(), "Run failed, skipping");
                continue;
            }
            Err(e) => {
                warn!(run, error = %e, "Run is malformed, skipping");
                continue;
            }
        };
        match (
            record.scalar(Field::Value.key()),
            record.scalar(Field::States.key()),
        ) {
            (Some(value), Some(count)) => {
                values.push(value);
                states.push(count);
            }
            _ => warn!(run, "Run lacks value or states, skipping"),
        }
    }

    Some(RunSummary {
        runs: values.len(),
        value: Spread::of(&values)?,
        states: Spread::of(&states)?,
    })
}
