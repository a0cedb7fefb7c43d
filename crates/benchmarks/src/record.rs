// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark record types.
//!
//! This module provides the canonical [`BenchmarkRecord`] that every raw
//! simulator entry is normalized into, whatever schema version produced it.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A numeric field value: either a single scalar or one value per bus.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Metric {
    /// A single value.
    Scalar(f64),
    /// An ordered sequence of values, one per bus.
    Sequence(Vec<f64>),
}

impl Metric {
    /// Collapse the metric into a single value.
    ///
    /// Sequences collapse to their arithmetic mean; an empty sequence is `0`.
    pub fn as_scalar(&self) -> f64 {
        match self {
            Metric::Scalar(v) => *v,
            Metric::Sequence(values) if values.is_empty() => 0.0,
            Metric::Sequence(values) => values.iter().sum::<f64>() / values.len() as f64,
        }
    }

    /// Per-bus view of the metric. A scalar is treated as a single bus.
    pub fn per_bus(&self) -> &[f64] {
        match self {
            Metric::Scalar(v) => std::slice::from_ref(v),
            Metric::Sequence(values) => values,
        }
    }
}

impl From<f64> for Metric {
    fn from(v: f64) -> Self {
        Metric::Scalar(v)
    }
}

impl From<Vec<f64>> for Metric {
    fn from(values: Vec<f64>) -> Self {
        Metric::Sequence(values)
    }
}

/// Well-known record fields, named by their canonical (underscore) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Total solve time in seconds.
    TotalTime,
    /// Time spent generating the state space, in seconds.
    GenerationTime,
    /// Peak memory in bytes.
    MaxMemory,
    /// Number of states.
    States,
    /// Number of transitions.
    Transitions,
    /// Optimal value in the initial state.
    Value,
    /// Optimization horizon.
    Horizon,
    /// Energization probability, per bus or aggregated.
    EnergizationP,
    /// Unconditional expected time until energization, per bus or aggregated.
    AvgTime,
}

impl Field {
    /// Canonical key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            Self::TotalTime => "total_time",
            Self::GenerationTime => "generation_time",
            Self::MaxMemory => "max_memory",
            Self::States => "states",
            Self::Transitions => "transitions",
            Self::Value => "value",
            Self::Horizon => "horizon",
            Self::EnergizationP => "energization_p",
            Self::AvgTime => "avg_time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Canonical benchmark record.
///
/// A record is sparse: only the fields the source entry carried are stored.
/// Defaults (`0` in charts, `"-"` in tables) are substituted by consumers.
/// Records are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    name: String,
    error: Option<String>,
    fields: BTreeMap<String, Metric>,
}

impl BenchmarkRecord {
    /// Create a record for a successful run with no fields yet.
    pub fn success(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: None,
            fields: BTreeMap::new(),
        }
    }

    /// Create a record for a failed run.
    pub fn failed(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            error: Some(description.into()),
            fields: BTreeMap::new(),
        }
    }

    /// Add a field during construction. Later values replace earlier ones.
    pub fn with(mut self, key: impl Into<String>, metric: impl Into<Metric>) -> Self {
        self.fields.insert(key.into(), metric.into());
        self
    }

    /// Add a well-known field during construction.
    pub fn with_field(self, field: Field, metric: impl Into<Metric>) -> Self {
        self.with(field.key(), metric)
    }

    /// Display label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Failure description, if the run failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the run failed. Errors take display priority over metrics.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Look up a field by canonical key.
    pub fn get(&self, key: &str) -> Option<&Metric> {
        self.fields.get(key)
    }

    /// Look up a well-known field.
    pub fn field(&self, field: Field) -> Option<&Metric> {
        self.get(field.key())
    }

    /// Scalar view of a field, collapsing per-bus sequences to their mean.
    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key).map(Metric::as_scalar)
    }

    /// Iterate over all stored fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Metric)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
