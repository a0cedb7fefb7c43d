// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Derived metrics computed across a whole dataset of records.
//!
//! Both metrics read per-bus `avg_time` and `energization_p`. The stored
//! `avg_time` is unconditional: for each bus it is the sum over all
//! restoration paths of `p(path) * time`, so it is already weighted by the
//! energization probability of that bus.
//!
//! Records of failed runs carry no metrics; they yield `None` and are left
//! out of dataset-wide aggregates such as the maximum horizon.

use crate::record::{BenchmarkRecord, Field};
use thiserror::Error;
use tracing::{debug, warn};

/// Absolute difference above which the cost self-check is reported as a warning.
pub const SANITY_TOLERANCE: f64 = 1e-6;

/// Errors that can occur while computing derived metrics.
#[derive(Debug, Error, PartialEq)]
pub enum MetricError {
    /// A field needed by the metric is absent.
    #[error("Record `{record}` is missing field `{field}`")]
    MissingField { record: String, field: Field },

    /// Per-bus sequences disagree on the bus count.
    #[error("Record `{record}` has {energization} energization probabilities but {times} average times")]
    LengthMismatch {
        record: String,
        energization: usize,
        times: usize,
    },

    /// The record has no buses to average over.
    #[error("Record `{record}` has no buses")]
    NoBuses { record: String },

    /// A bus was never energized, so its conditional time is undefined.
    #[error("Record `{record}` has zero energization probability on bus {bus}")]
    DivisionByZero { record: String, bus: usize },
}

/// Result type for metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

/// Average cost per bus for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct CostSample {
    /// Cost per bus using the dataset-wide maximum horizon. This is the
    /// displayed value.
    pub avg_cost: f64,
    /// Total cost over all buses using the record's own horizon.
    pub own_horizon_cost: f64,
    /// `value - own_horizon_cost`, when the record stores a `value`.
    pub value_diff: Option<f64>,
}

fn require(record: &BenchmarkRecord, field: Field) -> Result<f64> {
    record
        .field(field)
        .map(|m| m.as_scalar())
        .ok_or_else(|| MetricError::MissingField {
            record: record.name().to_string(),
            field,
        })
}

/// Per-bus `(avg_time, energization_p)` pairs of a record.
fn buses(record: &BenchmarkRecord) -> Result<Vec<(f64, f64)>> {
    let missing = |field| MetricError::MissingField {
        record: record.name().to_string(),
        field,
    };
    let times = record
        .field(Field::AvgTime)
        .ok_or_else(|| missing(Field::AvgTime))?
        .per_bus();
    let probabilities = record
        .field(Field::EnergizationP)
        .ok_or_else(|| missing(Field::EnergizationP))?
        .per_bus();

    if times.len() != probabilities.len() {
        return Err(MetricError::LengthMismatch {
            record: record.name().to_string(),
            energization: probabilities.len(),
            times: times.len(),
        });
    }
    if times.is_empty() {
        return Err(MetricError::NoBuses {
            record: record.name().to_string(),
        });
    }
    Ok(times.iter().copied().zip(probabilities.iter().copied()).collect())
}

fn expected_cost(buses: &[(f64, f64)], horizon: f64) -> f64 {
    buses
        .iter()
        .map(|(time, p)| time + (1.0 - p) * horizon)
        .sum()
}

/// Largest horizon among successful records, or `None` if there are none.
pub fn max_horizon(records: &[BenchmarkRecord]) -> Result<Option<f64>> {
    let mut max: Option<f64> = None;
    for record in records.iter().filter(|r| !r.is_error()) {
        let horizon = require(record, Field::Horizon)?;
        max = Some(max.map_or(horizon, |m| m.max(horizon)));
    }
    Ok(max)
}

/// Average cost per bus for every record.
///
/// A bus that is never energized costs the whole horizon, so each bus costs
/// `avg_time + (1 - energization_p) * horizon`. The dataset-wide maximum
/// horizon is used so records solved with different horizons stay
/// comparable. The same cost computed with the record's own horizon is
/// compared against its stored `value` and the difference is logged.
pub fn average_cost_per_bus(records: &[BenchmarkRecord]) -> Result<Vec<Option<CostSample>>> {
    let Some(horizon) = max_horizon(records)? else {
        return Ok(vec![None; records.len()]);
    };

    records
        .iter()
        .map(|record| {
            if record.is_error() {
                return Ok(None);
            }
            let buses = buses(record)?;
            let own_horizon = require(record, Field::Horizon)?;

            let avg_cost = expected_cost(&buses, horizon) / buses.len() as f64;
            let own_horizon_cost = expected_cost(&buses, own_horizon);
            let value_diff = record
                .scalar(Field::Value.key())
                .map(|value| value - own_horizon_cost);

            match value_diff {
                Some(diff) if diff.abs() > SANITY_TOLERANCE => warn!(
                    record = %record.name(),
                    value_diff = diff,
                    own_horizon,
                    "Stored value differs from recomputed cost"
                ),
                _ => debug!(
                    record = %record.name(),
                    avg_cost,
                    own_horizon_cost,
                    "Computed average cost per bus"
                ),
            }

            Ok(Some(CostSample {
                avg_cost,
                own_horizon_cost,
                value_diff,
            }))
        })
        .collect()
}

/// Average time until energization, conditioned on the bus being energized.
///
/// Per bus this is `avg_time / energization_p`; the result is the arithmetic
/// mean over buses. A zero probability fails with
/// [`MetricError::DivisionByZero`] instead of producing a non-finite value.
pub fn conditional_average_time(records: &[BenchmarkRecord]) -> Result<Vec<Option<f64>>> {
    records
        .iter()
        .map(|record| {
            if record.is_error() {
                return Ok(None);
            }
            let buses = buses(record)?;
            let mut total = 0.0;
            for (bus, (time, p)) in buses.iter().enumerate() {
                if *p == 0.0 {
                    return Err(MetricError::DivisionByZero {
                        record: record.name().to_string(),
                        bus,
                    });
                }
                total += time / p;
            }
            Ok(Some(total / buses.len() as f64))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, horizon: f64, times: Vec<f64>, ps: Vec<f64>) -> BenchmarkRecord {
        BenchmarkRecord::success(name)
            .with_field(Field::Horizon, horizon)
            .with_field(Field::AvgTime, times)
            .with_field(Field::EnergizationP, ps)
    }

    #[test]
    fn test_average_cost_uses_dataset_max_horizon() {
        let records = vec![
            record("short", 10.0, vec![2.0, 3.0], vec![0.5, 1.0]),
            record("long", 20.0, vec![4.0], vec![0.25]),
        ];
        let samples = average_cost_per_bus(&records).unwrap();

        let short = samples[0].as_ref().unwrap();
        assert_eq!(short.avg_cost, ((2.0 + 0.5 * 20.0) + (3.0 + 0.0)) / 2.0);
        assert_eq!(short.own_horizon_cost, (2.0 + 0.5 * 10.0) + 3.0);

        let long = samples[1].as_ref().unwrap();
        assert_eq!(long.avg_cost, 4.0 + 0.75 * 20.0);
    }

    #[test]
    fn test_average_cost_reports_value_diff() {
        let records = vec![record("a", 10.0, vec![1.0], vec![0.5]).with_field(Field::Value, 7.0)];
        let samples = average_cost_per_bus(&records).unwrap();
        let sample = samples[0].as_ref().unwrap();
        assert_eq!(sample.own_horizon_cost, 6.0);
        assert_eq!(sample.value_diff, Some(1.0));
    }

    #[test]
    fn test_average_cost_missing_horizon() {
        let records = vec![BenchmarkRecord::success("x")
            .with_field(Field::AvgTime, vec![1.0])
            .with_field(Field::EnergizationP, vec![1.0])];
        assert_eq!(
            average_cost_per_bus(&records).unwrap_err(),
            MetricError::MissingField {
                record: "x".to_string(),
                field: Field::Horizon
            }
        );
    }

    #[test]
    fn test_failed_records_are_skipped() {
        let records = vec![
            BenchmarkRecord::failed("broken", "timeout"),
            record("ok", 5.0, vec![1.0], vec![1.0]),
        ];
        let samples = average_cost_per_bus(&records).unwrap();
        assert!(samples[0].is_none());
        assert_eq!(samples[1].as_ref().unwrap().avg_cost, 1.0);
        assert_eq!(conditional_average_time(&records).unwrap()[0], None);
    }

    #[test]
    fn test_conditional_average_time() {
        let records = vec![record("a", 10.0, vec![4.0, 6.0], vec![0.5, 0.5])];
        assert_eq!(conditional_average_time(&records).unwrap(), vec![Some(10.0)]);
    }

    #[test]
    fn test_conditional_average_time_zero_probability() {
        let records = vec![record("a", 10.0, vec![4.0, 0.0], vec![0.5, 0.0])];
        assert_eq!(
            conditional_average_time(&records).unwrap_err(),
            MetricError::DivisionByZero {
                record: "a".to_string(),
                bus: 1
            }
        );
    }

    #[test]
    fn test_length_mismatch() {
        let records = vec![record("a", 10.0, vec![4.0, 6.0], vec![0.5])];
        assert!(matches!(
            conditional_average_time(&records),
            Err(MetricError::LengthMismatch { energization: 1, times: 2, .. })
        ));
    }

    #[test]
    fn test_scalar_fields_are_one_bus() {
        let records = vec![BenchmarkRecord::success("a")
            .with_field(Field::Horizon, 8.0)
            .with_field(Field::AvgTime, 3.0)
            .with_field(Field::EnergizationP, 0.75)];
        assert_eq!(conditional_average_time(&records).unwrap(), vec![Some(4.0)]);
        let cost = average_cost_per_bus(&records).unwrap();
        assert_eq!(cost[0].as_ref().unwrap().avg_cost, 3.0 + 0.25 * 8.0);
    }
}
