// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Normalization of raw simulator entries into [`BenchmarkRecord`]s.
//!
//! Two entry shapes are accepted:
//!
//! ```text
//! {"name": "...", "result": {"success": {...}} | {"error": {"description": "..."}}}
//! {"optimizations": {"indexer", "actions", "transitions"}, "result": ..., "simulation": {...}}
//! ```
//!
//! Older simulator versions write underscore keys (`total_time`), newer ones
//! camel case (`totalTime`). Both end up under the underscore key.

use crate::record::{BenchmarkRecord, Metric};
use crate::variant::{self, DecodeError, VariantDescriptor};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors that can occur while normalizing raw entries. All of them are fatal.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The input document is not a JSON array.
    #[error("Expected a JSON array of benchmark entries")]
    NotAnArray,

    /// The entry has no `result` key.
    #[error("Entry {index} is missing the required `result` field")]
    MissingResult { index: usize },

    /// Literal naming was requested but the entry has no string `name`.
    #[error("Entry {index} is missing a string `name` field")]
    MissingName { index: usize },

    /// Optimization naming was requested but the entry has no descriptor.
    #[error("Entry {index} is missing the `optimizations` field")]
    MissingOptimizations { index: usize },

    /// A sub-object does not have the expected shape.
    #[error("Entry {index} is malformed: {source}")]
    Malformed {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The optimization descriptor names an unknown variant.
    #[error("Entry {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: DecodeError,
    },
}

/// Result type for normalization operations.
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// How record names are chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Naming {
    /// Use the entry's literal `name`.
    #[default]
    Default,
    /// Decode the entry's optimization descriptor into a label.
    Opt,
}

impl FromStr for Naming {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "opt" => Ok(Self::Opt),
            _ => Err(format!("unknown naming `{s}`, expected `default` or `opt`")),
        }
    }
}

impl fmt::Display for Naming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Opt => f.write_str("opt"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RawResult {
    Error(RawFailure),
    Success(Map<String, Value>),
}

#[derive(Debug, Deserialize)]
struct RawFailure {
    description: String,
}

/// Map a schema key to its canonical underscore form (`totalTime` -> `total_time`).
pub fn canonical_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn metric_from_value(value: &Value) -> Option<Metric> {
    Metric::deserialize(value).ok()
}

fn merge_fields(mut record: BenchmarkRecord, fields: &Map<String, Value>) -> BenchmarkRecord {
    for (key, value) in fields {
        match metric_from_value(value) {
            Some(metric) => record = record.with(canonical_key(key), metric),
            None => trace!(key = %key, "Skipping non-numeric field"),
        }
    }
    record
}

fn entry_name(index: usize, entry: &Map<String, Value>, naming: Naming) -> Result<String> {
    match naming {
        Naming::Default => entry
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(NormalizeError::MissingName { index }),
        Naming::Opt => {
            let raw = entry
                .get("optimizations")
                .ok_or(NormalizeError::MissingOptimizations { index })?;
            let descriptor = VariantDescriptor::deserialize(raw)
                .map_err(|source| NormalizeError::Malformed { index, source })?;
            variant::decode(&descriptor).map_err(|source| NormalizeError::Decode { index, source })
        }
    }
}

/// Normalize one raw entry. `index` is the entry's position, used in errors.
pub fn normalize(index: usize, entry: &Value, naming: Naming) -> Result<BenchmarkRecord> {
    normalize_entry(index, entry, |object| entry_name(index, object, naming))
}

/// Normalize one raw entry under a caller-chosen name, for entries that carry
/// neither a `name` nor `optimizations`.
pub fn normalize_with_name(index: usize, entry: &Value, name: &str) -> Result<BenchmarkRecord> {
    normalize_entry(index, entry, |_| Ok(name.to_string()))
}

fn normalize_entry(
    index: usize,
    entry: &Value,
    name: impl FnOnce(&Map<String, Value>) -> Result<String>,
) -> Result<BenchmarkRecord> {
    let empty = Map::new();
    let object = entry.as_object().unwrap_or(&empty);

    let raw_result = object
        .get("result")
        .ok_or(NormalizeError::MissingResult { index })?;
    let result = RawResult::deserialize(raw_result)
        .map_err(|source| NormalizeError::Malformed { index, source })?;

    let name = name(object)?;

    let mut record = match result {
        RawResult::Error(failure) => {
            debug!(record = %name, error = %failure.description, "Normalized failed entry");
            BenchmarkRecord::failed(name, failure.description)
        }
        RawResult::Success(fields) => merge_fields(BenchmarkRecord::success(name), &fields),
    };

    if let Some(simulation) = object.get("simulation").and_then(Value::as_object) {
        record = merge_fields(record, simulation);
    }

    Ok(record)
}

/// Normalize a whole input document, preserving entry order.
pub fn normalize_all(document: &Value, naming: Naming) -> Result<Vec<BenchmarkRecord>> {
    let entries = document.as_array().ok_or(NormalizeError::NotAnArray)?;
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize(index, entry, naming))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Field;
    use serde_json::json;

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("totalTime"), "total_time");
        assert_eq!(canonical_key("total_time"), "total_time");
        assert_eq!(canonical_key("energizationP"), "energization_p");
        assert_eq!(canonical_key("states"), "states");
    }

    #[test]
    fn test_old_and_new_schema_agree() {
        let old = json!({"name": "A", "result": {"success": {"total_time": 1.5, "generation_time": 0.5}}});
        let new = json!({"name": "A", "result": {"success": {"totalTime": 1.5, "generationTime": 0.5}}});
        let old = normalize(0, &old, Naming::Default).unwrap();
        let new = normalize(0, &new, Naming::Default).unwrap();
        assert_eq!(old, new);
        assert_eq!(new.scalar("total_time"), Some(1.5));
    }

    #[test]
    fn test_error_entry_sets_error() {
        let entry = json!({"name": "B", "result": {"error": {"description": "Out of memory"}}});
        let record = normalize(0, &entry, Naming::Default).unwrap();
        assert_eq!(record.error(), Some("Out of memory"));
        assert_eq!(record.fields().count(), 0);
    }

    #[test]
    fn test_missing_result_is_fatal() {
        let entry = json!({"name": "C"});
        let err = normalize(3, &entry, Naming::Default).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingResult { index: 3 }));
    }

    #[test]
    fn test_caller_chosen_name() {
        let entry = json!({"result": {"success": {"value": 2.5}}});
        assert!(matches!(
            normalize(0, &entry, Naming::Default).unwrap_err(),
            NormalizeError::MissingName { index: 0 }
        ));
        let record = normalize_with_name(0, &entry, "run 0").unwrap();
        assert_eq!(record.name(), "run 0");
        assert_eq!(record.scalar("value"), Some(2.5));

        let err = normalize_with_name(1, &json!({}), "run 1").unwrap_err();
        assert!(matches!(err, NormalizeError::MissingResult { index: 1 }));
    }

    #[test]
    fn test_non_numeric_fields_are_skipped() {
        let entry = json!({"name": "E", "result": {"success": {
            "states": 4, "label": "x", "done": true, "mixed": [1, "a"], "energizationP": [0.5, 1]
        }}});
        let record = normalize(0, &entry, Naming::Default).unwrap();
        let keys: Vec<&str> = record.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, ["energization_p", "states"]);
    }

    #[test]
    fn test_missing_fields_stay_absent() {
        let entry = json!({"name": "D", "result": {"success": {"states": 7}}});
        let record = normalize(0, &entry, Naming::Default).unwrap();
        assert!(record.field(Field::TotalTime).is_none());
        assert_eq!(record.scalar("states"), Some(7.0));
    }

    #[test]
    fn test_simulation_overwrites_success_fields() {
        let entry = json!({
            "optimizations": {
                "indexer": "SortedStateIndexer",
                "actions": "PermutationalActions",
                "transitions": "NaiveActionApplier"
            },
            "result": {"success": {"value": 3.0, "avgTime": 9.0, "horizon": 10}},
            "simulation": {"avgTime": [1.0, 2.0], "energizationP": [0.5, 1.0]}
        });
        let record = normalize(0, &entry, Naming::Opt).unwrap();
        assert_eq!(record.name(), "S + P");
        assert_eq!(record.field(Field::AvgTime), Some(&Metric::Sequence(vec![1.0, 2.0])));
        assert_eq!(
            record.field(Field::EnergizationP),
            Some(&Metric::Sequence(vec![0.5, 1.0]))
        );
        assert_eq!(record.scalar("horizon"), Some(10.0));
    }

    #[test]
    fn test_unknown_variant_is_fatal() {
        let entry = json!({
            "optimizations": {"indexer": "NaiveStateIndexer", "actions": "Bogus", "transitions": "NaiveActionApplier"},
            "result": {"success": {}}
        });
        let err = normalize(1, &entry, Naming::Opt).unwrap_err();
        assert!(matches!(err, NormalizeError::Decode { index: 1, .. }));
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let doc = json!([
            {"name": "first", "result": {"success": {}}},
            {"name": "second", "result": {"success": {}}}
        ]);
        let records = normalize_all(&doc, Naming::Default).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["first", "second"]);
        assert!(matches!(
            normalize_all(&json!({"tasks": []}), Naming::Default),
            Err(NormalizeError::NotAnArray)
        ));
    }

    #[test]
    fn test_naming_from_str() {
        assert_eq!("opt".parse::<Naming>().unwrap(), Naming::Opt);
        assert_eq!("Default".parse::<Naming>().unwrap(), Naming::Default);
        assert!("other".parse::<Naming>().is_err());
    }
}
