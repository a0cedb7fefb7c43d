//! Canonical benchmark records for restoration simulator results.
//!
//! The simulator writes results in several JSON shapes. This crate turns them
//! into one sparse [`BenchmarkRecord`] shape and computes what the chart and
//! table outputs need from it.
//!
//! # Quick Start
//!
//! ```no_run
//! use dms_benchmarks::{io, normalize, table, Naming};
//!
//! let document = io::read_results_json("results/wscc3.json")?;
//! let records = normalize::normalize_all(&document, Naming::Opt)?;
//! print!("{}", table::format_table(&records, &[table::Column::name()]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! - [`record`] - The canonical `BenchmarkRecord` struct
//! - [`variant`] - Optimization descriptor to label decoding
//! - [`normalize`] - Raw entry normalization
//! - [`metrics`] - Derived dataset-wide metrics
//! - [`table`] - Typeset text tables
//! - [`format`] - printf-style number formatting
//! - [`io`] - Reading result files and deriving output paths
//! - [`summary`] - Statistics over repeated runs

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod format;
pub mod io;
pub mod metrics;
pub mod normalize;
pub mod record;
pub mod summary;
pub mod table;
pub mod variant;

pub use format::NumberFormat;
pub use normalize::Naming;
pub use record::{BenchmarkRecord, Field, Metric};
pub use variant::VariantDescriptor;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pipeline_to_table() {
        let document = json!([
            {"name": "fast", "result": {"success": {"totalTime": 1.0}}},
            {"name": "slow", "result": {"success": {"total_time": 4.0}}},
            {"name": "broken", "result": {"error": {"description": "timeout"}}}
        ]);
        let records = normalize::normalize_all(&document, Naming::Default).unwrap();
        let output = table::format_table(
            &records,
            &[
                table::Column::name(),
                table::Column::numeric("total_time", NumberFormat::default()),
            ],
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            [
                "fast   & \\textbf{1.00} \\\\",
                "slow   & 4.00 \\\\",
                "broken & - \\\\"
            ]
        );
    }
}
