// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chart configuration.

use dms_benchmarks::{BenchmarkRecord, NumberFormat};
use std::collections::BTreeSet;

/// Where a series takes its per-record values from.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesSource {
    /// A record field; missing values count as `0` and per-bus sequences
    /// collapse to their mean.
    Field(String),
    /// Precomputed values, one per record in record order.
    Values(Vec<f64>),
}

/// One value series drawn as bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub label: String,
    /// Value source.
    pub source: SeriesSource,
}

impl Series {
    /// A series read from a record field.
    pub fn field(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: SeriesSource::Field(key.into()),
        }
    }

    /// A series of precomputed values.
    pub fn values(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            source: SeriesSource::Values(values),
        }
    }

    pub(crate) fn resolve(&self, records: &[BenchmarkRecord]) -> Vec<f64> {
        match &self.source {
            SeriesSource::Field(key) => records
                .iter()
                .map(|r| r.scalar(key).unwrap_or(0.0))
                .collect(),
            SeriesSource::Values(values) => values.clone(),
        }
    }
}

/// Contents of the secondary (right-hand) axis.
#[derive(Debug, Clone, PartialEq)]
pub enum SideField {
    /// A record field; missing values show as `-`.
    Field(String),
    /// Literal labels, one per record in record order.
    Labels(Vec<String>),
}

/// Chart configuration.
///
/// `fields[0]` is the primary series. Every series is drawn at the same
/// category position, later series over earlier ones.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    /// Figure title.
    pub title: Option<String>,
    /// Value series, primary first.
    pub fields: Vec<Series>,
    /// Value axis label.
    pub xlabel: Option<String>,
    /// Fixed value axis limits.
    pub xlim: Option<(f64, f64)>,
    /// Secondary axis contents.
    pub side_field: Option<SideField>,
    /// Secondary axis label.
    pub side_label: Option<String>,
    /// Format of bar annotations.
    pub field_format: NumberFormat,
    /// Series indices whose annotations are skipped. Only affects
    /// non-primary series.
    pub disable_annotate: BTreeSet<usize>,
}

impl ChartSpec {
    /// A chart of the given series with default options.
    pub fn new(fields: Vec<Series>) -> Self {
        Self {
            title: None,
            fields,
            xlabel: None,
            xlim: None,
            side_field: None,
            side_label: None,
            field_format: NumberFormat::default(),
            disable_annotate: BTreeSet::new(),
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the value axis label.
    pub fn with_xlabel(mut self, xlabel: impl Into<String>) -> Self {
        self.xlabel = Some(xlabel.into());
        self
    }

    /// Fix the value axis limits.
    pub fn with_xlim(mut self, min: f64, max: f64) -> Self {
        self.xlim = Some((min, max));
        self
    }

    /// Show a secondary axis.
    pub fn with_side(mut self, field: SideField, label: Option<String>) -> Self {
        self.side_field = Some(field);
        self.side_label = label;
        self
    }

    /// Set the annotation format.
    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.field_format = format;
        self
    }

    /// Skip annotations of a non-primary series.
    pub fn without_annotation(mut self, series: usize) -> Self {
        self.disable_annotate.insert(series);
        self
    }
}
