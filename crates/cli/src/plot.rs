// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Plot kinds and the record-to-output pipeline.

use anyhow::{Context, Result};
use dms_benchmarks::metrics;
use dms_benchmarks::table::{self, Column};
use dms_benchmarks::{BenchmarkRecord, Field, NumberFormat};
use dms_chart::{ChartLayout, ChartSpec, Series, SideField};
use std::fmt;

const TITLE: &str = "Benchmark Results";
const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// What to produce from a results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotKind {
    /// Total and generation time.
    Time,
    /// Peak memory.
    Memory,
    /// Optimal value.
    Value,
    /// Mean energization probability.
    EnergizationProbability,
    /// Expected cost per bus.
    AverageCost,
    /// Conditional time until energization.
    AverageTime,
    /// Number of states.
    StateCount,
    /// Transitions per state.
    StateTransitionRatio,
    /// Text table on standard output.
    Table,
}

impl PlotKind {
    /// Every kind, in selector matching order.
    pub const ALL: [PlotKind; 9] = [
        Self::Time,
        Self::Memory,
        Self::Value,
        Self::EnergizationProbability,
        Self::AverageCost,
        Self::AverageTime,
        Self::StateCount,
        Self::StateTransitionRatio,
        Self::Table,
    ];

    /// Selector name, also used as the output file suffix.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Memory => "memory",
            Self::Value => "value",
            Self::EnergizationProbability => "energization-probability",
            Self::AverageCost => "average-cost",
            Self::AverageTime => "average-time",
            Self::StateCount => "state-count",
            Self::StateTransitionRatio => "state-transition-ratio",
            Self::Table => "table",
        }
    }

    /// First kind whose name starts with `selector`.
    pub fn from_prefix(selector: &str) -> Option<Self> {
        let selector = selector.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().starts_with(&selector))
    }

    /// Comma-separated list of all selector names.
    pub fn names() -> String {
        Self::ALL.map(|k| k.name()).join(", ")
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pipeline output.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// A chart to draw.
    Chart(ChartLayout),
    /// Table text to print.
    Table(String),
}

fn format(spec: &str) -> NumberFormat {
    spec.parse().unwrap_or_default()
}

fn states_side() -> SideField {
    SideField::Field(Field::States.key().to_string())
}

fn ratio(record: &BenchmarkRecord) -> f64 {
    match (
        record.scalar(Field::Transitions.key()),
        record.scalar(Field::States.key()),
    ) {
        (Some(transitions), Some(states)) if states != 0.0 => transitions / states,
        _ => 0.0,
    }
}

/// Chart configuration of a kind. `records` are already in drawing order.
pub fn chart_spec(kind: PlotKind, records: &[BenchmarkRecord]) -> Result<ChartSpec> {
    let states_label = Some("Number of States".to_string());
    let spec = match kind {
        PlotKind::Time => ChartSpec::new(vec![
            Series::field("Total Time", Field::TotalTime.key()),
            Series::field("Generation Time", Field::GenerationTime.key()),
        ])
        .with_xlabel("Time (seconds)")
        .with_side(states_side(), states_label),
        PlotKind::Memory => ChartSpec::new(vec![Series::values(
            "Maximum Memory",
            records
                .iter()
                .map(|r| r.scalar(Field::MaxMemory.key()).unwrap_or(0.0) / BYTES_PER_MIB)
                .collect(),
        )])
        .with_xlabel("Memory (MiB)")
        .with_side(states_side(), states_label),
        PlotKind::Value => ChartSpec::new(vec![Series::field("Value", Field::Value.key())])
            .with_xlabel("Optimal value")
            .with_side(states_side(), states_label),
        PlotKind::EnergizationProbability => ChartSpec::new(vec![Series::field(
            "Energization Probability",
            Field::EnergizationP.key(),
        )])
        .with_xlabel("Energization probability")
        .with_xlim(0.0, 1.0)
        .with_format(format("%.3f"))
        .with_side(states_side(), states_label),
        PlotKind::AverageCost => {
            let costs = metrics::average_cost_per_bus(records)
                .context("Failed to compute average cost per bus")?;
            ChartSpec::new(vec![Series::values(
                "Average Cost",
                costs.iter().map(|c| c.as_ref().map_or(0.0, |c| c.avg_cost)).collect(),
            )])
            .with_xlabel("Average cost per bus")
            .with_side(
                SideField::Field(Field::Horizon.key().to_string()),
                Some("Horizon".to_string()),
            )
        }
        PlotKind::AverageTime => {
            let times = metrics::conditional_average_time(records)
                .context("Failed to compute average time until energization")?;
            ChartSpec::new(vec![Series::values(
                "Average Time",
                times.iter().map(|t| t.unwrap_or(0.0)).collect(),
            )])
            .with_xlabel("Average time until energization")
            .with_side(states_side(), states_label)
        }
        PlotKind::StateCount => ChartSpec::new(vec![Series::field("States", Field::States.key())])
            .with_xlabel("Number of states")
            .with_format(format("%.0f"))
            .with_side(
                SideField::Field(Field::Transitions.key().to_string()),
                Some("Number of Transitions".to_string()),
            ),
        PlotKind::StateTransitionRatio => ChartSpec::new(vec![Series::values(
            "Transitions per State",
            records.iter().map(ratio).collect(),
        )])
        .with_xlabel("Transitions per state")
        .with_side(states_side(), states_label),
        PlotKind::Table => anyhow::bail!("`table` does not produce a chart"),
    };
    Ok(spec.with_title(TITLE))
}

/// Columns of the `table` kind.
pub fn table_columns() -> Vec<Column> {
    vec![
        Column::name(),
        Column::numeric(Field::TotalTime.key(), format("%.2f")),
        Column::numeric(Field::GenerationTime.key(), format("%.2f")),
        Column::numeric(Field::States.key(), format("%.0f")),
        Column::numeric(Field::Value.key(), format("%.2f")),
    ]
}

/// Turn records, in input order, into the output of `kind`.
///
/// Charts list the first record at the top, so records are handed to the
/// chart layout reversed. Tables keep input order.
pub fn render_kind(records: &[BenchmarkRecord], kind: PlotKind) -> Result<Rendered> {
    if kind == PlotKind::Table {
        return Ok(Rendered::Table(table::format_table(records, &table_columns())));
    }
    let reversed: Vec<BenchmarkRecord> = records.iter().rev().cloned().collect();
    let spec = chart_spec(kind, &reversed)?;
    let layout = dms_chart::layout(&reversed, &spec)
        .with_context(|| format!("Failed to lay out `{kind}` chart"))?;
    Ok(Rendered::Chart(layout))
}
