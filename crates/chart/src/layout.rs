// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chart layout: what is drawn where, independent of the drawing backend.
//!
//! Records are placed on the category axis in the order given, position `0`
//! first. Positions grow upwards, so callers that want the first record at
//! the top pass the records reversed.

use crate::spec::{ChartSpec, SideField};
use crate::ticks::{nice_ticks, MAJOR_TICKS};
use crate::{ChartError, Result};
use dms_benchmarks::table::MISSING;
use dms_benchmarks::BenchmarkRecord;
use tracing::debug;

/// Headroom added above the largest bar when no limits are given.
pub const AUTO_MARGIN: f64 = 0.05;

/// Where an annotation sits relative to the end of its bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Just past the bar end, text growing away from the bar.
    Outside,
    /// Just before the bar end, text ending at the bar end.
    Inside,
}

impl Placement {
    /// Horizontal text anchor implied by the placement.
    pub fn anchor(&self) -> Anchor {
        match self {
            Self::Outside => Anchor::Left,
            Self::Inside => Anchor::Right,
        }
    }
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Text starts at the anchor point.
    Left,
    /// Text ends at the anchor point.
    Right,
}

/// Text shade, chosen for contrast with what is behind the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Dark text on the background or on a light bar.
    Dark,
    /// Light text on a dark bar.
    Light,
}

/// A category row.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Category position, `0` at the bottom.
    pub position: usize,
    /// Record name shown on the category axis.
    pub name: String,
}

/// One bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Series index.
    pub series: usize,
    /// Category position.
    pub position: usize,
    /// Bar length along the value axis.
    pub length: f64,
}

/// A text label attached to a bar end.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Series index.
    pub series: usize,
    /// Category position.
    pub position: usize,
    /// Value axis coordinate of the bar end.
    pub x: f64,
    /// Label text.
    pub text: String,
    /// Placement relative to the bar end.
    pub placement: Placement,
    /// Text shade.
    pub tone: Tone,
}

/// The secondary axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SideAxis {
    /// Axis label.
    pub label: Option<String>,
    /// Tick labels indexed by category position.
    pub ticks: Vec<String>,
}

/// Everything needed to draw a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Figure title.
    pub title: Option<String>,
    /// Value axis label.
    pub xlabel: Option<String>,
    /// Value axis range.
    pub x_range: (f64, f64),
    /// Major tick positions on the value axis.
    pub x_ticks: Vec<f64>,
    /// Category rows by position.
    pub rows: Vec<Row>,
    /// Legend label per series.
    pub legend: Vec<String>,
    /// Bars, series by series.
    pub bars: Vec<Bar>,
    /// Bar annotations.
    pub annotations: Vec<Annotation>,
    /// Positions that get a background band.
    pub bands: Vec<usize>,
    /// Secondary axis, if any.
    pub side_axis: Option<SideAxis>,
    /// Primary series value below which labels go outside the bar.
    pub threshold: f64,
}

impl ChartLayout {
    /// Row names as they read from the top of the chart down.
    pub fn names_top_to_bottom(&self) -> Vec<&str> {
        self.rows.iter().rev().map(|r| r.name.as_str()).collect()
    }

    /// Annotations of one series, by position.
    pub fn annotations_for(&self, series: usize) -> Vec<&Annotation> {
        self.annotations
            .iter()
            .filter(|a| a.series == series)
            .collect()
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

fn side_value(record: &BenchmarkRecord, key: &str) -> String {
    match record.scalar(key) {
        Some(v) => v.to_string(),
        None => MISSING.to_string(),
    }
}

/// Lay out a chart of `records` according to `spec`.
pub fn layout(records: &[BenchmarkRecord], spec: &ChartSpec) -> Result<ChartLayout> {
    if records.is_empty() {
        return Err(ChartError::NoRecords);
    }
    if spec.fields.is_empty() {
        return Err(ChartError::NoSeries);
    }
    if let Some((min, max)) = spec.xlim {
        if !(min < max) {
            return Err(ChartError::InvalidLimits { min, max });
        }
    }

    let series: Vec<Vec<f64>> = spec.fields.iter().map(|s| s.resolve(records)).collect();
    for (index, values) in series.iter().enumerate() {
        if values.len() != records.len() {
            return Err(ChartError::SeriesLength {
                series: index,
                expected: records.len(),
                actual: values.len(),
            });
        }
    }

    let primary = &series[0];
    let (primary_min, primary_max) = min_max(primary);
    let threshold = match spec.xlim {
        Some((min, max)) => min * 0.25 + max * 0.75,
        None => (primary_min + primary_max) / 2.0,
    };

    let x_range = match spec.xlim {
        Some(limits) => limits,
        None => {
            let (lo, hi) = series
                .iter()
                .map(|values| min_max(values))
                .fold((0.0_f64, 0.0_f64), |(lo, hi), (l, h)| (lo.min(l), hi.max(h)));
            let hi = if hi > lo { hi + (hi - lo) * AUTO_MARGIN } else { lo + 1.0 };
            (lo, hi)
        }
    };

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(position, record)| Row {
            position,
            name: record.name().to_string(),
        })
        .collect();

    let mut bars = Vec::new();
    let mut annotations = Vec::new();
    for (index, values) in series.iter().enumerate() {
        for (position, (&value, record)) in values.iter().zip(records).enumerate() {
            bars.push(Bar {
                series: index,
                position,
                length: value,
            });

            if index == 0 {
                let (placement, tone) = if value < threshold || record.is_error() {
                    (Placement::Outside, Tone::Dark)
                } else {
                    (Placement::Inside, Tone::Light)
                };
                let text = match record.error() {
                    Some(error) => error.to_string(),
                    None => spec.field_format.format(value),
                };
                annotations.push(Annotation {
                    series: index,
                    position,
                    x: value,
                    text,
                    placement,
                    tone,
                });
            } else if !spec.disable_annotate.contains(&index) {
                annotations.push(Annotation {
                    series: index,
                    position,
                    x: value,
                    text: spec.field_format.format(value),
                    placement: Placement::Inside,
                    tone: Tone::Dark,
                });
            }
        }
    }

    let side_axis = match &spec.side_field {
        Some(SideField::Field(key)) => Some(SideAxis {
            label: spec.side_label.clone(),
            ticks: records.iter().map(|r| side_value(r, key)).collect(),
        }),
        Some(SideField::Labels(labels)) => {
            if labels.len() != records.len() {
                return Err(ChartError::SideLabels {
                    expected: records.len(),
                    actual: labels.len(),
                });
            }
            Some(SideAxis {
                label: spec.side_label.clone(),
                ticks: labels.clone(),
            })
        }
        None => None,
    };

    debug!(
        rows = rows.len(),
        series = series.len(),
        threshold,
        "Laid out chart"
    );

    Ok(ChartLayout {
        title: spec.title.clone(),
        xlabel: spec.xlabel.clone(),
        x_range,
        x_ticks: nice_ticks(x_range.0, x_range.1, MAJOR_TICKS),
        bands: (0..records.len()).filter(|p| p % 2 == 1).collect(),
        rows,
        legend: spec.fields.iter().map(|s| s.label.clone()).collect(),
        bars,
        annotations,
        side_axis,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Series;
    use dms_benchmarks::{Field, NumberFormat};

    fn timed(name: &str, total: f64, generation: f64) -> BenchmarkRecord {
        BenchmarkRecord::success(name)
            .with_field(Field::TotalTime, total)
            .with_field(Field::GenerationTime, generation)
    }

    fn time_spec() -> ChartSpec {
        ChartSpec::new(vec![
            Series::field("Total Time", "total_time"),
            Series::field("Generation Time", "generation_time"),
        ])
    }

    #[test]
    fn test_positions_follow_input_order() {
        let records = vec![timed("C", 1.0, 0.5), timed("B", 2.0, 0.5), timed("A", 3.0, 0.5)];
        let chart = layout(&records, &time_spec()).unwrap();
        assert_eq!(chart.rows[0].name, "C");
        assert_eq!(chart.names_top_to_bottom(), ["A", "B", "C"]);
    }

    #[test]
    fn test_series_overlay_at_same_position() {
        let records = vec![timed("A", 3.0, 1.0)];
        let chart = layout(&records, &time_spec()).unwrap();
        assert_eq!(chart.bars.len(), 2);
        assert!(chart.bars.iter().all(|b| b.position == 0));
        assert_eq!(chart.bars[0].length, 3.0);
        assert_eq!(chart.bars[1].length, 1.0);
        assert_eq!(chart.legend, ["Total Time", "Generation Time"]);
    }

    #[test]
    fn test_primary_annotation_contrast() {
        let records = vec![timed("small", 1.0, 0.1), timed("big", 9.0, 0.1)];
        let chart = layout(&records, &time_spec()).unwrap();
        assert_eq!(chart.threshold, 5.0);

        let primary = chart.annotations_for(0);
        assert_eq!(primary[0].placement, Placement::Outside);
        assert_eq!(primary[0].tone, Tone::Dark);
        assert_eq!(primary[0].placement.anchor(), Anchor::Left);
        assert_eq!(primary[1].placement, Placement::Inside);
        assert_eq!(primary[1].tone, Tone::Light);
        assert_eq!(primary[1].placement.anchor(), Anchor::Right);
        assert_eq!(primary[1].text, "9.00");
    }

    #[test]
    fn test_threshold_from_xlim() {
        let records = vec![timed("a", 0.6, 0.0), timed("b", 0.8, 0.0)];
        let chart = layout(&records, &time_spec().with_xlim(0.0, 1.0)).unwrap();
        assert_eq!(chart.threshold, 0.75);
        assert_eq!(chart.x_range, (0.0, 1.0));
        let primary = chart.annotations_for(0);
        assert_eq!(primary[0].placement, Placement::Outside);
        assert_eq!(primary[1].placement, Placement::Inside);
    }

    #[test]
    fn test_error_label_replaces_value_and_goes_outside() {
        let records = vec![
            timed("ok", 1.0, 0.5),
            BenchmarkRecord::failed("broken", "Out of memory").with_field(Field::TotalTime, 50.0),
        ];
        let chart = layout(&records, &time_spec()).unwrap();
        let primary = chart.annotations_for(0);
        assert_eq!(primary[1].text, "Out of memory");
        assert_eq!(primary[1].placement, Placement::Outside);
        assert_eq!(primary[1].tone, Tone::Dark);
    }

    #[test]
    fn test_secondary_annotations_inside_dark() {
        let records = vec![timed("a", 10.0, 0.01), timed("b", 1.0, 0.9)];
        let chart = layout(&records, &time_spec()).unwrap();
        for annotation in chart.annotations_for(1) {
            assert_eq!(annotation.placement, Placement::Inside);
            assert_eq!(annotation.tone, Tone::Dark);
        }

        let chart = layout(&records, &time_spec().without_annotation(1)).unwrap();
        assert!(chart.annotations_for(1).is_empty());
        assert_eq!(chart.annotations_for(0).len(), 2);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let records = vec![BenchmarkRecord::success("empty"), timed("a", 2.0, 1.0)];
        let chart = layout(&records, &time_spec()).unwrap();
        assert_eq!(chart.bars[0].length, 0.0);
        assert_eq!(chart.annotations_for(0)[0].text, "0.00");
    }

    #[test]
    fn test_side_axis_field_and_labels() {
        let records = vec![
            timed("a", 1.0, 0.5).with_field(Field::States, 7.0),
            timed("b", 1.0, 0.5),
        ];
        let spec = time_spec().with_side(SideField::Field("states".into()), Some("States".into()));
        let side = layout(&records, &spec).unwrap().side_axis.unwrap();
        assert_eq!(side.ticks, ["7", "-"]);
        assert_eq!(side.label.as_deref(), Some("States"));

        let spec = time_spec().with_side(SideField::Labels(vec!["x".into(), "y".into()]), None);
        let side = layout(&records, &spec).unwrap().side_axis.unwrap();
        assert_eq!(side.ticks, ["x", "y"]);

        let spec = time_spec().with_side(SideField::Labels(vec!["x".into()]), None);
        assert!(matches!(
            layout(&records, &spec),
            Err(ChartError::SideLabels { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_zebra_bands_on_odd_rows() {
        let records: Vec<_> = (0..5).map(|i| timed(&i.to_string(), 1.0, 0.5)).collect();
        let chart = layout(&records, &time_spec()).unwrap();
        assert_eq!(chart.bands, [1, 3]);
    }

    #[test]
    fn test_custom_format_and_ticks() {
        let records = vec![timed("a", 20.0, 0.0)];
        let spec = time_spec().with_format("%.1f".parse::<NumberFormat>().unwrap());
        let chart = layout(&records, &spec).unwrap();
        assert_eq!(chart.annotations_for(0)[0].text, "20.0");
        assert!(chart.x_ticks.len() <= MAJOR_TICKS);
        assert!(chart.x_range.1 > 20.0);
    }

    #[test]
    fn test_value_series_length_checked() {
        let records = vec![timed("a", 1.0, 0.5)];
        let spec = ChartSpec::new(vec![Series::values("Cost", vec![1.0, 2.0])]);
        assert!(matches!(
            layout(&records, &spec),
            Err(ChartError::SeriesLength { series: 0, expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_rejects_empty_and_bad_limits() {
        assert!(matches!(layout(&[], &time_spec()), Err(ChartError::NoRecords)));
        let records = vec![timed("a", 1.0, 0.5)];
        assert!(matches!(
            layout(&records, &time_spec().with_xlim(1.0, 1.0)),
            Err(ChartError::InvalidLimits { .. })
        ));
    }
}
