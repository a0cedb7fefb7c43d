//! Comparative horizontal-bar charts of benchmark records.
//!
//! Charting happens in two steps. [`layout`] turns records and a
//! [`ChartSpec`] into a [`ChartLayout`]: bars, annotation placement and
//! contrast, category and side axis labels, row bands. [`draw_svg`] then hands
//! the layout to plotters.
//!
//! ```no_run
//! use dms_benchmarks::BenchmarkRecord;
//! use dms_chart::{draw_svg, layout, ChartSpec, RenderOptions, Series};
//!
//! let records = vec![BenchmarkRecord::success("A").with("total_time", 1.5)];
//! let spec = ChartSpec::new(vec![Series::field("Total Time", "total_time")]);
//! let chart = layout(&records, &spec)?;
//! draw_svg(&chart, "time.svg".as_ref(), &RenderOptions::default())?;
//! # Ok::<(), dms_chart::ChartError>(())
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod draw;
pub mod layout;
pub mod spec;
pub mod ticks;

pub use draw::{draw_svg, draw_svg_string, RenderOptions};
pub use layout::{layout, Anchor, Annotation, Bar, ChartLayout, Placement, Row, SideAxis, Tone};
pub use spec::{ChartSpec, Series, SeriesSource, SideField};

use thiserror::Error;

/// Errors that can occur while laying out or drawing a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    /// There is nothing to plot.
    #[error("No records to plot")]
    NoRecords,

    /// The chart has no value series.
    #[error("Chart has no value series")]
    NoSeries,

    /// A precomputed series does not have one value per record.
    #[error("Series {series} has {actual} values for {expected} records")]
    SeriesLength {
        series: usize,
        expected: usize,
        actual: usize,
    },

    /// Literal side labels do not have one label per record.
    #[error("Side axis has {actual} labels for {expected} records")]
    SideLabels { expected: usize, actual: usize },

    /// Value axis limits are empty or inverted.
    #[error("Invalid axis limits: {min} to {max}")]
    InvalidLimits { min: f64, max: f64 },

    /// The drawing backend failed.
    #[error("Drawing failed: {0}")]
    Draw(String),
}

/// Result type for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;
