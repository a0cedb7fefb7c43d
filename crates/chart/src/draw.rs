// Copyright 2025 DMS Restoration Contributors
// SPDX-License-Identifier: Apache-2.0

//! Drawing a [`ChartLayout`] with plotters.

use crate::layout::{Anchor, ChartLayout, Tone};
use crate::{ChartError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};
use std::path::Path;
use tracing::info;

const TITLE_FONT_SIZE: f64 = 22.0;
const AXIS_LABEL_FONT_SIZE: f64 = 16.0;
const TICK_LABEL_FONT_SIZE: f64 = 13.0;
const DATA_LABEL_FONT_SIZE: f64 = 12.0;

/// Bar thickness as a fraction of the row pitch.
const BAR_HEIGHT: f64 = 0.75;

/// Pixel gap between a bar end and its annotation.
const LABEL_OFFSET: i32 = 5;

/// Right margin reserved for the side axis labels and title.
const SIDE_AREA_WIDTH: u32 = 110;

/// Pixel gap between the plot edge and axis labels.
const AXIS_LABEL_GAP: i32 = 8;

const PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

/// Figure options that do not depend on the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Figure width in pixels.
    pub width: u32,
    /// Figure height in pixels.
    pub height: u32,
    /// Font family for all text.
    pub font_family: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            font_family: "sans-serif".to_string(),
        }
    }
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> ChartError {
    ChartError::Draw(err.to_string())
}

fn series_color(series: usize) -> RGBColor {
    PALETTE[series % PALETTE.len()]
}

/// Value axis tick text, without float noise such as `0.30000000000000004`.
fn tick_label(x: f64) -> String {
    let text = format!("{x:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Draw `layout` onto any plotters drawing area.
///
/// plotters draws the axis lines only. Category names, value ticks and side
/// labels are placed by hand at the layout's positions, so value labels sit
/// on the gridlines and the right margin holds nothing but the side axis.
pub fn draw_on<DB>(root: &DrawingArea<DB, Shift>, layout: &ChartLayout, options: &RenderOptions) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let family = FontFamily::Name(options.font_family.as_str());
    let font = |size: f64, style: FontStyle| FontDesc::new(family, size, style);

    root.fill(&WHITE).map_err(draw_err)?;

    let rows = layout.rows.len();
    let (x_lo, x_hi) = layout.x_range;
    let y_top = rows as f64 - 0.5;
    let longest = layout
        .rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0) as u32;

    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 20 + longest * 8)
        .set_label_area_size(LabelAreaPosition::Bottom, 50);
    if layout.side_axis.is_some() {
        builder.margin_right(SIDE_AREA_WIDTH);
    }
    if let Some(title) = &layout.title {
        builder.caption(title, font(TITLE_FONT_SIZE, FontStyle::Bold));
    }
    let mut chart = builder
        .build_cartesian_2d(x_lo..x_hi, -0.5..y_top)
        .map_err(draw_err)?;

    // Zebra bands behind everything else.
    chart
        .draw_series(layout.bands.iter().map(|&p| {
            let y = p as f64;
            Rectangle::new([(x_lo, y - 0.5), (x_hi, y + 0.5)], BLACK.mix(0.04).filled())
        }))
        .map_err(draw_err)?;

    // Axis lines only; tick and category labels are placed below.
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(0)
            .y_labels(0)
            .axis_desc_style(font(AXIS_LABEL_FONT_SIZE, FontStyle::Normal));
        if let Some(xlabel) = &layout.xlabel {
            mesh.x_desc(xlabel.as_str());
        }
        mesh.draw().map_err(draw_err)?;
    }

    let label_font = font(TICK_LABEL_FONT_SIZE, FontStyle::Normal);
    let name_style = label_font
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for row in &layout.rows {
        let (px, py) = chart.backend_coord(&(x_lo, row.position as f64));
        root.draw_text(&row.name, &name_style, (px - AXIS_LABEL_GAP, py))
            .map_err(draw_err)?;
    }
    let tick_style = label_font
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for &tick in &layout.x_ticks {
        chart
            .draw_series(DashedLineSeries::new(
                vec![(tick, -0.5), (tick, y_top)],
                6,
                4,
                BLACK.mix(0.25).stroke_width(1),
            ))
            .map_err(draw_err)?;
        let (px, py) = chart.backend_coord(&(tick, -0.5));
        root.draw_text(&tick_label(tick), &tick_style, (px, py + AXIS_LABEL_GAP))
            .map_err(draw_err)?;
    }

    for (series, label) in layout.legend.iter().enumerate() {
        let color = series_color(series);
        let half = BAR_HEIGHT / 2.0;
        chart
            .draw_series(
                layout
                    .bars
                    .iter()
                    .filter(|b| b.series == series)
                    .map(|b| {
                        let y = b.position as f64;
                        Rectangle::new([(0.0, y - half), (b.length, y + half)], color.filled())
                    }),
            )
            .map_err(draw_err)?
            .label(label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.filled()));
    }

    for annotation in &layout.annotations {
        let (dx, hpos) = match annotation.placement.anchor() {
            Anchor::Left => (LABEL_OFFSET, HPos::Left),
            Anchor::Right => (-LABEL_OFFSET, HPos::Right),
        };
        let color = match annotation.tone {
            Tone::Dark => BLACK,
            Tone::Light => WHITE,
        };
        let style = font(DATA_LABEL_FONT_SIZE, FontStyle::Bold)
            .color(&color)
            .pos(Pos::new(hpos, VPos::Center));
        let text = annotation.text.clone();
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((annotation.x, annotation.position as f64))
                    + Text::new(text, (dx, 0), style),
            ))
            .map_err(draw_err)?;
    }

    if !layout.legend.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK.mix(0.3))
            .label_font(font(TICK_LABEL_FONT_SIZE, FontStyle::Normal))
            .draw()
            .map_err(draw_err)?;
    }

    if let Some(side) = &layout.side_axis {
        let side_style = label_font
            .color(&BLACK)
            .pos(Pos::new(HPos::Left, VPos::Center));
        for (position, label) in side.ticks.iter().enumerate() {
            let (px, py) = chart.backend_coord(&(x_hi, position as f64));
            root.draw_text(label, &side_style, (px + AXIS_LABEL_GAP, py))
                .map_err(draw_err)?;
        }
        if let Some(label) = &side.label {
            let (px, top) = chart.backend_coord(&(x_hi, y_top));
            let (_, bottom) = chart.backend_coord(&(x_hi, -0.5));
            let desc_style = font(AXIS_LABEL_FONT_SIZE, FontStyle::Normal)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center))
                .transform(FontTransform::Rotate90);
            let x = px + SIDE_AREA_WIDTH as i32 - AXIS_LABEL_GAP * 2;
            root.draw_text(label, &desc_style, (x, (top + bottom) / 2))
                .map_err(draw_err)?;
        }
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Draw `layout` into an SVG file.
pub fn draw_svg(layout: &ChartLayout, path: &Path, options: &RenderOptions) -> Result<()> {
    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    draw_on(&root, layout, options)?;
    info!(path = %path.display(), "Generated chart");
    Ok(())
}

/// Draw `layout` into an SVG document held in memory.
pub fn draw_svg_string(layout: &ChartLayout, options: &RenderOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (options.width, options.height)).into_drawing_area();
        draw_on(&root, layout, options)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout;
    use crate::spec::{ChartSpec, Series, SideField};
    use dms_benchmarks::{BenchmarkRecord, Field};

    fn sample_layout() -> ChartLayout {
        let records = vec![
            BenchmarkRecord::failed("broken", "Timed out"),
            BenchmarkRecord::success("S + P")
                .with_field(Field::TotalTime, 4.25)
                .with_field(Field::GenerationTime, 1.0)
                .with_field(Field::States, 120.0),
        ];
        let spec = ChartSpec::new(vec![
            Series::field("Total Time", "total_time"),
            Series::field("Generation Time", "generation_time"),
        ])
        .with_title("Benchmark Results")
        .with_xlabel("Time (seconds)")
        .with_side(
            SideField::Field("states".to_string()),
            Some("Number of States".to_string()),
        );
        layout(&records, &spec).unwrap()
    }

    struct SvgText {
        x: i32,
        y: i32,
        content: String,
    }

    fn attr(tag: &str, name: &str) -> i32 {
        let key = format!(" {name}=\"");
        let start = format!(" {tag}").find(&key).unwrap() + key.len() - 1;
        tag[start..].split('"').next().unwrap().parse().unwrap()
    }

    fn svg_texts(svg: &str) -> Vec<SvgText> {
        svg.split("<text")
            .skip(1)
            .map(|chunk| {
                let (tag, rest) = chunk.split_once('>').unwrap();
                let content = rest.split("</text>").next().unwrap().trim().to_string();
                SvgText {
                    x: attr(tag, "x"),
                    y: attr(tag, "y"),
                    content,
                }
            })
            .collect()
    }

    fn states_layout(count: usize) -> ChartLayout {
        let records: Vec<_> = (0..count)
            .map(|i| {
                BenchmarkRecord::success(format!("row{i}x"))
                    .with_field(Field::TotalTime, (i + 1) as f64)
                    .with_field(Field::States, (1000 + i) as f64)
            })
            .collect();
        let spec = ChartSpec::new(vec![Series::field("Total Time", "total_time")]).with_side(
            SideField::Field("states".to_string()),
            Some("Number of States".to_string()),
        );
        layout(&records, &spec).unwrap()
    }

    #[test]
    fn test_right_margin_holds_only_side_labels() {
        let options = RenderOptions::default();
        for count in [1, 3, 12] {
            let chart = states_layout(count);
            let svg = draw_svg_string(&chart, &options).unwrap();
            let texts = svg_texts(&svg);
            let plot_right = (options.width - SIDE_AREA_WIDTH) as i32;

            let mut right: Vec<&str> = texts
                .iter()
                .filter(|t| t.x > plot_right)
                .map(|t| t.content.as_str())
                .collect();
            right.sort_unstable();
            let mut expected: Vec<String> = (0..count).map(|i| (1000 + i).to_string()).collect();
            expected.push("Number of States".to_string());
            expected.sort_unstable();
            assert_eq!(right, expected, "{count} rows");

            for i in 0..count {
                let name = format!("row{i}x");
                let named: Vec<&SvgText> = texts.iter().filter(|t| t.content == name).collect();
                assert_eq!(named.len(), 1, "{name}");
                assert!(named[0].x < plot_right);
                let tick = texts
                    .iter()
                    .find(|t| t.content == (1000 + i).to_string())
                    .unwrap();
                assert!((tick.y - named[0].y).abs() <= 1, "{name} misaligned");
            }
        }
    }

    #[test]
    fn test_value_labels_sit_on_gridlines() {
        let options = RenderOptions::default();
        let chart = states_layout(3);
        let svg = draw_svg_string(&chart, &options).unwrap();
        let plot_bottom = options.height as i32 - 20 - 50;

        let texts = svg_texts(&svg);
        let mut bottom: Vec<&SvgText> = texts.iter().filter(|t| t.y >= plot_bottom).collect();
        bottom.sort_by_key(|t| t.x);
        let labels: Vec<&str> = bottom.iter().map(|t| t.content.as_str()).collect();
        let expected: Vec<String> = chart.x_ticks.iter().map(|&x| tick_label(x)).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_tick_label_drops_float_noise() {
        assert_eq!(tick_label(0.1 + 0.2), "0.3");
        assert_eq!(tick_label(2.5), "2.5");
        assert_eq!(tick_label(10.0), "10");
        assert_eq!(tick_label(-0.0), "0");
    }

    #[test]
    fn test_draw_svg_string_contains_labels() {
        let svg = draw_svg_string(&sample_layout(), &RenderOptions::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Benchmark Results"));
        assert!(svg.contains("4.25"));
        assert!(svg.contains("Timed out"));
    }

    #[test]
    fn test_draw_svg_file() {
        let path = std::env::temp_dir().join("dms-chart-draw-test.svg");
        draw_svg(&sample_layout(), &path, &RenderOptions::default()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Number of States"));
        std::fs::remove_file(&path).ok();
    }
}
