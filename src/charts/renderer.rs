//! Static Chart Renderer
//! Writes the History trend chart and the Rank leaderboard as PNG files.
//!
//! Layout mirrors the interactive charts:
//! - Trend: one line per metric, year on the x axis, legend top-right
//! - Leaderboard: horizontal bars, rank 1 at the top, shaded by value

use crate::data::formatter::format_grouped;
use crate::error::{ExplorerError, Result};
use crate::views::{file_name_component, HistoryView, RankView};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::info;

/// Default PNG size in pixels.
pub const PNG_SIZE: (u32, u32) = (1200, 700);

const FONT: &str = "sans-serif";

const SERIES_COLORS: [RGBColor; 10] = [
    RGBColor(52, 152, 219),
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

/// `nj_library_<kind>_<part>_<part>.png`, with anything other than ASCII
/// letters, digits and `-` replaced by `_`.
pub fn chart_file_name(kind: &str, parts: &[&str]) -> String {
    let mut name = format!("nj_library_{kind}");
    for part in parts {
        name.push('_');
        name.push_str(&file_name_component(part));
    }
    name.push_str(".png");
    name
}

fn chart_error<E: std::fmt::Display>(err: E) -> ExplorerError {
    ExplorerError::Chart(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the trend lines of `view` to `path`.
    pub fn render_trend_png(view: &HistoryView, path: &Path, size: (u32, u32)) -> Result<()> {
        let points: Vec<(f64, f64)> = view
            .series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .collect();
        if points.is_empty() {
            return Err(ExplorerError::Chart(format!(
                "no numeric values to chart for {}",
                view.library
            )));
        }
        let (x_range, y_range) = Self::trend_bounds(&points);

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{} trend", view.library), (FONT, 28))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_range)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Value")
            .x_labels(view.years.len().max(2))
            .x_label_formatter(&|x: &f64| format!("{:.0}", x))
            .y_label_formatter(&|y: &f64| format_grouped(*y))
            .draw()
            .map_err(chart_error)?;

        for (i, series) in view.series.iter().enumerate() {
            let color = SERIES_COLORS[i % SERIES_COLORS.len()];
            chart
                .draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(chart_error)?
                .label(format!("{}: {}", series.label, series.metric))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
            chart
                .draw_series(
                    series
                        .points
                        .iter()
                        .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
                )
                .map_err(chart_error)?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
        info!(path = %path.display(), library = %view.library, "rendered trend chart");
        Ok(())
    }

    /// Render the leaderboard of `view` to `path`.
    pub fn render_rank_png(view: &RankView, path: &Path, size: (u32, u32)) -> Result<()> {
        if view.entries.is_empty() {
            return Err(ExplorerError::Chart(format!(
                "empty leaderboard for {} in {}",
                view.metric, view.year
            )));
        }
        let n = view.entries.len() as i32;
        let max = view.entries.iter().map(|e| e.value).fold(0.0, f64::max);

        // Segment 0 is the bottom bar, so the last-ranked library goes first.
        let names: Vec<String> = view.entries.iter().rev().map(|e| e.library.clone()).collect();

        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Top {} libraries by {} ({})", n, view.metric, view.year),
                (FONT, 26),
            )
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(220)
            .build_cartesian_2d(0.0..Self::padded_max(max), (0..n).into_segmented())
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(names.len())
            .x_desc(view.metric.as_str())
            .x_label_formatter(&|x: &f64| format_grouped(*x))
            .y_label_formatter(&|v: &SegmentValue<i32>| match v {
                SegmentValue::CenterOf(i) => names.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(view.entries.iter().rev().enumerate().map(|(i, entry)| {
                let i = i as i32;
                let shade = Self::bar_shade(entry.value, max);
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(i)),
                        (entry.value, SegmentValue::Exact(i + 1)),
                    ],
                    shade.filled(),
                );
                bar.set_margin(3, 3, 0, 0);
                bar
            }))
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
        info!(path = %path.display(), metric = %view.metric, year = %view.year, "rendered leaderboard chart");
        Ok(())
    }

    /// Axis ranges for the trend chart: years padded by half a year, values
    /// from zero (or the minimum, if negative) to 10% above the maximum.
    fn trend_bounds(points: &[(f64, f64)]) -> (Range<f64>, Range<f64>) {
        let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut y_min, mut y_max) = (0.0f64, f64::NEG_INFINITY);
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        ((x_min - 0.5)..(x_max + 0.5), y_min..Self::padded_max(y_max))
    }

    fn padded_max(max: f64) -> f64 {
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn bar_shade(value: f64, max: f64) -> RGBColor {
        let t = if max > 0.0 {
            (value / max).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        RGBColor(mix(198, 8), mix(219, 48), mix(239, 107))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::MetricSummary;

    #[test]
    fn test_chart_file_name_is_path_safe() {
        assert_eq!(
            chart_file_name("trend", &["Trenton", "2023"]),
            "nj_library_trend_Trenton_2023.png"
        );
        assert_eq!(
            chart_file_name("rank", &["Total Circulation/Capita", "2021"]),
            "nj_library_rank_Total_Circulation_Capita_2021.png"
        );
    }

    #[test]
    fn test_trend_bounds_pad_years_and_values() {
        let (x, y) = StaticChartRenderer::trend_bounds(&[(2019.0, 100.0), (2023.0, 300.0)]);
        assert_eq!(x, 2018.5..2023.5);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 330.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_bounds_single_zero_point() {
        let (x, y) = StaticChartRenderer::trend_bounds(&[(2023.0, 0.0)]);
        assert_eq!(x, 2022.5..2023.5);
        assert_eq!(y, 0.0..1.0);
    }

    #[test]
    fn test_bar_shade_darkens_with_value() {
        assert_eq!(StaticChartRenderer::bar_shade(0.0, 10.0), RGBColor(198, 219, 239));
        assert_eq!(StaticChartRenderer::bar_shade(10.0, 10.0), RGBColor(8, 48, 107));
    }

    #[test]
    fn test_empty_inputs_are_chart_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let history = HistoryView {
            library: "Trenton".to_string(),
            years: vec!["2023".to_string()],
            rows: Vec::new(),
            series: Vec::new(),
        };
        let err = StaticChartRenderer::render_trend_png(&history, &dir.path().join("t.png"), PNG_SIZE)
            .unwrap_err();
        assert!(matches!(err, ExplorerError::Chart(_)));

        let rank = RankView {
            year: "2023".to_string(),
            metric: "Circulation".to_string(),
            entries: Vec::new(),
            summary: MetricSummary::default(),
        };
        let err = StaticChartRenderer::render_rank_png(&rank, &dir.path().join("r.png"), PNG_SIZE)
            .unwrap_err();
        assert!(matches!(err, ExplorerError::Chart(_)));
    }
}
