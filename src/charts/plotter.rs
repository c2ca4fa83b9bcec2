//! Chart Plotter Module
//! Interactive trend and bar charts drawn with egui_plot.

use crate::data::formatter::format_grouped;
use crate::views::{CompareView, HistoryView, RankView};
use egui::Color32;
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

/// Series colors, cycled by series index.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Leaderboard bar shades, lightest to darkest.
const BLUE_LIGHT: (u8, u8, u8) = (198, 219, 239);
const BLUE_DARK: (u8, u8, u8) = (8, 48, 107);

const CHART_HEIGHT: f32 = 400.0;

/// Draws the interactive charts used by the History, Compare and Rank tabs.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Blue shade for `value` within `0..=max`.
    pub fn value_shade(value: f64, max: f64) -> Color32 {
        let t = if max > 0.0 {
            (value / max).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Color32::from_rgb(
            mix(BLUE_LIGHT.0, BLUE_DARK.0),
            mix(BLUE_LIGHT.1, BLUE_DARK.1),
            mix(BLUE_LIGHT.2, BLUE_DARK.2),
        )
    }

    /// Axis label for a category index, blank between categories.
    fn category_label(labels: &[String], value: f64) -> String {
        let idx = value.round();
        if idx < 0.0 || (value - idx).abs() > 1e-6 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }

    /// Line chart with point markers, one line per metric.
    pub fn draw_trend_chart(ui: &mut egui::Ui, view: &HistoryView) {
        Plot::new(format!("trend_{}", view.library))
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("Value")
            .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
            .y_axis_formatter(|mark, _range| format_grouped(mark.value))
            .show(ui, |plot_ui| {
                for (i, series) in view.series.iter().enumerate() {
                    let color = Self::series_color(i);
                    let points: Vec<[f64; 2]> =
                        series.points.iter().map(|&(x, y)| [x, y]).collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from(points.clone()))
                            .color(color)
                            .width(2.0)
                            .name(&series.label),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from(points))
                            .radius(4.0)
                            .color(color)
                            .name(&series.label),
                    );
                }
            });
    }

    /// Vertical bars, one per library, in the view's (descending) order.
    pub fn draw_compare_chart(ui: &mut egui::Ui, view: &CompareView) {
        let labels: Vec<String> = view.rows.iter().map(|r| r.library.clone()).collect();
        let bars: Vec<Bar> = view
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Bar::new(i as f64, row.value)
                    .name(&row.library)
                    .fill(Self::series_color(i))
                    .width(0.6)
            })
            .collect();

        Plot::new(format!("compare_{}_{}", view.metric, view.year))
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label("Library")
            .y_axis_label(view.metric.clone())
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .y_axis_formatter(|mark, _range| format_grouped(mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&view.metric));
            });
    }

    /// Horizontal leaderboard bars, rank 1 at the top, shaded by value.
    pub fn draw_rank_chart(ui: &mut egui::Ui, view: &RankView) {
        let n = view.entries.len();
        let max = view.entries.first().map(|e| e.value).unwrap_or(0.0);

        // Rank 1 gets the highest y position.
        let labels: Vec<String> = view
            .entries
            .iter()
            .rev()
            .map(|e| e.library.clone())
            .collect();
        let bars: Vec<Bar> = view
            .entries
            .iter()
            .enumerate()
            .map(|(rank, entry)| {
                Bar::new((n - 1 - rank) as f64, entry.value)
                    .name(&entry.library)
                    .fill(Self::value_shade(entry.value, max))
                    .width(0.7)
            })
            .collect();

        let height = (n as f32 * 30.0).max(150.0);
        Plot::new(format!("rank_{}_{}", view.metric, view.year))
            .height(height)
            .allow_scroll(false)
            .x_axis_label(view.metric.clone())
            .x_axis_formatter(|mark, _range| format_grouped(mark.value))
            .y_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .y_axis_min_width(160.0)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).horizontal().name(&view.metric));
            });
    }

    /// Legend mapping short series labels back to metric names.
    pub fn draw_trend_legend(ui: &mut egui::Ui, view: &HistoryView) {
        for (i, series) in view.series.iter().enumerate() {
            ui.label(
                egui::RichText::new(format!("{}: {}", series.label, series.metric))
                    .strong()
                    .color(Self::series_color(i)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(10));
        assert_ne!(ChartPlotter::series_color(0), ChartPlotter::series_color(1));
    }

    #[test]
    fn test_value_shade_spans_scale() {
        assert_eq!(
            ChartPlotter::value_shade(0.0, 100.0),
            Color32::from_rgb(BLUE_LIGHT.0, BLUE_LIGHT.1, BLUE_LIGHT.2)
        );
        assert_eq!(
            ChartPlotter::value_shade(100.0, 100.0),
            Color32::from_rgb(BLUE_DARK.0, BLUE_DARK.1, BLUE_DARK.2)
        );
    }

    #[test]
    fn test_category_labels_only_on_whole_positions() {
        let labels = vec!["Camden".to_string(), "Trenton".to_string()];
        assert_eq!(ChartPlotter::category_label(&labels, 1.0), "Trenton");
        assert_eq!(ChartPlotter::category_label(&labels, 0.5), "");
        assert_eq!(ChartPlotter::category_label(&labels, -1.0), "");
        assert_eq!(ChartPlotter::category_label(&labels, 5.0), "");
    }
}
