//! Tab pages: selection state, cached view results and rendering.
//!
//! Each page recomputes its view only when a selection changes.

use super::widgets::{
    data_grid, ensure_member, heading, multi_select, optional_combo, value_combo, view_state,
    WARN_COLOR,
};
use crate::charts::ChartPlotter;
use crate::data::formatter::format_grouped;
use crate::data::UnifiedTable;
use crate::views::{
    compare, counties, discover, history, libraries_in_county, metric_columns, rank,
    rankable_metrics, snapshot, CompareView, DiscoveryView, HistoryView, RankView, SnapshotView,
    ViewResult,
};
use egui::RichText;

/// Discovery rows drawn on screen; exports always contain every row.
const DISPLAY_ROW_LIMIT: usize = 500;

const LIBRARY_PLACEHOLDER: &str = "Select A Library";
const METRIC_PLACEHOLDER: &str = "Select A Data Point";
const ALL_COUNTIES: &str = "All Counties";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Snapshot,
    History,
    Compare,
    Rank,
    Discovery,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Snapshot,
        Tab::History,
        Tab::Compare,
        Tab::Rank,
        Tab::Discovery,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Snapshot => "Snapshot",
            Tab::History => "History",
            Tab::Compare => "Compare",
            Tab::Rank => "Rank",
            Tab::Discovery => "Data Discovery",
        }
    }
}

/// Requests a page hands back to the app; they touch the filesystem.
#[derive(Debug, Clone)]
pub enum TabAction {
    None,
    ExportCsv(DiscoveryView),
    SaveCsvAs(DiscoveryView),
    SaveTrendPng(HistoryView),
    SaveRankPng(RankView),
}

/// Selector options that only change when the table is reloaded.
#[derive(Debug, Clone, Default)]
pub struct Choices {
    pub libraries: Vec<String>,
    pub years: Vec<String>,
    pub counties: Vec<String>,
    pub history_metrics: Vec<String>,
    pub compare_metrics: Vec<String>,
    pub has_county: bool,
}

impl Choices {
    pub fn from_table(table: &UnifiedTable) -> Self {
        Self {
            libraries: table.libraries(),
            years: table.years(),
            counties: counties(table),
            history_metrics: metric_columns(table, true),
            compare_metrics: metric_columns(table, false),
            has_county: table.county_column().is_some(),
        }
    }
}

#[derive(Default)]
pub struct SnapshotPage {
    library: Option<String>,
    year: String,
    result: Option<ViewResult<SnapshotView>>,
}

impl SnapshotPage {
    pub fn show(&mut self, ui: &mut egui::Ui, table: &UnifiedTable, choices: &Choices) {
        heading(ui, "📊 Library Snapshot");

        let mut changed = ensure_member(&mut self.year, &choices.years);
        ui.horizontal_wrapped(|ui| {
            changed |= optional_combo(
                ui,
                "snap_lib",
                "Select Municipality",
                LIBRARY_PLACEHOLDER,
                &mut self.library,
                &choices.libraries,
            );
            changed |= value_combo(ui, "snap_year", "Select Year", &mut self.year, &choices.years);
        });
        ui.separator();

        if changed || self.result.is_none() {
            self.result = Some(snapshot(table, self.library.as_deref(), &self.year));
        }
        let Some(view) = self.result.as_ref().and_then(|r| view_state(ui, r)) else {
            return;
        };

        ui.label(RichText::new(format!("📊 {}", view.title())).size(18.0).strong());
        ui.add_space(5.0);
        egui::Grid::new("snapshot_grid")
            .striped(true)
            .num_columns(2)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Field").strong());
                ui.label(RichText::new("Value").strong());
                ui.end_row();
                for (field, value) in &view.rows {
                    ui.label(field);
                    ui.label(value);
                    ui.end_row();
                }
            });
    }
}

#[derive(Default)]
pub struct HistoryPage {
    library: Option<String>,
    end_year: String,
    metrics: Vec<String>,
    library_years: Vec<String>,
    result: Option<ViewResult<HistoryView>>,
}

impl HistoryPage {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        table: &UnifiedTable,
        choices: &Choices,
        window: usize,
    ) -> TabAction {
        let mut action = TabAction::None;
        heading(ui, "📈 Historical Trend Analysis");

        let mut changed = false;
        ui.horizontal_wrapped(|ui| {
            if optional_combo(
                ui,
                "hist_lib",
                "Select Library",
                LIBRARY_PLACEHOLDER,
                &mut self.library,
                &choices.libraries,
            ) {
                self.library_years = match &self.library {
                    Some(library) => table.years_for_library(library),
                    None => Vec::new(),
                };
                changed = true;
            }
            let years = if self.library.is_some() {
                &self.library_years
            } else {
                &choices.years
            };
            changed |= ensure_member(&mut self.end_year, years);
            changed |= value_combo(ui, "hist_year", "End Year", &mut self.end_year, years);
        });
        changed |= multi_select(
            ui,
            "hist_metrics",
            "Select Metrics",
            &mut self.metrics,
            &choices.history_metrics,
        );
        ui.separator();

        if changed || self.result.is_none() {
            self.result = Some(history(
                table,
                self.library.as_deref(),
                &self.end_year,
                &self.metrics,
                window,
            ));
        }
        let Some(view) = self.result.as_ref().and_then(|r| view_state(ui, r)) else {
            return action;
        };

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!("{} ({} years)", view.library, view.years.len()))
                    .size(18.0)
                    .strong(),
            );
            if ui.button("🖼 Save PNG").clicked() {
                action = TabAction::SaveTrendPng(view.clone());
            }
        });
        ChartPlotter::draw_trend_chart(ui, view);
        ChartPlotter::draw_trend_legend(ui, view);

        ui.separator();
        let mut headers = vec!["Metric".to_string()];
        headers.extend(view.years.iter().cloned());
        let rows: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|(metric, values)| {
                let mut row = vec![metric.clone()];
                row.extend(values.iter().cloned());
                row
            })
            .collect();
        data_grid(ui, "history_grid", &headers, &rows);
        action
    }
}

#[derive(Default)]
pub struct ComparePage {
    county: Option<String>,
    libraries: Vec<String>,
    year: String,
    metric: Option<String>,
    county_libraries: Option<Vec<String>>,
    result: Option<ViewResult<CompareView>>,
}

impl ComparePage {
    pub fn show(&mut self, ui: &mut egui::Ui, table: &UnifiedTable, choices: &Choices) {
        heading(ui, "📊 Library Benchmarking");

        let mut changed = ensure_member(&mut self.year, &choices.years);
        ui.horizontal_wrapped(|ui| {
            if choices.has_county {
                if optional_combo(
                    ui,
                    "comp_county",
                    "Filter by County",
                    ALL_COUNTIES,
                    &mut self.county,
                    &choices.counties,
                ) {
                    self.county_libraries = None;
                    changed = true;
                }
            } else {
                ui.label(RichText::new("County Name column not detected.").color(WARN_COLOR));
            }
            changed |= value_combo(ui, "comp_year", "Select Year", &mut self.year, &choices.years);
        });

        let options = self
            .county_libraries
            .get_or_insert_with(|| libraries_in_county(table, self.county.as_deref()));
        let before = self.libraries.len();
        self.libraries.retain(|l| options.contains(l));
        changed |= self.libraries.len() != before;

        ui.horizontal_wrapped(|ui| {
            changed |= multi_select(ui, "comp_libs", "Select Libraries", &mut self.libraries, options);
            changed |= optional_combo(
                ui,
                "comp_metric",
                "Select Data Point",
                METRIC_PLACEHOLDER,
                &mut self.metric,
                &choices.compare_metrics,
            );
        });
        ui.separator();

        if changed || self.result.is_none() {
            self.result = Some(compare(
                table,
                &self.libraries,
                &self.year,
                self.metric.as_deref(),
            ));
        }
        let Some(view) = self.result.as_ref().and_then(|r| view_state(ui, r)) else {
            return;
        };

        ui.label(
            RichText::new(format!("📈 {} Comparison ({})", view.metric, view.year))
                .size(18.0)
                .strong(),
        );
        ChartPlotter::draw_compare_chart(ui, view);

        ui.separator();
        ui.label(RichText::new("📋 Comparison Details").size(16.0).strong());
        let headers = vec!["Library".to_string(), view.metric.clone()];
        let rows: Vec<Vec<String>> = view
            .rows
            .iter()
            .map(|r| vec![r.library.clone(), r.display.clone()])
            .collect();
        data_grid(ui, "compare_grid", &headers, &rows);
    }
}

#[derive(Default)]
pub struct RankPage {
    year: String,
    metric: Option<String>,
    metrics_year: Option<String>,
    metrics: Vec<String>,
    result: Option<ViewResult<RankView>>,
}

impl RankPage {
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        table: &UnifiedTable,
        choices: &Choices,
        limit: usize,
    ) -> TabAction {
        let mut action = TabAction::None;
        heading(ui, "🏆 Statewide Ranking");
        ui.label("See rankings for public libraries in the state in specific categories.");

        let mut changed = ensure_member(&mut self.year, &choices.years);
        ui.horizontal_wrapped(|ui| {
            changed |= value_combo(ui, "rank_year", "Select Year", &mut self.year, &choices.years);

            if self.metrics_year.as_deref() != Some(self.year.as_str()) {
                self.metrics = rankable_metrics(table, &self.year);
                self.metrics_year = Some(self.year.clone());
                if let Some(metric) = &self.metric {
                    if !self.metrics.contains(metric) {
                        self.metric = None;
                    }
                }
                changed = true;
            }
            changed |= optional_combo(
                ui,
                "rank_metric",
                "Select Metric",
                METRIC_PLACEHOLDER,
                &mut self.metric,
                &self.metrics,
            );
        });
        ui.separator();

        if changed || self.result.is_none() {
            self.result = Some(rank(table, &self.year, self.metric.as_deref(), limit));
        }
        let Some(view) = self.result.as_ref().and_then(|r| view_state(ui, r)) else {
            return action;
        };

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(format!(
                    "Top {} Libraries: {} ({})",
                    view.entries.len(),
                    view.metric,
                    view.year
                ))
                .size(18.0)
                .strong(),
            );
            if ui.button("🖼 Save PNG").clicked() {
                action = TabAction::SaveRankPng(view.clone());
            }
        });

        let summary = &view.summary;
        ui.label(format!(
            "Reporting libraries: {}   Mean: {}   Median: {}   95th percentile: {}",
            summary.count,
            format_grouped(summary.mean),
            format_grouped(summary.median),
            format_grouped(summary.p95),
        ));

        ChartPlotter::draw_rank_chart(ui, view);

        ui.separator();
        let headers = vec![
            "Rank".to_string(),
            "Library".to_string(),
            view.metric.clone(),
        ];
        let rows: Vec<Vec<String>> = view
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| vec![(i + 1).to_string(), e.library.clone(), e.display.clone()])
            .collect();
        data_grid(ui, "rank_grid", &headers, &rows);
        action
    }
}

#[derive(Default)]
pub struct DiscoveryPage {
    search: String,
    result: Option<DiscoveryView>,
}

impl DiscoveryPage {
    pub fn show(&mut self, ui: &mut egui::Ui, table: &UnifiedTable) -> TabAction {
        let mut action = TabAction::None;
        heading(ui, "🔍 Data Discovery & Export");
        ui.label("Search the entire dataset and download your filtered results.");

        let response = ui.add(
            egui::TextEdit::singleline(&mut self.search)
                .hint_text("e.g. 'Ocean', 'Public'...")
                .desired_width(360.0),
        );
        if response.changed() || self.result.is_none() {
            self.result = Some(discover(table, &self.search));
        }
        let Some(view) = &self.result else {
            return action;
        };

        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Found {} records", view.len())).strong());
            if ui.button("💾 Export CSV").clicked() {
                action = TabAction::ExportCsv(view.clone());
            }
            if ui.button("Save As...").clicked() {
                action = TabAction::SaveCsvAs(view.clone());
            }
        });
        ui.separator();

        let shown = view.rows.len().min(DISPLAY_ROW_LIMIT);
        if shown < view.rows.len() {
            ui.label(
                RichText::new(format!(
                    "Showing the first {shown} rows; the export contains all {}.",
                    view.len()
                ))
                .color(WARN_COLOR),
            );
        }
        data_grid(ui, "discovery_grid", &view.columns, &view.rows[..shown]);
        action
    }
}

/// All page state, rebuilt when a new table is loaded.
#[derive(Default)]
pub struct TabPages {
    pub snapshot: SnapshotPage,
    pub history: HistoryPage,
    pub compare: ComparePage,
    pub rank: RankPage,
    pub discovery: DiscoveryPage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::fixtures::sample_table;

    #[test]
    fn test_choices_from_table() {
        let table = sample_table();
        let choices = Choices::from_table(&table);
        assert_eq!(
            choices.libraries,
            vec!["Camden", "Newark", "Princeton", "Trenton"]
        );
        assert_eq!(choices.years, vec!["2023", "2021", "2019", "2018"]);
        assert!(choices.has_county);
        assert!(choices.history_metrics.contains(&"County".to_string()));
        assert!(!choices.compare_metrics.contains(&"County".to_string()));
    }

    #[test]
    fn test_tab_labels() {
        let labels: Vec<&str> = Tab::ALL.iter().map(|t| t.label()).collect();
        assert_eq!(
            labels,
            vec!["Snapshot", "History", "Compare", "Rank", "Data Discovery"]
        );
    }
}
