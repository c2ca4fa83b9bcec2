//! Shared selector and table widgets used by every tab.

use crate::views::ViewResult;
use egui::{Color32, ComboBox, RichText, ScrollArea};

const LABEL_WIDTH: f32 = 120.0;
const COMBO_WIDTH: f32 = 240.0;

pub const INFO_COLOR: Color32 = Color32::from_rgb(100, 149, 237);
pub const WARN_COLOR: Color32 = Color32::from_rgb(230, 160, 40);
pub const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
pub const OK_COLOR: Color32 = Color32::from_rgb(40, 167, 69);

/// Section heading in the style of the tab titles.
pub fn heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(5.0);
    ui.label(RichText::new(text).size(20.0).strong());
    ui.add_space(5.0);
}

/// Drop-down with a placeholder entry meaning "nothing selected".
/// Returns true when the selection changed.
pub fn optional_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    placeholder: &str,
    selected: &mut Option<String>,
    options: &[String],
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        let text = selected.clone().unwrap_or_else(|| placeholder.to_string());
        ComboBox::from_id_salt(id)
            .width(COMBO_WIDTH)
            .selected_text(text)
            .show_ui(ui, |ui| {
                if ui.selectable_label(selected.is_none(), placeholder).clicked()
                    && selected.is_some()
                {
                    *selected = None;
                    changed = true;
                }
                for option in options {
                    let is_selected = selected.as_deref() == Some(option.as_str());
                    if ui.selectable_label(is_selected, option).clicked() && !is_selected {
                        *selected = Some(option.clone());
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Drop-down that always holds one of `options`.
pub fn value_combo(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    selected: &mut String,
    options: &[String],
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(COMBO_WIDTH)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for option in options {
                    if ui.selectable_label(*selected == *option, option).clicked()
                        && *selected != *option
                    {
                        *selected = option.clone();
                        changed = true;
                    }
                }
            });
    });
    changed
}

/// Multi-select drop-down of checkboxes. Selection order is click order.
pub fn multi_select(
    ui: &mut egui::Ui,
    id: &str,
    label: &str,
    selected: &mut Vec<String>,
    options: &[String],
) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        let text = match selected.len() {
            0 => "Choose options".to_string(),
            1 => selected[0].clone(),
            n => format!("{n} selected"),
        };
        ComboBox::from_id_salt(id)
            .width(COMBO_WIDTH)
            .height(300.0)
            .selected_text(text)
            .show_ui(ui, |ui| {
                for option in options {
                    let mut checked = selected.contains(option);
                    if ui.checkbox(&mut checked, option).changed() {
                        if checked {
                            selected.push(option.clone());
                        } else {
                            selected.retain(|s| s != option);
                        }
                        changed = true;
                    }
                }
            });
        if !selected.is_empty() && ui.small_button("Clear").clicked() {
            selected.clear();
            changed = true;
        }
    });
    changed
}

/// Pin `selected` to a member of `options`, defaulting to the first one.
pub fn ensure_member(selected: &mut String, options: &[String]) -> bool {
    if options.iter().any(|o| o == selected) {
        return false;
    }
    match options.first() {
        Some(first) => {
            *selected = first.clone();
            true
        }
        None => false,
    }
}

/// Show the informational states of a view; returns the data when ready.
pub fn view_state<'a, T>(ui: &mut egui::Ui, result: &'a ViewResult<T>) -> Option<&'a T> {
    match result {
        ViewResult::Ready(view) => Some(view),
        ViewResult::NeedsSelection(message) => {
            ui.label(RichText::new(format!("👈 {message}")).color(INFO_COLOR));
            None
        }
        ViewResult::NoData(message) => {
            ui.label(RichText::new(format!("⚠ {message}")).color(WARN_COLOR));
            None
        }
    }
}

/// Striped grid with a bold header row.
pub fn data_grid(ui: &mut egui::Ui, id: &str, headers: &[String], rows: &[Vec<String>]) {
    ScrollArea::horizontal().id_salt(id).show(ui, |ui| {
        egui::Grid::new(id)
            .striped(true)
            .num_columns(headers.len())
            .spacing([18.0, 4.0])
            .show(ui, |ui| {
                for header in headers {
                    ui.label(RichText::new(header).strong());
                }
                ui.end_row();
                for row in rows {
                    for cell in row {
                        ui.label(cell);
                    }
                    ui.end_row();
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["2023".to_string(), "2022".to_string()]
    }

    #[test]
    fn test_ensure_member_defaults_to_first() {
        let mut year = String::new();
        assert!(ensure_member(&mut year, &options()));
        assert_eq!(year, "2023");
    }

    #[test]
    fn test_ensure_member_keeps_valid_choice() {
        let mut year = "2022".to_string();
        assert!(!ensure_member(&mut year, &options()));
        assert_eq!(year, "2022");
    }

    #[test]
    fn test_ensure_member_with_no_options() {
        let mut year = "2019".to_string();
        assert!(!ensure_member(&mut year, &[]));
        assert_eq!(year, "2019");
    }
}
