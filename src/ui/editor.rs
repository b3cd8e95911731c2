use std::path::Path;

use egui::{ComboBox, DragValue, TextEdit, Ui};

use crate::data::geometry::RegionCollection;
use crate::data::records::{RecordDraft, RecordStore, TripStatus};

/// The edit form: select a region, edit its visit fields, save back into the
/// store, clear, or export the CSV. Callers only show this panel when signed
/// in; the panel itself does not re-check the session on each operation.
///
/// A committed save reports back `true` so the caller can rebuild the map
/// layer; nothing refreshes implicitly.
#[derive(Default)]
pub struct EditorPanel {
    region_names: Vec<String>,
    selected: Option<String>,
    draft: RecordDraft,
    notice: Option<String>,
}

impl EditorPanel {
    /// Called once both sources have loaded, with the geometry's name list.
    pub fn set_region_names(&mut self, names: Vec<String>) {
        self.region_names = names;
        self.selected = None;
        self.clear_fields();
    }

    /// Populates the form from the region's record, or resets to defaults
    /// when it has none yet. Also used by the popup's edit shortcut.
    pub fn select_region(&mut self, name: &str, store: &RecordStore) {
        let name = name.trim();
        self.selected = Some(name.to_string());
        match store.lookup(name) {
            Some(record) => {
                self.draft = RecordDraft {
                    status: record.status,
                    visit_count: record.visit_count,
                    last_visit_date: record.last_visit_date.clone(),
                    all_visit_dates: record.all_visit_dates.join(";"),
                };
            }
            None => self.draft = RecordDraft::default(),
        }
        self.notice = None;
    }

    pub fn clear_fields(&mut self) {
        self.draft = RecordDraft::default();
        self.notice = None;
    }

    /// Renders the form. Returns true when an edit was committed and the map
    /// layer needs rebuilding.
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        store: &mut RecordStore,
        regions: &RegionCollection,
        export_path: &Path,
    ) -> bool {
        let mut committed = false;

        ui.heading("Edit State Data");
        ui.add_space(4.0);

        let mut newly_selected: Option<String> = None;
        ComboBox::from_label("State")
            .selected_text(self.selected.as_deref().unwrap_or("-- Select a State --"))
            .show_ui(ui, |ui| {
                for name in &self.region_names {
                    let is_selected = self.selected.as_deref() == Some(name.as_str());
                    if ui.selectable_label(is_selected, name).clicked() {
                        newly_selected = Some(name.clone());
                    }
                }
            });
        if let Some(name) = newly_selected {
            self.select_region(&name, store);
        }

        ComboBox::from_label("Status")
            .selected_text(self.draft.status.label())
            .show_ui(ui, |ui| {
                for status in [
                    TripStatus::NotVisited,
                    TripStatus::Visited,
                    TripStatus::Planned,
                ] {
                    ui.selectable_value(&mut self.draft.status, status, status.label());
                }
            });

        ui.horizontal(|ui| {
            ui.label("Visit count");
            ui.add(DragValue::new(&mut self.draft.visit_count).range(0..=1000));
        });

        ui.label("Last visit date");
        ui.add(TextEdit::singleline(&mut self.draft.last_visit_date).hint_text("YYYY-MM-DD"));

        ui.label("All visit dates (semicolon-separated)");
        ui.add(
            TextEdit::multiline(&mut self.draft.all_visit_dates)
                .hint_text("2024-01-01;2024-05-01")
                .desired_rows(2),
        );

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                match &self.selected {
                    Some(name) => {
                        store.upsert(name, &self.draft, regions.code_for(name));
                        self.notice = Some(format!(
                            "{name} updated locally. Export the CSV to keep your changes."
                        ));
                        committed = true;
                    }
                    None => {
                        self.notice = Some("Please select a state to update.".to_string());
                    }
                }
            }
            if ui.button("Clear Form").clicked() {
                self.clear_fields();
            }
            if ui.button("Export CSV").clicked() {
                self.export(store, export_path);
            }
        });

        if let Some(notice) = &self.notice {
            ui.add_space(4.0);
            ui.label(notice);
        }

        committed
    }

    fn export(&mut self, store: &RecordStore, export_path: &Path) {
        if store.is_empty() {
            self.notice = Some("No data available to export.".to_string());
            return;
        }
        let result = store
            .export()
            .and_then(|csv| std::fs::write(export_path, csv).map_err(Into::into));
        match result {
            Ok(()) => {
                self.notice = Some(format!("Exported to {}.", export_path.display()));
            }
            Err(e) => {
                log::error!("csv export failed: {e}");
                self.notice = Some(format!("Export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_texas() -> RecordStore {
        let mut store = RecordStore::default();
        store.upsert(
            "Texas",
            &RecordDraft {
                status: TripStatus::Visited,
                visit_count: 2,
                last_visit_date: "2024-05-01".to_string(),
                all_visit_dates: "2024-01-01;2024-05-01".to_string(),
            },
            Some("48"),
        );
        store
    }

    #[test]
    fn selecting_a_region_populates_the_draft() {
        let mut editor = EditorPanel::default();
        editor.select_region("Texas", &store_with_texas());
        assert_eq!(editor.draft.status, TripStatus::Visited);
        assert_eq!(editor.draft.visit_count, 2);
        assert_eq!(editor.draft.all_visit_dates, "2024-01-01;2024-05-01");
    }

    #[test]
    fn selecting_an_unknown_region_resets_to_defaults() {
        let mut editor = EditorPanel::default();
        editor.select_region("Texas", &store_with_texas());
        editor.select_region("Maine", &store_with_texas());
        assert_eq!(editor.draft.status, TripStatus::NotVisited);
        assert_eq!(editor.draft.visit_count, 0);
        assert!(editor.draft.last_visit_date.is_empty());
    }

    #[test]
    fn clear_resets_fields_without_touching_the_store() {
        let store = store_with_texas();
        let mut editor = EditorPanel::default();
        editor.select_region("Texas", &store);
        editor.clear_fields();
        assert_eq!(editor.draft.visit_count, 0);
        assert_eq!(store.lookup("Texas").unwrap().visit_count, 2);
    }
}
