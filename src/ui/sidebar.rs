use chrono::{Local, NaiveDate};
use egui::Ui;

use crate::data::records::RecordStore;

/// Days elapsed since `start`; negative when the date is in the future.
pub fn days_since(start: NaiveDate, today: NaiveDate) -> i64 {
    (today - start).num_days()
}

pub fn stats_ui(ui: &mut Ui, store: &RecordStore, tracking_start: NaiveDate) {
    let today = Local::now().date_naive();

    ui.group(|ui| {
        ui.label("Days since");
        ui.heading(days_since(tracking_start, today).to_string());
        ui.small(tracking_start.format("%Y-%m-%d").to_string());
    });
    ui.group(|ui| {
        ui.label("States visited");
        ui.heading(store.visited_count().to_string());
        ui.small(format!("of {} tracked", store.len()));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_since_counts_whole_days() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 2, 8).unwrap();
        assert_eq!(days_since(start, today), 3);
    }

    #[test]
    fn future_dates_go_negative() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(days_since(start, today), -4);
    }
}
