use serde::Deserialize;

use crate::error::DataError;

/// Column order of the CSV source and of every export. Fixed; the export must
/// be byte-stable under repeated calls on an unchanged store.
pub const CSV_COLUMNS: [&str; 6] = [
    "id",
    "state_name",
    "visited_status",
    "visit_count",
    "last_visit_date",
    "all_visit_dates",
];

/// Visit status of a region. One enum is authoritative in memory; the two
/// legacy CSV encodings (`visited_status` bool tokens and an optional
/// `trip_status` column) both decode into it, see [`TripStatus::decode`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TripStatus {
    #[default]
    NotVisited,
    Visited,
    Planned,
}

impl TripStatus {
    /// Decodes the status of a CSV row. A non-empty `trip_status` column wins;
    /// otherwise `visited_status` is interpreted (`true`/`visited` count as
    /// visited for compatibility with both legacy encodings).
    pub fn decode(trip_status: Option<&str>, visited_status: &str) -> Self {
        let token = match trip_status.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => visited_status.trim(),
        };
        match token {
            "true" | "visited" => TripStatus::Visited,
            "planned" => TripStatus::Planned,
            _ => TripStatus::NotVisited,
        }
    }

    /// Token written to the `visited_status` column on export. Chosen so that
    /// decoding the export reproduces the same status.
    pub fn csv_token(self) -> &'static str {
        match self {
            TripStatus::NotVisited => "false",
            TripStatus::Visited => "true",
            TripStatus::Planned => "planned",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TripStatus::NotVisited => "Not Visited",
            TripStatus::Visited => "Visited",
            TripStatus::Planned => "Planned",
        }
    }
}

/// One per-region visit record. At most one exists per `state_name` within a
/// [`RecordStore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitRecord {
    pub id: String,
    pub state_name: String,
    pub status: TripStatus,
    pub visit_count: u32,
    pub last_visit_date: String,
    /// Individual date strings; semicolon-joined in external CSV form.
    pub all_visit_dates: Vec<String>,
}

/// Editable fields of a record, as captured by the edit form.
#[derive(Clone, Debug, Default)]
pub struct RecordDraft {
    pub status: TripStatus,
    pub visit_count: u32,
    pub last_visit_date: String,
    /// Raw form text; split on `;` and trimmed on commit.
    pub all_visit_dates: String,
}

/// Raw CSV row. All fields default so rows from older files with missing or
/// extra columns still load; coercion to typed values happens in `from_csv`.
#[derive(Debug, Default, Deserialize)]
struct RawRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    state_name: String,
    #[serde(default)]
    visited_status: String,
    #[serde(default)]
    visit_count: String,
    #[serde(default)]
    last_visit_date: String,
    #[serde(default)]
    all_visit_dates: String,
    #[serde(default)]
    trip_status: Option<String>,
}

/// The Visit Record Store together with its synchronizer operations: an
/// ordered collection of records, looked up by exact (trimmed) region name,
/// mutated only through [`RecordStore::upsert`], replaced wholesale when a
/// new CSV source is loaded.
///
/// There is no backing persistence: edits live for one app run unless the
/// user exports the CSV and replaces the source out-of-band.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<VisitRecord>,
}

impl RecordStore {
    /// Parses a header-based CSV text into a fresh store. Blank lines are
    /// skipped by the reader; unknown columns are ignored.
    pub fn from_csv(text: &str) -> Result<Self, DataError> {
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let mut records = Vec::new();
        for row in reader.deserialize::<RawRow>() {
            let row = row?;
            let state_name = row.state_name.trim().to_string();
            if state_name.is_empty() {
                log::warn!("skipping csv row without a state_name");
                continue;
            }
            let status = TripStatus::decode(row.trip_status.as_deref(), &row.visited_status);
            records.push(VisitRecord {
                id: non_empty_or(row.id.trim(), &state_name),
                state_name,
                status,
                visit_count: row.visit_count.trim().parse().unwrap_or(0),
                last_visit_date: row.last_visit_date.trim().to_string(),
                all_visit_dates: split_dates(&row.all_visit_dates),
            });
        }
        Ok(Self { records })
    }

    /// Exact-match lookup by trimmed region name. A miss is not an error: it
    /// means "unvisited, no data".
    pub fn lookup(&self, state_name: &str) -> Option<&VisitRecord> {
        let key = state_name.trim();
        self.records.iter().find(|r| r.state_name == key)
    }

    /// Updates the record for `state_name` in place, or appends a new one.
    /// New records take their id from `code_hint` (the geometry's stable code
    /// for that region) when available, else the region name. Existing record
    /// order is preserved; the operation is idempotent under identical input.
    pub fn upsert(
        &mut self,
        state_name: &str,
        draft: &RecordDraft,
        code_hint: Option<&str>,
    ) -> &VisitRecord {
        let key = state_name.trim().to_string();
        let index = match self.records.iter().position(|r| r.state_name == key) {
            Some(i) => i,
            None => {
                self.records.push(VisitRecord {
                    id: code_hint
                        .map(str::to_string)
                        .unwrap_or_else(|| key.clone()),
                    state_name: key,
                    status: TripStatus::default(),
                    visit_count: 0,
                    last_visit_date: String::new(),
                    all_visit_dates: Vec::new(),
                });
                self.records.len() - 1
            }
        };

        let record = &mut self.records[index];
        record.status = draft.status;
        record.visit_count = draft.visit_count;
        record.last_visit_date = draft.last_visit_date.trim().to_string();
        record.all_visit_dates = split_dates(&draft.all_visit_dates);
        &self.records[index]
    }

    /// Serializes the full store to CSV text in the fixed [`CSV_COLUMNS`]
    /// order, header included. Pure function of the current collection.
    pub fn export(&self) -> Result<String, DataError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(CSV_COLUMNS)?;
        for record in &self.records {
            writer.write_record([
                record.id.as_str(),
                record.state_name.as_str(),
                record.status.csv_token(),
                &record.visit_count.to_string(),
                record.last_visit_date.as_str(),
                &record.all_visit_dates.join(";"),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| DataError::Io(e.into_error()))?;
        Ok(String::from_utf8(bytes).expect("csv writer produces utf-8"))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VisitRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of regions currently marked visited; feeds the sidebar counter.
    pub fn visited_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status == TripStatus::Visited)
            .count()
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn split_dates(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(status: TripStatus, count: u32) -> RecordDraft {
        RecordDraft {
            status,
            visit_count: count,
            last_visit_date: "2024-05-01".to_string(),
            all_visit_dates: "2024-05-01".to_string(),
        }
    }

    #[test]
    fn lookup_miss_on_empty_store() {
        let store = RecordStore::default();
        assert!(store.lookup("Texas").is_none());
    }

    #[test]
    fn upsert_appends_then_updates_in_place() {
        let mut store = RecordStore::default();
        store.upsert("Texas", &draft(TripStatus::Visited, 2), Some("48"));
        assert_eq!(store.len(), 1);

        let record = store.lookup("Texas").unwrap();
        assert_eq!(record.id, "48");
        assert_eq!(record.visit_count, 2);
        assert_eq!(record.status, TripStatus::Visited);

        store.upsert("Texas", &draft(TripStatus::Visited, 3), Some("48"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("Texas").unwrap().visit_count, 3);
    }

    #[test]
    fn upsert_is_idempotent_under_identical_input() {
        let mut store = RecordStore::default();
        store.upsert("Texas", &draft(TripStatus::Visited, 2), None);
        let once = store.clone();
        store.upsert("Texas", &draft(TripStatus::Visited, 2), None);
        assert_eq!(store, once);
    }

    #[test]
    fn upsert_preserves_order_and_appends_at_end() {
        let mut store = RecordStore::default();
        store.upsert("Ohio", &draft(TripStatus::Visited, 1), None);
        store.upsert("Texas", &draft(TripStatus::Planned, 0), None);
        store.upsert("Ohio", &draft(TripStatus::Visited, 2), None);

        let names: Vec<&str> = store.iter().map(|r| r.state_name.as_str()).collect();
        assert_eq!(names, ["Ohio", "Texas"]);
    }

    #[test]
    fn upsert_without_code_hint_falls_back_to_name() {
        let mut store = RecordStore::default();
        store.upsert("Ohio", &draft(TripStatus::NotVisited, 0), None);
        assert_eq!(store.lookup("Ohio").unwrap().id, "Ohio");
    }

    #[test]
    fn upsert_trims_name_before_matching() {
        let mut store = RecordStore::default();
        store.upsert("Texas", &draft(TripStatus::Visited, 1), None);
        store.upsert("  Texas ", &draft(TripStatus::Visited, 2), None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.lookup("Texas").unwrap().visit_count, 2);
    }

    #[test]
    fn from_csv_skips_blank_and_nameless_rows() {
        let text = "id,state_name,visited_status,visit_count,last_visit_date,all_visit_dates\n\
                    48,Texas,true,2,2024-05-01,2024-01-01;2024-05-01\n\
                    ,,,,,\n";
        let store = RecordStore::from_csv(text).unwrap();
        assert_eq!(store.len(), 1);

        let record = store.lookup("Texas").unwrap();
        assert_eq!(record.status, TripStatus::Visited);
        assert_eq!(record.visit_count, 2);
        assert_eq!(record.all_visit_dates, ["2024-01-01", "2024-05-01"]);
    }

    #[test]
    fn from_csv_coerces_unparsable_count_to_zero() {
        let text = "id,state_name,visited_status,visit_count,last_visit_date,all_visit_dates\n\
                    48,Texas,true,lots,,\n";
        let store = RecordStore::from_csv(text).unwrap();
        assert_eq!(store.lookup("Texas").unwrap().visit_count, 0);
    }

    #[test]
    fn trip_status_column_wins_over_visited_status() {
        let text = "id,state_name,visited_status,visit_count,last_visit_date,all_visit_dates,trip_status\n\
                    48,Texas,false,0,,,planned\n";
        let store = RecordStore::from_csv(text).unwrap();
        assert_eq!(store.lookup("Texas").unwrap().status, TripStatus::Planned);
    }

    #[test]
    fn status_decoding_accepts_both_legacy_encodings() {
        assert_eq!(TripStatus::decode(None, "true"), TripStatus::Visited);
        assert_eq!(TripStatus::decode(None, "visited"), TripStatus::Visited);
        assert_eq!(TripStatus::decode(None, "planned"), TripStatus::Planned);
        assert_eq!(TripStatus::decode(None, "false"), TripStatus::NotVisited);
        assert_eq!(TripStatus::decode(None, ""), TripStatus::NotVisited);
        assert_eq!(
            TripStatus::decode(Some("visited"), "false"),
            TripStatus::Visited
        );
        assert_eq!(TripStatus::decode(Some(""), "true"), TripStatus::Visited);
    }

    #[test]
    fn export_has_fixed_header_and_column_order() {
        let text = "id,state_name,visited_status,visit_count,last_visit_date,all_visit_dates\n\
                    48,Texas,true,2,2024-05-01,2024-05-01\n\
                    Ohio,Ohio,false,0,,\n";
        let store = RecordStore::from_csv(text).unwrap();
        let exported = store.export().unwrap();

        let lines: Vec<&str> = exported.lines().collect();
        assert_eq!(
            lines[0],
            "id,state_name,visited_status,visit_count,last_visit_date,all_visit_dates"
        );
        assert_eq!(lines[1], "48,Texas,true,2,2024-05-01,2024-05-01");
        assert_eq!(lines[2], "Ohio,Ohio,false,0,,");
    }

    #[test]
    fn export_is_stable_under_repeated_calls() {
        let mut store = RecordStore::default();
        store.upsert("Texas", &draft(TripStatus::Planned, 0), Some("48"));
        assert_eq!(store.export().unwrap(), store.export().unwrap());
    }

    #[test]
    fn export_round_trips_for_all_statuses() {
        let mut store = RecordStore::default();
        store.upsert("Texas", &draft(TripStatus::Visited, 2), Some("48"));
        store.upsert("Ohio", &draft(TripStatus::Planned, 0), None);
        store.upsert("Maine", &draft(TripStatus::NotVisited, 0), None);

        let reparsed = RecordStore::from_csv(&store.export().unwrap()).unwrap();
        assert_eq!(reparsed, store);
    }

    #[test]
    fn visited_count_counts_only_visited() {
        let mut store = RecordStore::default();
        store.upsert("Texas", &draft(TripStatus::Visited, 2), None);
        store.upsert("Ohio", &draft(TripStatus::Planned, 0), None);
        store.upsert("Maine", &draft(TripStatus::NotVisited, 0), None);
        assert_eq!(store.visited_count(), 1);
    }
}
