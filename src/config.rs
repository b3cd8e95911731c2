use std::path::PathBuf;

use chrono::NaiveDate;

const DEFAULT_GEOJSON: &str = "data/us-states.geojson";
const DEFAULT_VISITS: &str = "data/visited_states.csv";
const DEFAULT_EXPORT: &str = "updated_visited_states.csv";
const DEFAULT_TRACKING_START: &str = "2025-02-05";

/// Runtime configuration, read once at startup from `.env` / the environment.
///
/// Source locations containing `://` are fetched over HTTP, anything else is
/// treated as a local path.
#[derive(Clone, Debug)]
pub struct Config {
    pub geojson_source: String,
    pub visits_source: String,
    pub export_path: PathBuf,
    pub tracking_start: NaiveDate,
}

impl Config {
    pub fn from_env() -> Self {
        let geojson_source =
            dotenv::var("VISITMAP_GEOJSON").unwrap_or_else(|_| DEFAULT_GEOJSON.to_string());
        let visits_source =
            dotenv::var("VISITMAP_VISITS").unwrap_or_else(|_| DEFAULT_VISITS.to_string());
        let export_path = PathBuf::from(
            dotenv::var("VISITMAP_EXPORT").unwrap_or_else(|_| DEFAULT_EXPORT.to_string()),
        );

        let raw_start = dotenv::var("VISITMAP_TRACKING_START")
            .unwrap_or_else(|_| DEFAULT_TRACKING_START.to_string());
        let tracking_start = NaiveDate::parse_from_str(&raw_start, "%Y-%m-%d").unwrap_or_else(|e| {
            log::warn!("invalid VISITMAP_TRACKING_START {raw_start:?} ({e}), using default");
            NaiveDate::parse_from_str(DEFAULT_TRACKING_START, "%Y-%m-%d")
                .expect("default tracking start date is valid")
        });

        Self {
            geojson_source,
            visits_source,
            export_path,
            tracking_start,
        }
    }
}
