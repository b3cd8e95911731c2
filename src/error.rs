use thiserror::Error;

/// Failures while loading or decoding the two data sources.
///
/// Fetch and parse errors are fatal to initialization: the app logs them and
/// stays in a failed state, there is no retry.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("fetching {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("geojson error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("geometry source is not a FeatureCollection")]
    NotFeatureCollection,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
