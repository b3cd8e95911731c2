use crate::data::geometry::RegionCollection;
use crate::data::records::RecordStore;
use crate::error::DataError;

/// Which of the two startup sources a channel message belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceId {
    Geometry,
    Records,
}

/// A fully parsed source, ready to be installed into the app state.
pub enum SourcePayload {
    Geometry(RegionCollection),
    Records(RecordStore),
}

/// Fetches the geometry and visit-record sources. A location containing
/// `://` is retrieved over HTTP; anything else is read from disk. Cheap to
/// clone into the fetch tasks.
#[derive(Clone, Debug, Default)]
pub struct DataRetriever {
    client: reqwest::Client,
}

impl DataRetriever {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn fetch_geometry(&self, location: &str) -> Result<SourcePayload, DataError> {
        let text = self.fetch_text(location).await?;
        Ok(SourcePayload::Geometry(RegionCollection::from_geojson(
            &text,
        )?))
    }

    pub async fn fetch_records(&self, location: &str) -> Result<SourcePayload, DataError> {
        let text = self.fetch_text(location).await?;
        Ok(SourcePayload::Records(RecordStore::from_csv(&text)?))
    }

    async fn fetch_text(&self, location: &str) -> Result<String, DataError> {
        if location.contains("://") {
            log::info!("fetching {location}");
            let response = self.client.get(location).send().await?;
            if !response.status().is_success() {
                return Err(DataError::Status {
                    url: location.to_string(),
                    status: response.status(),
                });
            }
            Ok(response.text().await?)
        } else {
            log::info!("reading {location}");
            Ok(tokio::fs::read_to_string(location).await?)
        }
    }
}
