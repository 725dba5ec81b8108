//! [`RecordSource`] implementations for HTTP and local files.

use std::path::PathBuf;

use async_trait::async_trait;
use retrofit_map_building_models::BuildingRecord;
use retrofit_map_config::DatasetLocation;

use crate::{DatasetError, RecordSource, parse_records};

/// Builds the source described by a configured location.
#[must_use]
pub fn source_for(location: &DatasetLocation) -> Box<dyn RecordSource> {
    match location {
        DatasetLocation::Url { url } => Box::new(HttpSource::new(reqwest::Client::new(), url)),
        DatasetLocation::File { path } => Box::new(FileSource::new(path.clone())),
    }
}

/// Fetches a JSON array of records over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    /// Creates a source that `GET`s `url` with `client`.
    #[must_use]
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl RecordSource for HttpSource {
    fn id(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<BuildingRecord>, DatasetError> {
        let resp = self.client.get(&self.url).send().await?;
        if !resp.status().is_success() {
            return Err(DatasetError::Status {
                url: self.url.clone(),
                status: resp.status().as_u16(),
            });
        }
        let body = resp.text().await?;
        parse_records(&body)
    }
}

/// Reads a JSON array of records from disk.
pub struct FileSource {
    path: PathBuf,
    label: String,
}

impl FileSource {
    /// Creates a source that reads `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        let label = path.display().to_string();
        Self { path, label }
    }
}

#[async_trait]
impl RecordSource for FileSource {
    fn id(&self) -> &str {
        &self.label
    }

    async fn fetch(&self) -> Result<Vec<BuildingRecord>, DatasetError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_records(&text)
    }
}
