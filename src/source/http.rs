use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::quiz::category::Category;
use crate::source::{DataLoadError, ProblemSource};

/// Problem files served over HTTP under a common base URL.
pub struct HttpSource {
    base_url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url_for(&self, category: Category) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            category.file_name()
        )
    }
}

impl ProblemSource for HttpSource {
    fn fetch_category(&self, category: Category) -> Result<Option<Vec<u8>>, DataLoadError> {
        let url = self.url_for(category);
        log::debug!("fetching {url}");
        let http_err = |source: reqwest::Error| DataLoadError::Http { category, source };

        let response = self.client.get(&url).send().map_err(http_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(http_err)?;
        let bytes = response.bytes().map_err(http_err)?;
        Ok(Some(bytes.to_vec()))
    }
}
