//! HTTP gateway to the backend API and the static data snapshot.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{FetchError, SubmitError};
use crate::models::{ContributionData, ContributionReceipt, Place};

/// Page size requested from the listing endpoint. A single page at this
/// size covers the full city dataset.
pub const PLACES_PAGE_SIZE: usize = 100;

const USER_AGENT: &str = "aasaan/0.1 (accessibility map)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GENERIC_SUBMIT_ERROR: &str = "Failed to submit contribution";

/// Paged response returned by `GET {base}/places`.
#[derive(Debug, Deserialize)]
pub struct PlacesPage {
    pub items: Vec<Place>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub page_size: usize,
    #[serde(default)]
    pub pages: usize,
}

/// Report returned by `GET {base}/health`.
#[derive(Debug, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Read side of the place data: the live backend and the bundled snapshot.
#[allow(async_fn_in_trait)]
pub trait PlacesApi {
    /// Fetch the live place list from the backend.
    async fn fetch_places(&self) -> Result<Vec<Place>, FetchError>;

    /// Fetch the static snapshot used when the backend is down.
    async fn fetch_fallback(&self) -> Result<Vec<Place>, FetchError>;
}

/// Write side: public contribution submissions.
#[allow(async_fn_in_trait)]
pub trait ContributionsApi {
    async fn submit_contribution(
        &self,
        data: &ContributionData,
    ) -> Result<ContributionReceipt, SubmitError>;
}

/// Concrete HTTP client for both API surfaces.
pub struct ApiClient {
    config: ApiConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Probe the backend health endpoint.
    pub async fn health(&self) -> Result<HealthReport, FetchError> {
        let url = self.config.health_url();
        debug!("Checking backend health at {url}");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        Ok(response.json().await?)
    }
}

impl PlacesApi for ApiClient {
    async fn fetch_places(&self) -> Result<Vec<Place>, FetchError> {
        let url = self.config.places_url(PLACES_PAGE_SIZE);
        debug!("Fetching places from {url}");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url,
            });
        }

        let page: PlacesPage = response.json().await?;
        info!("Loaded {} places from the backend", page.items.len());
        Ok(page.items)
    }

    async fn fetch_fallback(&self) -> Result<Vec<Place>, FetchError> {
        let url = &self.config.data_url;
        debug!("Fetching place snapshot from {url}");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                url: url.clone(),
            });
        }

        // The snapshot is a bare array, not the paged envelope.
        let places: Vec<Place> = response.json().await?;
        info!("Loaded {} places from the snapshot", places.len());
        Ok(places)
    }
}

impl ContributionsApi for ApiClient {
    async fn submit_contribution(
        &self,
        data: &ContributionData,
    ) -> Result<ContributionReceipt, SubmitError> {
        let url = self.config.contributions_url();
        debug!("Submitting contribution for {:?} to {url}", data.name);

        let response = self.client.post(&url).json(data).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = extract_detail(&body);
            warn!("Contribution rejected with HTTP {status}: {detail}");
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let receipt: ContributionReceipt = response.json().await?;
        info!("Contribution {} accepted as {:?}", receipt.id, receipt.status);
        Ok(receipt)
    }
}

/// Pull the human-readable `detail` field out of an error body, falling
/// back to a generic message when the body has some other shape.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("detail")
                .and_then(|detail| detail.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_SUBMIT_ERROR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extracted_from_error_body() {
        let body = r#"{"detail": "A similar place already exists"}"#;
        assert_eq!(extract_detail(body), "A similar place already exists");
    }

    #[test]
    fn test_missing_detail_falls_back_to_generic_message() {
        assert_eq!(extract_detail("{}"), GENERIC_SUBMIT_ERROR);
        assert_eq!(extract_detail("not json"), GENERIC_SUBMIT_ERROR);
        assert_eq!(extract_detail(""), GENERIC_SUBMIT_ERROR);
    }

    #[test]
    fn test_structured_detail_falls_back_to_generic_message() {
        // Validation errors carry a list under `detail`, not a string.
        let body = r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#;
        assert_eq!(extract_detail(body), GENERIC_SUBMIT_ERROR);
    }

    #[test]
    fn test_places_page_decodes_without_counts() {
        let body = r#"{"items": []}"#;
        let page: PlacesPage = serde_json::from_str(body).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
