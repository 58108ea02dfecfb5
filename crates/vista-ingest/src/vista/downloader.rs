// VISTA Enhancer Browser HTTP client

use crate::vista::metadata::parse_experiment_page;
use crate::vista::models::ExperimentMetadata;
use crate::vista::{IngestError, Result, VistaConfig};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// HTTP client for the search results and element detail pages
///
/// Requests are made once; any network or HTTP status failure is returned
/// to the caller.
pub struct VistaClient {
    client: Client,
    config: VistaConfig,
}

impl VistaClient {
    /// Create new client with configuration
    pub fn new(config: VistaConfig) -> Result<Self> {
        config.validate().map_err(IngestError::Validation)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("VISTA-Enhancer-Ingester/1.0")
            .build()?;

        Ok(VistaClient { client, config })
    }

    /// Download the raw search results page
    pub async fn fetch_search_results(&self) -> Result<String> {
        let url = self.config.search_url();
        info!("Downloading VISTA search results from: {}", url);

        let text = self.fetch_text(&url).await?;
        info!("Downloaded search results: {} bytes ({} KB)", text.len(), text.len() / 1024);

        Ok(text)
    }

    /// Download the detail page of an element
    pub async fn fetch_experiment_page(&self, element_id: &str) -> Result<String> {
        let url = self.config.detail_url(element_id);
        debug!(element = %element_id, "Downloading detail page from: {}", url);

        self.fetch_text(&url).await
    }

    /// Download and scrape an element's position and flanking genes
    pub async fn fetch_experiment_metadata(
        &self,
        element_id: &str,
    ) -> Result<Option<ExperimentMetadata>> {
        let html = self.fetch_experiment_page(element_id).await?;
        parse_experiment_page(&html)
    }

    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(IngestError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        Ok(response.text().await?)
    }

    /// Get configuration
    pub fn config(&self) -> &VistaConfig {
        &self.config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        assert!(VistaClient::new(VistaConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = VistaConfig::builder().page_size(0).build();
        let err = VistaClient::new(config).err().unwrap();
        assert!(matches!(err, IngestError::Validation(_)));
    }

    #[tokio::test]
    async fn test_fetch_search_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/cgi-bin/imagedb3.pl"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<pre>>Human|...</pre>"))
            .mount(&server)
            .await;

        let config = VistaConfig::builder()
            .base_url(format!("{}/cgi-bin/imagedb3.pl", server.uri()))
            .build();
        let client = VistaClient::new(config).unwrap();

        let text = client.fetch_search_results().await.unwrap();
        assert_eq!(text, "<pre>>Human|...</pre>");
    }

    #[tokio::test]
    async fn test_http_error_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let config = VistaConfig::builder()
            .base_url(format!("{}/cgi-bin/imagedb3.pl", server.uri()))
            .build();
        let client = VistaClient::new(config).unwrap();

        let err = client.fetch_experiment_page("element 1").await.unwrap_err();
        match err {
            IngestError::HttpStatus { status, url } => {
                assert_eq!(status.as_u16(), 503);
                assert!(url.contains("experiment_id=1;"));
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    #[ignore] // Ignore by default (requires network)
    async fn test_fetch_live_search_results() {
        let client = VistaClient::new(VistaConfig::default()).unwrap();
        let text = client.fetch_search_results().await.unwrap();
        assert!(text.contains(">Human"));
    }
}
