//! ungoogled-chromium-binaries release index implementation

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{Architecture, FetchConfig};
use crate::version::error::FetchError;
use crate::version::source::{PageSource, ReleasePage};

/// Page source for the static ungoogled-chromium-binaries site
pub struct ReleaseIndexSource {
    client: reqwest::Client,
    base_url: String,
}

impl ReleaseIndexSource {
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(config.user_agent.as_str())
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()?,
            base_url: config.base_url.clone(),
        })
    }

    /// Release index URL for an architecture on the configured host
    pub fn page_url(&self, architecture: Architecture) -> String {
        architecture.page_url(&self.base_url)
    }
}

#[async_trait::async_trait]
impl PageSource for ReleaseIndexSource {
    async fn fetch_page(&self, architecture: Architecture) -> Result<ReleasePage, FetchError> {
        let url = self.page_url(architecture);
        debug!("Fetching release index {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Release index returned status {}: {}", status, url);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(ReleasePage { url, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use rstest::rstest;

    fn source_for(server: &Server) -> ReleaseIndexSource {
        ReleaseIndexSource::new(&FetchConfig {
            base_url: server.url(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn page_url_uses_configured_host() {
        let source = ReleaseIndexSource::new(&FetchConfig {
            base_url: "http://mirror.test/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            source.page_url(Architecture::X86),
            "http://mirror.test/ungoogled-chromium-binaries/releases/windows/32bit/"
        );
    }

    #[tokio::test]
    async fn fetch_page_returns_body_of_architecture_page() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/ungoogled-chromium-binaries/releases/windows/64bit/",
            )
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<a href=\"./136.0.7103.92-1.1\">136.0.7103.92-1.1</a>")
            .create_async()
            .await;

        let source = source_for(&server);
        let page = source.fetch_page(Architecture::X64).await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            page.url,
            format!(
                "{}/ungoogled-chromium-binaries/releases/windows/64bit/",
                server.url()
            )
        );
        assert!(page.body.contains("136.0.7103.92-1.1"));
    }

    #[tokio::test]
    async fn fetch_page_sends_user_agent() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/ungoogled-chromium-binaries/releases/windows/arm64/",
            )
            .match_header("user-agent", "test-agent/1.0")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let source = ReleaseIndexSource::new(&FetchConfig {
            base_url: server.url(),
            user_agent: "test-agent/1.0".to_string(),
            ..Default::default()
        })
        .unwrap();
        source.fetch_page(Architecture::Arm).await.unwrap();

        mock.assert_async().await;
    }

    #[rstest]
    #[case(404)]
    #[case(500)]
    #[case(503)]
    #[tokio::test]
    async fn fetch_page_fails_on_non_success_status(#[case] status: usize) {
        let mut server = Server::new_async().await;

        let mock = server
            .mock(
                "GET",
                "/ungoogled-chromium-binaries/releases/windows/32bit/",
            )
            .with_status(status)
            .with_body("error")
            .create_async()
            .await;

        let source = source_for(&server);
        let result = source.fetch_page(Architecture::X86).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(FetchError::Status(s)) if usize::from(s) == status));
    }

    #[tokio::test]
    async fn fetch_page_fails_on_unreachable_host() {
        let source = ReleaseIndexSource::new(&FetchConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_ms: 2_000,
            ..Default::default()
        })
        .unwrap();

        let result = source.fetch_page(Architecture::X64).await;

        assert!(matches!(result, Err(FetchError::Network(_))));
    }
}
