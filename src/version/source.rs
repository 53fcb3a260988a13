//! Source trait for fetching the release index page

#[cfg(test)]
use mockall::automock;

use crate::config::Architecture;
use crate::version::error::FetchError;

/// A fetched release index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePage {
    /// URL the page was fetched from
    pub url: String,
    /// Raw page body
    pub body: String,
}

/// Trait for fetching the release index of one architecture
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the release index page
    ///
    /// # Returns
    /// * `Ok(ReleasePage)` - Page body on a 2xx response
    /// * `Err(FetchError)` - On transport failure or any other status
    async fn fetch_page(&self, architecture: Architecture) -> Result<ReleasePage, FetchError>;
}
