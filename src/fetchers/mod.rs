mod request;

pub use request::RequestFetcher;

use crate::error::ImportError;
use async_trait::async_trait;

/// Retrieves the markup of a recipe page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the decoded body of `url`, or an error for transport
    /// failures and non-success responses.
    async fn fetch(&self, url: &str) -> Result<String, ImportError>;
}
