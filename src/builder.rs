use std::time::Duration;

use log::warn;
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::ImportConfig;
use crate::fetchers::{Fetcher, RequestFetcher};
use crate::pipelines;
use crate::{ImportError, RecipeDraft};

/// Builder for configuring a [`RecipeImporter`]
#[derive(Default)]
pub struct RecipeImporterBuilder {
    config: Option<ImportConfig>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    fetcher: Option<Box<dyn Fetcher>>,
}

impl RecipeImporterBuilder {
    /// Start from an explicit configuration instead of the defaults
    ///
    /// # Example
    /// ```
    /// use recipe_import::{ImportConfig, RecipeImporter};
    ///
    /// let builder = RecipeImporter::builder()
    ///     .config(ImportConfig::default());
    /// ```
    pub fn config(mut self, config: ImportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeImporter::builder()
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the user agent sent with page requests
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom page fetcher instead of the HTTP client
    ///
    /// Timeout and user agent settings are ignored when a fetcher is given.
    pub fn fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
        self.fetcher = Some(Box::new(fetcher));
        self
    }

    /// Build the importer
    ///
    /// # Errors
    /// Returns `ImportError::ClientError` if the HTTP client cannot be created.
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let importer = RecipeImporter::builder().build().unwrap();
    /// ```
    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => {
                let config = self.config.unwrap_or_default();
                let timeout = self
                    .timeout
                    .unwrap_or_else(|| Duration::from_secs(config.timeout));
                let user_agent = self.user_agent.unwrap_or(config.user_agent);
                Box::new(RequestFetcher::new(timeout, &user_agent)?)
            }
        };

        Ok(RecipeImporter { fetcher })
    }
}

/// Answer to an import request: an HTTP status and a JSON body that is
/// either a recipe draft or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResponse {
    pub status: u16,
    pub body: Value,
}

impl ImportResponse {
    fn error(err: &ImportError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "error": err.to_string() }),
        }
    }
}

/// Imports recipes from web pages
pub struct RecipeImporter {
    fetcher: Box<dyn Fetcher>,
}

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use recipe_import::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    /// Fetch `url` and normalize the recipe it describes
    ///
    /// # Example
    /// ```no_run
    /// # use recipe_import::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let importer = RecipeImporter::builder().build()?;
    /// let draft = importer.import("https://example.com/recipe").await?;
    /// println!("{}", draft.title);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn import(&self, url: &str) -> Result<RecipeDraft, ImportError> {
        pipelines::url::process(url, self.fetcher.as_ref()).await
    }

    /// Handle a `{"url": "..."}` request body
    ///
    /// Input faults answer 400 without fetching anything, upstream faults
    /// 502, pages without a recipe 422.
    pub async fn handle_request(&self, body: &str) -> ImportResponse {
        let requested = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|request| request.get("url").and_then(Value::as_str).map(str::to_string));

        let Some(requested) = requested else {
            return ImportResponse::error(&ImportError::InvalidUrl("url is required".to_string()));
        };

        match self.import(&requested).await {
            Ok(draft) => match serde_json::to_value(&draft) {
                Ok(body) => ImportResponse { status: 200, body },
                Err(e) => ImportResponse {
                    status: 500,
                    body: json!({ "error": e.to_string() }),
                },
            },
            Err(err) => {
                warn!("Import of {} failed: {}", requested, err);
                ImportResponse::error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingFetcher;

    #[async_trait]
    impl Fetcher for FailingFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, ImportError> {
            Err(ImportError::UpstreamError {
                status: 503,
                reason: "Service Unavailable".to_string(),
            })
        }
    }

    fn importer() -> RecipeImporter {
        RecipeImporter::builder()
            .fetcher(FailingFetcher)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_url_is_client_fault() {
        for body in ["{}", r#"{"url": 42}"#, "not json", r#"{"url": null}"#] {
            let response = importer().handle_request(body).await;
            assert_eq!(response.status, 400, "body: {body}");
            assert_eq!(response.body["error"], "url is required");
        }
    }

    #[tokio::test]
    async fn test_blank_url_is_client_fault() {
        let response = importer().handle_request(r#"{"url": "  "}"#).await;
        assert_eq!(response.status, 400);
    }

    #[tokio::test]
    async fn test_upstream_fault_embeds_status() {
        let response = importer()
            .handle_request(r#"{"url": "https://example.com/recipe"}"#)
            .await;
        assert_eq!(response.status, 502);
        assert_eq!(
            response.body["error"],
            "Failed to fetch page (503 Service Unavailable)"
        );
    }

    #[test]
    fn test_build_with_http_client() {
        assert!(RecipeImporter::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("test-agent")
            .build()
            .is_ok());
    }
}
