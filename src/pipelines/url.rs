use crate::error::ImportError;
use crate::extractors::{Extractor, JsonLdExtractor, ParsingContext};
use crate::fetchers::Fetcher;
use crate::model::RecipeDraft;
use log::{debug, info};
use reqwest::Url;

/// Process a URL into a recipe draft
///
/// This pipeline:
/// 1. Validates the URL (absolute, http or https)
/// 2. Fetches the page through `fetcher`
/// 3. Extracts the first JSON-LD recipe from the markup
///
/// # Returns
/// * `Ok(RecipeDraft)` - The normalized recipe
/// * `Err(ImportError::InvalidUrl)` - Nothing was fetched
/// * `Err(ImportError::UpstreamError | ImportError::FetchError)` - The page could not be retrieved
/// * `Err(ImportError::NoRecipeFound)` - The page has no recipe structured data
pub async fn process(url: &str, fetcher: &dyn Fetcher) -> Result<RecipeDraft, ImportError> {
    validate_url(url)?;
    let url = url.trim();

    let html_content = fetcher.fetch(url).await?;
    debug!("Fetched {} bytes from {}", html_content.len(), url);

    let context = ParsingContext::new(&html_content, url);
    let draft = JsonLdExtractor.parse(&context)?;
    info!(
        "Imported '{}' ({} ingredients, {} steps) from {}",
        draft.title,
        draft.ingredients.len(),
        draft.steps.len(),
        url
    );
    Ok(draft)
}

/// Accepts absolute http(s) URLs only.
pub fn validate_url(url: &str) -> Result<Url, ImportError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ImportError::InvalidUrl("url is required".to_string()));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|e| ImportError::InvalidUrl(format!("url is not valid: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ImportError::InvalidUrl(format!(
            "url must use http or https, not {scheme}"
        ))),
    }
}
