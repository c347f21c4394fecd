use crate::error::ImportError;
use crate::model::RecipeDraft;
use scraper::Html;

mod json_ld;

pub use json_ld::JsonLdExtractor;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

impl ParsingContext {
    pub fn new(markup: &str, url: &str) -> Self {
        Self {
            url: url.to_string(),
            document: Html::parse_document(markup),
        }
    }
}

pub trait Extractor {
    fn parse(&self, context: &ParsingContext) -> Result<RecipeDraft, ImportError>;
}

/// Finds the first schema.org `Recipe` embedded in `markup` and normalizes it.
///
/// Returns `None` when the page carries no recipe structured data.
pub fn extract_recipe(markup: &str, source_url: &str) -> Option<RecipeDraft> {
    let context = ParsingContext::new(markup, source_url);
    JsonLdExtractor.parse(&context).ok()
}
