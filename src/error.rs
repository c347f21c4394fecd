use thiserror::Error;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// The request did not carry a usable URL
    #[error("{0}")]
    InvalidUrl(String),

    /// The page answered with a non-success status
    #[error("Failed to fetch page ({status} {reason})")]
    UpstreamError { status: u16, reason: String },

    /// Failed to fetch recipe from URL
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The page was retrieved but carries no recipe structured data
    #[error("No recipe schema found on this page. The site may not support structured data; try entering the recipe manually.")]
    NoRecipeFound,

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    ClientError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ImportError {
    /// HTTP status reported at the import request boundary.
    ///
    /// Client-input faults are 400, upstream faults 502, extraction
    /// faults 422, everything else 500.
    pub fn status_code(&self) -> u16 {
        match self {
            ImportError::InvalidUrl(_) => 400,
            ImportError::UpstreamError { .. } | ImportError::FetchError(_) => 502,
            ImportError::NoRecipeFound => 422,
            ImportError::ClientError(_) | ImportError::ConfigError(_) => 500,
        }
    }
}
