use thiserror::Error;

/// Failure to read the inventory from its backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Inventory store lock was poisoned")]
    Poisoned,

    #[error("Invalid food item: {0}")]
    Validation(String),

    #[error("Inventory backend unavailable: {0}")]
    Unavailable(String),
}

/// The recommendation engine could not produce a result at all.
///
/// Only raised when the inventory snapshot cannot be obtained; image
/// enrichment problems never surface here.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Unable to read inventory for recipe suggestions: {0}")]
    Inventory(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ImageApiError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {error_body}")]
    Api {
        status: reqwest::StatusCode,
        error_body: String,
    },

    #[error("Image API returned no image")]
    EmptyResult,

    #[error("Image generation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

#[derive(Debug, Error)]
pub enum ReminderError {
    #[error("An email address is required")]
    MissingEmail,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}
