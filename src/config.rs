use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

pub const IMAGE_API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const IMAGE_API_BASE_URL_ENV_VAR: &str = "IMAGE_API_BASE_URL";
pub const IMAGE_TIMEOUT_ENV_VAR: &str = "IMAGE_TIMEOUT_SECS";
pub const SENDGRID_API_KEY_ENV_VAR: &str = "SENDGRID_API_KEY";
pub const REMINDER_FROM_ENV_VAR: &str = "REMINDER_FROM";
pub const GMAIL_USER_ENV_VAR: &str = "GMAIL_USER";
pub const GMAIL_PASS_ENV_VAR: &str = "GMAIL_PASS";

const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REMINDER_FROM: &str = "noreply@smartfridge.com";

/// Settings read from the environment (after `.env` is loaded).
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Image enrichment runs only when this key is present.
    pub image_api_key_present: bool,
    pub image_api_base_url: Option<String>,
    pub image_timeout: Duration,
    pub sendgrid_api_key: Option<String>,
    /// SendGrid sender address.
    pub reminder_from: String,
    /// Gmail is used only when both of these are set.
    pub gmail_user: Option<String>,
    pub gmail_pass: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let image_timeout = match non_empty_var(IMAGE_TIMEOUT_ENV_VAR) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    name: IMAGE_TIMEOUT_ENV_VAR,
                    value: raw.clone(),
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS),
        };

        Ok(Self {
            image_api_key_present: non_empty_var(IMAGE_API_KEY_ENV_VAR).is_some(),
            image_api_base_url: non_empty_var(IMAGE_API_BASE_URL_ENV_VAR),
            image_timeout,
            sendgrid_api_key: non_empty_var(SENDGRID_API_KEY_ENV_VAR),
            reminder_from: non_empty_var(REMINDER_FROM_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_REMINDER_FROM.to_string()),
            gmail_user: non_empty_var(GMAIL_USER_ENV_VAR),
            gmail_pass: non_empty_var(GMAIL_PASS_ENV_VAR),
        })
    }
}
