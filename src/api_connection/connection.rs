use async_trait::async_trait;
use reqwest::Client;
use std::env;
use tracing::debug;

use super::endpoints::{
    ImageGenerationRequest, ImageGenerationResponse, ImageProvider, DEFAULT_IMAGE_API_BASE_URL,
    DEFAULT_IMAGE_MODEL,
};
use crate::errors::ImageApiError;

/// Anything that can turn a prompt into an image URL.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_image(&self, prompt: &str) -> Result<String, ImageApiError>;
}

#[async_trait]
impl<'a, T: ImageGenerator + ?Sized> ImageGenerator for &'a T {
    async fn generate_image(&self, prompt: &str) -> Result<String, ImageApiError> {
        (**self).generate_image(prompt).await
    }
}

impl ImageProvider {
    /// The key is looked up in `api_key_env_var` on every call, not here.
    pub fn openai(api_key_env_var: &str) -> Self {
        Self::OpenAi {
            api_key: api_key_env_var.to_string(),
            base_url: DEFAULT_IMAGE_API_BASE_URL.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    pub fn with_base_url(self, url: &str) -> Self {
        match self {
            ImageProvider::OpenAi { api_key, model, .. } => ImageProvider::OpenAi {
                api_key,
                base_url: url.trim_end_matches('/').to_string(),
                model,
            },
        }
    }

    pub async fn call_image_generation(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ImageApiError> {
        match self {
            ImageProvider::OpenAi {
                api_key: api_key_env_var_name,
                base_url,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ImageApiError::MissingApiKey(api_key_env_var_name.clone()))?;

                let client = Client::new();
                let url = format!("{}/images/generations", base_url);

                let response = client
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let image_response = response.json::<ImageGenerationResponse>().await?;
                    Ok(image_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ImageApiError::Api { status, error_body })
                }
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for ImageProvider {
    async fn generate_image(&self, prompt: &str) -> Result<String, ImageApiError> {
        let model = match self {
            ImageProvider::OpenAi { model, .. } => model.as_str(),
        };
        let request = ImageGenerationRequest::dish_photo(model, prompt.to_string());
        let response = self.call_image_generation(request).await?;

        if let Some(revised) = response.data.first().and_then(|d| d.revised_prompt.as_deref()) {
            debug!(revised_prompt = revised, "Image API revised the prompt");
        }

        response
            .first_url()
            .map(str::to_string)
            .ok_or(ImageApiError::EmptyResult)
    }
}
