use serde::{Deserialize, Serialize};

pub const DEFAULT_IMAGE_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

#[derive(Clone, Debug, Serialize)]
pub enum ImageProvider {
    OpenAi {
        api_key: String,
        base_url: String,
        model: String,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

impl ImageGenerationRequest {
    pub fn dish_photo(model: &str, prompt: String) -> Self {
        Self {
            model: model.to_string(),
            prompt,
            n: 1,
            size: "1024x1024".to_string(),
            quality: Some("standard".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneratedImage {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub created: Option<u64>,
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
}

impl ImageGenerationResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.data.first().and_then(|image| image.url.as_deref())
    }
}
