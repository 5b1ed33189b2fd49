use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data_base64: String,
}

impl GeneratedImage {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data_base64)
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedImage, ImageGeneratorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageGeneratorError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("no image in response")]
    NoImageReturned,
    #[error("image payload is not valid base64: {0}")]
    InvalidImageData(String),
}
