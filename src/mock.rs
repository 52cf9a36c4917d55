use async_trait::async_trait;
use parking_lot::Mutex;

use crate::models::ImageUpload;
use crate::openai::{ModelBackend, ModelError};

/// 1x1 transparent PNG.
pub const TINY_PNG_B64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Scripted stand-in for the model API.
pub struct MockBackend {
    text_reply: Option<String>,
    fail_text: bool,
    image_reply: Option<String>,
    fail_image: bool,
    text_prompts: Mutex<Vec<String>>,
    image_prompts: Mutex<Vec<String>>,
    described: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            text_reply: Some("TODAY'S OUTFIT: a mock outfit from your wardrobe.".to_string()),
            fail_text: false,
            image_reply: Some(TINY_PNG_B64.to_string()),
            fail_image: false,
            text_prompts: Mutex::new(Vec::new()),
            image_prompts: Mutex::new(Vec::new()),
            described: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_reply = Some(text.into());
        self
    }

    /// The API answers, but with no decodable text.
    pub fn without_text(mut self) -> Self {
        self.text_reply = None;
        self
    }

    pub fn failing_text(mut self) -> Self {
        self.fail_text = true;
        self
    }

    pub fn without_image(mut self) -> Self {
        self.image_reply = None;
        self
    }

    pub fn failing_image(mut self) -> Self {
        self.fail_image = true;
        self
    }

    pub fn text_prompts(&self) -> Vec<String> {
        self.text_prompts.lock().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().clone()
    }

    /// Content types of the images passed to `describe_image`.
    pub fn described_images(&self) -> Vec<String> {
        self.described.lock().clone()
    }

    fn text_outcome(&self) -> Result<Option<String>, ModelError> {
        if self.fail_text {
            return Err(ModelError::Http("simulated text generation failure".to_string()));
        }
        Ok(self.text_reply.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelBackend for MockBackend {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, ModelError> {
        self.text_prompts.lock().push(prompt.to_string());
        self.text_outcome()
    }

    async fn describe_image(&self, prompt: &str, image: &ImageUpload) -> Result<Option<String>, ModelError> {
        self.text_prompts.lock().push(prompt.to_string());
        self.described.lock().push(image.content_type.clone());
        self.text_outcome()
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ModelError> {
        self.image_prompts.lock().push(prompt.to_string());
        if self.fail_image {
            return Err(ModelError::Http("simulated image generation failure".to_string()));
        }
        self.image_reply.clone().ok_or(ModelError::MissingImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_prompts() {
        let mock = MockBackend::new().with_text("hello");
        assert_eq!(mock.generate_text("p1").await.unwrap().as_deref(), Some("hello"));
        assert_eq!(mock.generate_image("p2").await.unwrap(), TINY_PNG_B64);
        assert_eq!(mock.text_prompts(), vec!["p1".to_string()]);
        assert_eq!(mock.image_prompts(), vec!["p2".to_string()]);
    }

    #[tokio::test]
    async fn failure_switches() {
        let mock = MockBackend::new().failing_text().without_image();
        assert!(mock.generate_text("p").await.is_err());
        assert!(matches!(mock.generate_image("p").await, Err(ModelError::MissingImage)));
    }
}
