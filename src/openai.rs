use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use serde_with::{serde_as, DefaultOnNull};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::OpenAiConfig;
use crate::models::ImageUpload;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("no image data in response")]
    MissingImage,
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,
}

/// The external model API as the request handlers see it.
///
/// `Ok(None)` from the text calls means the API answered but no generated
/// text could be decoded from the reply; callers substitute a fallback.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, ModelError>;

    async fn describe_image(&self, prompt: &str, image: &ImageUpload) -> Result<Option<String>, ModelError>;

    /// Returns the generated image as base64.
    async fn generate_image(&self, prompt: &str) -> Result<String, ModelError>;
}

pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self { client: Client::new(), config }
    }

    fn api_key(&self) -> Result<&str, ModelError> {
        self.config.api_key.as_deref().filter(|k| !k.is_empty()).ok_or(ModelError::MissingApiKey)
    }

    async fn post(&self, path: &str, body: &serde_json::Value) -> Result<String, ModelError> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        info!("🔗 Making request to: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ModelError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await.map_err(|e| ModelError::Http(e.to_string()))?;
        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(ModelError::Api { status: status.as_u16(), body: response_text });
        }
        Ok(response_text)
    }

    async fn responses(&self, input: serde_json::Value, model: &str) -> Result<Option<String>, ModelError> {
        let request_body = json!({ "model": model, "input": input });
        let response_text = self.post("/responses", &request_body).await?;
        Ok(decode_response_text(&response_text))
    }
}

#[async_trait]
impl ModelBackend for OpenAiClient {
    async fn generate_text(&self, prompt: &str) -> Result<Option<String>, ModelError> {
        info!("Generating text with {}...", self.config.text_model);
        self.responses(json!(prompt), &self.config.text_model).await
    }

    async fn describe_image(&self, prompt: &str, image: &ImageUpload) -> Result<Option<String>, ModelError> {
        info!("Describing {} image ({} bytes) with {}...", image.content_type, image.bytes.len(), self.config.vision_model);
        let input = json!([{
            "role": "user",
            "content": [
                { "type": "input_text", "text": prompt },
                { "type": "input_image", "image_url": image.data_url() }
            ]
        }]);
        self.responses(input, &self.config.vision_model).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ModelError> {
        info!("Generating image with {}...", self.config.image_model);
        let request_body = json!({
            "model": self.config.image_model,
            "prompt": prompt,
            "size": self.config.image_size,
        });
        let response_text = self.post("/images/generations", &request_body).await?;

        let image = decode_image_b64(&response_text).ok_or(ModelError::MissingImage)?;
        info!("🖼️ Extracted {} image from API response: {}", image_kind(&image), preview(&image));
        Ok(image)
    }
}

// --- Response Parsing Helpers ---

#[serde_as]
#[derive(Debug, Deserialize, Default)]
struct ResponsesReply {
    #[serde(default)]
    output_text: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    output: Vec<OutputItem>,
}

/// Reasoning and tool items may carry `"content": null`.
#[serde_as]
#[derive(Debug, Deserialize, Default)]
struct OutputItem {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize, Default)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesReply {
    /// `output_text` wins; otherwise the first text part in reading order.
    fn into_text(self) -> Option<String> {
        let non_blank = |t: &String| !t.trim().is_empty();
        self.output_text.filter(non_blank).or_else(|| {
            self.output
                .into_iter()
                .flat_map(|item| item.content)
                .filter_map(|part| part.text)
                .find(non_blank)
        })
    }
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct ImagesReply {
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    #[serde(default)]
    b64_json: Option<String>,
}

pub(crate) fn decode_response_text(body: &str) -> Option<String> {
    match serde_json::from_str::<ResponsesReply>(body) {
        Ok(reply) => {
            let text = reply.into_text();
            if text.is_none() {
                warn!("⚠️ No generated text found in response structure");
            }
            text
        }
        Err(e) => {
            warn!("⚠️ Could not decode model response: {}", e);
            None
        }
    }
}

fn decode_image_b64(body: &str) -> Option<String> {
    let reply: ImagesReply = match serde_json::from_str(body) {
        Ok(reply) => reply,
        Err(e) => {
            warn!("⚠️ Could not decode image response: {}", e);
            return None;
        }
    };
    reply.data.into_iter().filter_map(|d| d.b64_json).find(|b| !b.is_empty())
}

/// Sniffs the image format from the leading base64 characters.
pub fn image_kind(image_b64: &str) -> &'static str {
    if image_b64.starts_with("/9j/") {
        "jpeg"
    } else if image_b64.starts_with("UklGR") {
        "webp"
    } else {
        "png"
    }
}

pub fn image_data_url(image_b64: &str) -> String {
    format!("data:image/{};base64,{}", image_kind(image_b64), image_b64)
}

pub fn preview(data: &str) -> String {
    match data.char_indices().nth(50) {
        Some((cut, _)) => format!("{}...[{} chars total]", &data[..cut], data.len()),
        None => data.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(OpenAiConfig {
            api_key: Some("test-key".to_string()),
            base_url: server.uri(),
            ..OpenAiConfig::default()
        })
    }

    #[test]
    fn decoder_prefers_output_text() {
        let body = r#"{"output_text":"flat","output":[{"content":[{"text":"nested"}]}]}"#;
        assert_eq!(decode_response_text(body).as_deref(), Some("flat"));
    }

    #[test]
    fn decoder_skips_items_without_text() {
        let body = r#"{"output":[{"type":"reasoning","summary":[]},{"type":"message","content":[{"type":"output_text","text":"Outfit"}]}]}"#;
        assert_eq!(decode_response_text(body).as_deref(), Some("Outfit"));
    }

    #[test]
    fn decoder_tolerates_null_content() {
        let body = r#"{"output":[{"type":"reasoning","content":null},{"type":"message","content":[{"text":null},{"text":"Outfit"}]}]}"#;
        assert_eq!(decode_response_text(body).as_deref(), Some("Outfit"));
        assert_eq!(decode_response_text(r#"{"output":null}"#), None);
        assert_eq!(decode_image_b64(r#"{"data":null}"#), None);
    }

    #[test]
    fn decoder_falls_back_to_none() {
        assert_eq!(decode_response_text(r#"{"output":[]}"#), None);
        assert_eq!(decode_response_text("not json"), None);
        assert_eq!(decode_response_text(r#"{"output_text":"  "}"#), None);
    }

    #[test]
    fn image_kind_is_sniffed() {
        assert_eq!(image_data_url("iVBORw0KGgo"), "data:image/png;base64,iVBORw0KGgo");
        assert_eq!(image_kind("/9j/4AAQ"), "jpeg");
        assert_eq!(image_kind("UklGRiQ"), "webp");
    }

    #[test]
    fn preview_truncates_long_payloads() {
        let long = "A".repeat(120);
        assert_eq!(preview(&long), format!("{}...[120 chars total]", "A".repeat(50)));
        assert_eq!(preview("short"), "short");
    }

    #[tokio::test]
    async fn generate_text_posts_prompt_to_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_string_contains("two jackets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": [{ "content": [{ "type": "output_text", "text": "Wear the jacket." }] }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = client_for(&server).generate_text("two jackets").await.unwrap();
        assert_eq!(text.as_deref(), Some("Wear the jacket."));
    }

    #[tokio::test]
    async fn describe_image_sends_data_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(body_string_contains("data:image/png;base64,iVBORw=="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output_text": "white linen shirt, summer, basic style"
            })))
            .mount(&server)
            .await;

        let upload = ImageUpload::new("image/png", vec![0x89, 0x50, 0x4e, 0x47]);
        let text = client_for(&server).describe_image("describe", &upload).await.unwrap();
        assert_eq!(text.as_deref(), Some("white linen shirt, summer, basic style"));
    }

    #[tokio::test]
    async fn api_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client_for(&server).generate_text("hi").await.unwrap_err();
        assert!(matches!(err, ModelError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn generate_image_returns_b64_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .and(body_string_contains("gpt-image-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{ "b64_json": "iVBORw0KGgo" }]
            })))
            .mount(&server)
            .await;

        let image = client_for(&server).generate_image("outfit").await.unwrap();
        assert_eq!(image, "iVBORw0KGgo");
    }

    #[tokio::test]
    async fn generate_image_without_payload_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [{ "url": "https://x" }] })))
            .mount(&server)
            .await;

        let err = client_for(&server).generate_image("outfit").await.unwrap_err();
        assert!(matches!(err, ModelError::MissingImage));
    }

    #[tokio::test]
    async fn missing_api_key_short_circuits() {
        let client = OpenAiClient::new(OpenAiConfig::default());
        let err = client.generate_text("hi").await.unwrap_err();
        assert!(matches!(err, ModelError::MissingApiKey));
    }
}
