use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

/// Fields of the wrong shape are treated as absent rather than rejected.
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutfitRequest {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub wardrobe: Option<Vec<String>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub preferences: Option<Vec<String>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub style_profile: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub weather: Option<WeatherReading>,
}

/// Only used to bias prompt text; values are never checked for plausibility.
#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub condition: Option<String>,
}

/// `description` is always populated, even on the failure path.
/// `image_url` is `None` whenever no image was produced.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub description: String,
    pub image_url: Option<String>,
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GapsRequest {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub wardrobe: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GapsResponse {
    pub gaps: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DescriptionResponse {
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfileResponse {
    pub style_profile: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub error: String,
}

/// An image received from the browser, kept in memory for one request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self { content_type: content_type.into(), bytes: bytes.into() }
    }

    pub fn data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{}", self.content_type, encoded)
    }
}
