//! Orchestration of the model-backed endpoints.
//!
//! Each function returns `Err` only when the primary model call fails;
//! the HTTP layer turns that into a server error with a fixed message.

use tracing::{error, info, warn};

use crate::models::{GenerationResult, ImageUpload, OutfitRequest, WeatherReading};
use crate::openai::{image_data_url, preview, ModelBackend, ModelError};
use crate::prompts;

pub const EMPTY_WARDROBE_MESSAGE: &str = "Add some clothes to your wardrobe first to generate an outfit.";
pub const OUTFIT_UNREADABLE: &str = "Could not read the AI response.";
pub const OUTFIT_FAILED: &str = "The AI service ran into an error. Please try again in a moment.";

pub const GARMENT_UNREADABLE: &str = "Could not read a garment description from the photo.";
pub const GARMENT_FAILED: &str = "Could not analyze the photo. Check the API limits or try again later.";

pub const STYLE_UNREADABLE: &str = "Could not read a style from the inspirations.";
pub const STYLE_FAILED: &str = "Could not analyze the inspirations. Please try again later.";

pub const GAPS_EMPTY_WARDROBE: &str = "No clothes in the wardrobe, so there is nothing to analyze for gaps.";
pub const GAPS_UNREADABLE: &str = "Could not analyze the wardrobe gaps.";
pub const GAPS_FAILED: &str = "An error occurred during the wardrobe gap analysis.";

/// Empty wardrobe → instructional message without calling the model.
/// Text generation failure → `Err`. Image generation failure → `image_url: None`.
pub async fn generate_outfit(
    backend: &dyn ModelBackend,
    request: &OutfitRequest,
) -> Result<GenerationResult, ModelError> {
    let wardrobe = request.wardrobe.as_deref().unwrap_or_default();
    if wardrobe.is_empty() {
        info!("Outfit requested for an empty wardrobe, skipping model calls");
        return Ok(GenerationResult { description: EMPTY_WARDROBE_MESSAGE.to_string(), image_url: None });
    }

    let preferences = request.preferences.as_deref().unwrap_or_default();
    let weather = request.weather.as_ref();

    info!("🚀 Generating outfit from {} wardrobe items", wardrobe.len());
    let prompt = prompts::outfit_prompt(wardrobe, preferences, request.style_profile.as_deref(), weather);
    let description = backend
        .generate_text(&prompt)
        .await
        .inspect_err(|e| error!("❌ Outfit text generation failed: {}", e))?
        .unwrap_or_else(|| OUTFIT_UNREADABLE.to_string());
    info!("✅ Outfit description generated ({} chars)", description.len());

    let image_url = match render_outfit_image(backend, &description, weather).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!("⚠️ Outfit image generation failed, responding without image: {}", e);
            None
        }
    };

    Ok(GenerationResult { description, image_url })
}

async fn render_outfit_image(
    backend: &dyn ModelBackend,
    description: &str,
    weather: Option<&WeatherReading>,
) -> Result<String, ModelError> {
    let prompt = prompts::outfit_image_prompt(description, weather);
    let image = backend.generate_image(&prompt).await?;
    let url = image_data_url(&image);
    info!("🖼️ Outfit image ready: {}", preview(&url));
    Ok(url)
}

pub async fn analyze_garment(backend: &dyn ModelBackend, image: &ImageUpload) -> Result<String, ModelError> {
    let text = backend
        .describe_image(prompts::garment_vision_prompt(), image)
        .await
        .inspect_err(|e| error!("❌ Garment photo analysis failed: {}", e))?;
    Ok(text.unwrap_or_else(|| GARMENT_UNREADABLE.to_string()))
}

pub async fn analyze_style(backend: &dyn ModelBackend, image: &ImageUpload) -> Result<String, ModelError> {
    let text = backend
        .describe_image(prompts::style_vision_prompt(), image)
        .await
        .inspect_err(|e| error!("❌ Inspiration analysis failed: {}", e))?;
    Ok(text.unwrap_or_else(|| STYLE_UNREADABLE.to_string()))
}

/// The caller rejects an empty wardrobe before calling this.
pub async fn wardrobe_gaps(backend: &dyn ModelBackend, wardrobe: &[String]) -> Result<String, ModelError> {
    let prompt = prompts::wardrobe_gaps_prompt(wardrobe);
    let text = backend
        .generate_text(&prompt)
        .await
        .inspect_err(|e| error!("❌ Wardrobe gap analysis failed: {}", e))?;
    Ok(text.unwrap_or_else(|| GAPS_UNREADABLE.to_string()))
}
