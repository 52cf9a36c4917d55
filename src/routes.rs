use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::{
    models::{
        DescriptionResponse, ErrorResponse, GapsRequest, GapsResponse, GenerationResult, ImageUpload,
        MessageResponse, OutfitRequest, StyleProfileResponse,
    },
    openai::ModelBackend,
    shop::{self, ShopConfig, ShopRequest, ShopSuggestionsResponse},
    stylist,
};

/// Maximum number of inspiration photos accepted per request.
pub const MAX_STYLE_IMAGES: usize = 5;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn ModelBackend>,
    pub shop: Arc<ShopConfig>,
}

impl AppState {
    pub fn new(backend: Arc<dyn ModelBackend>, shop: ShopConfig) -> Self {
        Self { backend, shop: Arc::new(shop) }
    }
}

pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Backend is running!".to_string() })
}

pub async fn analyze_image(State(state): State<AppState>, multipart: Multipart) -> Response {
    let Some(image) = collect_images(multipart, "image", 1).await.into_iter().next() else {
        return bad_request("No photo to analyze");
    };

    tracing::info!("🎯 Analyzing garment photo ({}, {} bytes)", image.content_type, image.bytes.len());
    match stylist::analyze_garment(state.backend.as_ref(), &image).await {
        Ok(description) => Json(DescriptionResponse { description }).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(DescriptionResponse { description: stylist::GARMENT_FAILED.to_string() }),
        )
            .into_response(),
    }
}

pub async fn analyze_style_images(State(state): State<AppState>, multipart: Multipart) -> Response {
    let images = collect_images(multipart, "images", MAX_STYLE_IMAGES).await;
    let Some(first) = images.first() else {
        return bad_request("No inspiration photos");
    };

    tracing::info!("🎯 Analyzing inspirations ({} received, using the first)", images.len());
    match stylist::analyze_style(state.backend.as_ref(), first).await {
        Ok(style_profile) => Json(StyleProfileResponse { style_profile }).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(StyleProfileResponse { style_profile: stylist::STYLE_FAILED.to_string() }),
        )
            .into_response(),
    }
}

pub async fn generate_outfit(
    State(state): State<AppState>,
    payload: Result<Json<OutfitRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejected(rejection),
    };
    match stylist::generate_outfit(state.backend.as_ref(), &body).await {
        Ok(result) => Json(result).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GenerationResult { description: stylist::OUTFIT_FAILED.to_string(), image_url: None }),
        )
            .into_response(),
    }
}

pub async fn wardrobe_gaps(
    State(state): State<AppState>,
    payload: Result<Json<GapsRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejected(rejection),
    };
    let wardrobe = body.wardrobe.unwrap_or_default();
    if wardrobe.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(GapsResponse { gaps: stylist::GAPS_EMPTY_WARDROBE.to_string() }),
        )
            .into_response();
    }

    tracing::info!("🎯 Analyzing gaps in a wardrobe of {} items", wardrobe.len());
    match stylist::wardrobe_gaps(state.backend.as_ref(), &wardrobe).await {
        Ok(gaps) => Json(GapsResponse { gaps }).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(GapsResponse { gaps: stylist::GAPS_FAILED.to_string() }),
        )
            .into_response(),
    }
}

pub async fn shop_suggestions(
    State(state): State<AppState>,
    payload: Result<Json<ShopRequest>, JsonRejection>,
) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejected(rejection),
    };
    match shop::suggest(&body, &state.shop) {
        Ok(suggestions) => {
            tracing::info!("🛍️ Built {} shop suggestions", suggestions.len());
            Json(ShopSuggestionsResponse { suggestions }).into_response()
        }
        Err(e) => bad_request(&e.to_string()),
    }
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse { error: "Not found".to_string() })).into_response()
}

/// Reads up to `limit` files from the multipart fields named `field_name`.
async fn collect_images(mut multipart: Multipart, field_name: &str, limit: usize) -> Vec<ImageUpload> {
    let mut images = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stopped reading multipart body");
                break;
            }
        };
        if field.name() != Some(field_name) || images.len() >= limit {
            continue;
        }
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        match field.bytes().await {
            Ok(bytes) if !bytes.is_empty() => images.push(ImageUpload::new(content_type, bytes)),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to read uploaded file");
                break;
            }
        }
    }
    images
}

/// Unreadable JSON bodies keep axum's status but get the JSON error shape.
fn rejected(rejection: JsonRejection) -> Response {
    tracing::warn!(status = %rejection.status(), "rejected request body: {}", rejection.body_text());
    (rejection.status(), Json(ErrorResponse { error: rejection.body_text() })).into_response()
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message.to_string() })).into_response()
}
