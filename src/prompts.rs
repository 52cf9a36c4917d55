//! Prompt templates for the model calls.
//!
//! Everything here is a pure string transformation: absent optional inputs
//! are replaced by fixed placeholder phrases instead of raising errors.

use crate::models::WeatherReading;

pub const WARDROBE_DELIMITER: &str = "; ";
pub const PREFERENCE_DELIMITER: &str = ", ";
pub const WEATHER_SEPARATOR: &str = ", ";

/// Upper bound (in characters) of the outfit description embedded in the image prompt.
pub const IMAGE_DESCRIPTION_MAX_CHARS: usize = 400;

pub const NO_PREFERENCES: &str = "no special preferences (treat it as an everyday style)";
pub const NO_STYLE_PROFILE: &str = "no inspiration photo analysis available (assume a neutral style)";
pub const NO_WEATHER: &str = "no weather information (assume neutral conditions).";

pub fn wardrobe_text(wardrobe: &[String]) -> String {
    wardrobe.join(WARDROBE_DELIMITER)
}

pub fn preferences_text(preferences: &[String]) -> String {
    if preferences.is_empty() {
        NO_PREFERENCES.to_string()
    } else {
        preferences.join(PREFERENCE_DELIMITER)
    }
}

pub fn style_profile_text(style_profile: Option<&str>) -> String {
    match style_profile {
        Some(profile) if !profile.is_empty() => profile.to_string(),
        _ => NO_STYLE_PROFILE.to_string(),
    }
}

/// Temperature clause first, then the condition clause.
pub fn weather_text(weather: Option<&WeatherReading>) -> String {
    let Some(weather) = weather else {
        return NO_WEATHER.to_string();
    };

    let mut parts = Vec::new();
    if let Some(t) = weather.temperature_c.filter(|t| t.is_finite()) {
        parts.push(format!("temperature around {t}°C"));
    }
    if let Some(condition) = weather.condition.as_deref().filter(|c| !c.is_empty()) {
        parts.push(format!("conditions: {condition}"));
    }

    if parts.is_empty() {
        NO_WEATHER.to_string()
    } else {
        parts.join(WEATHER_SEPARATOR)
    }
}

pub fn outfit_prompt(
    wardrobe: &[String],
    preferences: &[String],
    style_profile: Option<&str>,
    weather: Option<&WeatherReading>,
) -> String {
    let wardrobe = wardrobe_text(wardrobe);
    let preferences = preferences_text(preferences);
    let style = style_profile_text(style_profile);
    let weather = weather_text(weather);

    format!(
        r#"You are a virtual stylist in a wardrobe app. Your task is to put together an outfit using only the user's own wardrobe.

WARDROBE (items the user actually owns):
{wardrobe}

PREFERENCES (entered by the user):
{preferences}

STYLE FROM INSPIRATION PHOTOS (vision analysis):
{style}

WEATHER CONDITIONS (VERY IMPORTANT):
{weather}

RULES:
1. The outfit MUST BE REALISTIC AND PRACTICAL for the weather above.
   - If the temperature is below 10°C or there is rain, snow or wind, include warmer layers, closed shoes and outerwear.
   - If the temperature is above 20°C or it is hot, prefer light fabrics and airy cuts, with no heavy winter pieces.
2. Use ONLY items from the wardrobe. Do not invent new garments, colours or cuts that are not on the list.
3. If something important is missing from the wardrobe (e.g. rain boots), do NOT add it to the outfit. Mention it only in the "WARDROBE GAPS" section as a general suggestion.
4. Match the outfit to the user's preferences and inspiration style, but never break the weather rules.
5. Write in a friendly tone, without emoji.

RESPONSE FORMAT:
TODAY'S OUTFIT:
- A short overall description (1-2 sentences).

OUTFIT ITEMS:
- A bulleted list of wardrobe items (exactly as written above), each with a short reason why it fits.

OCCASION:
- 1 sentence on which situation this outfit suits best.

WEATHER AND THE OUTFIT:
- 1-2 sentences explaining why this set works for: {weather}.

WARDROBE GAPS:
- 1-3 sentences suggesting which TYPES of clothing are missing (e.g. "a waterproof jacket is missing") to open up more options. These are shopping recommendations, not outfit items.

STYLIST TIP:
- 1-2 sentences of advice personalised to the user and their style.
"#
    )
}

/// Built from the first `IMAGE_DESCRIPTION_MAX_CHARS` characters of the generated description.
pub fn outfit_image_prompt(description: &str, weather: Option<&WeatherReading>) -> String {
    let short: String = description.chars().take(IMAGE_DESCRIPTION_MAX_CHARS).collect();
    let weather = weather_text(weather);

    format!(
        "Full-body clothing outfit.

CONSIDER THE WEATHER CONDITIONS:
- {weather}

CONSIDER THE OUTFIT DESCRIPTION:
{short}

Rules:
- the clothing must suit the stated weather conditions,
- a neutral figure,
- realistic body proportions,
- a simple or blurred background."
    )
}

pub fn garment_vision_prompt() -> &'static str {
    "Based on the photo, describe ONE main garment visible in it.
Write a single short sentence in this form:
\"black leather block-heel ankle boots, autumn-winter, casual-rock style\".

Include:
- the garment type (e.g. ankle boots, coat, dress, trousers),
- the colour,
- the material or cut if visible (e.g. oversize, fitted, leather),
- the season (e.g. spring, summer, autumn-winter),
- the style (e.g. elegant, casual, sporty, basic).

Do not add any comments, headings or lists.
Only one descriptive sentence about the garment, without emoji."
}

pub fn style_vision_prompt() -> &'static str {
    "Based on the inspiration photo, describe the user's style, colour palette and vibe.

Write concisely, in a few short parts:

1) STYLE / VIBE - 1-2 sentences (e.g. \"minimalist, elegant, with a touch of French chic\").
2) COLOUR PALETTE - 1-2 sentences (dominant colours, warm or cool, contrasting or muted).
3) CUTS - 1-2 sentences (e.g. oversize, fitted, straight, loose, waist-defining).
4) OCCASIONS - 1-2 sentences (which situations the style suits: work, city, date, everyday).

No emoji and no headings such as \"Answer:\"."
}

pub fn wardrobe_gaps_prompt(wardrobe: &[String]) -> String {
    let wardrobe = wardrobe_text(wardrobe);

    format!(
        "You are a professional virtual stylist in a fashion app.
Your task is to review the user's wardrobe and point out what is missing.

WARDROBE:
{wardrobe}

ASSESS:
1. Which key items are missing from the wardrobe? (e.g. footwear, outerwear, basic tops, accessories)
2. Split the gaps into clear categories (e.g. Elegant / Basic / Outdoor / Footwear / Accessories).
3. For each category list 2-4 items that would broaden the styling options.
4. Be short and concrete, without inventing specific product models.

RESPONSE FORMAT:
WARDROBE GAPS:
- bullet points

CATEGORIES:
- Category: proposals

SHOPPING HINTS:
- general advice on what to look for (no specific links)
"
    )
}
