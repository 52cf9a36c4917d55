//! Shop suggestions: search links built from wardrobe gaps. No inventory lookup happens.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};
use thiserror::Error;

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, as browsers' `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone)]
pub struct ShopConfig {
    pub search_base_url: String,
    pub default_store: String,
    pub default_currency: String,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            search_base_url: "https://www.reserved.com/pl/pl/search?searchPhrase=".to_string(),
            default_store: "Reserved".to_string(),
            default_currency: "PLN".to_string(),
        }
    }
}

#[serde_as]
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShopRequest {
    #[serde(default)]
    pub gaps: Option<Vec<String>>,
    /// A number or a numeric string such as `"120"`. Only positive budgets are echoed
    /// back as `approxPrice`; zero, negatives and anything unparseable become `None`.
    #[serde_as(deserialize_as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub budget_per_item: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub preferred_store: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShopSuggestion {
    pub gap: String,
    pub store: String,
    pub approx_price: Option<f64>,
    pub currency: String,
    pub search_url: String,
    pub note: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ShopSuggestionsResponse {
    pub suggestions: Vec<ShopSuggestion>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ShopError {
    #[error("No list of wardrobe gaps (gaps) was provided.")]
    NoGaps,
}

pub fn search_url(base: &str, gap: &str) -> String {
    format!("{}{}", base, utf8_percent_encode(gap, COMPONENT))
}

pub fn suggest(request: &ShopRequest, config: &ShopConfig) -> Result<Vec<ShopSuggestion>, ShopError> {
    let gaps: Vec<&str> = request
        .gaps
        .iter()
        .flatten()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .collect();
    if gaps.is_empty() {
        return Err(ShopError::NoGaps);
    }

    let store = non_blank(&request.preferred_store).unwrap_or(config.default_store.as_str());
    let currency = non_blank(&request.currency).unwrap_or(config.default_currency.as_str());
    let approx_price = request.budget_per_item.filter(|b| b.is_finite() && *b > 0.0);
    if let Some(country) = non_blank(&request.country) {
        tracing::debug!(%country, "shop suggestions requested for country");
    }

    Ok(gaps
        .into_iter()
        .map(|gap| ShopSuggestion {
            gap: gap.to_string(),
            store: store.to_string(),
            approx_price,
            currency: currency.to_string(),
            search_url: search_url(&config.search_base_url, gap),
            note: format!(
                "This is a link to a {store} search based on what you are looking for. You can refine it directly on the store's website."
            ),
        })
        .collect())
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
