use std::env;
use std::path::PathBuf;

use crate::shop::ShopConfig;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub vision_model: String,
    pub image_model: String,
    pub image_size: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            text_model: "gpt-5.1".to_string(),
            vision_model: "gpt-4o-mini".to_string(),
            image_model: "gpt-image-1".to_string(),
            image_size: "1024x1024".to_string(),
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: non_blank(lookup, "OPENAI_API_KEY"),
            base_url: var_or(lookup, "OPENAI_API_BASE", defaults.base_url),
            text_model: var_or(lookup, "OPENAI_TEXT_MODEL", defaults.text_model),
            vision_model: var_or(lookup, "OPENAI_VISION_MODEL", defaults.vision_model),
            image_model: var_or(lookup, "OPENAI_IMAGE_MODEL", defaults.image_model),
            image_size: var_or(lookup, "OPENAI_IMAGE_SIZE", defaults.image_size),
        }
    }

    /// First characters of the key only, for startup logs.
    pub fn masked_key(&self) -> String {
        match &self.api_key {
            Some(key) => format!("{}...", key.chars().take(7).collect::<String>()),
            None => "<unset>".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub openai: OpenAiConfig,
    pub shop: ShopConfig,
    pub static_dir: Option<PathBuf>,
    /// `MOCK_MODEL=1` answers every model call with canned replies, for running the UI offline.
    pub mock_model: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let shop_defaults = ShopConfig::default();
        let shop = ShopConfig {
            search_base_url: var_or(lookup, "SHOP_SEARCH_BASE_URL", shop_defaults.search_base_url),
            default_store: var_or(lookup, "SHOP_DEFAULT_STORE", shop_defaults.default_store),
            default_currency: var_or(lookup, "SHOP_DEFAULT_CURRENCY", shop_defaults.default_currency),
        };

        let mock_model = non_blank(lookup, "MOCK_MODEL")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            port,
            openai: OpenAiConfig::from_lookup(lookup),
            shop,
            static_dir: non_blank(lookup, "STATIC_DIR").map(PathBuf::from),
            mock_model,
        }
    }
}

fn env_lookup(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn non_blank(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn var_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: String) -> String {
    non_blank(lookup, name).unwrap_or(default)
}
