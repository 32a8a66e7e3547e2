use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub transcription: TranscriptionSettings,
    #[serde(default)]
    pub cards: CardSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub limits: LimitSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Loads an optional `config/{environment}` file overlaid with
    /// `CARDSMITH`-prefixed environment variables.
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.as_str())).required(false),
            )
            .add_source(EnvironmentSource::with_prefix("CARDSMITH").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[default]
    Local,
    #[serde(rename = "openai")]
    OpenAi,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    #[serde(default)]
    pub provider: TranscriptionProviderSetting,
    #[serde(default = "default_whisper_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            provider: TranscriptionProviderSetting::Local,
            model: default_whisper_model(),
            api_key: None,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_card_model")]
    pub model: String,
    #[serde(default = "default_num_cards")]
    pub default_num_cards: usize,
}

impl Default for CardSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_card_model(),
            default_num_cards: default_num_cards(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_deck_name")]
    pub default_deck_name: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_deck_name: default_deck_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_upload_mb: default_max_upload_mb(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsSettings {
    /// Exact origins allowed to call the API; empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub json_format: bool,
    #[serde(default)]
    pub directives: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_whisper_model() -> String {
    "openai/whisper-base".to_string()
}

fn default_card_model() -> String {
    "gemini-1.5-pro-latest".to_string()
}

fn default_num_cards() -> usize {
    10
}

fn default_deck_name() -> String {
    "Cardsmith Export".to_string()
}

fn default_max_upload_mb() -> usize {
    50
}
