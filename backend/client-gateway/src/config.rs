use doc_store::StoreConfig;
use feed_service::FeedConfig;
use identity_service::IdentityConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub store: StoreConfig,
    pub identity: IdentityConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Load every section from the environment; unset variables use defaults
    pub fn from_env() -> Result<Self, envy::Error> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: std::env::var("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(LogFormat::Json),
        };

        Ok(Config {
            app,
            store: StoreConfig::from_env()?,
            identity: IdentityConfig::from_env()?,
            feed: FeedConfig::from_env()?,
        })
    }
}
