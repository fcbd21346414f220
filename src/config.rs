use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_HEADLINES_SOURCE: &str = "bbc-news";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("invalid bind address {addr:?}: {source}")]
    InvalidBindAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration, read once at startup and handed to the router.
#[derive(Clone)]
pub struct Config {
    pub news_api_key: String,
    pub news_api_base_url: String,
    pub headlines_source: String,
    pub bind_addr: SocketAddr,
    pub assets_dir: PathBuf,
    /// `None` means the built-in page template.
    pub template_path: Option<PathBuf>,
}

// The access key must never end up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("news_api_key", &"<redacted>")
            .field("news_api_base_url", &self.news_api_base_url)
            .field("headlines_source", &self.headlines_source)
            .field("bind_addr", &self.bind_addr)
            .field("assets_dir", &self.assets_dir)
            .field("template_path", &self.template_path)
            .finish()
    }
}

impl Config {
    /// Build the configuration from the process environment.
    /// Loads a `.env` file first if one is present.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenvy::dotenv().ok();

        let bind = get_env_or_default("BIND_ADDR", DEFAULT_BIND_ADDR);
        Ok(Config {
            news_api_key: get_env("NEWS_API_KEY")?,
            news_api_base_url: get_env_or_default("NEWS_API_BASE_URL", DEFAULT_BASE_URL),
            headlines_source: get_env_or_default("NEWS_HEADLINES_SOURCE", DEFAULT_HEADLINES_SOURCE),
            bind_addr: parse_bind_addr(&bind)?,
            assets_dir: PathBuf::from(get_env_or_default("ASSETS_DIR", DEFAULT_ASSETS_DIR)),
            template_path: env::var("TEMPLATE_PATH").ok().map(PathBuf::from),
        })
    }

    /// Configuration pointing at an arbitrary upstream, used by tests and
    /// local tooling.
    pub fn for_upstream(base_url: &str, api_key: &str) -> Config {
        Config {
            news_api_key: api_key.to_string(),
            news_api_base_url: base_url.to_string(),
            headlines_source: DEFAULT_HEADLINES_SOURCE.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            template_path: None,
        }
    }
}

pub fn parse_bind_addr(addr: &str) -> Result<SocketAddr, ConfigError> {
    addr.parse().map_err(|source| ConfigError::InvalidBindAddr {
        addr: addr.to_string(),
        source,
    })
}

fn get_env(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
