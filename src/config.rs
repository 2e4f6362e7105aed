use std::time::Duration;

use secstr::SecUtf8;
use serde::{Deserialize, Deserializer};

/// Settings read from `GHFEED_*` environment variables (and `.env`).
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_secutf8")]
    pub token: Option<SecUtf8>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed("GHFEED_").from_env()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn deserialize_opt_secutf8<'de, D>(de: D) -> Result<Option<SecUtf8>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de)
        .map(|o| o.filter(|s| !s.is_empty()).map(SecUtf8::from))
}
