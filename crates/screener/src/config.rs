//! Application configuration: API keys and store credentials.
//!
//! Read from `config.json` when present; anything it leaves out falls back
//! to the environment.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Value shipped in the sample config; treated as no key at all.
pub const CRUSTDATA_KEY_PLACEHOLDER: &str = "YOUR_CRUSTDATA_API_KEY_HERE";

pub const CRUSTDATA_KEY_ENV: &str = "CRUSTDATA_API_KEY";
pub const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_ENV: &str = "SUPABASE_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Crust Data enrichment key
    pub api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
}

fn usable(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != CRUSTDATA_KEY_PLACEHOLDER)
}

impl AppConfig {
    /// Load `path` (a missing file is fine) and fill gaps from the process
    /// environment.
    pub fn load(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            debug!("No config file at {}, using environment only", path.display());
            Self::default()
        };
        Ok(config.with_env_fallback(|name| std::env::var(name).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Fill every unset (or placeholder) value from `lookup`.
    pub fn with_env_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fill = |slot: &mut Option<String>, name: &str| {
            if usable(slot).is_none() {
                if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                    *slot = Some(value);
                }
            }
        };
        fill(&mut self.api_key, CRUSTDATA_KEY_ENV);
        fill(&mut self.openai_api_key, OPENAI_KEY_ENV);
        fill(&mut self.supabase_url, SUPABASE_URL_ENV);
        fill(&mut self.supabase_key, SUPABASE_KEY_ENV);
        self
    }

    pub fn crustdata_api_key(&self) -> Option<&str> {
        usable(&self.api_key)
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        usable(&self.openai_api_key)
    }

    /// URL and key, only when both are set.
    pub fn supabase(&self) -> Option<(&str, &str)> {
        Some((usable(&self.supabase_url)?, usable(&self.supabase_key)?))
    }

    pub fn require_crustdata_api_key(&self) -> Result<&str> {
        match self.crustdata_api_key() {
            Some(key) => Ok(key),
            None => bail!("Crust Data API key not configured. Add 'api_key' to config.json or set {CRUSTDATA_KEY_ENV}"),
        }
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        match self.openai_api_key() {
            Some(key) => Ok(key),
            None => bail!("OpenAI API key not configured. Add 'openai_api_key' to config.json or set {OPENAI_KEY_ENV}"),
        }
    }

    pub fn require_supabase(&self) -> Result<(&str, &str)> {
        match self.supabase() {
            Some(credentials) => Ok(credentials),
            None => bail!(
                "Supabase not configured. Add 'supabase_url' and 'supabase_key' to config.json or set {SUPABASE_URL_ENV} and {SUPABASE_KEY_ENV}"
            ),
        }
    }
}
