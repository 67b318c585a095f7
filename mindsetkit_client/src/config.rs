use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server origin, e.g. `https://www.mindsetkit.org`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path every resource operation is rooted at.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log every failed request.
    #[serde(default)]
    pub debug: bool,

    /// Report identities to analytics.
    #[serde(default)]
    pub production: bool,

    /// Public domain used when building share links.
    #[serde(default = "default_hosting_domain")]
    pub hosting_domain: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_prefix: default_api_prefix(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            debug: false,
            production: false,
            hosting_domain: default_hosting_domain(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            base_url: sanitize_base_url(base_url.into())?,
            ..Self::default()
        })
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Reads a TOML file. Missing keys fall back to their defaults and
    /// environment variables still take precedence.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: ClientConfig = toml::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.base_url = sanitize_base_url(config.base_url)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Uses `<config dir>/mindsetkit/config.toml` when present, the
    /// environment otherwise.
    pub fn discover() -> Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Self::from_env(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Absolute URL for a path below the API prefix.
    pub fn api_url(&self, path: &str) -> Result<Url> {
        let prefix = self.api_prefix.trim_matches('/');
        let path = path.trim_start_matches('/');
        let joined = if prefix.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else {
            format!("{}/{}/{}", self.base_url, prefix, path)
        };
        Url::parse(&joined).context("invalid API URL")
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = env::var("MSK_BASE_URL") {
            self.base_url = sanitize_base_url(raw)?;
        }
        if let Some(size) = env::var("MSK_PAGE_SIZE")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.page_size = size;
        }
        if let Some(secs) = env::var("MSK_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
        {
            self.timeout_secs = secs;
        }
        if let Ok(raw) = env::var("MSK_DEBUG") {
            self.debug = parse_flag(&raw);
        }
        if let Ok(raw) = env::var("MSK_PRODUCTION") {
            self.production = parse_flag(&raw);
        }
        if let Ok(domain) = env::var("MSK_HOSTING_DOMAIN") {
            self.hosting_domain = domain;
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mindsetkit").join("config.toml"))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub(crate) fn sanitize_base_url(mut base: String) -> Result<String> {
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    while base.ends_with('/') {
        base.pop();
    }
    let _ = Url::parse(&base).context("invalid base URL")?;
    Ok(base)
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_api_prefix() -> String {
    "/api/".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_hosting_domain() -> String {
    "www.mindsetkit.org".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sanitize_adds_scheme_and_strips_slashes() {
        let base = sanitize_base_url("example.org//".into()).unwrap();
        assert_eq!(base, "http://example.org");
    }

    #[test]
    fn api_url_joins_prefix() {
        let config = ClientConfig::new("https://msk.test/").unwrap();
        let url = config.api_url("/practices/Practice_1").unwrap();
        assert_eq!(url.as_str(), "https://msk.test/api/practices/Practice_1");
    }

    #[test]
    fn load_fills_missing_keys_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url = \"msk.test\"\ndebug = true").unwrap();
        let config = ClientConfig::load(file.path()).unwrap();
        assert!(config.base_url.ends_with("msk.test") || std::env::var("MSK_BASE_URL").is_ok());
        assert_eq!(config.api_prefix, "/api/");
        assert!(config.timeout_secs > 0);
    }

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("no"));
    }
}
