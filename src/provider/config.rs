use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str =
    "https://pinterest-downloader-download-pinterest-image-video-and-reels.p.rapidapi.com/pins/info";
pub const DEFAULT_API_HOST: &str =
    "pinterest-downloader-download-pinterest-image-video-and-reels.p.rapidapi.com";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_USER_AGENT: &str = "pinfetch/0.1";
const CONFIG_FILE: &str = "provider.toml";

/// Upstream provider settings. Read from `provider.toml`, then overridden by
/// `PINFETCH_*` environment variables.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub api_host: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_host: DEFAULT_API_HOST.to_string(),
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("api_host", &self.api_host)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ProviderConfig {
    /// Load from `path`, or from the default config location if it exists.
    /// Environment variables win over file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };
        let mut cfg = match file {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading provider config: {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("parsing provider config: {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        if let Some(v) = var("PINFETCH_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = var("PINFETCH_API_HOST") {
            self.api_host = v;
        }
        if let Some(v) = var("PINFETCH_ENDPOINT") {
            self.endpoint = v;
        }
        if let Some(v) = var("PINFETCH_TIMEOUT_MS").and_then(|s| s.parse().ok()) {
            self.timeout_ms = v;
        }
    }

    /// The provider key; a missing key is a configuration error.
    pub fn require_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(k) if !k.is_empty() => Ok(k),
            _ => bail!(
                "no provider API key configured (set PINFETCH_API_KEY or api_key in {CONFIG_FILE})"
            ),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "pinfetch", "pinfetch")
        .map(|p| p.config_dir().join(CONFIG_FILE))
}
