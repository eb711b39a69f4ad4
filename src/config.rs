use serde::Deserialize;
use std::path::Path;

use crate::utils::DEFAULT_PAGE_SIZE;

pub const DEFAULT_UPSTREAM_URL: &str =
    "https://newsapi.timesmed.com/WebAPI/getnewslist?siteId=9&language=English";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Feed endpoint the proxy forwards to
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Page size for news, blog, category and video listings
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
    /// Galleries render larger, so they get their own page size
    #[serde(default = "default_gallery_items_per_page")]
    pub gallery_items_per_page: usize,
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_items_per_page() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_gallery_items_per_page() -> usize {
    6
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: default_upstream_url(),
            listen_addr: default_listen_addr(),
            items_per_page: default_items_per_page(),
            gallery_items_per_page: default_gallery_items_per_page(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file means "all defaults".
    /// A file that exists and fails to parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply the `UPSTREAM_URL` override, the only environment-driven setting.
    pub fn with_env_overrides(self) -> Self {
        self.with_upstream_override(std::env::var("UPSTREAM_URL").ok())
    }

    fn with_upstream_override(mut self, upstream_url: Option<String>) -> Self {
        if let Some(url) = upstream_url.filter(|u| !u.trim().is_empty()) {
            self.upstream_url = url;
        }
        self
    }
}
