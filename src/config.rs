use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::fetch::FeedQuery;
use crate::render::SiteKeys;

/// Everything one run needs, resolved before any network activity.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    pub webhook_url: Option<String>,
    pub public_base_url: Option<String>,
    pub feed: FeedQuery,
    pub site_dir: PathBuf,
    pub keys: SiteKeys,
    pub strict_panel: bool,
}

impl Settings {
    /// Fails when the API key is missing; nothing else is mandatory.
    pub fn validate(self) -> Result<Self> {
        if self.api_key.trim().is_empty() {
            bail!("GEMINI_API_KEY is not set (pass --api-key or export GEMINI_API_KEY)");
        }
        Ok(self)
    }

    pub fn template_path(&self) -> PathBuf {
        self.site_dir.join("template.html")
    }

    pub fn index_path(&self) -> PathBuf {
        self.site_dir.join("index.html")
    }

    pub fn used_titles_path(&self) -> PathBuf {
        self.site_dir.join("used_titles.json")
    }

    pub fn icons_dir(&self) -> PathBuf {
        self.site_dir.join("assets").join("icons")
    }

    /// Absolute link to an article, when a public base URL is configured.
    pub fn article_url(&self, file_name: &str) -> Option<String> {
        self.public_base_url
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), file_name))
    }
}

#[cfg(test)]
pub(crate) fn test_settings(site_dir: &std::path::Path) -> Settings {
    Settings {
        api_key: "test-key".into(),
        api_base: crate::llm::DEFAULT_API_BASE.into(),
        model: crate::llm::DEFAULT_MODEL.into(),
        webhook_url: None,
        public_base_url: None,
        feed: FeedQuery::default(),
        site_dir: site_dir.to_path_buf(),
        keys: SiteKeys::default(),
        strict_panel: false,
    }
}
