use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::quiz::category::Category;

/// Locales with a bundled label set.
pub const AVAILABLE_LOCALES: &[&str] = &["ja", "en"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_category")]
    pub default_category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_url: Option<String>,
    #[serde(default = "default_include_debug")]
    pub include_debug: bool,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_category() -> Category {
    Category::Grammar
}
fn default_include_debug() -> bool {
    false
}
fn default_locale() -> String {
    "ja".to_string()
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quizdr")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            problem_dir: None,
            problem_url: None,
            include_debug: default_include_debug(),
            locale: default_locale(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize_locale();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Reset `locale` to the default when no label set exists for it.
    pub fn normalize_locale(&mut self) {
        let lower = self.locale.trim().to_ascii_lowercase();
        // "ja-JP" and "en_US" style tags fall back to their language
        let lang = lower.split(['-', '_']).next().unwrap_or_default();
        self.locale = if AVAILABLE_LOCALES.contains(&lang) {
            lang.to_string()
        } else {
            default_locale()
        };
    }
}
