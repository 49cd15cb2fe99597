use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_DOMAIN: &str = "io";
const APP_ORG: &str = "QuoteComposer";
const APP_NAME: &str = "quote-composer";

pub const CONFIG_ENV: &str = "QUOTE_COMPOSER_CONFIG";

/// Maximum length of a single chat message accepted by the host.
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 16383;
pub const DEFAULT_FALLBACK_EVENT: &str = "insertText";

pub struct ConfigLoader {
    config_file: PathBuf,
}

impl ConfigLoader {
    pub fn discover() -> Result<Self> {
        if let Some(path) = env::var_os(CONFIG_ENV).map(PathBuf::from) {
            let config_file = if path.is_dir() {
                path.join("config.toml")
            } else {
                path
            };
            return Ok(Self { config_file });
        }

        let project_dirs = ProjectDirs::from(APP_DOMAIN, APP_ORG, APP_NAME)
            .context("resolving XDG project directories")?;
        Ok(Self {
            config_file: project_dirs.config_dir().join("config.toml"),
        })
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_file: path.into(),
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Loads the config file, or the defaults when none exists. Never writes.
    pub fn load_or_default(&self) -> Result<QuoteConfig> {
        if !self.config_file.exists() {
            tracing::debug!(path = %self.config_file.display(), "no config file, using defaults");
            return Ok(QuoteConfig::default());
        }
        self.load()
    }

    pub fn load(&self) -> Result<QuoteConfig> {
        let raw = fs::read_to_string(&self.config_file)
            .with_context(|| format!("reading config {}", self.config_file.display()))?;
        QuoteConfig::from_toml(&raw)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QuoteConfig {
    pub max_message_length: usize,
    pub fallback_event: String,
    pub surfaces: SurfaceSelectors,
    pub alerts: AlertText,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            fallback_event: DEFAULT_FALLBACK_EVENT.to_string(),
            surfaces: SurfaceSelectors::default(),
            alerts: AlertText::default(),
        }
    }
}

impl QuoteConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        let mut cfg: QuoteConfig = toml::from_str(raw).context("parsing config toml")?;
        cfg.post_load();
        Ok(cfg)
    }

    fn post_load(&mut self) {
        if self.max_message_length == 0 {
            tracing::warn!(
                "max_message_length of 0 in config, falling back to {DEFAULT_MAX_MESSAGE_LENGTH}"
            );
            self.max_message_length = DEFAULT_MAX_MESSAGE_LENGTH;
        }
        if self.fallback_event.trim().is_empty() {
            tracing::warn!("empty fallback_event in config, falling back to {DEFAULT_FALLBACK_EVENT}");
            self.fallback_event = DEFAULT_FALLBACK_EVENT.to_string();
        }
        self.surfaces.fill_blanks();
    }
}

/// Host selectors for each composer role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SurfaceSelectors {
    pub main_composer: String,
    pub thread_reply: String,
    pub side_panel_text: String,
}

impl Default for SurfaceSelectors {
    fn default() -> Self {
        Self {
            main_composer: "#post_textbox".to_string(),
            thread_reply: "#reply_textbox".to_string(),
            side_panel_text: "#rhsContainer textarea".to_string(),
        }
    }
}

impl SurfaceSelectors {
    fn fill_blanks(&mut self) {
        let defaults = SurfaceSelectors::default();
        for (field, selector, fallback) in [
            ("main_composer", &mut self.main_composer, defaults.main_composer),
            ("thread_reply", &mut self.thread_reply, defaults.thread_reply),
            ("side_panel_text", &mut self.side_panel_text, defaults.side_panel_text),
        ] {
            if selector.trim().is_empty() {
                tracing::warn!(field, %fallback, "empty surface selector in config, using default");
                *selector = fallback;
            }
        }
    }
}

/// User-visible notices. `{limit}` in `too_long` is replaced with the length limit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AlertText {
    pub too_long: String,
    pub failure: String,
}

impl Default for AlertText {
    fn default() -> Self {
        Self {
            too_long: "Quote is too long. Maximum message length: {limit} characters.".to_string(),
            failure: "Something went wrong while quoting the message. Check the console for details."
                .to_string(),
        }
    }
}

impl AlertText {
    pub fn too_long_message(&self, limit: usize) -> String {
        self.too_long.replace("{limit}", &limit.to_string())
    }
}
