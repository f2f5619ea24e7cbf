//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys with `__`, e.g. `APP_RANKING__BOOST`). Typed sections fall
//! back to their defaults when absent.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(&env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed section, or its defaults when the section is absent.
    pub fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.contains(key) { self.get(key) } else { Ok(T::default()) }
    }

    pub fn ranking(&self) -> anyhow::Result<RankingSettings> {
        self.section("ranking")
    }

    pub fn data(&self) -> anyhow::Result<DataSettings> {
        self.section("data")
    }

    pub fn embedding(&self) -> anyhow::Result<EmbeddingSettings> {
        self.section("embedding")
    }

    pub fn caption(&self) -> anyhow::Result<CaptionSettings> {
        self.section("caption")
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let ranking = self.ranking()?;
        ranking.validate()?;
        match env {
            "prod" | "production" => {
                let caption = self.caption()?;
                if caption.timeout_secs == 0 {
                    anyhow::bail!("caption.timeout_secs must be > 0 in production");
                }
            }
            "dev" | "development" => {}
            "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Fusion and result-size knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RankingSettings {
    pub boost: f32,
    pub threshold: f32,
    pub top_k: usize,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self { boost: 0.3, threshold: 0.60, top_k: 5 }
    }
}

impl RankingSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.boost.is_finite() || self.boost < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "ranking.boost must be a finite, non-negative number (got {})",
                self.boost
            )));
        }
        if !self.threshold.is_finite() {
            return Err(Error::InvalidConfig(format!("ranking.threshold must be finite (got {})", self.threshold)));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("ranking.top_k must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub catalog_csv: String,
    pub image_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { catalog_csv: "hotel_image_captions.csv".to_string(), image_dir: "hotel_images".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Local model directory; when unset the embedder searches its defaults.
    pub model_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptionSettings {
    pub base_url: String,
    pub image_count: usize,
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://static.obilet.com.s3.eu-central-1.amazonaws.com/CaseStudy/HotelImages/".to_string(),
            image_count: 25,
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o".to_string(),
            max_tokens: 300,
            timeout_secs: 60,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
