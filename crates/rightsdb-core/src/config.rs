//! Search tuning and a lightweight configuration loader.
//!
//! Uses Figment to merge built-in defaults + `rightsdb.toml` +
//! `rightsdb.<env>.toml` + `RIGHTSDB_*` env vars. Provides helpers to expand
//! `~` and `${VAR}` and to resolve relative paths against a known base
//! directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Relative importance of each scoring signal. Must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub natural_query: f64,
    pub keywords: f64,
    pub title: f64,
    pub partial: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { natural_query: 0.45, keywords: 0.30, title: 0.15, partial: 0.10 }
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.natural_query + self.keywords + self.title + self.partial
    }

    fn as_array(&self) -> [(&'static str, f64); 4] {
        [
            ("natural_query", self.natural_query),
            ("keywords", self.keywords),
            ("title", self.title),
            ("partial", self.partial),
        ]
    }
}

/// Prefix matching knobs. Tokens shorter than `prefix_len` chars never match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialConfig {
    pub prefix_len: usize,
    pub scale: f64,
}

impl Default for PartialConfig {
    fn default() -> Self {
        Self { prefix_len: 4, scale: 0.4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
    /// Noise floor; a hit must score strictly above it.
    pub min_score: f64,
    pub weights: Weights,
    pub partial: PartialConfig,
    /// Replaces the built-in Spanish stopword list when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopwords: Option<Vec<String>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 3,
            min_score: 0.05,
            weights: Weights::default(),
            partial: PartialConfig::default(),
            stopwords: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, w) in self.weights.as_array() {
            if !w.is_finite() || w < 0.0 {
                return Err(Error::InvalidConfig(format!("weight '{}' must be a non-negative number, got {}", name, w)));
            }
        }
        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidConfig(format!("weights must sum to 1.0, got {}", sum)));
        }
        if !(0.0..1.0).contains(&self.min_score) {
            return Err(Error::InvalidConfig(format!("min_score must be in [0, 1), got {}", self.min_score)));
        }
        if self.default_limit == 0 {
            return Err(Error::InvalidConfig("default_limit must be at least 1".to_string()));
        }
        if self.partial.prefix_len == 0 {
            return Err(Error::InvalidConfig("partial.prefix_len must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.partial.scale) {
            return Err(Error::InvalidConfig(format!("partial.scale must be in [0, 1], got {}", self.partial.scale)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory of situation JSON files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchConfig,
    pub catalog: CatalogConfig,
}

pub struct Config {
    figment: Figment,
    /// Relative paths in the settings resolve against this directory.
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RIGHTSDB_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("rightsdb.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("rightsdb.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("rightsdb.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("rightsdb.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("RIGHTSDB_").split("__"));

        let base_dir = env::current_dir()?;
        let config = Self { figment, base_dir };
        config.search()?.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with a single TOML file. A missing file yields the
    /// defaults. Relative paths inside the file are taken from its directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file(path));
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let config = Self { figment, base_dir };
        config.search()?.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    pub fn settings(&self) -> Result<Settings> {
        self.figment.extract().map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    pub fn search(&self) -> Result<SearchConfig> {
        self.get("search")
    }

    pub fn catalog_dir(&self) -> Result<Option<PathBuf>> {
        Ok(self.settings()?.catalog.dir.map(|dir| resolve_with_base(&self.base_dir, dir)))
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
