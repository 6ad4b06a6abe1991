//! TOML configuration.
//!
//! ```toml
//! [catalog]
//! path = "./data/catalog.json"
//!
//! [embedding]
//! provider = "local"
//! model = "all-minilm-l6-v2"
//!
//! [faq]
//! similarity_threshold = 0.65
//!
//! [server]
//! bind = "0.0.0.0:5000"
//! ```
//!
//! Relative `catalog.path`, `server.templates_dir`, and `server.static_dir`
//! resolve against the directory holding the config file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub faq: FaqConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Budget for embedding a single question at request time. On overrun
    /// the resolver falls back instead of waiting.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Number of local model instances kept for concurrent inference.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            url: None,
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
            query_timeout_ms: default_query_timeout_ms(),
            pool_size: default_pool_size(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_retries() -> u32 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_query_timeout_ms() -> u64 {
    5000
}
fn default_pool_size() -> usize {
    2
}

impl EmbeddingConfig {
    /// Providers that call a remote API and need `model` and `dims` spelled out.
    pub fn is_remote(&self) -> bool {
        matches!(self.provider.as_str(), "openai" | "ollama")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FaqConfig {
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
    /// Seed for the fallback-message RNG. Unset means non-deterministic.
    #[serde(default)]
    pub fallback_seed: Option<u64>,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            fallback_seed: None,
        }
    }
}

fn default_similarity_threshold() -> f32 {
    product_advisor_core::resolve::DEFAULT_SIMILARITY_THRESHOLD
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            templates_dir: default_templates_dir(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}
fn default_templates_dir() -> PathBuf {
    PathBuf::from("./templates")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Relative paths resolve against the config file's directory.
    if let Some(dir) = path.parent() {
        for p in [
            &mut config.catalog.path,
            &mut config.server.templates_dir,
            &mut config.server.static_dir,
        ] {
            if p.is_relative() {
                *p = dir.join(&*p);
            }
        }
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    let threshold = config.faq.similarity_threshold;
    if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
        anyhow::bail!("faq.similarity_threshold must be in [-1.0, 1.0]");
    }

    let embedding = &config.embedding;
    match embedding.provider.as_str() {
        "disabled" | "openai" | "ollama" | "local" | "hash" => {}
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be disabled, openai, ollama, local, or hash.",
            other
        ),
    }

    if embedding.is_remote() {
        if embedding.dims.is_none() || embedding.dims == Some(0) {
            anyhow::bail!(
                "embedding.dims must be > 0 when provider is '{}'",
                embedding.provider
            );
        }
        if embedding.model.is_none() {
            anyhow::bail!(
                "embedding.model must be specified when provider is '{}'",
                embedding.provider
            );
        }
    }

    if embedding.dims == Some(0) {
        anyhow::bail!("embedding.dims must be > 0");
    }
    if embedding.batch_size == 0 {
        anyhow::bail!("embedding.batch_size must be > 0");
    }
    if embedding.query_timeout_ms == 0 {
        anyhow::bail!("embedding.query_timeout_ms must be > 0");
    }
    if embedding.pool_size == 0 {
        anyhow::bail!("embedding.pool_size must be >= 1");
    }

    Ok(())
}
