//! Startup wiring: configuration in, a frozen [`Advisor`] out.
//!
//! Loads the catalog, creates the embedding provider, builds the FAQ index,
//! and wraps the query-time embedder with the configured timeout. Any
//! failure here is fatal; the server must not start without an index.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use product_advisor_core::resolve::{
    Answer, MatchSource, MessagePicker, RandomPicker, ResolverParams, SeededPicker,
};
use product_advisor_core::Advisor;

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::embedding::{create_provider, Embedder, TimedEmbedder};

/// Build the shared decision context from configuration.
pub async fn build_advisor(config: &Config) -> Result<Arc<Advisor>> {
    let catalog = load_catalog(&config.catalog.path)?;

    let embedding_config = config.embedding.clone();
    let provider = tokio::task::spawn_blocking(move || create_provider(&embedding_config))
        .await?
        .with_context(|| {
            format!(
                "Failed to create embedding provider '{}'",
                config.embedding.provider
            )
        })?;

    build_advisor_with(config, catalog, provider).await
}

/// Like [`build_advisor`], but with a caller-supplied catalog and provider.
pub async fn build_advisor_with(
    config: &Config,
    catalog: product_advisor_core::models::Catalog,
    provider: Arc<dyn Embedder>,
) -> Result<Arc<Advisor>> {
    let picker: Arc<dyn MessagePicker> = match config.faq.fallback_seed {
        Some(seed) => Arc::new(SeededPicker::new(seed)),
        None => Arc::new(RandomPicker),
    };
    let query_embedder: Arc<dyn Embedder> = Arc::new(TimedEmbedder::new(
        provider.clone(),
        Duration::from_millis(config.embedding.query_timeout_ms),
    ));
    let params = ResolverParams {
        similarity_threshold: config.faq.similarity_threshold,
    };

    let started = std::time::Instant::now();
    let advisor = Advisor::build(catalog, provider.as_ref(), query_embedder, picker, params)
        .await
        .context("Failed to build FAQ index")?;

    tracing::info!(
        model = advisor.index().model_name(),
        dims = advisor.index().dims(),
        faqs = advisor.index().len(),
        threshold = params.similarity_threshold,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "FAQ index built"
    );

    Ok(Arc::new(advisor))
}

/// Log how a question was answered. Degraded matches log at `warn`.
pub fn log_resolution(question: &str, answer: &Answer) {
    match &answer.source {
        MatchSource::Fallback {
            error: Some(error), ..
        } => {
            tracing::warn!(question, %error, "embedding failed, served fallback answer");
        }
        MatchSource::Fallback {
            best_score,
            error: None,
        } => {
            tracing::debug!(question, ?best_score, "no FAQ match, served fallback answer");
        }
        MatchSource::Exact { index } => {
            tracing::debug!(question, index, "exact FAQ match");
        }
        MatchSource::Semantic { index, score } => {
            tracing::debug!(question, index, score, "semantic FAQ match");
        }
    }
}
