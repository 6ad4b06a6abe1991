//! The immutable decision context shared by every request.
//!
//! [`Advisor::build`] is the single startup barrier: it embeds the FAQ
//! questions, freezes the index, and wires the resolver. Once built, an
//! `Advisor` is read-only and can be shared across tasks behind an `Arc`
//! without locking.

use std::sync::Arc;

use anyhow::Result;

use crate::embedding::Embedder;
use crate::index::FaqIndex;
use crate::models::{Catalog, UserProfile};
use crate::recommend::{recommend, Recommendation};
use crate::resolve::{Answer, FaqResolver, MessagePicker, ResolverParams};

pub struct Advisor {
    catalog: Arc<Catalog>,
    index: Arc<FaqIndex>,
    resolver: FaqResolver,
}

impl Advisor {
    /// Build the FAQ index with `index_embedder` and wire the resolver to
    /// use `query_embedder` at request time.
    ///
    /// The two embedders are usually the same model; the app wraps the
    /// query-time one with a timeout.
    ///
    /// # Errors
    ///
    /// Fails if the index cannot be built. The caller must not serve
    /// requests in that case.
    pub async fn build(
        catalog: Catalog,
        index_embedder: &dyn Embedder,
        query_embedder: Arc<dyn Embedder>,
        picker: Arc<dyn MessagePicker>,
        params: ResolverParams,
    ) -> Result<Self> {
        let catalog = Arc::new(catalog);
        let index = Arc::new(FaqIndex::build(catalog.faqs(), index_embedder).await?);
        let resolver = FaqResolver::new(
            catalog.clone(),
            index.clone(),
            query_embedder,
            picker,
            params,
        )?;
        Ok(Self {
            catalog,
            index,
            resolver,
        })
    }

    /// Answer a support question. See [`FaqResolver::resolve`].
    pub async fn resolve(&self, question: &str) -> Answer {
        self.resolver.resolve(question).await
    }

    /// Recommend a product. See [`recommend`].
    pub fn recommend(&self, profile: &UserProfile) -> Recommendation {
        recommend(&self.catalog, profile)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &FaqIndex {
        &self.index
    }

    pub fn params(&self) -> ResolverParams {
        self.resolver.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::MockEmbedder;
    use crate::models::fixtures;
    use crate::resolve::{MatchSource, SeededPicker};

    async fn advisor() -> Advisor {
        let embedder = Arc::new(MockEmbedder::new(
            &[
                ("What is OMX Sales?", vec![1.0, 0.0, 0.0]),
                ("Does OMX Flow support WhatsApp?", vec![0.0, 1.0, 0.0]),
                ("How much does it cost?", vec![0.0, 0.0, 1.0]),
                ("whatsapp integration?", vec![0.1, 0.95, 0.0]),
            ],
            vec![0.5, 0.5, 0.5],
        ));
        Advisor::build(
            fixtures::catalog(),
            embedder.as_ref(),
            embedder.clone(),
            Arc::new(SeededPicker::new(1)),
            ResolverParams::default(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_index_matches_catalog() {
        let advisor = advisor().await;
        assert_eq!(advisor.index().len(), advisor.catalog().faqs().len());
        assert_eq!(advisor.index().vector(2).unwrap(), &[0.0, 0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_build_fails_without_embedder() {
        let failing = Arc::new(MockEmbedder::failing());
        let result = Advisor::build(
            fixtures::catalog(),
            failing.as_ref(),
            failing.clone(),
            Arc::new(SeededPicker::new(1)),
            ResolverParams::default(),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_resolve_and_recommend() {
        let advisor = advisor().await;

        let answer = advisor.resolve("WhatsApp integration?").await;
        assert!(matches!(answer.source, MatchSource::Semantic { index: 1, .. }));

        // [0.5, 0.5, 0.5] scores ~0.577 against every entry.
        let answer = advisor.resolve("Where are you located?").await;
        assert!(answer.source.is_fallback());

        let rec = advisor.recommend(&UserProfile {
            goals: vec!["Bulk messaging".into()],
            business_type: "Services".into(),
            business_size: None,
        });
        assert_eq!(rec.recommendation, "OMX Flow");
    }

    #[tokio::test]
    async fn test_concurrent_resolution() {
        let advisor = Arc::new(advisor().await);
        let mut handles = Vec::new();
        for i in 0..16 {
            let advisor = advisor.clone();
            handles.push(tokio::spawn(async move {
                let q = if i % 2 == 0 {
                    "what is omx sales?"
                } else {
                    "whatsapp integration?"
                };
                advisor.resolve(q).await
            }));
        }
        for (i, h) in handles.into_iter().enumerate() {
            let answer = h.await.unwrap();
            let expected = if i % 2 == 0 { 0 } else { 1 };
            match answer.source {
                MatchSource::Exact { index } | MatchSource::Semantic { index, .. } => {
                    assert_eq!(index, expected)
                }
                other => panic!("unexpected fallback: {:?}", other),
            }
        }
    }
}
