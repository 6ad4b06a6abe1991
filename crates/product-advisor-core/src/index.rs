//! FAQ index: one embedding per FAQ question, in catalog order.
//!
//! Built once at startup and frozen. Position `i` in the index always
//! corresponds to FAQ entry `i`, so a similarity query is a single pass
//! over the stored vectors.

use anyhow::{bail, Context, Result};

use crate::embedding::{cosine_similarity, Embedder};
use crate::models::FaqEntry;

#[derive(Debug, Clone)]
pub struct FaqIndex {
    vectors: Vec<Vec<f32>>,
    model: String,
    dims: usize,
}

impl FaqIndex {
    /// Embed every FAQ question with one batched call.
    ///
    /// # Errors
    ///
    /// Fails if the embedder fails, returns a different number of vectors
    /// than there are entries, or returns vectors of inconsistent or zero
    /// dimension. Any of these is a startup error.
    pub async fn build(entries: &[FaqEntry], embedder: &dyn Embedder) -> Result<Self> {
        let questions: Vec<String> = entries.iter().map(|e| e.question.clone()).collect();

        let vectors = embedder.embed(&questions).await.with_context(|| {
            format!(
                "Failed to embed {} FAQ questions with model '{}'",
                questions.len(),
                embedder.model_name()
            )
        })?;

        if vectors.len() != entries.len() {
            bail!(
                "Embedder returned {} vectors for {} FAQ questions",
                vectors.len(),
                entries.len()
            );
        }

        let dims = vectors.first().map(Vec::len).unwrap_or(0);
        if !vectors.is_empty() && dims == 0 {
            bail!("Embedder returned empty vectors");
        }
        if let Some(i) = vectors.iter().position(|v| v.len() != dims) {
            bail!(
                "FAQ {} embedded with {} dims, expected {}",
                i,
                vectors[i].len(),
                dims
            );
        }

        Ok(Self {
            vectors,
            model: embedder.model_name().to_string(),
            dims,
        })
    }

    /// Return the entry index with the highest cosine similarity to `query`
    /// and its score.
    ///
    /// Exact score ties go to the lowest index. Returns `None` only for an
    /// empty index.
    pub fn best_match(&self, query: &[f32]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (i, v) in self.vectors.iter().enumerate() {
            let score = cosine_similarity(query, v);
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        self.vectors.get(i).map(Vec::as_slice)
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn dims(&self) -> usize {
        self.dims
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::mock::MockEmbedder;

    fn entries() -> Vec<FaqEntry> {
        ["alpha", "beta", "gamma"]
            .iter()
            .map(|q| FaqEntry {
                question: q.to_string(),
                answer: format!("{} answer", q),
            })
            .collect()
    }

    fn embedder() -> MockEmbedder {
        MockEmbedder::new(
            &[
                ("alpha", vec![1.0, 0.0, 0.0]),
                ("beta", vec![0.0, 1.0, 0.0]),
                ("gamma", vec![0.0, 0.0, 1.0]),
            ],
            vec![0.0, 0.0, 0.0],
        )
    }

    #[tokio::test]
    async fn test_build_preserves_order_and_length() {
        let entries = entries();
        let embedder = embedder();
        let index = FaqIndex::build(&entries, &embedder).await.unwrap();

        assert_eq!(index.len(), entries.len());
        assert_eq!(index.dims(), 3);
        assert_eq!(index.model_name(), "mock");
        for (i, e) in entries.iter().enumerate() {
            let expected = embedder.embed_one(&e.question).await.unwrap();
            assert_eq!(index.vector(i).unwrap(), expected.as_slice());
        }
        // One batched call for the build, plus the lookups above.
        assert_eq!(embedder.calls(), 1 + entries.len());
    }

    #[tokio::test]
    async fn test_build_fails_when_embedder_unavailable() {
        let err = FaqIndex::build(&entries(), &MockEmbedder::failing())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to embed 3 FAQ questions"));
    }

    #[tokio::test]
    async fn test_build_rejects_inconsistent_dims() {
        let embedder = MockEmbedder::new(&[("beta", vec![1.0, 0.0])], vec![1.0, 0.0, 0.0]);
        let err = FaqIndex::build(&entries(), &embedder).await.unwrap_err();
        assert!(err.to_string().contains("FAQ 1"));
    }

    #[tokio::test]
    async fn test_best_match_picks_highest() {
        let index = FaqIndex::build(&entries(), &embedder()).await.unwrap();
        let (i, score) = index.best_match(&[0.1, 0.2, 0.9]).unwrap();
        assert_eq!(i, 2);
        assert!(score > 0.9);
    }

    #[tokio::test]
    async fn test_best_match_tie_goes_to_first() {
        let embedder = MockEmbedder::new(&[], vec![1.0, 1.0, 0.0]);
        let index = FaqIndex::build(&entries(), &embedder).await.unwrap();
        let (i, _) = index.best_match(&[1.0, 1.0, 0.0]).unwrap();
        assert_eq!(i, 0);
    }

    #[tokio::test]
    async fn test_best_match_zero_query_scores_zero() {
        let index = FaqIndex::build(&entries(), &embedder()).await.unwrap();
        assert_eq!(index.best_match(&[0.0, 0.0, 0.0]), Some((0, 0.0)));
    }
}
