//! Hybrid FAQ resolution.
//!
//! Answers a free-text question from the curated FAQ set in three ordered
//! stages, first success wins:
//!
//! 1. **Exact match**: case-folded, trimmed string equality against every
//!    FAQ question in catalog order. No embedding is computed.
//! 2. **Semantic match**: embed the question, take the FAQ with the
//!    highest cosine similarity (lowest index on ties), and accept it if
//!    the score is strictly above the configured threshold.
//! 3. **Fallback**: a fallback message chosen by the injected
//!    [`MessagePicker`], plus contact details.
//!
//! The resolver never returns an error. An embedder failure during stage 2
//! degrades to the fallback answer and the cause is recorded on
//! [`MatchSource::Fallback`] for the caller to log.

use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::embedding::Embedder;
use crate::index::FaqIndex;
use crate::models::{Catalog, ContactInfo};

/// Default minimum similarity (exclusive) for a semantic match.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.65;

/// Resolver tuning parameters, decoupled from application config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverParams {
    /// A semantic match is accepted only when its score is strictly greater
    /// than this value.
    pub similarity_threshold: f32,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Source of randomness for choosing a fallback message.
pub trait MessagePicker: Send + Sync {
    /// Return an index in `0..len`. `len` is always at least 1.
    fn pick(&self, len: usize) -> usize;
}

/// Picks uniformly with the thread-local RNG.
#[derive(Debug, Default)]
pub struct RandomPicker;

impl MessagePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Picks uniformly from a seeded RNG, so a given seed always yields the
/// same sequence of choices.
#[derive(Debug)]
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl MessagePicker for SeededPicker {
    fn pick(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.random_range(0..len)
    }
}

/// How an [`Answer`] was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchSource {
    /// Case-folded string equality with FAQ `index`.
    Exact { index: usize },
    /// Nearest neighbour above the threshold.
    Semantic { index: usize, score: f32 },
    /// No match. `best_score` is the top similarity when the semantic pass
    /// ran; `error` holds the embedder failure when it could not run.
    Fallback {
        best_score: Option<f32>,
        error: Option<String>,
    },
}

impl MatchSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, MatchSource::Fallback { .. })
    }
}

/// Contact details attached to a fallback answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactCard {
    pub email: String,
    pub phone: String,
    pub action: String,
}

impl From<&ContactInfo> for ContactCard {
    fn from(c: &ContactInfo) -> Self {
        Self {
            email: c.support_email.clone(),
            phone: c.phone.clone(),
            action: c.action.clone(),
        }
    }
}

/// Result of resolving a question.
///
/// Serializes as `{"question", "answer"}` for a match and as
/// `{"answer", "contact"}` for a fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    pub answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactCard>,
    #[serde(skip)]
    pub source: MatchSource,
}

/// Trim and case-fold a question for comparison.
pub fn normalize_question(text: &str) -> String {
    text.trim().to_lowercase()
}

pub struct FaqResolver {
    catalog: Arc<Catalog>,
    folded_questions: Vec<String>,
    index: Arc<FaqIndex>,
    embedder: Arc<dyn Embedder>,
    picker: Arc<dyn MessagePicker>,
    params: ResolverParams,
}

impl FaqResolver {
    /// # Errors
    ///
    /// Fails if `index` does not hold exactly one vector per catalog FAQ.
    pub fn new(
        catalog: Arc<Catalog>,
        index: Arc<FaqIndex>,
        embedder: Arc<dyn Embedder>,
        picker: Arc<dyn MessagePicker>,
        params: ResolverParams,
    ) -> Result<Self> {
        if index.len() != catalog.faqs().len() {
            bail!(
                "FAQ index holds {} vectors but the catalog has {} entries",
                index.len(),
                catalog.faqs().len()
            );
        }
        let folded_questions = catalog
            .faqs()
            .iter()
            .map(|f| normalize_question(&f.question))
            .collect();
        Ok(Self {
            catalog,
            folded_questions,
            index,
            embedder,
            picker,
            params,
        })
    }

    pub fn params(&self) -> ResolverParams {
        self.params
    }

    /// Resolve a question to an FAQ answer or a fallback. Never fails.
    pub async fn resolve(&self, question: &str) -> Answer {
        let query = normalize_question(question);
        if query.is_empty() {
            return self.fallback(None, None);
        }

        if let Some(index) = self.folded_questions.iter().position(|q| *q == query) {
            return self.matched(MatchSource::Exact { index }, index);
        }

        let query_vec = match self.embedder.embed_one(&query).await {
            Ok(v) => v,
            Err(e) => return self.fallback(None, Some(format!("{:#}", e))),
        };

        match self.index.best_match(&query_vec) {
            Some((index, score)) if score > self.params.similarity_threshold => {
                self.matched(MatchSource::Semantic { index, score }, index)
            }
            Some((_, score)) => self.fallback(Some(score), None),
            None => self.fallback(None, None),
        }
    }

    fn matched(&self, source: MatchSource, index: usize) -> Answer {
        let entry = &self.catalog.faqs()[index];
        Answer {
            question: Some(entry.question.clone()),
            answer: entry.answer.clone(),
            contact: None,
            source,
        }
    }

    fn fallback(&self, best_score: Option<f32>, error: Option<String>) -> Answer {
        let contact = self.catalog.contact();
        let messages = &contact.fallback_messages;
        // Catalog validation guarantees at least one message.
        let pick = self.picker.pick(messages.len()).min(messages.len() - 1);
        Answer {
            question: None,
            answer: messages[pick].clone(),
            contact: Some(ContactCard::from(contact)),
            source: MatchSource::Fallback { best_score, error },
        }
    }
}
