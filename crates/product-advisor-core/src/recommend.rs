//! Deterministic product recommendation.
//!
//! Scores a [`UserProfile`] against two fixed keyword sets and picks one
//! of the two catalog products. Pure: no embeddings, no randomness, no I/O.
//!
//! # Scoring
//!
//! 1. Case-fold every goal.
//! 2. `sales` = number of [`SALES_KEYWORDS`] that occur as a substring of
//!    at least one goal. Each keyword counts at most once.
//! 3. `flow` = the same over [`FLOW_KEYWORDS`].
//! 4. If the case-folded business type is one of [`FLOW_INDUSTRIES`], add
//!    [`INDUSTRY_BONUS`] to `flow`.
//! 5. `sales >= flow` recommends Sales (ties favour Sales), otherwise Flow.

use serde::Serialize;

use crate::models::{Catalog, ProductDetails, ProductKind, UserProfile};

pub const SALES_KEYWORDS: [&str; 4] = ["lead", "crm", "sales", "pipeline"];
pub const FLOW_KEYWORDS: [&str; 4] = ["whatsapp", "bulk", "chatbot", "support"];
pub const FLOW_INDUSTRIES: [&str; 2] = ["e-commerce", "retail"];
pub const INDUSTRY_BONUS: u32 = 2;

pub const SALES_REASON: &str = "goal profile emphasizes CRM/lead management";
pub const FLOW_REASON: &str = "goal profile emphasizes conversational/automation needs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalScores {
    pub sales: u32,
    pub flow: u32,
}

impl GoalScores {
    pub fn winner(&self) -> ProductKind {
        if self.sales >= self.flow {
            ProductKind::Sales
        } else {
            ProductKind::Flow
        }
    }
}

/// A product recommendation with its justification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Catalog name of the recommended product.
    pub recommendation: String,
    /// Product payload, verbatim from the catalog.
    pub product: ProductDetails,
    pub match_reason: String,
    #[serde(skip)]
    pub scores: GoalScores,
}

fn keyword_hits(keywords: &[&str], goals: &[String]) -> u32 {
    keywords
        .iter()
        .filter(|kw| goals.iter().any(|g| g.contains(**kw)))
        .count() as u32
}

/// Compute both keyword scores for a profile.
pub fn score_profile(profile: &UserProfile) -> GoalScores {
    let goals: Vec<String> = profile.goals.iter().map(|g| g.to_lowercase()).collect();

    let sales = keyword_hits(&SALES_KEYWORDS, &goals);
    let mut flow = keyword_hits(&FLOW_KEYWORDS, &goals);

    let business_type = profile.business_type.to_lowercase();
    if FLOW_INDUSTRIES.contains(&business_type.as_str()) {
        flow += INDUSTRY_BONUS;
    }

    GoalScores { sales, flow }
}

/// Score a profile and return the winning product from the catalog.
pub fn recommend(catalog: &Catalog, profile: &UserProfile) -> Recommendation {
    let scores = score_profile(profile);
    let kind = scores.winner();
    let match_reason = match kind {
        ProductKind::Sales => SALES_REASON,
        ProductKind::Flow => FLOW_REASON,
    };

    Recommendation {
        recommendation: kind.catalog_name().to_string(),
        product: catalog.product(kind).clone(),
        match_reason: match_reason.to_string(),
        scores,
    }
}
