//! Typed catalog validation errors.
//!
//! Raised while loading the catalog document. Any of these is fatal at
//! startup: the process must not serve requests from a catalog that
//! failed validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog is not valid JSON or has the wrong shape: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains no FAQ entries")]
    NoFaqs,

    #[error("FAQ entry {0} has a blank question")]
    BlankQuestion(usize),

    #[error("catalog is missing product: {0}")]
    MissingProduct(String),

    #[error("catalog contact section has no fallback messages")]
    NoFallbackMessages,
}
