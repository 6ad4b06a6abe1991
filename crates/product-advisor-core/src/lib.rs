//! # Product Advisor Core
//!
//! Pure decision logic for Product Advisor: catalog models, the FAQ
//! index, the hybrid FAQ resolver, and the deterministic recommendation
//! scorer.
//!
//! This crate contains no tokio, HTTP, or filesystem I/O. Concrete
//! embedding providers, configuration, and the web server live in the
//! `product-advisor` app crate and reach the core through the
//! [`embedding::Embedder`] trait.

pub mod advisor;
pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod recommend;
pub mod resolve;

pub use advisor::Advisor;
pub use error::CatalogError;
