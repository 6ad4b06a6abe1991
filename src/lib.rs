//! # Product Advisor
//!
//! Decision-support backend behind a simple web form. Answers two
//! questions for a visiting user:
//!
//! - *Which product fits my business goals?* A deterministic keyword
//!   scorer picks between the two catalog products.
//! - *What is the answer to my support question?* A hybrid resolver
//!   tries an exact match, then a nearest-neighbour semantic match over
//!   the FAQ set, then falls back to a contact prompt.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ catalog.json │──▶│  FAQ Index   │──▶│   Advisor    │
//! │  (Catalog)   │   │ (embeddings) │   │  (frozen)    │
//! └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                              │
//!                          ┌───────────────────┤
//!                          ▼                   ▼
//!                     ┌──────────┐       ┌──────────┐
//!                     │   CLI    │       │   HTTP   │
//!                     │(advisor) │       │  (axum)  │
//!                     └──────────┘       └──────────┘
//! ```
//!
//! The decision logic lives in the `product-advisor-core` crate; this
//! crate supplies configuration, catalog loading, embedding providers, and
//! the HTTP server.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`catalog`] | Catalog file loading |
//! | [`embedding`] | Embedding provider implementations |
//! | [`context`] | Startup wiring of the shared advisor |
//! | [`server`] | HTTP server |

pub mod catalog;
pub mod config;
pub mod context;
pub mod embedding;
pub mod server;
