//! HTTP server for the web form.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | The web form (`templates/index.html`) |
//! | `GET`  | `/static/*` | Static assets |
//! | `GET`  | `/api/onboarding` | Business types, sizes, and goals offered by the form |
//! | `POST` | `/api/recommend` | Recommend a product for a goal profile |
//! | `GET`  | `/api/faq` | All FAQ entries |
//! | `POST` | `/api/faq` | Answer a support question |
//! | `GET`  | `/health` | Health check (returns version and model) |
//!
//! # Request Handling
//!
//! Neither decision endpoint ever fails. Request bodies are parsed
//! leniently: a missing, empty, or malformed body is treated as an empty
//! request and answered with the fallback answer or the default
//! recommendation.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients served from another origin.

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use product_advisor_core::models::{null_as_default, FaqEntry, OnboardingOptions, UserProfile};
use product_advisor_core::recommend::Recommendation;
use product_advisor_core::resolve::Answer;
use product_advisor_core::Advisor;

use crate::config::Config;
use crate::context::log_resolution;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub advisor: Arc<Advisor>,
}

/// Build the router with all routes and layers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let index_html = state.config.server.templates_dir.join("index.html");
    let static_dir = state.config.server.static_dir.clone();

    Router::new()
        .route_service("/", ServeFile::new(index_html))
        .nest_service("/static", ServeDir::new(static_dir))
        .route("/api/onboarding", get(handle_onboarding))
        .route("/api/recommend", post(handle_recommend))
        .route("/api/faq", get(handle_list_faqs).post(handle_faq))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on `[server].bind`.
///
/// Runs until the process is terminated. The advisor must already be
/// built; the index is never rebuilt while serving.
pub async fn run_server(config: &Config, advisor: Arc<Advisor>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        config: Arc::new(config.clone()),
        advisor,
    };

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on http://{}", bind_addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}

/// Parse a JSON body, treating anything unparseable as the default request.
fn parse_lenient<T: DeserializeOwned + Default>(body: &Bytes, route: &str) -> T {
    if body.is_empty() {
        return T::default();
    }
    match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(route, error = %e, "malformed request body, treating as empty");
            T::default()
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    model: String,
    faq_count: usize,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.advisor.index().model_name().to_string(),
        faq_count: state.advisor.index().len(),
    })
}

// ============ GET /api/onboarding ============

async fn handle_onboarding(State(state): State<AppState>) -> Json<OnboardingOptions> {
    Json(state.advisor.catalog().onboarding().clone())
}

// ============ POST /api/recommend ============

async fn handle_recommend(State(state): State<AppState>, body: Bytes) -> Json<Recommendation> {
    let profile: UserProfile = parse_lenient(&body, "/api/recommend");
    let rec = state.advisor.recommend(&profile);
    tracing::debug!(
        recommendation = %rec.recommendation,
        sales = rec.scores.sales,
        flow = rec.scores.flow,
        "recommendation"
    );
    Json(rec)
}

// ============ /api/faq ============

async fn handle_list_faqs(State(state): State<AppState>) -> Json<Vec<FaqEntry>> {
    Json(state.advisor.catalog().faqs().to_vec())
}

#[derive(Deserialize, Default)]
struct FaqRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    question: String,
}

async fn handle_faq(State(state): State<AppState>, body: Bytes) -> Json<Answer> {
    let req: FaqRequest = parse_lenient(&body, "/api/faq");
    let answer = state.advisor.resolve(&req.question).await;
    log_resolution(&req.question, &answer);
    Json(answer)
}
