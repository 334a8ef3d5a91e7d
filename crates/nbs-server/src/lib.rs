#![forbid(unsafe_code)]
//! HTTP surface of the nature-based solutions catalog.

use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use nbs_api::CatalogAdapter;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::warn;

mod config;
mod http;
mod telemetry;

pub use config::{
    env_bool, env_f64, env_u64, env_usize, validate_startup_config, ApiConfig,
};
pub use telemetry::init_tracing;

pub const CRATE_NAME: &str = "nbs-server";

pub type SharedCatalog = Arc<dyn CatalogAdapter + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub catalog: SharedCatalog,
    pub api: Arc<ApiConfig>,
    /// Cleared while the process drains on shutdown.
    pub accepting_requests: Arc<AtomicBool>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(catalog: SharedCatalog, api: ApiConfig) -> Self {
        Self {
            catalog,
            api: Arc::new(api),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

fn cors_layer(api: &ApiConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);
    if api.allows_any_origin() {
        return base.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = api
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparsable cors origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.api);
    Router::new()
        .route("/", get(http::root_handler))
        .route("/healthz", get(http::healthz_handler))
        .route("/readyz", get(http::readyz_handler))
        .route("/v1/openapi.json", get(http::openapi_handler))
        .route(
            "/api/solutions/solutions",
            get(http::list_solutions_handler).post(http::create_solution_handler),
        )
        .route(
            "/api/solutions/solutions/",
            get(http::list_solutions_handler).post(http::create_solution_handler),
        )
        .route(
            "/api/solutions/solutions/:solution_id",
            get(http::get_solution_handler),
        )
        .route(
            "/api/solutions/by-name/:name",
            get(http::get_solution_by_name_handler),
        )
        .route("/api/targets/targets", get(http::list_targets_handler))
        .route(
            "/api/targets/targets/:target_id",
            get(http::get_target_handler),
        )
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .layer(TimeoutLayer::new(state.api.request_timeout))
        .layer(cors)
        .with_state(state)
}
