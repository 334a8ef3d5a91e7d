#![forbid(unsafe_code)]

use std::sync::atomic::Ordering;
use std::sync::Arc;

use nbs_query::SolutionCatalog;
use nbs_server::{build_router, init_tracing, validate_startup_config, ApiConfig, AppState};
use nbs_store::SqliteStore;
use tokio::net::TcpListener;
use tracing::info;

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let api_cfg = ApiConfig::from_env();
    init_tracing(api_cfg.log_json);
    validate_startup_config(&api_cfg)?;

    let store = SqliteStore::open_url(&api_cfg.database_url)
        .map_err(|e| format!("open database {} failed: {e}", api_cfg.database_url))?;
    let catalog = SolutionCatalog::new(store, api_cfg.limits.clone());
    if api_cfg.seed_targets_on_start {
        let seeded = catalog
            .seed_targets()
            .map_err(|e| format!("seeding adaptation targets failed: {e}"))?;
        info!(targets = seeded.len(), "adaptation targets seeded");
    }

    let bind_addr = api_cfg.bind_addr.clone();
    let state = AppState::new(Arc::new(catalog), api_cfg);
    let app = build_router(state.clone());

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| format!("bind {bind_addr} failed: {e}"))?;
    info!("nbs-server listening on {bind_addr}");
    let accepting = state.accepting_requests.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            accepting.store(false, Ordering::Relaxed);
            info!("shutdown requested; draining in-flight requests");
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
