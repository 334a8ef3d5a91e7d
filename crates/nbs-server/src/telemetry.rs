// SPDX-License-Identifier: Apache-2.0

use nbs_core::ENV_NBS_LOG_LEVEL;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "info";

/// `NBS_LOG_LEVEL` first, then `RUST_LOG`, then `info`. Blank values are skipped.
fn filter_directive(nbs_level: Option<String>, rust_log: Option<String>) -> String {
    [nbs_level, rust_log]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVE.to_string())
}

/// Installs the global subscriber.
pub fn init_tracing(log_json: bool) {
    let directive = filter_directive(
        std::env::var(ENV_NBS_LOG_LEVEL).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
