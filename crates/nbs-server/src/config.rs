// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::time::Duration;

use nbs_core::{
    ENV_NBS_BIND, ENV_NBS_CORS_ALLOWED_ORIGINS, ENV_NBS_DATABASE_URL, ENV_NBS_LOG_JSON,
    ENV_NBS_MAX_BODY_BYTES, ENV_NBS_MAX_REGION_AREA_M2, ENV_NBS_PROJECT_NAME,
    ENV_NBS_REQUEST_TIMEOUT_MS, ENV_NBS_SEED_TARGETS,
};
use nbs_query::QueryLimits;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    /// Exact origins allowed by CORS; `*` or an empty list allows any.
    pub cors_allowed_origins: Vec<String>,
    pub seed_targets_on_start: bool,
    pub log_json: bool,
    pub project_name: String,
    pub limits: QueryLimits,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let db_path = nbs_core::resolve_nbs_data_dir().join("nbs.sqlite");
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            database_url: format!("sqlite://{}", db_path.display()),
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(10),
            cors_allowed_origins: vec!["*".to_string()],
            seed_targets_on_start: true,
            log_json: true,
            project_name: "nbsapi".to_string(),
            limits: QueryLimits::default(),
        }
    }
}

impl ApiConfig {
    /// Defaults overlaid with whatever `NBS_*` variables are set.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env_string(ENV_NBS_BIND, &defaults.bind_addr),
            database_url: env_string(ENV_NBS_DATABASE_URL, &defaults.database_url),
            max_body_bytes: env_usize(ENV_NBS_MAX_BODY_BYTES, defaults.max_body_bytes),
            request_timeout: Duration::from_millis(env_u64(
                ENV_NBS_REQUEST_TIMEOUT_MS,
                defaults.request_timeout.as_millis() as u64,
            )),
            cors_allowed_origins: env_list(ENV_NBS_CORS_ALLOWED_ORIGINS)
                .unwrap_or(defaults.cors_allowed_origins),
            seed_targets_on_start: env_bool(ENV_NBS_SEED_TARGETS, defaults.seed_targets_on_start),
            log_json: env_bool(ENV_NBS_LOG_JSON, defaults.log_json),
            project_name: env_string(ENV_NBS_PROJECT_NAME, &defaults.project_name),
            limits: defaults.limits.clone().with_max_region_area_m2(env_f64(
                ENV_NBS_MAX_REGION_AREA_M2,
                defaults.limits.max_region_area_m2,
            )),
        }
    }

    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.cors_allowed_origins.is_empty() || self.cors_allowed_origins.iter().any(|o| o == "*")
    }
}

pub fn validate_startup_config(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.request_timeout.is_zero() {
        return Err("request timeout must be > 0".to_string());
    }
    let max_area = api.limits.max_region_area_m2;
    if !max_area.is_finite() || max_area <= 0.0 {
        return Err(format!("max region area must be a positive number, got {max_area}"));
    }
    if api.limits.max_target_clauses == 0 {
        return Err("max target clauses must be > 0".to_string());
    }
    if api.project_name.trim().is_empty() {
        return Err("project name must not be empty".to_string());
    }
    api.bind_addr
        .parse::<std::net::SocketAddr>()
        .map_err(|e| format!("invalid bind addr {}: {e}", api.bind_addr))?;
    nbs_store::parse_database_url(&api.database_url)
        .map_err(|e| format!("invalid {ENV_NBS_DATABASE_URL}: {e}"))?;
    Ok(())
}

pub fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

pub fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

pub fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

pub fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(default)
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_list(name: &str) -> Option<Vec<String>> {
    let raw = env::var(name).ok()?;
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
    )
}
