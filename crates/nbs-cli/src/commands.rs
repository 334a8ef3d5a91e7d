// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use nbs_api::{
    get_solution_by_name_v1, get_solution_v1, import_fixture, list_solutions_v1, list_targets_v1,
    openapi_v1_spec, parse_fixture, target_view, ApiError, ApiErrorCode,
};
use nbs_core::{resolve_nbs_data_dir, ErrorCode, ExitCode, MachineError, ENV_NBS_DATABASE_URL};
use nbs_query::{QueryError, QueryLimits, SolutionCatalog};
use nbs_store::{SqliteStore, StoreError};
use serde_json::{json, Value};
use tracing::{debug, info};

pub(crate) type Output = Option<Value>;

#[derive(Debug)]
pub(crate) struct CliError {
    pub exit: ExitCode,
    pub error: MachineError,
}

impl CliError {
    pub(crate) fn usage(message: impl Into<String>) -> Self {
        Self {
            exit: ExitCode::Usage,
            error: MachineError::new(ErrorCode::InvalidArgument, &message.into()),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            exit: ExitCode::Internal,
            error: MachineError::new(ErrorCode::Internal, &message.into()),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let exit = match err.code {
            ApiErrorCode::Internal => ExitCode::Internal,
            ApiErrorCode::NotReady | ApiErrorCode::Timeout => ExitCode::DependencyFailure,
            _ => ExitCode::Validation,
        };
        let details: BTreeMap<String, String> = match &err.details {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| {
                    let text = v.as_str().map_or_else(|| v.to_string(), ToString::to_string);
                    (k.clone(), text)
                })
                .collect(),
            _ => BTreeMap::new(),
        };
        Self {
            exit,
            error: MachineError {
                code: err.code.as_str().to_string(),
                message: err.message,
                details,
            },
        }
    }
}

impl From<QueryError> for CliError {
    fn from(err: QueryError) -> Self {
        Self {
            exit: err.code.exit_code(),
            error: err.to_machine_error(),
        }
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        let code = err.code.as_error_code();
        let exit = match code {
            ErrorCode::InvalidArgument => ExitCode::Usage,
            _ => ExitCode::DependencyFailure,
        };
        Self {
            exit,
            error: MachineError::new(code, &err.message),
        }
    }
}

pub(crate) struct QueryArgs {
    pub bbox: Option<String>,
    pub geojson: Option<String>,
    pub targets: Vec<String>,
    pub max_area: Option<f64>,
}

pub(crate) fn resolve_database_url(flag: Option<String>) -> String {
    database_url_from(flag, std::env::var(ENV_NBS_DATABASE_URL).ok())
}

fn database_url_from(flag: Option<String>, env_url: Option<String>) -> String {
    flag.or_else(|| env_url.filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| {
            let path = resolve_nbs_data_dir().join("nbs.sqlite");
            format!("sqlite://{}", path.display())
        })
}

fn open_catalog(db: &str, limits: QueryLimits) -> Result<SolutionCatalog<SqliteStore>, CliError> {
    debug!(db, "opening catalog");
    let store = SqliteStore::open_url(db)?;
    Ok(SolutionCatalog::new(store, limits))
}

pub(crate) fn init_db(db: &str) -> Result<Output, CliError> {
    let store = SqliteStore::open_url(db)?;
    let version = store.schema_version()?;
    info!(db, schema_version = version, "database ready");
    Ok(Some(json!({"database": db, "schema_version": version})))
}

pub(crate) fn seed_targets(db: &str) -> Result<Output, CliError> {
    let catalog = open_catalog(db, QueryLimits::default())?;
    let seeded = catalog.seed_targets()?;
    let views: Vec<_> = seeded.iter().map(target_view).collect();
    Ok(Some(json!(views)))
}

pub(crate) fn import(db: &str, path: &Path) -> Result<Output, CliError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CliError::usage(format!("read {}: {e}", path.display())))?;
    let payloads = parse_fixture(&raw)?;
    let catalog = open_catalog(db, QueryLimits::default())?;
    catalog.seed_targets()?;
    let report = import_fixture(&catalog, payloads)?;
    info!(
        created = report.created.len(),
        skipped = report.skipped.len(),
        "fixture imported"
    );
    Ok(Some(json!(report)))
}

fn read_geojson_arg(raw: String) -> Result<String, CliError> {
    match raw.strip_prefix('@') {
        Some(file) => fs::read_to_string(file)
            .map_err(|e| CliError::usage(format!("read geojson file {file}: {e}"))),
        None => Ok(raw),
    }
}

pub(crate) fn query(db: &str, args: QueryArgs) -> Result<Output, CliError> {
    let mut limits = QueryLimits::default();
    if let Some(max_area) = args.max_area {
        if !max_area.is_finite() || max_area <= 0.0 {
            return Err(CliError::usage("--max-area must be a positive number"));
        }
        limits = limits.with_max_region_area_m2(max_area);
    }
    let mut params = Vec::new();
    if let Some(bbox) = args.bbox {
        params.push(("bbox".to_string(), bbox));
    }
    if let Some(geojson) = args.geojson {
        params.push(("geojson".to_string(), read_geojson_arg(geojson)?));
    }
    params.extend(args.targets.into_iter().map(|t| ("target".to_string(), t)));
    let catalog = open_catalog(db, limits)?;
    let views = list_solutions_v1(&catalog, &params)?;
    Ok(Some(json!(views)))
}

pub(crate) fn get(db: &str, id: Option<String>, name: Option<String>) -> Result<Output, CliError> {
    let catalog = open_catalog(db, QueryLimits::default())?;
    let view = match (id, name) {
        (Some(id), None) => get_solution_v1(&catalog, &id)?,
        (None, Some(name)) => get_solution_by_name_v1(&catalog, &name)?,
        _ => return Err(CliError::usage("pass a solution id or --name")),
    };
    Ok(Some(json!(view)))
}

pub(crate) fn targets(db: &str) -> Result<Output, CliError> {
    let catalog = open_catalog(db, QueryLimits::default())?;
    Ok(Some(json!(list_targets_v1(&catalog)?)))
}

pub(crate) fn openapi(out: Option<PathBuf>) -> Result<Output, CliError> {
    let spec = openapi_v1_spec();
    let Some(path) = out else {
        return Ok(Some(spec));
    };
    let text = serde_json::to_string_pretty(&spec)
        .map_err(|e| CliError::internal(format!("encode openapi: {e}")))?;
    fs::write(&path, format!("{text}\n"))
        .map_err(|e| CliError::internal(format!("write {}: {e}", path.display())))?;
    Ok(Some(json!({"written": path.display().to_string()})))
}
