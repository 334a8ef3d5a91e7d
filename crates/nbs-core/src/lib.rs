#![forbid(unsafe_code)]
//! Shared vocabulary for the nature-based solutions catalog: error taxonomy,
//! process exit codes, typed record ids, `NBS_*` environment names and data directory resolution.

mod errors;
mod ids;
mod paths;

use sha2::{Digest, Sha256};

pub use errors::{ErrorCode, ExitCode, MachineError, ERROR_CODES};
pub use ids::{IdError, SolutionId, TargetId};
pub use paths::resolve_nbs_data_dir;

pub const CRATE_NAME: &str = "nbs-core";

/// Log filter directive; takes precedence over `RUST_LOG`.
pub const ENV_NBS_LOG_LEVEL: &str = "NBS_LOG_LEVEL";
pub const ENV_NBS_LOG_JSON: &str = "NBS_LOG_JSON";
pub const ENV_NBS_DATA_DIR: &str = "NBS_DATA_DIR";
pub const ENV_NBS_DATABASE_URL: &str = "NBS_DATABASE_URL";
pub const ENV_NBS_BIND: &str = "NBS_BIND";
pub const ENV_NBS_MAX_BODY_BYTES: &str = "NBS_MAX_BODY_BYTES";
pub const ENV_NBS_REQUEST_TIMEOUT_MS: &str = "NBS_REQUEST_TIMEOUT_MS";
pub const ENV_NBS_CORS_ALLOWED_ORIGINS: &str = "NBS_CORS_ALLOWED_ORIGINS";
pub const ENV_NBS_SEED_TARGETS: &str = "NBS_SEED_TARGETS";
pub const ENV_NBS_MAX_REGION_AREA_M2: &str = "NBS_MAX_REGION_AREA_M2";
pub const ENV_NBS_PROJECT_NAME: &str = "NBS_PROJECT_NAME";

/// Lowercase hex SHA-256 digest, used for response entity tags.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
