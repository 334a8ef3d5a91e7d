use std::path::PathBuf;

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Directory holding the default on-disk catalog database.
#[must_use]
pub fn resolve_nbs_data_dir() -> PathBuf {
    if let Some(explicit) = non_empty_env(crate::ENV_NBS_DATA_DIR) {
        return PathBuf::from(explicit);
    }
    if let Some(xdg_data_home) = non_empty_env("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data_home).join("nbs");
    }
    if let Some(home) = non_empty_env("HOME") {
        return PathBuf::from(home).join(".local").join("share").join("nbs");
    }
    PathBuf::from(".nbs").join("data")
}
