// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use crate::{StoreError, StoreErrorCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    Path(PathBuf),
}

/// Accepts `:memory:`, `sqlite::memory:`, `sqlite://path`, `sqlite:path`
/// and bare filesystem paths. Any other URL scheme is rejected.
pub fn parse_database_url(raw: &str) -> Result<DatabaseLocation, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::new(
            StoreErrorCode::Validation,
            "database url must not be empty",
        ));
    }
    let rest = if let Some(rest) = trimmed.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("sqlite:") {
        rest
    } else if let Some((scheme, _)) = trimmed.split_once("://") {
        return Err(StoreError::new(
            StoreErrorCode::Validation,
            format!("unsupported database scheme `{scheme}`; only sqlite is available"),
        ));
    } else {
        trimmed
    };
    let rest = rest.split('?').next().unwrap_or_default();
    match rest {
        "" => Err(StoreError::new(
            StoreErrorCode::Validation,
            "database url has no path",
        )),
        ":memory:" => Ok(DatabaseLocation::Memory),
        path => Ok(DatabaseLocation::Path(PathBuf::from(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_forms_are_normalized() {
        assert_eq!(parse_database_url(":memory:"), Ok(DatabaseLocation::Memory));
        assert_eq!(parse_database_url("sqlite::memory:"), Ok(DatabaseLocation::Memory));
        assert_eq!(
            parse_database_url("sqlite:///var/lib/nbs.db"),
            Ok(DatabaseLocation::Path(PathBuf::from("/var/lib/nbs.db")))
        );
        assert_eq!(
            parse_database_url("sqlite:data/nbs.db?mode=rwc"),
            Ok(DatabaseLocation::Path(PathBuf::from("data/nbs.db")))
        );
        assert_eq!(
            parse_database_url("./nbs.sqlite"),
            Ok(DatabaseLocation::Path(PathBuf::from("./nbs.sqlite")))
        );
    }

    #[test]
    fn other_schemes_are_rejected() {
        let err = parse_database_url("postgresql://user@localhost/nbs").expect_err("postgres");
        assert_eq!(err.code, StoreErrorCode::Validation);
        assert!(err.message.contains("postgresql"));
        assert!(parse_database_url("  ").is_err());
    }
}
