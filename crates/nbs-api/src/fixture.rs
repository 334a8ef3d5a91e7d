// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::{create_solution_v1, ApiError, ApiErrorCode, CatalogAdapter, CreateSolutionPayload};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: Vec<String>,
    /// Names that already existed and were left untouched.
    pub skipped: Vec<String>,
}

/// A fixture file is a JSON array of create payloads.
pub fn parse_fixture(raw: &str) -> Result<Vec<CreateSolutionPayload>, ApiError> {
    serde_json::from_str(raw).map_err(|err| ApiError::invalid_body(err.to_string()))
}

/// Creates every payload in order. Each create is atomic; a name that is
/// already taken is skipped so re-importing the same file is harmless.
/// Any other failure stops the import.
pub fn import_fixture<A: CatalogAdapter + ?Sized>(
    adapter: &A,
    payloads: Vec<CreateSolutionPayload>,
) -> Result<ImportReport, ApiError> {
    let mut report = ImportReport::default();
    for payload in payloads {
        let name = payload.name.clone();
        match create_solution_v1(adapter, payload) {
            Ok(view) => report.created.push(view.name),
            Err(err) if err.code == ApiErrorCode::Conflict => report.skipped.push(name),
            Err(mut err) => {
                err.message = format!("importing `{name}`: {}", err.message);
                return Err(err);
            }
        }
    }
    Ok(report)
}
