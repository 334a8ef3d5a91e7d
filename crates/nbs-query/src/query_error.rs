// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use nbs_core::{ErrorCode, MachineError};
use nbs_model::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl QueryError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    #[must_use]
    pub fn region_too_large(area_m2: f64, max_area_m2: f64) -> Self {
        Self::new(
            ErrorCode::RegionTooLarge,
            format!("region area {area_m2:.0} m2 exceeds the maximum of {max_area_m2:.0} m2"),
        )
        .with_detail("area_m2", format!("{area_m2:.3}"))
        .with_detail("max_area_m2", format!("{max_area_m2:.3}"))
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    #[must_use]
    pub fn to_machine_error(&self) -> MachineError {
        let mut out = MachineError::new(self.code, &self.message);
        for (key, value) in &self.details {
            out = out.with_detail(key, value);
        }
        out
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for QueryError {}

impl From<ValidationError> for QueryError {
    fn from(value: ValidationError) -> Self {
        Self::new(value.code, value.message)
    }
}
