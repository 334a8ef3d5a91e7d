// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use nbs_core::ErrorCode;
use nbs_query::QueryError;
use rusqlite::ffi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    NotFound,
    Validation,
    Conflict,
    Io,
    Internal,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Validation => "validation_error",
            Self::Conflict => "conflict",
            Self::Io => "io_error",
            Self::Internal => "internal_error",
        }
    }

    #[must_use]
    pub const fn as_error_code(self) -> ErrorCode {
        match self {
            Self::NotFound => ErrorCode::NotFound,
            Self::Validation => ErrorCode::InvalidArgument,
            Self::Conflict => ErrorCode::Conflict,
            Self::Io | Self::Internal => ErrorCode::Internal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        let code = match &value {
            rusqlite::Error::SqliteFailure(err, _) => match err.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    StoreErrorCode::Conflict
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreErrorCode::NotFound,
                ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                    StoreErrorCode::Validation
                }
                _ if err.code == rusqlite::ErrorCode::CannotOpen => StoreErrorCode::Io,
                _ => StoreErrorCode::Internal,
            },
            _ => StoreErrorCode::Internal,
        };
        Self::new(code, value.to_string())
    }
}

impl From<StoreError> for QueryError {
    fn from(value: StoreError) -> Self {
        QueryError::new(value.code.as_error_code(), value.message)
    }
}
