// SPDX-License-Identifier: Apache-2.0

use nbs_core::ErrorCode;
use nbs_model::ValidationError;
use nbs_query::QueryError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ApiErrorCode {
    NotFound,
    InvalidArgument,
    RegionTooLarge,
    InvalidGeometry,
    Conflict,
    PayloadTooLarge,
    Timeout,
    NotReady,
    Internal,
}

pub const API_ERROR_CODES: [ApiErrorCode; 9] = [
    ApiErrorCode::NotFound,
    ApiErrorCode::InvalidArgument,
    ApiErrorCode::RegionTooLarge,
    ApiErrorCode::InvalidGeometry,
    ApiErrorCode::Conflict,
    ApiErrorCode::PayloadTooLarge,
    ApiErrorCode::Timeout,
    ApiErrorCode::NotReady,
    ApiErrorCode::Internal,
];

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::RegionTooLarge => "region_too_large",
            Self::InvalidGeometry => "invalid_geometry",
            Self::Conflict => "conflict",
            Self::PayloadTooLarge => "payload_too_large",
            Self::Timeout => "timeout",
            Self::NotReady => "not_ready",
            Self::Internal => "internal",
        }
    }

    #[must_use]
    pub const fn from_error_code(code: ErrorCode) -> Self {
        match code {
            ErrorCode::NotFound => Self::NotFound,
            ErrorCode::InvalidArgument => Self::InvalidArgument,
            ErrorCode::RegionTooLarge => Self::RegionTooLarge,
            ErrorCode::InvalidGeometry => Self::InvalidGeometry,
            ErrorCode::Conflict => Self::Conflict,
            _ => Self::Internal,
        }
    }
}

/// Error body carried under the `error` key of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
}

impl ApiError {
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidArgument,
            format!("invalid query parameter: {name}"),
            json!({"parameter": name, "value": value}),
        )
    }

    #[must_use]
    pub fn invalid_body(reason: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::InvalidArgument,
            "invalid request body",
            json!({"reason": reason.into()}),
        )
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::NotFound, message, json!({}))
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message, json!({}))
    }

    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({ "error": self })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<QueryError> for ApiError {
    fn from(value: QueryError) -> Self {
        let details: Map<String, Value> = value
            .details
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        Self::new(
            ApiErrorCode::from_error_code(value.code),
            value.message,
            Value::Object(details),
        )
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        QueryError::from(value).into()
    }
}
