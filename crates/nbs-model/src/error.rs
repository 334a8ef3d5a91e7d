use nbs_core::ErrorCode;
use std::fmt::{Display, Formatter};

/// A rejected input, tagged with the error kind the caller should surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidArgument,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_geometry(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidGeometry,
            message: message.into(),
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}
