// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdError {
    pub kind: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {} `{}`: {}", self.kind, self.value, self.reason)
    }
}

impl std::error::Error for IdError {}

/// Row identity of a nature-based solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SolutionId(i64);

/// Row identity of an adaptation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TargetId(i64);

fn validate_id(kind: &'static str, value: i64) -> Result<i64, IdError> {
    if value <= 0 {
        return Err(IdError {
            kind,
            value: value.to_string(),
            reason: "must be a positive integer",
        });
    }
    Ok(value)
}

fn parse_id(kind: &'static str, raw: &str) -> Result<i64, IdError> {
    let value = raw.trim().parse::<i64>().map_err(|_| IdError {
        kind,
        value: raw.to_string(),
        reason: "must be an integer",
    })?;
    validate_id(kind, value)
}

macro_rules! impl_id_traits {
    ($name:ident, $kind:literal) => {
        impl $name {
            pub const MIN: Self = Self(1);
            pub const MAX: Self = Self(i64::MAX);

            pub fn new(value: i64) -> Result<Self, IdError> {
                validate_id($kind, value).map(Self)
            }

            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = IdError;

            fn try_from(value: i64) -> Result<Self, IdError> {
                Self::new(value)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, IdError> {
                parse_id($kind, s).map(Self)
            }
        }
    };
}

impl_id_traits!(SolutionId, "solution_id");
impl_id_traits!(TargetId, "target_id");
