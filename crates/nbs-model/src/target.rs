// SPDX-License-Identifier: Apache-2.0

use nbs_core::TargetId;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

pub const TARGET_NAME_MAX_LEN: usize = 100;

/// The kinds of protection or enhancement a solution can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum AdaptationTargetKind {
    PluvialFlooding,
    Drought,
    Heat,
    CoastalFluvialFlooding,
    Groundwater,
}

impl AdaptationTargetKind {
    pub const ALL: [Self; 5] = [
        Self::PluvialFlooding,
        Self::Drought,
        Self::Heat,
        Self::CoastalFluvialFlooding,
        Self::Groundwater,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PluvialFlooding => "Pluvial flooding",
            Self::Drought => "Drought",
            Self::Heat => "Heat",
            Self::CoastalFluvialFlooding => "Coastal and Fluvial flooding",
            Self::Groundwater => "Groundwater",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = normalize_target_name(raw);
        Self::ALL
            .into_iter()
            .find(|kind| normalize_target_name(kind.as_str()) == wanted)
    }
}

/// Lookup key for target names: trimmed, inner whitespace collapsed, lowercase.
#[must_use]
pub fn normalize_target_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Entry of the shared target vocabulary. Serialized as `{"id", "type"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdaptationTarget {
    pub id: TargetId,
    #[serde(rename = "type")]
    pub name: String,
}

impl AdaptationTarget {
    pub fn new(id: TargetId, name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_target_name(&name)?;
        Ok(Self { id, name })
    }

    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        normalize_target_name(&self.name) == normalize_target_name(name)
    }
}

pub(crate) fn validate_target_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::invalid_argument(
            "adaptation target name must not be empty",
        ));
    }
    if name.chars().count() > TARGET_NAME_MAX_LEN {
        return Err(ValidationError::invalid_argument(format!(
            "adaptation target name exceeds {TARGET_NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}
