// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use nbs_core::{SolutionId, TargetId};

use crate::{Footprint, GeoJsonGeometry, Score, ValidationError};

pub const NAME_MAX_LEN: usize = 100;
pub const DEFINITION_MAX_LEN: usize = 500;
pub const SPECIFIC_DETAILS_MAX_LEN: usize = 500;
pub const COBENEFITS_MAX_LEN: usize = 200;

/// "This solution scores `value` against `target`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Association {
    pub target: TargetId,
    pub value: Score,
}

/// A stored nature-based solution with its owned associations.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub id: SolutionId,
    pub name: String,
    pub definition: String,
    pub cobenefits: String,
    pub specific_details: String,
    pub location: String,
    pub geometry: Option<Footprint>,
    pub adaptations: Vec<Association>,
}

impl Solution {
    #[must_use]
    pub fn from_new(id: SolutionId, new: NewSolution) -> Self {
        Self {
            id,
            name: new.name,
            definition: new.definition,
            cobenefits: new.cobenefits,
            specific_details: new.specific_details,
            location: new.location,
            geometry: new.geometry,
            adaptations: new
                .adaptations
                .into_iter()
                .map(|assoc| Association {
                    target: assoc.target,
                    value: assoc.value,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn association_for(&self, target: TargetId) -> Option<Score> {
        self.adaptations
            .iter()
            .find(|assoc| assoc.target == target)
            .map(|assoc| assoc.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssociation {
    pub target: TargetId,
    pub value: Score,
}

/// A validated create payload. Target ids are well-formed but not yet
/// checked for existence; that is the store's job at commit time.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSolution {
    pub name: String,
    pub definition: String,
    pub cobenefits: String,
    pub specific_details: String,
    pub location: String,
    pub geometry: Option<Footprint>,
    pub adaptations: Vec<NewAssociation>,
}

/// Unvalidated create input as it arrives from a client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionDraft {
    pub name: String,
    pub definition: String,
    pub cobenefits: String,
    pub specific_details: String,
    pub location: String,
    pub geometry: Option<GeoJsonGeometry>,
    /// `(target id, value)` pairs.
    pub adaptations: Vec<(i64, i64)>,
}

impl SolutionDraft {
    pub fn validate(self) -> Result<NewSolution, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::invalid_argument("name must not be empty"));
        }
        check_len("name", &self.name, NAME_MAX_LEN)?;
        check_len("definition", &self.definition, DEFINITION_MAX_LEN)?;
        check_len("specific_details", &self.specific_details, SPECIFIC_DETAILS_MAX_LEN)?;
        check_len("cobenefits", &self.cobenefits, COBENEFITS_MAX_LEN)?;
        if self.location.trim().is_empty() {
            return Err(ValidationError::invalid_argument(
                "location must not be empty",
            ));
        }

        let mut seen = BTreeSet::new();
        let mut adaptations = Vec::with_capacity(self.adaptations.len());
        for (raw_target, raw_value) in self.adaptations {
            let target = TargetId::new(raw_target)
                .map_err(|err| ValidationError::invalid_argument(err.to_string()))?;
            let value = Score::new(raw_value).map_err(|err| {
                ValidationError::invalid_argument(format!(
                    "adaptation target {target}: {}",
                    err.message
                ))
            })?;
            if !seen.insert(target) {
                return Err(ValidationError::invalid_argument(format!(
                    "adaptation target {target} is listed more than once"
                )));
            }
            adaptations.push(NewAssociation { target, value });
        }

        let geometry = self.geometry.map(Footprint::from_geojson).transpose()?;

        Ok(NewSolution {
            name: self.name,
            definition: self.definition,
            cobenefits: self.cobenefits,
            specific_details: self.specific_details,
            location: self.location,
            geometry,
            adaptations,
        })
    }
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::invalid_argument(format!(
            "{field} must be {max} characters or less, got {len}"
        )));
    }
    Ok(())
}
