// SPDX-License-Identifier: Apache-2.0

use nbs_core::TargetId;
use nbs_model::{normalize_target_name, AdaptationTarget, Score, Solution};

use crate::QueryError;

/// "Score against target `name` must be at least `min`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetClause {
    pub name: String,
    pub min: Score,
}

impl TargetClause {
    pub fn new(name: impl Into<String>, min: i64) -> Result<Self, QueryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(QueryError::invalid_argument(
                "target filter name must not be empty",
            ));
        }
        let min = Score::new(min).map_err(|err| {
            QueryError::invalid_argument(format!("target filter `{}`: {}", name.trim(), err.message))
        })?;
        Ok(Self { name, min })
    }
}

/// Clauses resolved against the target vocabulary. A clause naming an
/// unknown target resolves to `None` and can never be satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMatcher {
    clauses: Vec<(Option<TargetId>, Score)>,
}

impl TargetMatcher {
    #[must_use]
    pub fn resolve(clauses: &[TargetClause], vocabulary: &[AdaptationTarget]) -> Self {
        let clauses = clauses
            .iter()
            .map(|clause| {
                let wanted = normalize_target_name(&clause.name);
                let id = vocabulary
                    .iter()
                    .find(|target| normalize_target_name(&target.name) == wanted)
                    .map(|target| target.id);
                (id, clause.min)
            })
            .collect();
        Self { clauses }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.clauses.is_empty()
    }

    #[must_use]
    pub fn matches(&self, solution: &Solution) -> bool {
        self.clauses.iter().all(|(id, min)| {
            id.and_then(|id| solution.association_for(id))
                .is_some_and(|value| value.meets(*min))
        })
    }

    #[must_use]
    pub fn retain(&self, mut candidates: Vec<Solution>) -> Vec<Solution> {
        if self.is_noop() {
            return candidates;
        }
        candidates.retain(|solution| self.matches(solution));
        candidates
    }
}
