// SPDX-License-Identifier: Apache-2.0

use nbs_model::{AdaptationTarget, Envelope, Solution};

use crate::{
    GeometryGate, QueryError, QueryLimits, RegionSelector, SpatialMatcher, TargetClause,
    TargetMatcher, ValidatedRegion,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub region: RegionSelector,
    pub targets: Vec<TargetClause>,
}

/// A list request that passed every input check.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPlan {
    pub region: Option<ValidatedRegion>,
    pub targets: Vec<TargetClause>,
}

impl ListPlan {
    #[must_use]
    pub fn candidate_envelope(&self) -> Option<Envelope> {
        self.region.as_ref().map(ValidatedRegion::envelope)
    }

    /// No region and no target clause: every candidate is returned.
    #[must_use]
    pub fn is_full_scan(&self) -> bool {
        self.region.is_none() && self.targets.is_empty()
    }
}

/// Validates the request. The region goes through the gate first so an
/// oversized region is rejected before anything else is looked at.
pub fn plan_list(req: &ListRequest, limits: &QueryLimits) -> Result<ListPlan, QueryError> {
    let region = GeometryGate::new(limits).validate_selector(&req.region)?;
    if req.targets.len() > limits.max_target_clauses {
        return Err(QueryError::invalid_argument(format!(
            "at most {} target filters are allowed",
            limits.max_target_clauses
        )));
    }
    Ok(ListPlan {
        region,
        targets: req.targets.clone(),
    })
}

/// Runs the spatial then the target stage over `candidates`, preserving order.
#[must_use]
pub fn execute_plan(
    plan: &ListPlan,
    candidates: Vec<Solution>,
    vocabulary: &[AdaptationTarget],
) -> Vec<Solution> {
    if plan.is_full_scan() {
        return candidates;
    }
    let candidates = match &plan.region {
        Some(region) => SpatialMatcher::new(region).retain(candidates),
        None => candidates,
    };
    TargetMatcher::resolve(&plan.targets, vocabulary).retain(candidates)
}
