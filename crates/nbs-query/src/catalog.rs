// SPDX-License-Identifier: Apache-2.0

use nbs_core::{SolutionId, TargetId};
use nbs_model::{AdaptationTarget, AdaptationTargetKind, Solution, SolutionDraft};
use tracing::{debug, info, warn};

use crate::{execute_plan, plan_list, CatalogStore, ListRequest, QueryError, QueryLimits};

/// Query and command surface of the catalog over an explicit store.
#[derive(Debug, Clone)]
pub struct SolutionCatalog<S> {
    store: S,
    limits: QueryLimits,
}

impl<S: CatalogStore> SolutionCatalog<S> {
    #[must_use]
    pub fn new(store: S, limits: QueryLimits) -> Self {
        Self { store, limits }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    pub fn get_by_id(&self, id: SolutionId) -> Result<Solution, QueryError> {
        self.store
            .solution_by_id(id)?
            .ok_or_else(|| QueryError::not_found(format!("solution {id} not found")))
    }

    /// Absence is `Ok(None)`; only storage failures are errors.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Solution>, QueryError> {
        self.store.solution_by_name(name)
    }

    pub fn list_filtered(&self, req: &ListRequest) -> Result<Vec<Solution>, QueryError> {
        let plan = match plan_list(req, &self.limits) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(code = %err.code, message = %err.message, "list query rejected");
                return Err(err);
            }
        };
        let envelope = plan.candidate_envelope();
        let candidates = self.store.candidate_solutions(envelope.as_ref())?;
        let vocabulary = if plan.targets.is_empty() {
            Vec::new()
        } else {
            self.store.all_targets()?
        };
        let scanned = candidates.len();
        let matched = execute_plan(&plan, candidates, &vocabulary);
        debug!(
            scanned,
            matched = matched.len(),
            area_m2 = ?plan.region.as_ref().map(|r| r.area_m2()),
            target_clauses = plan.targets.len(),
            full_scan = plan.is_full_scan(),
            "list query executed"
        );
        Ok(matched)
    }

    /// Validates the draft, checks every referenced target exists and the
    /// name is free, then hands the record to the store's atomic insert.
    pub fn create(&self, draft: SolutionDraft) -> Result<Solution, QueryError> {
        let new = draft.validate()?;
        for assoc in &new.adaptations {
            if self.store.target_by_id(assoc.target)?.is_none() {
                info!(target_id = %assoc.target, name = %new.name, "create rejected: unknown target");
                return Err(QueryError::not_found(format!(
                    "adaptation target {} not found",
                    assoc.target
                ))
                .with_detail("target_id", assoc.target.to_string()));
            }
        }
        if self.store.solution_by_name(&new.name)?.is_some() {
            info!(name = %new.name, "create rejected: duplicate name");
            return Err(QueryError::conflict(format!(
                "a solution named `{}` already exists",
                new.name
            )));
        }
        let created = self.store.insert_solution(new)?;
        info!(
            solution_id = %created.id,
            name = %created.name,
            associations = created.adaptations.len(),
            "solution created"
        );
        Ok(created)
    }

    pub fn get_target(&self, id: TargetId) -> Result<AdaptationTarget, QueryError> {
        self.store
            .target_by_id(id)?
            .ok_or_else(|| QueryError::not_found(format!("adaptation target {id} not found")))
    }

    pub fn list_targets(&self) -> Result<Vec<AdaptationTarget>, QueryError> {
        self.store.all_targets()
    }

    /// Case-insensitive lookup in the target vocabulary.
    pub fn target_by_name(&self, name: &str) -> Result<Option<AdaptationTarget>, QueryError> {
        Ok(self
            .store
            .all_targets()?
            .into_iter()
            .find(|target| target.matches_name(name)))
    }

    /// Inserts the canonical targets that are missing. Safe to call repeatedly.
    pub fn seed_targets(&self) -> Result<Vec<AdaptationTarget>, QueryError> {
        let seeded = AdaptationTargetKind::ALL
            .iter()
            .map(|kind| self.store.upsert_target(kind.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        info!(count = seeded.len(), "adaptation targets seeded");
        Ok(seeded)
    }

    pub fn ping(&self) -> Result<(), QueryError> {
        self.store.ping()
    }
}
