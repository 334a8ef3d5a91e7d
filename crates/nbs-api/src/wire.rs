// SPDX-License-Identifier: Apache-2.0

use nbs_core::{SolutionId, TargetId};
use nbs_model::{AdaptationTarget, Solution, SolutionDraft};
use nbs_query::{CatalogStore, ListRequest, SolutionCatalog};

use crate::convert::{draft_from_payload, list_request_from_params, solution_view, target_view};
use crate::params::{parse_list_solutions_params, parse_record_id};
use crate::{ApiError, CreateSolutionPayload, SolutionView, TargetView};

/// What the wire layer needs from the catalog.
pub trait CatalogAdapter {
    fn get_solution(&self, id: SolutionId) -> Result<Solution, ApiError>;
    fn find_solution_by_name(&self, name: &str) -> Result<Option<Solution>, ApiError>;
    fn list_solutions(&self, req: &ListRequest) -> Result<Vec<Solution>, ApiError>;
    fn create_solution(&self, draft: SolutionDraft) -> Result<Solution, ApiError>;
    fn get_target(&self, id: TargetId) -> Result<AdaptationTarget, ApiError>;
    fn list_targets(&self) -> Result<Vec<AdaptationTarget>, ApiError>;
    fn ready(&self) -> Result<(), ApiError>;
}

impl<S: CatalogStore> CatalogAdapter for SolutionCatalog<S> {
    fn get_solution(&self, id: SolutionId) -> Result<Solution, ApiError> {
        Ok(self.get_by_id(id)?)
    }

    fn find_solution_by_name(&self, name: &str) -> Result<Option<Solution>, ApiError> {
        Ok(self.get_by_name(name)?)
    }

    fn list_solutions(&self, req: &ListRequest) -> Result<Vec<Solution>, ApiError> {
        Ok(self.list_filtered(req)?)
    }

    fn create_solution(&self, draft: SolutionDraft) -> Result<Solution, ApiError> {
        Ok(self.create(draft)?)
    }

    fn get_target(&self, id: TargetId) -> Result<AdaptationTarget, ApiError> {
        Ok(SolutionCatalog::get_target(self, id)?)
    }

    fn list_targets(&self) -> Result<Vec<AdaptationTarget>, ApiError> {
        Ok(SolutionCatalog::list_targets(self)?)
    }

    fn ready(&self) -> Result<(), ApiError> {
        Ok(self.ping()?)
    }
}

fn solution_id(raw: &str) -> Result<SolutionId, ApiError> {
    let id = parse_record_id("solution_id", raw)?;
    SolutionId::new(id).map_err(|_| ApiError::invalid_param("solution_id", raw))
}

fn target_id(raw: &str) -> Result<TargetId, ApiError> {
    let id = parse_record_id("target_id", raw)?;
    TargetId::new(id).map_err(|_| ApiError::invalid_param("target_id", raw))
}

pub fn get_solution_v1<A: CatalogAdapter + ?Sized>(
    adapter: &A,
    raw_id: &str,
) -> Result<SolutionView, ApiError> {
    let solution = adapter.get_solution(solution_id(raw_id)?)?;
    solution_view(&solution, &adapter.list_targets()?)
}

pub fn get_solution_by_name_v1<A: CatalogAdapter + ?Sized>(
    adapter: &A,
    name: &str,
) -> Result<SolutionView, ApiError> {
    let solution = adapter
        .find_solution_by_name(name)?
        .ok_or_else(|| ApiError::not_found("Could not find a solution with that name"))?;
    solution_view(&solution, &adapter.list_targets()?)
}

pub fn list_solutions_v1<A: CatalogAdapter + ?Sized>(
    adapter: &A,
    pairs: &[(String, String)],
) -> Result<Vec<SolutionView>, ApiError> {
    let req = list_request_from_params(parse_list_solutions_params(pairs)?)?;
    let solutions = adapter.list_solutions(&req)?;
    let vocabulary = adapter.list_targets()?;
    solutions
        .iter()
        .map(|solution| solution_view(solution, &vocabulary))
        .collect()
}

pub fn create_solution_v1<A: CatalogAdapter + ?Sized>(
    adapter: &A,
    payload: CreateSolutionPayload,
) -> Result<SolutionView, ApiError> {
    let vocabulary = adapter.list_targets()?;
    let draft = draft_from_payload(payload, &vocabulary)?;
    let created = adapter.create_solution(draft)?;
    solution_view(&created, &vocabulary)
}

pub fn get_target_v1<A: CatalogAdapter + ?Sized>(
    adapter: &A,
    raw_id: &str,
) -> Result<TargetView, ApiError> {
    Ok(target_view(&adapter.get_target(target_id(raw_id)?)?))
}

pub fn list_targets_v1<A: CatalogAdapter + ?Sized>(
    adapter: &A,
) -> Result<Vec<TargetView>, ApiError> {
    Ok(adapter.list_targets()?.iter().map(target_view).collect())
}
