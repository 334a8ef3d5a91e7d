// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use nbs_core::{SolutionId, TargetId};
use nbs_model::{AdaptationTarget, Envelope, NewSolution, Solution};

use crate::QueryError;

/// Storage collaborator of [`crate::SolutionCatalog`].
///
/// Implementations own durability and the atomicity of
/// [`CatalogStore::insert_solution`]; the catalog never holds locks itself.
pub trait CatalogStore: Send + Sync {
    fn solution_by_id(&self, id: SolutionId) -> Result<Option<Solution>, QueryError>;

    fn solution_by_name(&self, name: &str) -> Result<Option<Solution>, QueryError>;

    /// All solutions ordered by id. With an envelope, the store may drop
    /// solutions whose footprint envelope cannot touch it; exact matching
    /// stays with the caller.
    fn candidate_solutions(&self, envelope: Option<&Envelope>) -> Result<Vec<Solution>, QueryError>;

    fn target_by_id(&self, id: TargetId) -> Result<Option<AdaptationTarget>, QueryError>;

    /// Targets ordered by id.
    fn all_targets(&self) -> Result<Vec<AdaptationTarget>, QueryError>;

    /// Returns the existing target with this exact name or inserts it.
    fn upsert_target(&self, name: &str) -> Result<AdaptationTarget, QueryError>;

    /// Persists the solution and all of its associations, or nothing.
    /// Fails `not_found` for an unknown target id and `conflict` for a taken name.
    fn insert_solution(&self, new: NewSolution) -> Result<Solution, QueryError>;

    fn ping(&self) -> Result<(), QueryError>;
}

macro_rules! forward_catalog_store {
    ($wrapper:ident) => {
        impl<T: CatalogStore + ?Sized> CatalogStore for $wrapper<T> {
            fn solution_by_id(&self, id: SolutionId) -> Result<Option<Solution>, QueryError> {
                (**self).solution_by_id(id)
            }

            fn solution_by_name(&self, name: &str) -> Result<Option<Solution>, QueryError> {
                (**self).solution_by_name(name)
            }

            fn candidate_solutions(
                &self,
                envelope: Option<&Envelope>,
            ) -> Result<Vec<Solution>, QueryError> {
                (**self).candidate_solutions(envelope)
            }

            fn target_by_id(&self, id: TargetId) -> Result<Option<AdaptationTarget>, QueryError> {
                (**self).target_by_id(id)
            }

            fn all_targets(&self) -> Result<Vec<AdaptationTarget>, QueryError> {
                (**self).all_targets()
            }

            fn upsert_target(&self, name: &str) -> Result<AdaptationTarget, QueryError> {
                (**self).upsert_target(name)
            }

            fn insert_solution(&self, new: NewSolution) -> Result<Solution, QueryError> {
                (**self).insert_solution(new)
            }

            fn ping(&self) -> Result<(), QueryError> {
                (**self).ping()
            }
        }
    };
}

forward_catalog_store!(Box);
forward_catalog_store!(Arc);
