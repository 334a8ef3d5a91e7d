// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use nbs_core::{SolutionId, TargetId};
use nbs_model::{AdaptationTarget, Association, Envelope, Footprint, NewSolution, Score, Solution};
use nbs_query::{CatalogStore, QueryError};

use crate::{StoreError, StoreErrorCode};

#[derive(Debug, Clone)]
struct SolutionRecord {
    name: String,
    definition: String,
    cobenefits: String,
    specific_details: String,
    location: String,
    geometry: Option<Footprint>,
}

#[derive(Debug, Default)]
struct Arena {
    solutions: BTreeMap<SolutionId, SolutionRecord>,
    targets: BTreeMap<TargetId, AdaptationTarget>,
    scores: BTreeMap<(SolutionId, TargetId), Score>,
    last_solution_id: i64,
    last_target_id: i64,
}

impl Arena {
    fn materialize(&self, id: SolutionId, record: &SolutionRecord) -> Solution {
        let adaptations = self
            .scores
            .range((id, TargetId::MIN)..=(id, TargetId::MAX))
            .map(|(&(_, target), &value)| Association { target, value })
            .collect();
        Solution {
            id,
            name: record.name.clone(),
            definition: record.definition.clone(),
            cobenefits: record.cobenefits.clone(),
            specific_details: record.specific_details.clone(),
            location: record.location.clone(),
            geometry: record.geometry.clone(),
            adaptations,
        }
    }
}

/// In-process store: records live in id-keyed maps and associations in a
/// `(solution, target) -> score` map, all behind one lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    arena: RwLock<Arena>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Arena>, StoreError> {
        self.arena
            .read()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Arena>, StoreError> {
        self.arena
            .write()
            .map_err(|_| StoreError::new(StoreErrorCode::Internal, "memory store lock poisoned"))
    }
}

fn next_id(counter: &mut i64) -> Result<i64, StoreError> {
    *counter = counter
        .checked_add(1)
        .ok_or_else(|| StoreError::new(StoreErrorCode::Internal, "id space exhausted"))?;
    Ok(*counter)
}

impl CatalogStore for MemoryStore {
    fn solution_by_id(&self, id: SolutionId) -> Result<Option<Solution>, QueryError> {
        let arena = self.read()?;
        Ok(arena
            .solutions
            .get(&id)
            .map(|record| arena.materialize(id, record)))
    }

    fn solution_by_name(&self, name: &str) -> Result<Option<Solution>, QueryError> {
        let arena = self.read()?;
        Ok(arena
            .solutions
            .iter()
            .find(|(_, record)| record.name == name)
            .map(|(&id, record)| arena.materialize(id, record)))
    }

    fn candidate_solutions(&self, envelope: Option<&Envelope>) -> Result<Vec<Solution>, QueryError> {
        let arena = self.read()?;
        Ok(arena
            .solutions
            .iter()
            .filter(|(_, record)| match (envelope, &record.geometry) {
                (None, _) => true,
                (Some(env), Some(footprint)) => footprint.envelope().intersects(env),
                (Some(_), None) => false,
            })
            .map(|(&id, record)| arena.materialize(id, record))
            .collect())
    }

    fn target_by_id(&self, id: TargetId) -> Result<Option<AdaptationTarget>, QueryError> {
        Ok(self.read()?.targets.get(&id).cloned())
    }

    fn all_targets(&self) -> Result<Vec<AdaptationTarget>, QueryError> {
        Ok(self.read()?.targets.values().cloned().collect())
    }

    fn upsert_target(&self, name: &str) -> Result<AdaptationTarget, QueryError> {
        let mut arena = self.write()?;
        if let Some(found) = arena.targets.values().find(|t| t.matches_name(name)) {
            return Ok(found.clone());
        }
        let raw = next_id(&mut arena.last_target_id)?;
        let id = TargetId::new(raw)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        let target = AdaptationTarget::new(id, name)?;
        arena.targets.insert(id, target.clone());
        Ok(target)
    }

    fn insert_solution(&self, new: NewSolution) -> Result<Solution, QueryError> {
        let mut arena = self.write()?;
        if let Some(missing) = new
            .adaptations
            .iter()
            .find(|assoc| !arena.targets.contains_key(&assoc.target))
        {
            return Err(StoreError::new(
                StoreErrorCode::NotFound,
                format!("adaptation target {} not found", missing.target),
            )
            .into());
        }
        if arena.solutions.values().any(|record| record.name == new.name) {
            return Err(StoreError::new(
                StoreErrorCode::Conflict,
                format!("a solution named `{}` already exists", new.name),
            )
            .into());
        }
        let raw = next_id(&mut arena.last_solution_id)?;
        let id = SolutionId::new(raw)
            .map_err(|e| StoreError::new(StoreErrorCode::Internal, e.to_string()))?;
        for assoc in &new.adaptations {
            arena.scores.insert((id, assoc.target), assoc.value);
        }
        let record = SolutionRecord {
            name: new.name,
            definition: new.definition,
            cobenefits: new.cobenefits,
            specific_details: new.specific_details,
            location: new.location,
            geometry: new.geometry,
        };
        let solution = arena.materialize(id, &record);
        arena.solutions.insert(id, record);
        Ok(solution)
    }

    fn ping(&self) -> Result<(), QueryError> {
        self.read()?;
        Ok(())
    }
}
