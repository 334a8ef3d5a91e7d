// SPDX-License-Identifier: Apache-2.0

use geo::Intersects;
use nbs_model::Solution;

use crate::ValidatedRegion;

/// Keeps the candidates whose footprint intersects a validated region.
///
/// Boundary contact counts as intersection. Solutions without a footprint
/// never match. Output order is input order.
#[derive(Debug, Clone, Copy)]
pub struct SpatialMatcher<'a> {
    region: &'a ValidatedRegion,
}

impl<'a> SpatialMatcher<'a> {
    #[must_use]
    pub fn new(region: &'a ValidatedRegion) -> Self {
        Self { region }
    }

    #[must_use]
    pub fn matches(&self, solution: &Solution) -> bool {
        let Some(footprint) = &solution.geometry else {
            return false;
        };
        if !footprint.envelope().intersects(&self.region.envelope()) {
            return false;
        }
        self.region.region().shape().intersects(footprint.shape())
    }

    #[must_use]
    pub fn retain(&self, mut candidates: Vec<Solution>) -> Vec<Solution> {
        candidates.retain(|solution| self.matches(solution));
        candidates
    }
}
