// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryLimits {
    /// Largest geodesic region area a list query may cover, in square metres.
    pub max_region_area_m2: f64,
    pub max_target_clauses: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            max_region_area_m2: 1_000_000.0,
            max_target_clauses: 16,
        }
    }
}

impl QueryLimits {
    #[must_use]
    pub fn with_max_region_area_m2(mut self, max_region_area_m2: f64) -> Self {
        self.max_region_area_m2 = max_region_area_m2;
        self
    }
}
