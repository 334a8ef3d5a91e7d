// SPDX-License-Identifier: Apache-2.0

use geo::GeodesicArea;
use nbs_model::{BBox, Envelope, Footprint, Region};

use crate::{QueryError, QueryLimits};

/// Raw region input of a list query: a bbox, a GeoJSON polygon, or neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionSelector {
    pub bbox: Option<Vec<f64>>,
    pub geojson: Option<String>,
}

impl RegionSelector {
    #[must_use]
    pub fn bbox(values: &[f64]) -> Self {
        Self {
            bbox: Some(values.to_vec()),
            geojson: None,
        }
    }

    #[must_use]
    pub fn geojson(raw: impl Into<String>) -> Self {
        Self {
            bbox: None,
            geojson: Some(raw.into()),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bbox.is_none() && self.geojson.is_none()
    }
}

/// A region that passed the gate. Only [`GeometryGate`] constructs these.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRegion {
    region: Region,
    area_m2: f64,
}

impl ValidatedRegion {
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn area_m2(&self) -> f64 {
        self.area_m2
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.region.envelope()
    }
}

/// Geodesic (ellipsoidal) area of the region as written, in square metres.
#[must_use]
pub fn geodesic_area_m2(region: &Region) -> f64 {
    region.polygons().geodesic_area_unsigned()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryGate {
    max_area_m2: f64,
}

impl GeometryGate {
    #[must_use]
    pub fn new(limits: &QueryLimits) -> Self {
        Self {
            max_area_m2: limits.max_region_area_m2,
        }
    }

    #[must_use]
    pub fn max_area_m2(&self) -> f64 {
        self.max_area_m2
    }

    pub fn validate(&self, region: Region) -> Result<ValidatedRegion, QueryError> {
        let area_m2 = geodesic_area_m2(&region);
        if !area_m2.is_finite() || area_m2 > self.max_area_m2 {
            return Err(QueryError::region_too_large(area_m2, self.max_area_m2));
        }
        Ok(ValidatedRegion { region, area_m2 })
    }

    /// Optional region: `Ok(None)` when the selector is empty.
    pub fn validate_selector(
        &self,
        selector: &RegionSelector,
    ) -> Result<Option<ValidatedRegion>, QueryError> {
        let region = match (&selector.bbox, &selector.geojson) {
            (None, None) => return Ok(None),
            (Some(_), Some(_)) => {
                return Err(QueryError::invalid_argument(
                    "supply either bbox or geojson, not both",
                ))
            }
            (Some(values), None) => Region::from_bbox(BBox::from_slice(values)?)?,
            (None, Some(raw)) => Region::from_footprint(Footprint::parse_geojson_str(raw)?)?,
        };
        self.validate(region).map(Some)
    }

    /// Mandatory region: an empty selector is rejected.
    pub fn require_selector(&self, selector: &RegionSelector) -> Result<ValidatedRegion, QueryError> {
        self.validate_selector(selector)?
            .ok_or_else(|| QueryError::invalid_argument("a bbox or geojson region is required"))
    }
}
