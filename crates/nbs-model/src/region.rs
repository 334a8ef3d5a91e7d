// SPDX-License-Identifier: Apache-2.0

use geo::{Geometry, MultiPolygon};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{Envelope, Footprint, GeoJsonGeometry, ValidationError};

/// `[west, south, east, north]` in WGS84 degrees. Boxes crossing the
/// antimeridian are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 4]")]
pub struct BBox {
    west: f64,
    south: f64,
    east: f64,
    north: f64,
}

impl BBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ValidationError> {
        for (label, value) in [("west", west), ("south", south), ("east", east), ("north", north)] {
            if !value.is_finite() {
                return Err(ValidationError::invalid_argument(format!(
                    "bbox {label} must be a finite number"
                )));
            }
        }
        if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
            return Err(ValidationError::invalid_argument(
                "bbox longitudes must be within -180..=180",
            ));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(ValidationError::invalid_argument(
                "bbox latitudes must be within -90..=90",
            ));
        }
        if west > east {
            return Err(ValidationError::invalid_argument(
                "bbox west must not exceed east",
            ));
        }
        if south > north {
            return Err(ValidationError::invalid_argument(
                "bbox south must not exceed north",
            ));
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    pub fn from_slice(values: &[f64]) -> Result<Self, ValidationError> {
        match values {
            [west, south, east, north] => Self::new(*west, *south, *east, *north),
            _ => Err(ValidationError::invalid_argument(format!(
                "bbox needs exactly 4 values [west, south, east, north], got {}",
                values.len()
            ))),
        }
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        Envelope {
            min_lon: self.west,
            min_lat: self.south,
            max_lon: self.east,
            max_lat: self.north,
        }
    }

    /// Closed counter-clockwise ring tracing the box edges.
    #[must_use]
    pub fn to_geojson(&self) -> GeoJsonGeometry {
        let (w, s, e, n) = (self.west, self.south, self.east, self.north);
        GeoJsonGeometry::Polygon(vec![vec![[w, s], [e, s], [e, n], [w, n], [w, s]]])
    }
}

impl TryFrom<Vec<f64>> for BBox {
    type Error = ValidationError;

    fn try_from(value: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&value)
    }
}

impl From<BBox> for [f64; 4] {
    fn from(value: BBox) -> Self {
        value.as_array()
    }
}

impl Display for BBox {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

/// A spatial query filter: a bounding box or an areal GeoJSON geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    bbox: Option<BBox>,
    footprint: Footprint,
}

impl Region {
    pub fn from_bbox(bbox: BBox) -> Result<Self, ValidationError> {
        let footprint = Footprint::from_geojson(bbox.to_geojson())?;
        Ok(Self {
            bbox: Some(bbox),
            footprint,
        })
    }

    pub fn from_footprint(footprint: Footprint) -> Result<Self, ValidationError> {
        if !footprint.source().is_areal() {
            return Err(ValidationError::invalid_geometry(format!(
                "region must be a Polygon or MultiPolygon, got {}",
                footprint.source().kind()
            )));
        }
        Ok(Self {
            bbox: None,
            footprint,
        })
    }

    #[must_use]
    pub fn bbox(&self) -> Option<BBox> {
        self.bbox
    }

    #[must_use]
    pub fn footprint(&self) -> &Footprint {
        &self.footprint
    }

    #[must_use]
    pub fn shape(&self) -> &Geometry<f64> {
        self.footprint.shape()
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.footprint.envelope()
    }

    /// The region as written, for area measurement.
    #[must_use]
    pub fn polygons(&self) -> MultiPolygon<f64> {
        self.footprint
            .polygons()
            .unwrap_or_else(|| MultiPolygon::new(Vec::new()))
    }
}
