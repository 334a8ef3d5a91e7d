// SPDX-License-Identifier: Apache-2.0

use geo::line_intersection::line_intersection;
use geo::{
    Area, BoundingRect, Coord, Geometry, GeometryCollection, Line, LineString, MultiPolygon, Point,
    Polygon,
};
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// `[longitude, latitude]` in degrees.
pub type Position = [f64; 2];

/// The GeoJSON geometry subset the catalog accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum GeoJsonGeometry {
    Point(Position),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

impl GeoJsonGeometry {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Point(_) => "Point",
            Self::Polygon(_) => "Polygon",
            Self::MultiPolygon(_) => "MultiPolygon",
        }
    }

    #[must_use]
    pub fn is_areal(&self) -> bool {
        matches!(self, Self::Polygon(_) | Self::MultiPolygon(_))
    }
}

/// Axis-aligned lon/lat envelope; edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Envelope {
    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        self.min_lon <= other.max_lon
            && other.min_lon <= self.max_lon
            && self.min_lat <= other.max_lat
            && other.min_lat <= self.max_lat
    }

    fn of(shape: &Geometry<f64>) -> Option<Self> {
        shape.bounding_rect().map(|rect| Self {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        })
    }
}

/// A validated WGS84 geometry: the GeoJSON it was read from plus the planar
/// shape used for intersection tests.
///
/// Zero-area polygons are kept verbatim in `source` but their `shape`
/// collapses to a point (all vertices identical) or a line string, so
/// intersection only reports what the vertices actually touch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoJsonGeometry", into = "GeoJsonGeometry")]
pub struct Footprint {
    source: GeoJsonGeometry,
    shape: Geometry<f64>,
    envelope: Envelope,
}

impl Footprint {
    pub fn from_geojson(source: GeoJsonGeometry) -> Result<Self, ValidationError> {
        let shape = match &source {
            GeoJsonGeometry::Point(position) => {
                let coord = validate_position(*position)?;
                Geometry::Point(Point::from(coord))
            }
            GeoJsonGeometry::Polygon(rings) => normalize_polygon(build_polygon(rings)?),
            GeoJsonGeometry::MultiPolygon(polygons) => {
                if polygons.is_empty() {
                    return Err(ValidationError::invalid_geometry(
                        "MultiPolygon must contain at least one polygon",
                    ));
                }
                let built = polygons
                    .iter()
                    .map(|rings| build_polygon(rings))
                    .collect::<Result<Vec<_>, _>>()?;
                normalize_multi_polygon(built)
            }
        };
        let envelope = Envelope::of(&shape)
            .ok_or_else(|| ValidationError::invalid_geometry("geometry has no extent"))?;
        Ok(Self {
            source,
            shape,
            envelope,
        })
    }

    pub fn point(lon: f64, lat: f64) -> Result<Self, ValidationError> {
        Self::from_geojson(GeoJsonGeometry::Point([lon, lat]))
    }

    /// Parses a GeoJSON geometry object such as
    /// `{"type":"Polygon","coordinates":[[[lon,lat],...]]}`.
    pub fn parse_geojson_str(raw: &str) -> Result<Self, ValidationError> {
        let source: GeoJsonGeometry = serde_json::from_str(raw).map_err(|err| {
            ValidationError::invalid_geometry(format!("geojson is not a supported geometry: {err}"))
        })?;
        Self::from_geojson(source)
    }

    #[must_use]
    pub fn source(&self) -> &GeoJsonGeometry {
        &self.source
    }

    #[must_use]
    pub fn shape(&self) -> &Geometry<f64> {
        &self.shape
    }

    #[must_use]
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    /// The polygons as written, before degenerate collapse. `None` for points.
    #[must_use]
    pub fn polygons(&self) -> Option<MultiPolygon<f64>> {
        let to_polygon = |rings: &Vec<Vec<Position>>| {
            let mut rings = rings.iter().map(|ring| {
                LineString::from(
                    ring.iter()
                        .map(|p| Coord { x: p[0], y: p[1] })
                        .collect::<Vec<_>>(),
                )
            });
            let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
            Polygon::new(exterior, rings.collect())
        };
        match &self.source {
            GeoJsonGeometry::Point(_) => None,
            GeoJsonGeometry::Polygon(rings) => Some(MultiPolygon::new(vec![to_polygon(rings)])),
            GeoJsonGeometry::MultiPolygon(polygons) => {
                Some(MultiPolygon::new(polygons.iter().map(to_polygon).collect()))
            }
        }
    }

    #[must_use]
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.source).unwrap_or_default()
    }
}

impl TryFrom<GeoJsonGeometry> for Footprint {
    type Error = ValidationError;

    fn try_from(value: GeoJsonGeometry) -> Result<Self, Self::Error> {
        Self::from_geojson(value)
    }
}

impl From<Footprint> for GeoJsonGeometry {
    fn from(value: Footprint) -> Self {
        value.source
    }
}

fn validate_position(position: Position) -> Result<Coord<f64>, ValidationError> {
    let [lon, lat] = position;
    if !lon.is_finite() || !lat.is_finite() {
        return Err(ValidationError::invalid_geometry(
            "coordinates must be finite numbers",
        ));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ValidationError::invalid_geometry(format!(
            "longitude {lon} is outside -180..=180"
        )));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ValidationError::invalid_geometry(format!(
            "latitude {lat} is outside -90..=90"
        )));
    }
    Ok(Coord { x: lon, y: lat })
}

fn build_ring(ring: &[Position]) -> Result<LineString<f64>, ValidationError> {
    if ring.len() < 4 {
        return Err(ValidationError::invalid_geometry(format!(
            "polygon ring needs at least 4 positions, got {}",
            ring.len()
        )));
    }
    if ring.first() != ring.last() {
        return Err(ValidationError::invalid_geometry(
            "polygon ring is not closed",
        ));
    }
    let coords = ring
        .iter()
        .map(|position| validate_position(*position))
        .collect::<Result<Vec<_>, _>>()?;
    ensure_simple_ring(&coords)?;
    Ok(LineString::from(coords))
}

/// Rejects rings whose non-adjacent edges touch or cross.
fn ensure_simple_ring(coords: &[Coord<f64>]) -> Result<(), ValidationError> {
    let mut distinct = coords.to_vec();
    distinct.dedup();
    // Under three vertices once repeats are dropped: a point or a line.
    if distinct.len() < 4 {
        return Ok(());
    }
    let edges: Vec<Line<f64>> = LineString::from(distinct).lines().collect();
    let last = edges.len() - 1;
    for (i, edge) in edges.iter().enumerate() {
        for (j, other) in edges.iter().enumerate().skip(i + 2) {
            if i == 0 && j == last {
                continue;
            }
            if line_intersection(*edge, *other).is_some() {
                return Err(ValidationError::invalid_geometry(format!(
                    "polygon ring intersects itself between edges {i} and {j}"
                )));
            }
        }
    }
    Ok(())
}

fn build_polygon(rings: &[Vec<Position>]) -> Result<Polygon<f64>, ValidationError> {
    let Some((exterior, interiors)) = rings.split_first() else {
        return Err(ValidationError::invalid_geometry(
            "polygon must have an exterior ring",
        ));
    };
    let exterior = build_ring(exterior)?;
    let interiors = interiors
        .iter()
        .map(|ring| build_ring(ring))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn normalize_polygon(polygon: Polygon<f64>) -> Geometry<f64> {
    if polygon.unsigned_area() > 0.0 {
        return Geometry::Polygon(polygon);
    }
    let (exterior, _) = polygon.into_inner();
    let mut coords: Vec<Coord<f64>> = exterior.0;
    coords.dedup();
    if let [single] = coords[..] {
        return Geometry::Point(Point::from(single));
    }
    Geometry::LineString(LineString::from(coords))
}

fn normalize_multi_polygon(polygons: Vec<Polygon<f64>>) -> Geometry<f64> {
    if polygons.iter().all(|polygon| polygon.unsigned_area() > 0.0) {
        return Geometry::MultiPolygon(MultiPolygon::new(polygons));
    }
    let parts: Vec<Geometry<f64>> = polygons.into_iter().map(normalize_polygon).collect();
    Geometry::GeometryCollection(GeometryCollection::from(parts))
}
