#![forbid(unsafe_code)]
//! Catalog data model: solutions, the shared adaptation-target vocabulary,
//! scored associations between them, and the WGS84 geometries used both as
//! solution footprints and as query regions.

mod error;
mod geometry;
mod region;
mod score;
mod solution;
mod target;

pub use error::ValidationError;
pub use geometry::{Envelope, Footprint, GeoJsonGeometry, Position};
pub use region::{BBox, Region};
pub use score::{Score, SCORE_MAX, SCORE_MIN};
pub use solution::{
    Association, NewAssociation, NewSolution, Solution, SolutionDraft, COBENEFITS_MAX_LEN,
    DEFINITION_MAX_LEN, NAME_MAX_LEN, SPECIFIC_DETAILS_MAX_LEN,
};
pub use target::{normalize_target_name, AdaptationTarget, AdaptationTargetKind, TARGET_NAME_MAX_LEN};

pub const CRATE_NAME: &str = "nbs-model";
