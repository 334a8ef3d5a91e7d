#![forbid(unsafe_code)]
//! Filtering engine of the catalog.
//!
//! A list query flows through [`GeometryGate`] (region validation and area
//! bound), [`SpatialMatcher`] (geometry intersection) and [`TargetMatcher`]
//! (per-target score thresholds). The matchers are pure and synchronous;
//! [`SolutionCatalog`] composes them over a [`CatalogStore`].

mod catalog;
mod gate;
mod limits;
mod planner;
mod ports;
mod query_error;
mod spatial;
mod targets;

pub use catalog::SolutionCatalog;
pub use gate::{geodesic_area_m2, GeometryGate, RegionSelector, ValidatedRegion};
pub use limits::QueryLimits;
pub use planner::{execute_plan, plan_list, ListPlan, ListRequest};
pub use ports::CatalogStore;
pub use query_error::QueryError;
pub use spatial::SpatialMatcher;
pub use targets::{TargetClause, TargetMatcher};

pub const CRATE_NAME: &str = "nbs-query";
