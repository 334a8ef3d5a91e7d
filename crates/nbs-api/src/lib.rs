#![forbid(unsafe_code)]
#![recursion_limit = "256"]
//! Transport-agnostic wire layer: request parsing, response DTOs, error
//! mapping and the OpenAPI document. HTTP framing lives in `nbs-server`.

mod convert;
mod dto;
mod error_mapping;
mod errors;
mod fixture;
mod openapi;
mod params;
mod wire;

pub use convert::{draft_from_payload, list_request_from_params, solution_view, target_view};
pub use dto::{
    AdaptationRef, AdaptationValueInput, AdaptationValueView, CreateSolutionPayload,
    SolutionView, TargetView, WelcomeView,
};
pub use error_mapping::{map_error, ApiErrorMapping, API_ERROR_SCHEMA_REF};
pub use errors::{ApiError, ApiErrorCode, API_ERROR_CODES};
pub use fixture::{import_fixture, parse_fixture, ImportReport};
pub use openapi::openapi_v1_spec;
pub use params::{parse_list_solutions_params, parse_record_id, ListSolutionsParams};
pub use wire::{
    create_solution_v1, get_solution_by_name_v1, get_solution_v1, get_target_v1,
    list_solutions_v1, list_targets_v1, CatalogAdapter,
};

pub const CRATE_NAME: &str = "nbs-api";
pub const API_VERSION: &str = "v1";
