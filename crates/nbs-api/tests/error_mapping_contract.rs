// SPDX-License-Identifier: Apache-2.0

use nbs_api::{map_error, ApiError, ApiErrorCode, API_ERROR_CODES};
use nbs_core::{ErrorCode, ERROR_CODES};
use nbs_query::QueryError;
use serde_json::json;

#[test]
fn every_core_code_maps_to_a_distinct_status() {
    let expected = [
        (ErrorCode::NotFound, 404),
        (ErrorCode::InvalidArgument, 400),
        (ErrorCode::RegionTooLarge, 422),
        (ErrorCode::InvalidGeometry, 400),
        (ErrorCode::Conflict, 409),
        (ErrorCode::Internal, 500),
    ];
    assert_eq!(expected.len(), ERROR_CODES.len());
    for (code, status) in expected {
        let err = ApiError::from(QueryError::new(code, "x"));
        assert_eq!(map_error(&err).status_code, status, "{code}");
    }
}

#[test]
fn region_too_large_keeps_its_area_details() {
    let err = ApiError::from(QueryError::region_too_large(2.5e9, 1.0e6));
    assert_eq!(err.code, ApiErrorCode::RegionTooLarge);
    assert_eq!(err.details["max_area_m2"], "1000000.000");
    assert_eq!(
        err.to_body()["error"]["code"],
        json!("region_too_large")
    );
}

#[test]
fn error_codes_serialize_as_their_stable_strings() {
    for code in API_ERROR_CODES {
        assert_eq!(serde_json::to_value(code).expect("json"), json!(code.as_str()));
    }
}
