// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use nbs_api::{
    create_solution_v1, get_solution_by_name_v1, get_solution_v1, get_target_v1,
    list_solutions_v1, list_targets_v1, openapi_v1_spec, ApiError, ApiErrorCode,
    CreateSolutionPayload, WelcomeView,
};
use serde_json::json;
use tracing::info;

use super::support::{
    api_error_response, etagged_json, make_request_id, propagated_request_id, respond,
    run_blocking, with_request_id,
};
use crate::AppState;

const TARGETS_TTL: Duration = Duration::from_secs(60);
const OPENAPI_TTL: Duration = Duration::from_secs(300);

pub(crate) async fn root_handler(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    let view = WelcomeView {
        message: format!("Welcome to {}", state.api.project_name),
    };
    respond(Ok(view), StatusCode::OK, "/", &request_id)
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    with_request_id((StatusCode::OK, "ok").into_response(), &request_id)
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    let outcome = if state.accepting_requests.load(Ordering::Relaxed) {
        run_blocking(&state, |catalog| catalog.ready()).await
    } else {
        Err(ApiError::new(
            ApiErrorCode::NotReady,
            "server is draining",
            json!({}),
        ))
    };
    let response = match outcome {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(err) => {
            let err = ApiError::new(ApiErrorCode::NotReady, err.message, err.details);
            api_error_response(&err, "/readyz")
        }
    };
    with_request_id(response, &request_id)
}

pub(crate) async fn openapi_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let response = match etagged_json(&headers, &openapi_v1_spec(), OPENAPI_TTL) {
        Ok(response) => response,
        Err(err) => api_error_response(&err, "/v1/openapi.json"),
    };
    with_request_id(response, &request_id)
}

pub(crate) async fn list_solutions_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = match query {
        Ok(Query(params)) => {
            run_blocking(&state, move |catalog| list_solutions_v1(catalog, &params)).await
        }
        Err(rejection) => Err(ApiError::new(
            ApiErrorCode::InvalidArgument,
            "invalid query string",
            json!({"reason": rejection.body_text()}),
        )),
    };
    respond(result, StatusCode::OK, "/api/solutions/solutions", &request_id)
}

pub(crate) async fn create_solution_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<CreateSolutionPayload>, JsonRejection>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = match payload {
        Ok(Json(payload)) => {
            run_blocking(&state, move |catalog| create_solution_v1(catalog, payload)).await
        }
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            Err(ApiError::new(
                ApiErrorCode::PayloadTooLarge,
                "request body too large",
                json!({"max_body_bytes": state.api.max_body_bytes}),
            ))
        }
        Err(rejection) => Err(ApiError::invalid_body(rejection.body_text())),
    };
    if let Ok(view) = &result {
        info!(request_id = %request_id, solution_id = view.id, "solution created");
    }
    respond(
        result,
        StatusCode::CREATED,
        "/api/solutions/solutions",
        &request_id,
    )
}

pub(crate) async fn get_solution_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = run_blocking(&state, move |catalog| get_solution_v1(catalog, &raw_id)).await;
    respond(
        result,
        StatusCode::OK,
        "/api/solutions/solutions/{solution_id}",
        &request_id,
    )
}

pub(crate) async fn get_solution_by_name_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = run_blocking(&state, move |catalog| {
        get_solution_by_name_v1(catalog, &name)
    })
    .await;
    respond(
        result,
        StatusCode::OK,
        "/api/solutions/by-name/{name}",
        &request_id,
    )
}

pub(crate) async fn get_target_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let result = run_blocking(&state, move |catalog| get_target_v1(catalog, &raw_id)).await;
    respond(
        result,
        StatusCode::OK,
        "/api/targets/targets/{target_id}",
        &request_id,
    )
}

pub(crate) async fn list_targets_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    let request_id = propagated_request_id(&headers, &state);
    let response = match run_blocking(&state, |catalog| list_targets_v1(catalog)).await {
        Ok(views) => etagged_json(&headers, &views, TARGETS_TTL)
            .unwrap_or_else(|err| api_error_response(&err, "/api/targets/targets")),
        Err(err) => api_error_response(&err, "/api/targets/targets"),
    };
    with_request_id(response, &request_id)
}
