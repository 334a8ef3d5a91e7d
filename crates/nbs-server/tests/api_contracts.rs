use std::net::SocketAddr;
use std::sync::Arc;

use nbs_query::{QueryLimits, SolutionCatalog};
use nbs_server::{build_router, ApiConfig, AppState};
use nbs_store::{MemoryStore, SqliteStore};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn send_raw_with_method(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(payload) = body {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", payload.len()));
    }
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    if let Some(payload) = body {
        req.push_str(payload);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    send_raw_with_method(addr, "GET", path, &[], None).await
}

async fn post(addr: SocketAddr, path: &str, body: &Value) -> (u16, String, String) {
    let text = body.to_string();
    send_raw_with_method(addr, "POST", path, &[], Some(&text)).await
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

async fn spawn_with(api: ApiConfig) -> SocketAddr {
    let catalog = SolutionCatalog::new(MemoryStore::new(), api.limits.clone());
    catalog.seed_targets().expect("seed targets");
    let state = AppState::new(Arc::new(catalog), api);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

fn test_config() -> ApiConfig {
    ApiConfig {
        database_url: ":memory:".to_string(),
        ..ApiConfig::default()
    }
}

async fn spawn_server() -> SocketAddr {
    spawn_with(test_config()).await
}

fn shade_trees() -> Value {
    json!({
        "name": "Shade Trees",
        "definition": "Trees provide shade, reducing urban heat.",
        "cobenefits": "Improved air quality",
        "specificdetails": "Street trees",
        "location": "Central Park, NYC",
        "geometry": {"type": "Point", "coordinates": [-73.9654, 40.7829]},
        "adaptations": [
            {"adaptation": {"type": "Heat"}, "value": 90},
            {"adaptation": {"id": 1}, "value": 30}
        ]
    })
}

fn bioswales() -> Value {
    json!({
        "name": "Bioswales",
        "definition": "Bioswales capture and filter stormwater runoff.",
        "cobenefits": "Groundwater recharge",
        "specificdetails": "Vegetated channels",
        "location": "Greenpoint, NYC",
        "geometry": {"type": "Point", "coordinates": [-73.9442, 40.7294]},
        "adaptations": [
            {"adaptation": {"type": "Pluvial flooding"}, "value": 80},
            {"adaptation": {"type": "Heat"}, "value": 20}
        ]
    })
}

const CENTRAL_PARK_BBOX: &str = "-73.970,40.780,-73.960,40.786";

#[tokio::test]
async fn root_health_and_readiness() {
    let addr = spawn_server().await;
    let (status, head, body) = get(addr, "/").await;
    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_str::<Value>(&body).expect("json"),
        json!({"message": "Welcome to nbsapi"})
    );
    assert!(header(&head, "x-request-id").is_some());

    let (status, _, body) = get(addr, "/healthz").await;
    assert_eq!((status, body.as_str()), (200, "ok"));
    let (status, _, body) = get(addr, "/readyz").await;
    assert_eq!((status, body.as_str()), (200, "ready"));
}

#[tokio::test]
async fn create_then_fetch_by_id_and_name() {
    let addr = spawn_server().await;
    let (status, _, body) = post(addr, "/api/solutions/solutions", &shade_trees()).await;
    assert_eq!(status, 201, "{body}");
    let created: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(created["id"], 1);
    assert_eq!(
        created["adaptations"],
        json!([
            {"adaptation": {"id": 1, "type": "Pluvial flooding"}, "value": 30},
            {"adaptation": {"id": 3, "type": "Heat"}, "value": 90}
        ])
    );

    let (status, _, body) = get(addr, "/api/solutions/solutions/1").await;
    assert_eq!(status, 200);
    assert_eq!(serde_json::from_str::<Value>(&body).expect("json"), created);

    let (status, _, body) = get(addr, "/api/solutions/by-name/Shade%20Trees").await;
    assert_eq!(status, 200);
    assert_eq!(serde_json::from_str::<Value>(&body).expect("json")["id"], 1);
}

#[tokio::test]
async fn trailing_slash_create_and_duplicate_name_conflict() {
    let addr = spawn_server().await;
    let (status, _, _) = post(addr, "/api/solutions/solutions/", &shade_trees()).await;
    assert_eq!(status, 201);
    let (status, _, body) = post(addr, "/api/solutions/solutions", &shade_trees()).await;
    assert_eq!(status, 409);
    let err: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(err["error"]["code"], "conflict");
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let addr = spawn_server().await;
    let (status, _, body) = get(addr, "/api/solutions/by-name/Nowhere").await;
    assert_eq!(status, 404);
    let err: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(
        err["error"]["message"],
        "Could not find a solution with that name"
    );
    let (status, _, _) = get(addr, "/api/solutions/solutions/42").await;
    assert_eq!(status, 404);
    let (status, _, _) = get(addr, "/api/targets/targets/99").await;
    assert_eq!(status, 404);
    let (status, _, body) = get(addr, "/api/solutions/solutions/abc").await;
    assert_eq!(status, 400);
    let err: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(err["error"]["code"], "invalid_argument");
}

#[tokio::test]
async fn list_filters_by_region_and_target_threshold() {
    let addr = spawn_server().await;
    post(addr, "/api/solutions/solutions", &shade_trees()).await;
    post(addr, "/api/solutions/solutions", &bioswales()).await;

    let (status, _, body) = get(addr, "/api/solutions/solutions").await;
    assert_eq!(status, 200);
    let all: Vec<Value> = serde_json::from_str(&body).expect("json");
    assert_eq!(all.len(), 2);

    let path = format!("/api/solutions/solutions?bbox={CENTRAL_PARK_BBOX}&targets=Heat:80");
    let (status, _, body) = get(addr, &path).await;
    assert_eq!(status, 200, "{body}");
    let hits: Vec<Value> = serde_json::from_str(&body).expect("json");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Shade Trees");

    let path = format!("/api/solutions/solutions?bbox={CENTRAL_PARK_BBOX}&targets=Heat:95");
    let (_, _, body) = get(addr, &path).await;
    assert_eq!(body, "[]");

    let (status, _, body) =
        get(addr, "/api/solutions/solutions?target=Heat:10&target=Pluvial%20flooding:50").await;
    assert_eq!(status, 200);
    let hits: Vec<Value> = serde_json::from_str(&body).expect("json");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Bioswales");
}

#[tokio::test]
async fn oversized_region_is_rejected_with_area_details() {
    let addr = spawn_server().await;
    let (status, _, body) =
        get(addr, "/api/solutions/solutions?bbox=-74.1,40.7,-73.9,40.8").await;
    assert_eq!(status, 422);
    let err: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(err["error"]["code"], "region_too_large");
    assert_eq!(err["error"]["details"]["max_area_m2"], "1000000.000");
}

#[tokio::test]
async fn raised_area_bound_admits_wide_regions() {
    let addr = spawn_with(ApiConfig {
        limits: QueryLimits::default().with_max_region_area_m2(1.0e9),
        ..test_config()
    })
    .await;
    post(addr, "/api/solutions/solutions", &shade_trees()).await;
    let (status, _, body) =
        get(addr, "/api/solutions/solutions?bbox=-74.1,40.7,-73.9,40.8&targets=Heat:50").await;
    assert_eq!(status, 200, "{body}");
    let hits: Vec<Value> = serde_json::from_str(&body).expect("json");
    assert_eq!(hits.len(), 1);
}

#[tokio::test]
async fn bad_list_parameters_are_invalid_arguments() {
    let addr = spawn_server().await;
    for path in [
        "/api/solutions/solutions?bbox=1,2,3",
        "/api/solutions/solutions?targets=Heat:150",
        "/api/solutions/solutions?targets=Heat",
    ] {
        let (status, _, body) = get(addr, path).await;
        assert_eq!(status, 400, "{path}: {body}");
    }
}

#[tokio::test]
async fn invalid_create_payloads_are_rejected() {
    let addr = spawn_server().await;
    let mut out_of_range = shade_trees();
    out_of_range["adaptations"][0]["value"] = json!(101);
    let (status, _, _) = post(addr, "/api/solutions/solutions", &out_of_range).await;
    assert_eq!(status, 400);

    let mut bad_geometry = shade_trees();
    bad_geometry["geometry"] = json!({"type": "Point", "coordinates": [200.0, 10.0]});
    let (status, _, body) = post(addr, "/api/solutions/solutions", &bad_geometry).await;
    assert_eq!(status, 400);
    let err: Value = serde_json::from_str(&body).expect("json");
    assert_eq!(err["error"]["code"], "invalid_geometry");

    let (status, _, _) =
        send_raw_with_method(addr, "POST", "/api/solutions/solutions", &[], Some("{not json")).await;
    assert_eq!(status, 400);

    let (_, _, body) = get(addr, "/api/solutions/solutions").await;
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let addr = spawn_with(ApiConfig {
        max_body_bytes: 128,
        ..test_config()
    })
    .await;
    let (status, _, body) = post(addr, "/api/solutions/solutions", &shade_trees()).await;
    assert_eq!(status, 413, "{body}");
}

#[tokio::test]
async fn targets_list_carries_an_entity_tag() {
    let addr = spawn_server().await;
    let (status, head, body) = get(addr, "/api/targets/targets").await;
    assert_eq!(status, 200);
    let targets: Vec<Value> = serde_json::from_str(&body).expect("json");
    assert_eq!(targets.len(), 5);
    assert_eq!(targets[2], json!({"id": 3, "type": "Heat"}));

    let etag = header(&head, "etag").expect("etag").to_string();
    let (status, _, _) = send_raw_with_method(
        addr,
        "GET",
        "/api/targets/targets",
        &[("If-None-Match", &etag)],
        None,
    )
    .await;
    assert_eq!(status, 304);

    let (status, _, body) = get(addr, "/api/targets/targets/3").await;
    assert_eq!(status, 200);
    assert_eq!(
        serde_json::from_str::<Value>(&body).expect("json"),
        json!({"id": 3, "type": "Heat"})
    );
}

#[tokio::test]
async fn request_ids_are_propagated() {
    let addr = spawn_server().await;
    let (_, head, _) = send_raw_with_method(
        addr,
        "GET",
        "/api/targets/targets/1",
        &[("x-request-id", "trace-me")],
        None,
    )
    .await;
    assert_eq!(header(&head, "x-request-id"), Some("trace-me"));
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let addr = spawn_server().await;
    let (_, head, _) = send_raw_with_method(
        addr,
        "GET",
        "/api/targets/targets",
        &[("Origin", "https://maps.example.org")],
        None,
    )
    .await;
    assert_eq!(header(&head, "access-control-allow-origin"), Some("*"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let addr = spawn_server().await;
    let (status, head, body) = get(addr, "/v1/openapi.json").await;
    assert_eq!(status, 200);
    assert!(header(&head, "etag").is_some());
    let doc: Value = serde_json::from_str(&body).expect("json");
    assert!(doc["paths"]["/api/solutions/solutions"].is_object());
}

#[tokio::test]
async fn sqlite_backed_catalog_serves_the_same_routes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(&dir.path().join("nbs.sqlite")).expect("open sqlite");
    let api = test_config();
    let catalog = SolutionCatalog::new(store, api.limits.clone());
    catalog.seed_targets().expect("seed targets");
    let app = build_router(AppState::new(Arc::new(catalog), api));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    let (status, _, _) = post(addr, "/api/solutions/solutions", &shade_trees()).await;
    assert_eq!(status, 201);
    let path = format!("/api/solutions/solutions?bbox={CENTRAL_PARK_BBOX}");
    let (_, _, body) = get(addr, &path).await;
    let hits: Vec<Value> = serde_json::from_str(&body).expect("json");
    assert_eq!(hits.len(), 1);
}
