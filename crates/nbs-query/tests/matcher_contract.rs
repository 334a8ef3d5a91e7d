// SPDX-License-Identifier: Apache-2.0

use nbs_core::{SolutionId, TargetId};
use nbs_model::{AdaptationTarget, Association, Footprint, GeoJsonGeometry, Score, Solution};
use nbs_query::{
    execute_plan, plan_list, GeometryGate, ListRequest, QueryLimits, RegionSelector,
    SpatialMatcher, TargetClause, TargetMatcher,
};

fn wide_limits() -> QueryLimits {
    QueryLimits::default().with_max_region_area_m2(1.0e9)
}

fn solution(id: i64, name: &str, geometry: Option<Footprint>, scores: &[(i64, i64)]) -> Solution {
    Solution {
        id: SolutionId::new(id).expect("id"),
        name: name.to_string(),
        definition: "def".to_string(),
        cobenefits: "cb".to_string(),
        specific_details: "details".to_string(),
        location: "loc".to_string(),
        geometry,
        adaptations: scores
            .iter()
            .map(|(target, value)| Association {
                target: TargetId::new(*target).expect("target"),
                value: Score::new(*value).expect("score"),
            })
            .collect(),
    }
}

fn shade_trees() -> Solution {
    solution(
        1,
        "Shade Trees",
        Some(Footprint::point(-73.9654, 40.7829).expect("point")),
        &[(3, 90)],
    )
}

fn vocabulary() -> Vec<AdaptationTarget> {
    vec![
        AdaptationTarget::new(TargetId::new(1).expect("id"), "Pluvial flooding").expect("t"),
        AdaptationTarget::new(TargetId::new(2).expect("id"), "Drought").expect("t"),
        AdaptationTarget::new(TargetId::new(3).expect("id"), "Heat").expect("t"),
    ]
}

#[test]
fn bbox_over_central_park_matches_shade_trees() {
    let gate = GeometryGate::new(&wide_limits());
    let region = gate
        .require_selector(&RegionSelector::bbox(&[-74.1, 40.7, -73.9, 40.8]))
        .expect("region");
    let matched = SpatialMatcher::new(&region).retain(vec![shade_trees()]);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Shade Trees");
}

#[test]
fn bbox_west_of_the_park_matches_nothing() {
    let gate = GeometryGate::new(&wide_limits());
    let region = gate
        .require_selector(&RegionSelector::bbox(&[-74.2, 40.6, -74.15, 40.7]))
        .expect("region");
    assert!(SpatialMatcher::new(&region).retain(vec![shade_trees()]).is_empty());
}

#[test]
fn default_limits_reject_the_ten_km_box_before_matching() {
    let req = ListRequest {
        region: RegionSelector::bbox(&[-74.3, 40.5, -73.7, 41.0]),
        targets: Vec::new(),
    };
    let err = plan_list(&req, &QueryLimits::default()).expect_err("too large");
    assert_eq!(err.code, nbs_core::ErrorCode::RegionTooLarge);
}

#[test]
fn heat_threshold_keeps_only_the_strong_candidate() {
    let strong = solution(1, "Strong", None, &[(3, 90)]);
    let weak = solution(2, "Weak", None, &[(3, 30)]);
    let clauses = vec![TargetClause::new("Heat", 50).expect("clause")];
    let matched = TargetMatcher::resolve(&clauses, &vocabulary()).retain(vec![strong, weak]);
    let names: Vec<&str> = matched.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Strong"]);
}

#[test]
fn region_and_targets_compose_with_and() {
    let inside_weak = solution(
        1,
        "Inside weak",
        Some(Footprint::point(-73.95, 40.75).expect("point")),
        &[(3, 10)],
    );
    let inside_strong = solution(
        2,
        "Inside strong",
        Some(Footprint::point(-73.96, 40.76).expect("point")),
        &[(3, 80)],
    );
    let outside_strong = solution(
        3,
        "Outside strong",
        Some(Footprint::point(-70.0, 40.76).expect("point")),
        &[(3, 80)],
    );
    let req = ListRequest {
        region: RegionSelector::bbox(&[-74.1, 40.7, -73.9, 40.8]),
        targets: vec![TargetClause::new("Heat", 50).expect("clause")],
    };
    let plan = plan_list(&req, &wide_limits()).expect("plan");
    let matched = execute_plan(&plan, vec![inside_weak, inside_strong, outside_strong], &vocabulary());
    let ids: Vec<i64> = matched.iter().map(|s| s.id.get()).collect();
    assert_eq!(ids, vec![2]);
    assert!(!plan.is_full_scan());
}

#[test]
fn empty_request_returns_every_candidate_in_order() {
    let plan = plan_list(&ListRequest::default(), &QueryLimits::default()).expect("plan");
    assert!(plan.is_full_scan());
    let unplaced = solution(7, "Unplaced", None, &[]);
    let matched = execute_plan(&plan, vec![unplaced, shade_trees()], &vocabulary());
    let ids: Vec<i64> = matched.iter().map(|s| s.id.get()).collect();
    assert_eq!(ids, vec![7, 1]);
}

#[test]
fn spatial_output_preserves_input_order() {
    let points = [(-73.91, 40.71), (-73.99, 40.79), (-73.95, 40.75), (-60.0, 10.0)];
    let candidates: Vec<Solution> = points
        .iter()
        .enumerate()
        .map(|(i, (lon, lat))| {
            solution(
                (points.len() - i) as i64,
                &format!("p{i}"),
                Some(Footprint::point(*lon, *lat).expect("point")),
                &[],
            )
        })
        .collect();
    let region = GeometryGate::new(&wide_limits())
        .require_selector(&RegionSelector::bbox(&[-74.1, 40.7, -73.9, 40.8]))
        .expect("region");
    let names: Vec<String> = SpatialMatcher::new(&region)
        .retain(candidates)
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["p0", "p1", "p2"]);
}

#[test]
fn shared_boundary_counts_as_intersection() {
    let edge_point = solution(1, "edge", Some(Footprint::point(-73.9, 40.75).expect("p")), &[]);
    let region = GeometryGate::new(&wide_limits())
        .require_selector(&RegionSelector::bbox(&[-74.1, 40.7, -73.9, 40.8]))
        .expect("region");
    assert!(SpatialMatcher::new(&region).matches(&edge_point));
}

#[test]
fn degenerate_footprint_only_matches_regions_covering_its_point() {
    let collapsed = Footprint::from_geojson(GeoJsonGeometry::Polygon(vec![vec![
        [-73.95, 40.75];
        4
    ]]))
    .expect("degenerate polygon");
    let candidate = solution(1, "collapsed", Some(collapsed), &[]);
    let gate = GeometryGate::new(&wide_limits());

    let covering = gate
        .require_selector(&RegionSelector::bbox(&[-74.0, 40.7, -73.9, 40.8]))
        .expect("region");
    assert!(SpatialMatcher::new(&covering).matches(&candidate));

    let elsewhere = gate
        .require_selector(&RegionSelector::bbox(&[-73.94, 40.7, -73.9, 40.8]))
        .expect("region");
    assert!(!SpatialMatcher::new(&elsewhere).matches(&candidate));
}

#[test]
fn degenerate_region_matches_only_its_exact_point() {
    let raw = r#"{"type":"Polygon","coordinates":[[[-73.95,40.75],[-73.95,40.75],[-73.95,40.75],[-73.95,40.75]]]}"#;
    let region = GeometryGate::new(&QueryLimits::default())
        .require_selector(&RegionSelector::geojson(raw))
        .expect("zero-area region is accepted");
    let on = solution(1, "on", Some(Footprint::point(-73.95, 40.75).expect("p")), &[]);
    let off = solution(2, "off", Some(Footprint::point(-73.951, 40.75).expect("p")), &[]);
    let matched = SpatialMatcher::new(&region).retain(vec![on, off]);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "on");
}

#[test]
fn solutions_without_geometry_never_match_a_region() {
    let region = GeometryGate::new(&wide_limits())
        .require_selector(&RegionSelector::bbox(&[-180.0, -10.0, 180.0, 10.0]))
        .expect("region");
    let bare = solution(1, "bare", None, &[(3, 100)]);
    assert!(!SpatialMatcher::new(&region).matches(&bare));
}

#[test]
fn too_many_target_clauses_are_rejected() {
    let limits = QueryLimits::default();
    let targets = (0..=limits.max_target_clauses)
        .map(|_| TargetClause::new("Heat", 1).expect("clause"))
        .collect();
    let req = ListRequest {
        region: RegionSelector::default(),
        targets,
    };
    let err = plan_list(&req, &limits).expect_err("too many");
    assert_eq!(err.code, nbs_core::ErrorCode::InvalidArgument);
}
