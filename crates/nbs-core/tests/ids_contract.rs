// SPDX-License-Identifier: Apache-2.0

use nbs_core::{SolutionId, TargetId};

#[test]
fn ids_reject_non_positive_values() {
    assert!(SolutionId::new(0).is_err());
    assert!(TargetId::new(-4).is_err());
    assert_eq!(SolutionId::new(7).expect("id").get(), 7);
}

#[test]
fn ids_parse_from_path_segments() {
    let id: TargetId = " 3 ".parse().expect("parse");
    assert_eq!(id.get(), 3);
    let err = "abc".parse::<SolutionId>().expect_err("non-numeric");
    assert_eq!(err.kind, "solution_id");
    assert!(err.to_string().contains("must be an integer"));
}

#[test]
fn ids_serialize_as_bare_integers() {
    let encoded = serde_json::to_string(&SolutionId::new(12).expect("id")).expect("json");
    assert_eq!(encoded, "12");
    assert!(serde_json::from_str::<TargetId>("0").is_err());
}
