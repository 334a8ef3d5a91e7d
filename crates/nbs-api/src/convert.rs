// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use nbs_core::TargetId;
use nbs_model::{AdaptationTarget, GeoJsonGeometry, Solution, SolutionDraft, ValidationError};
use nbs_query::{ListRequest, RegionSelector, TargetClause};
use serde_json::json;

use crate::{
    AdaptationValueView, ApiError, CreateSolutionPayload, ListSolutionsParams, SolutionView,
    TargetView,
};

#[must_use]
pub fn target_view(target: &AdaptationTarget) -> TargetView {
    TargetView {
        id: target.id.get(),
        kind: target.name.clone(),
    }
}

/// Maps a stored solution to its wire shape, resolving association
/// targets against `vocabulary`.
pub fn solution_view(
    solution: &Solution,
    vocabulary: &[AdaptationTarget],
) -> Result<SolutionView, ApiError> {
    let names: BTreeMap<TargetId, &str> = vocabulary
        .iter()
        .map(|target| (target.id, target.name.as_str()))
        .collect();
    let adaptations = solution
        .adaptations
        .iter()
        .map(|assoc| {
            let name = names.get(&assoc.target).ok_or_else(|| {
                ApiError::internal(format!(
                    "solution {} references unknown target {}",
                    solution.id, assoc.target
                ))
            })?;
            Ok(AdaptationValueView {
                adaptation: TargetView {
                    id: assoc.target.get(),
                    kind: (*name).to_string(),
                },
                value: i64::from(assoc.value),
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(SolutionView {
        id: solution.id.get(),
        name: solution.name.clone(),
        definition: solution.definition.clone(),
        cobenefits: solution.cobenefits.clone(),
        specificdetails: solution.specific_details.clone(),
        location: solution.location.clone(),
        adaptations,
    })
}

pub fn list_request_from_params(params: ListSolutionsParams) -> Result<ListRequest, ApiError> {
    let targets = params
        .targets
        .into_iter()
        .map(|(name, min)| TargetClause::new(name, min))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ListRequest {
        region: RegionSelector {
            bbox: params.bbox,
            geojson: params.geojson,
        },
        targets,
    })
}

/// Builds a draft from a create payload. Adaptations given by `type` name
/// are resolved against `vocabulary`; an unknown name is `not_found`.
pub fn draft_from_payload(
    payload: CreateSolutionPayload,
    vocabulary: &[AdaptationTarget],
) -> Result<SolutionDraft, ApiError> {
    let geometry = payload
        .geometry
        .map(|raw| {
            serde_json::from_value::<GeoJsonGeometry>(raw).map_err(|err| {
                ValidationError::invalid_geometry(format!(
                    "geometry is not a supported GeoJSON geometry: {err}"
                ))
            })
        })
        .transpose()?;
    let adaptations = payload
        .adaptations
        .into_iter()
        .map(|input| {
            let id = match (input.adaptation.id, input.adaptation.kind.as_deref()) {
                (Some(id), _) => id,
                (None, Some(name)) => vocabulary
                    .iter()
                    .find(|target| target.matches_name(name))
                    .map(|target| target.id.get())
                    .ok_or_else(|| {
                        ApiError::new(
                            crate::ApiErrorCode::NotFound,
                            format!("adaptation target `{name}` not found"),
                            json!({"type": name}),
                        )
                    })?,
                (None, None) => {
                    return Err(ApiError::invalid_body(
                        "each adaptation needs an `id` or a `type`",
                    ))
                }
            };
            Ok((id, input.value))
        })
        .collect::<Result<Vec<_>, ApiError>>()?;
    Ok(SolutionDraft {
        name: payload.name,
        definition: payload.definition,
        cobenefits: payload.cobenefits,
        specific_details: payload.specificdetails,
        location: payload.location,
        geometry,
        adaptations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AdaptationRef, AdaptationValueInput, ApiErrorCode};
    use nbs_core::SolutionId;
    use nbs_model::{Association, Score};

    fn vocabulary() -> Vec<AdaptationTarget> {
        vec![
            AdaptationTarget::new(TargetId::new(1).expect("id"), "Pluvial flooding").expect("t"),
            AdaptationTarget::new(TargetId::new(3).expect("id"), "Heat").expect("t"),
        ]
    }

    fn payload(adaptations: Vec<AdaptationValueInput>) -> CreateSolutionPayload {
        CreateSolutionPayload {
            name: "Bioswales".to_string(),
            definition: "Vegetated channels".to_string(),
            cobenefits: "Habitat".to_string(),
            specificdetails: "Capture runoff".to_string(),
            location: "Greenpoint, NYC".to_string(),
            geometry: None,
            adaptations,
        }
    }

    #[test]
    fn solution_view_nests_target_and_value() {
        let solution = Solution {
            id: SolutionId::new(7).expect("id"),
            name: "Shade Trees".to_string(),
            definition: "d".to_string(),
            cobenefits: "c".to_string(),
            specific_details: "s".to_string(),
            location: "Central Park".to_string(),
            geometry: None,
            adaptations: vec![Association {
                target: TargetId::new(3).expect("id"),
                value: Score::new(90).expect("score"),
            }],
        };
        let view = solution_view(&solution, &vocabulary()).expect("view");
        let json = serde_json::to_value(&view).expect("json");
        assert_eq!(
            json["adaptations"],
            json!([{"adaptation": {"id": 3, "type": "Heat"}, "value": 90}])
        );
        assert_eq!(json["specificdetails"], "s");
    }

    #[test]
    fn adaptations_resolve_by_type_name() {
        let input = payload(vec![AdaptationValueInput {
            adaptation: AdaptationRef {
                id: None,
                kind: Some("pluvial flooding".to_string()),
            },
            value: 80,
        }]);
        let draft = draft_from_payload(input, &vocabulary()).expect("draft");
        assert_eq!(draft.adaptations, vec![(1, 80)]);
    }

    #[test]
    fn unknown_type_name_is_not_found() {
        let input = payload(vec![AdaptationValueInput {
            adaptation: AdaptationRef {
                id: None,
                kind: Some("Wildfire".to_string()),
            },
            value: 10,
        }]);
        let err = draft_from_payload(input, &vocabulary()).expect_err("unknown");
        assert_eq!(err.code, ApiErrorCode::NotFound);
    }

    #[test]
    fn bad_geometry_is_invalid_geometry() {
        let mut input = payload(Vec::new());
        input.geometry = Some(json!({"type": "LineString", "coordinates": [[0, 0], [1, 1]]}));
        let err = draft_from_payload(input, &vocabulary()).expect_err("line");
        assert_eq!(err.code, ApiErrorCode::InvalidGeometry);
    }
}
