// SPDX-License-Identifier: Apache-2.0

use crate::ApiError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListSolutionsParams {
    pub bbox: Option<Vec<f64>>,
    pub geojson: Option<String>,
    /// `(target name, minimum value)` in request order.
    pub targets: Vec<(String, i64)>,
}

/// Parses list query pairs.
///
/// `bbox` is either `w,s,e,n` or four repeated `bbox` keys. Target clauses
/// come as `targets=Heat:50,Drought:20` and/or repeated `target=Heat:50`.
pub fn parse_list_solutions_params(
    pairs: &[(String, String)],
) -> Result<ListSolutionsParams, ApiError> {
    let mut out = ListSolutionsParams::default();
    let mut bbox_values = Vec::new();
    for (key, value) in pairs {
        match key.as_str() {
            "bbox" => {
                for part in value.split(',') {
                    let parsed = part
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| ApiError::invalid_param("bbox", value))?;
                    bbox_values.push(parsed);
                }
            }
            "geojson" => {
                if value.trim().is_empty() {
                    continue;
                }
                if out.geojson.is_some() {
                    return Err(ApiError::invalid_param("geojson", value));
                }
                out.geojson = Some(value.clone());
            }
            "targets" => {
                for clause in value.split(',').filter(|c| !c.trim().is_empty()) {
                    out.targets.push(parse_target_clause("targets", clause)?);
                }
            }
            "target" => out.targets.push(parse_target_clause("target", value)?),
            _ => {}
        }
    }
    if !bbox_values.is_empty() {
        out.bbox = Some(bbox_values);
    }
    Ok(out)
}

fn parse_target_clause(param: &str, raw: &str) -> Result<(String, i64), ApiError> {
    let (name, min) = raw
        .rsplit_once(':')
        .ok_or_else(|| ApiError::invalid_param(param, raw))?;
    let name = name.trim();
    let min = min
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::invalid_param(param, raw))?;
    if name.is_empty() {
        return Err(ApiError::invalid_param(param, raw));
    }
    Ok((name.to_string(), min))
}

/// Path ids must be positive integers.
pub fn parse_record_id(param: &str, raw: &str) -> Result<i64, ApiError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::invalid_param(param, raw)),
    }
}
