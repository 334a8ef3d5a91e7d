use serde_json::{json, Value};

use crate::API_ERROR_CODES;

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorBody"}}}
    })
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {"application/json": {"schema": schema}}
    })
}

fn id_param(name: &str) -> Value {
    json!({"name": name, "in": "path", "required": true, "schema": {"type": "integer", "minimum": 1}})
}

#[must_use]
pub fn openapi_v1_spec() -> Value {
    let error_codes: Vec<&str> = API_ERROR_CODES.iter().map(|code| code.as_str()).collect();
    let solution = json!({"$ref": "#/components/schemas/SolutionView"});
    let target = json!({"$ref": "#/components/schemas/TargetView"});
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "nbsapi",
        "version": crate::API_VERSION,
        "description": "Catalog of nature-based solutions scored against climate adaptation targets"
      },
      "paths": {
        "/": {"get": {"responses": {"200": json_response("welcome", json!({"$ref": "#/components/schemas/WelcomeView"}))}}},
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {
          "get": {
            "responses": {
              "200": {"description": "ready"},
              "503": error_response("store unavailable")
            }
          }
        },
        "/v1/openapi.json": {"get": {"responses": {"200": {"description": "this document"}}}},
        "/api/solutions/solutions": {
          "get": {
            "tags": ["solutions"],
            "parameters": [
              {"name": "bbox", "in": "query", "schema": {"type": "string"},
               "description": "west,south,east,north in WGS84 degrees"},
              {"name": "geojson", "in": "query", "schema": {"type": "string"},
               "description": "GeoJSON Polygon or MultiPolygon; exclusive with bbox"},
              {"name": "targets", "in": "query", "schema": {"type": "string"},
               "description": "comma list of name:minimum, every clause must hold"},
              {"name": "target", "in": "query", "schema": {"type": "string"},
               "description": "single name:minimum clause, repeatable"}
            ],
            "responses": {
              "200": json_response("matching solutions", json!({"type": "array", "items": solution})),
              "400": error_response("invalid filter or geometry"),
              "422": error_response("region larger than the configured bound")
            }
          },
          "post": {
            "tags": ["solutions"],
            "requestBody": {
              "required": true,
              "content": {"application/json": {"schema": {"$ref": "#/components/schemas/CreateSolution"}}}
            },
            "responses": {
              "201": json_response("created", solution.clone()),
              "400": error_response("invalid payload"),
              "404": error_response("referenced target does not exist"),
              "409": error_response("name already taken"),
              "413": error_response("body too large")
            }
          }
        },
        "/api/solutions/solutions/{solution_id}": {
          "get": {
            "tags": ["solutions"],
            "parameters": [id_param("solution_id")],
            "responses": {
              "200": json_response("solution", solution.clone()),
              "400": error_response("malformed id"),
              "404": error_response("no such solution")
            }
          }
        },
        "/api/solutions/by-name/{name}": {
          "get": {
            "tags": ["solutions"],
            "parameters": [{"name": "name", "in": "path", "required": true, "schema": {"type": "string"}}],
            "responses": {
              "200": json_response("solution", solution),
              "404": error_response("no such solution")
            }
          }
        },
        "/api/targets/targets": {
          "get": {
            "tags": ["targets"],
            "responses": {
              "200": json_response("target vocabulary", json!({"type": "array", "items": target})),
              "304": {"description": "not modified"}
            }
          }
        },
        "/api/targets/targets/{target_id}": {
          "get": {
            "tags": ["targets"],
            "parameters": [id_param("target_id")],
            "responses": {
              "200": json_response("target", target),
              "400": error_response("malformed id"),
              "404": error_response("no such target")
            }
          }
        }
      },
      "components": {
        "schemas": {
          "WelcomeView": {
            "type": "object",
            "required": ["message"],
            "properties": {"message": {"type": "string"}}
          },
          "TargetView": {
            "type": "object",
            "required": ["id", "type"],
            "properties": {"id": {"type": "integer"}, "type": {"type": "string"}}
          },
          "AdaptationValueView": {
            "type": "object",
            "required": ["adaptation", "value"],
            "properties": {
              "adaptation": {"$ref": "#/components/schemas/TargetView"},
              "value": {"type": "integer", "minimum": 0, "maximum": 100}
            }
          },
          "SolutionView": {
            "type": "object",
            "required": ["id", "name", "definition", "cobenefits", "specificdetails", "location", "adaptations"],
            "properties": {
              "id": {"type": "integer"},
              "name": {"type": "string"},
              "definition": {"type": "string"},
              "cobenefits": {"type": "string"},
              "specificdetails": {"type": "string"},
              "location": {"type": "string"},
              "adaptations": {"type": "array", "items": {"$ref": "#/components/schemas/AdaptationValueView"}}
            }
          },
          "CreateSolution": {
            "type": "object",
            "required": ["name", "definition", "cobenefits", "specificdetails", "location"],
            "properties": {
              "name": {"type": "string", "minLength": 1, "maxLength": nbs_model::NAME_MAX_LEN},
              "definition": {"type": "string", "maxLength": nbs_model::DEFINITION_MAX_LEN},
              "cobenefits": {"type": "string", "maxLength": nbs_model::COBENEFITS_MAX_LEN},
              "specificdetails": {"type": "string", "maxLength": nbs_model::SPECIFIC_DETAILS_MAX_LEN},
              "location": {"type": "string", "minLength": 1},
              "geometry": {"type": "object", "description": "GeoJSON Point, Polygon or MultiPolygon (WGS84)"},
              "adaptations": {
                "type": "array",
                "items": {
                  "type": "object",
                  "required": ["adaptation", "value"],
                  "properties": {
                    "adaptation": {
                      "type": "object",
                      "properties": {"id": {"type": "integer"}, "type": {"type": "string"}}
                    },
                    "value": {"type": "integer", "minimum": 0, "maximum": 100}
                  }
                }
              }
            }
          },
          "ApiErrorCode": {"type": "string", "enum": error_codes},
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details"],
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "message": {"type": "string"},
              "details": {"type": "object", "additionalProperties": true}
            }
          },
          "ErrorBody": {
            "type": "object",
            "required": ["error"],
            "properties": {"error": {"$ref": "#/components/schemas/ApiError"}}
          }
        }
      }
    })
}
