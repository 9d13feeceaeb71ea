//! Interactive API documentation.

use actix_web::{http::header, HttpResponse};
use serde_json::{json, Value};

use crate::core::validation::{FLAG_VOCABULARY, GENDER_VOCABULARY};
use crate::core::verdict::{HIGH_RISK, LOW_RISK, SUCCESS_MESSAGE};
use crate::models::patient::{AGE, FIELDS, GENDER, SYMPTOM_FIELDS};

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>Lungcare API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.onload = () => {
      window.ui = SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
    };
  </script>
</body>
</html>
"##;

/// `GET /` sends browsers to the docs.
pub async fn index() -> HttpResponse {
    HttpResponse::TemporaryRedirect()
        .insert_header((header::LOCATION, "/docs"))
        .finish()
}

/// `GET /docs`
pub async fn swagger_ui() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(SWAGGER_UI)
}

/// `GET /openapi.json`
pub async fn openapi() -> HttpResponse {
    HttpResponse::Ok().json(openapi_document())
}

fn example_payload() -> Value {
    let mut example = serde_json::Map::new();
    example.insert(GENDER.into(), json!("m"));
    example.insert(AGE.into(), json!(50));
    for (i, field) in SYMPTOM_FIELDS.iter().enumerate() {
        let flag = if i % 2 == 0 { "y" } else { "n" };
        example.insert((*field).into(), json!(flag));
    }
    Value::Object(example)
}

fn error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "error": {
                "oneOf": [
                    { "type": "string" },
                    { "type": "object", "additionalProperties": { "type": "string" } }
                ]
            }
        }
    })
}

/// OpenAPI 3 description of the prediction endpoint.
pub fn openapi_document() -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        GENDER.into(),
        json!({ "type": "string", "enum": GENDER_VOCABULARY, "description": "m = male, f = female" }),
    );
    properties.insert(
        AGE.into(),
        json!({ "type": "integer", "minimum": 1, "description": "Age in years" }),
    );
    for field in SYMPTOM_FIELDS {
        properties.insert(
            field.into(),
            json!({ "type": "string", "enum": FLAG_VOCABULARY, "description": "y = yes, n = no" }),
        );
    }

    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Lungcare",
            "description": "Lung cancer risk prediction",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": { "/predict": { "post": predict_operation() } },
        "components": {
            "schemas": {
                "Patient": {
                    "type": "object",
                    "required": FIELDS,
                    "additionalProperties": false,
                    "properties": properties,
                },
                "Prediction": prediction_schema(),
            }
        }
    })
}

fn predict_operation() -> Value {
    let json_body = |schema: Value| json!({ "application/json": { "schema": schema } });

    json!({
        "summary": "Predict lung cancer risk for one patient",
        "requestBody": {
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/Patient" },
                    "example": example_payload(),
                }
            }
        },
        "responses": {
            "200": {
                "description": "Prediction",
                "content": json_body(json!({ "$ref": "#/components/schemas/Prediction" })),
            },
            "400": {
                "description": "Missing body or invalid fields",
                "content": json_body(error_schema()),
            },
            "500": {
                "description": "Prediction failed or pipeline not loaded",
                "content": json_body(error_schema()),
            }
        }
    })
}

fn prediction_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "message": { "type": "string", "example": SUCCESS_MESSAGE },
            "result": { "type": "string", "enum": [HIGH_RISK, LOW_RISK] },
            "cancer": { "type": "string", "enum": ["YES", "NO"] }
        }
    })
}
