use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

use crate::models::FEATURES;

/// Errors raised while fitting a [`crate::inference::LinearModel`].
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("non-finite value in training row {row}")]
    NonFinite { row: usize },

    #[error("least-squares solve failed: {0}")]
    Solve(&'static str),
}

/// Errors raised while reading runtime configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// One element of a field location, e.g. `["body", "feature1"]` or `["body", 1, 12]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocItem {
    Key(String),
    Index(usize),
}

impl From<&str> for LocItem {
    fn from(key: &str) -> Self {
        LocItem::Key(key.to_string())
    }
}

impl From<usize> for LocItem {
    fn from(index: usize) -> Self {
        LocItem::Index(index)
    }
}

/// A single offending field in a rejected request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub loc: Vec<LocItem>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        FieldError {
            loc: vec!["body".into(), field.into()],
            msg: "field required".to_string(),
            kind: "value_error.missing".to_string(),
        }
    }

    pub fn not_a_float(field: &str) -> Self {
        FieldError {
            loc: vec!["body".into(), field.into()],
            msg: "value is not a valid float".to_string(),
            kind: "type_error.float".to_string(),
        }
    }

    pub fn not_a_dict() -> Self {
        FieldError {
            loc: vec!["body".into()],
            msg: "value is not a valid dict".to_string(),
            kind: "type_error.dict".to_string(),
        }
    }

    pub fn json_decode(err: &serde_json::Error) -> Self {
        FieldError {
            loc: vec!["body".into(), err.line().into(), err.column().into()],
            msg: err.to_string(),
            kind: "value_error.jsondecode".to_string(),
        }
    }

    pub fn missing_body() -> Self {
        FieldError {
            loc: vec!["body".into()],
            msg: "field required".to_string(),
            kind: "value_error.missing".to_string(),
        }
    }

    pub fn body(msg: impl Into<String>) -> Self {
        FieldError {
            loc: vec!["body".into()],
            msg: msg.into(),
            kind: "value_error".to_string(),
        }
    }
}

/// Request body rejected by the typed decoder. Rendered as `422` with a
/// `{"detail": [...]}` body listing every offending field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("request validation failed ({} field error(s))", .detail.len())]
pub struct ValidationError {
    pub detail: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(detail: Vec<FieldError>) -> Self {
        ValidationError { detail }
    }

    pub fn single(error: FieldError) -> Self {
        ValidationError {
            detail: vec![error],
        }
    }
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// The model produced a value JSON cannot carry.
#[derive(Debug, thiserror::Error)]
#[error("prediction for {features:?} is not finite ({value})")]
pub struct PredictionError {
    pub features: [f64; FEATURES],
    pub value: f64,
}

impl ResponseError for PredictionError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "detail": "Internal Server Error" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_serializes_kind_as_type() {
        let value = serde_json::to_value(FieldError::missing("feature2")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "loc": ["body", "feature2"],
                "msg": "field required",
                "type": "value_error.missing"
            })
        );
    }

    #[test]
    fn test_json_decode_location_is_line_and_column() {
        let err = serde_json::from_str::<serde_json::Value>("{\n  \"feature1\": }").unwrap_err();
        let field = FieldError::json_decode(&err);
        assert_eq!(field.loc[0], LocItem::Key("body".to_string()));
        assert_eq!(field.loc[1], LocItem::Index(2));
        assert!(matches!(field.loc[2], LocItem::Index(_)));
        assert_eq!(field.kind, "value_error.jsondecode");
    }

    #[test]
    fn test_validation_error_is_unprocessable() {
        let err = ValidationError::single(FieldError::not_a_dict());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "request validation failed (1 field error(s))");
    }

    #[test]
    fn test_prediction_error_is_internal() {
        let err = PredictionError {
            features: [1e308, 1e308],
            value: f64::INFINITY,
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().ends_with("is not finite (inf)"));
    }
}
