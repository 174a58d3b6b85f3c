use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{FieldError, ValidationError};

pub const WELCOME_MESSAGE: &str = "Welcome to the AI/ML FastAPI project!";

/// Number of input features the model takes.
pub const FEATURES: usize = 2;

pub const FEATURE_NAMES: [&str; FEATURES] = ["feature1", "feature2"];

/// A training pair: feature vector and target.
pub type Sample = ([f64; FEATURES], f64);

/// Data the served model is fitted on at startup.
pub const TRAINING_SET: [Sample; 5] = [
    ([1.0, 2.0], 3.0),
    ([2.0, 3.0], 5.0),
    ([3.0, 4.0], 7.0),
    ([4.0, 5.0], 9.0),
    ([5.0, 6.0], 11.0),
];

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct PredictionRequest {
    #[serde(deserialize_with = "lenient_float")]
    pub feature1: f64,
    #[serde(deserialize_with = "lenient_float")]
    pub feature2: f64,
}

impl PredictionRequest {
    /// Decodes a raw request body. On failure every offending field is
    /// reported, not just the first one the decoder tripped on.
    pub fn decode(body: &[u8]) -> Result<Self, ValidationError> {
        serde_json::from_slice(body).map_err(|err| Self::diagnose(body, &err))
    }

    pub fn to_array(&self) -> [f64; FEATURES] {
        [self.feature1, self.feature2]
    }

    fn diagnose(body: &[u8], err: &serde_json::Error) -> ValidationError {
        if body.is_empty() {
            return ValidationError::single(FieldError::missing_body());
        }

        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(syntax) => return ValidationError::single(FieldError::json_decode(&syntax)),
        };

        let Some(object) = value.as_object() else {
            return ValidationError::single(FieldError::not_a_dict());
        };

        let detail: Vec<FieldError> = FEATURE_NAMES
            .iter()
            .filter_map(|name| match object.get(*name) {
                None => Some(FieldError::missing(name)),
                Some(field) if coerce_float(field).is_none() => Some(FieldError::not_a_float(name)),
                Some(_) => None,
            })
            .collect();

        if detail.is_empty() {
            // Every field is fine on its own, e.g. a duplicated key.
            ValidationError::single(FieldError::body(err.to_string()))
        } else {
            ValidationError::new(detail)
        }
    }
}

/// Accepts a JSON number, a boolean (as 1.0 / 0.0) or a string holding a
/// finite number.
fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn lenient_float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    coerce_float(&value).ok_or_else(|| D::Error::custom("value is not a valid float"))
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PredictionResponse {
    pub prediction: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WelcomeResponse {
    pub message: String,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        WelcomeResponse {
            message: WELCOME_MESSAGE.to_string(),
        }
    }
}
