//! ODsay API response DTOs.
//!
//! A response carries either `result` or `error`. The error appears as an
//! object on some failures and as a one-element array on others, with the
//! code as either a string or a number.

use serde::Deserialize;

/// Response from `searchPubTransPathT`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPathResponse {
    pub result: Option<SearchPathResult>,
    pub error: Option<ApiErrors>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchPathResult {
    #[serde(default)]
    pub path: Vec<PathItem>,
}

/// One candidate itinerary.
#[derive(Debug, Clone, Deserialize)]
pub struct PathItem {
    pub info: PathInfo,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathInfo {
    /// Total travel time in minutes.
    pub total_time: Option<u32>,
}

/// Array form must be tried first: a struct also deserializes from a
/// sequence.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiErrors {
    Many(Vec<ApiError>),
    One(ApiError),
}

impl ApiErrors {
    pub fn first(&self) -> Option<&ApiError> {
        match self {
            ApiErrors::Many(errors) => errors.first(),
            ApiErrors::One(e) => Some(e),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: serde_json::Value,

    #[serde(default, alias = "message")]
    pub msg: String,
}

impl ApiError {
    /// The error code as text, whatever its JSON type.
    pub fn code(&self) -> String {
        match &self.code {
            serde_json::Value::String(s) => s.trim().to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => "unknown".to_string(),
        }
    }
}
