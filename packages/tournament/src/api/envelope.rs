//! Result envelope returned by every backend endpoint.
//!
//! Success looks like `{ "kind": "ok", "data": ... }`. Any other `kind`
//! is a problem descriptor, and the remaining fields are kept as-is.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Discriminator value of a successful envelope.
pub const OK_KIND: &str = "ok";

/// Decoded backend envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Ok(T),
    Problem(ApiProblem),
}

impl<T> ApiResult<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiResult::Ok(_))
    }

    pub fn into_result(self) -> Result<T, ApiProblem> {
        match self {
            ApiResult::Ok(data) => Ok(data),
            ApiResult::Problem(problem) => Err(problem),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Ok(data) => ApiResult::Ok(f(data)),
            ApiResult::Problem(problem) => ApiResult::Problem(problem),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ApiResult<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut fields = Map::<String, Value>::deserialize(deserializer)?;

        if fields.get("kind").and_then(Value::as_str) == Some(OK_KIND) {
            let data = fields.remove("data").unwrap_or(Value::Null);
            return serde_json::from_value(data)
                .map(ApiResult::Ok)
                .map_err(de::Error::custom);
        }

        serde_json::from_value(Value::Object(fields))
            .map(ApiResult::Problem)
            .map_err(de::Error::custom)
    }
}

/// Failure descriptor: a `kind` tag, an optional human-readable message
/// and whatever else the backend attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiProblem {
    #[serde(default = "unknown_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn unknown_kind() -> String {
    "unknown".to_string()
}

impl ApiProblem {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: Some(message.into()),
            status: None,
            extra: Map::new(),
        }
    }

    /// Problem for a non-2xx response whose body is not an envelope.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.trim();
        Self {
            kind: kind_for_status(status).to_string(),
            message: (!body.is_empty()).then(|| body.to_string()),
            status: Some(status),
            extra: Map::new(),
        }
    }
}

/// Problem kind derived from an HTTP status code.
pub fn kind_for_status(status: u16) -> &'static str {
    match status {
        401 => "unauthorized",
        403 => "forbidden",
        404 => "not-found",
        400..=499 => "rejected",
        500..=599 => "server",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_ok_envelope_yields_data() {
        let result: ApiResult<HashMap<String, u32>> =
            serde_json::from_value(json!({ "kind": "ok", "data": { "a": 1 } })).unwrap();

        assert_eq!(result.into_result().unwrap().get("a"), Some(&1));
    }

    #[test]
    fn test_other_kind_is_problem() {
        let result: ApiResult<u32> = serde_json::from_value(json!({
            "kind": "error",
            "message": "duplicate",
            "field": "name"
        }))
        .unwrap();

        let problem = result.into_result().unwrap_err();
        assert_eq!(problem.kind, "error");
        assert_eq!(problem.message.as_deref(), Some("duplicate"));
        assert_eq!(problem.extra.get("field"), Some(&json!("name")));
    }

    #[test]
    fn test_missing_kind_is_unknown_problem() {
        let result: ApiResult<u32> = serde_json::from_value(json!({ "data": 5 })).unwrap();
        assert_eq!(result.into_result().unwrap_err().kind, "unknown");
    }

    #[test]
    fn test_ok_with_wrong_payload_fails_to_decode() {
        let result = serde_json::from_value::<ApiResult<u32>>(json!({ "kind": "ok", "data": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_status_kinds() {
        assert_eq!(kind_for_status(401), "unauthorized");
        assert_eq!(kind_for_status(403), "forbidden");
        assert_eq!(kind_for_status(404), "not-found");
        assert_eq!(kind_for_status(422), "rejected");
        assert_eq!(kind_for_status(502), "server");
        assert_eq!(kind_for_status(302), "unknown");

        let problem = ApiProblem::from_status(500, "  ");
        assert_eq!(problem.message, None);
        assert_eq!(problem.status, Some(500));
    }
}
