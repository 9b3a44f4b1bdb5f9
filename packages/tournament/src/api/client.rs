use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::envelope::{ApiProblem, ApiResult};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Transport-level failures. Backend problems are not errors here; they
/// come back as [`ApiResult::Problem`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

/// JSON-over-POST client for the tournament backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// POST `body` to `path` and decode the result envelope.
    ///
    /// Single attempt, no timeout beyond the transport's own.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiResult<T>, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let request_id = Uuid::new_v4();
        debug!(%url, %request_id, "POST backend");

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let result = if status.is_success() {
            serde_json::from_str::<ApiResult<T>>(&text)?
        } else {
            decode_failure(status, &text)
        };

        debug!(
            %request_id,
            status = status.as_u16(),
            ok = result.is_ok(),
            "backend responded"
        );

        Ok(result)
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Non-2xx responses: use the envelope when the body carries one,
/// otherwise derive a problem from the status.
fn decode_failure<T: DeserializeOwned>(status: StatusCode, text: &str) -> ApiResult<T> {
    let envelope = serde_json::from_str::<Value>(text)
        .ok()
        .filter(|value| value.get("kind").and_then(Value::as_str).is_some())
        .and_then(|value| serde_json::from_value::<ApiResult<T>>(value).ok());

    match envelope {
        Some(ApiResult::Problem(mut problem)) => {
            problem.status.get_or_insert(status.as_u16());
            ApiResult::Problem(problem)
        }
        Some(ok) => ok,
        None => ApiResult::Problem(ApiProblem::from_status(status.as_u16(), text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = BackendClient::new("https://be-tournament.kuma.id.vn/");
        assert_eq!(
            client.endpoint("/tournament/get"),
            "https://be-tournament.kuma.id.vn/tournament/get"
        );

        let client = BackendClient::new("http://localhost:5053");
        assert_eq!(
            client.endpoint("tournament/get"),
            "http://localhost:5053/tournament/get"
        );
    }

    #[test]
    fn test_failure_prefers_envelope() {
        let result: ApiResult<u32> = decode_failure(
            StatusCode::CONFLICT,
            r#"{"kind":"error","message":"duplicate"}"#,
        );

        let problem = result.into_result().unwrap_err();
        assert_eq!(problem.kind, "error");
        assert_eq!(problem.status, Some(409));
    }

    #[test]
    fn test_failure_without_envelope_uses_status() {
        let result: ApiResult<u32> = decode_failure(StatusCode::FORBIDDEN, "nope");

        let problem = result.into_result().unwrap_err();
        assert_eq!(problem.kind, "forbidden");
        assert_eq!(problem.message.as_deref(), Some("nope"));
    }
}
