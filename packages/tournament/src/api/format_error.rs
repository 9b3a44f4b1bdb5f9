use std::fmt;

use thiserror::Error;

use super::client::ClientError;
use super::envelope::ApiProblem;

/// Either failure source of a backend call.
#[derive(Debug, Error)]
pub enum ApiFailure {
    #[error("{0}")]
    Problem(ApiProblem),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<ApiProblem> for ApiFailure {
    fn from(problem: ApiProblem) -> Self {
        ApiFailure::Problem(problem)
    }
}

impl fmt::Display for ApiProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => f.write_str(message),
            _ => {
                write!(f, "Request failed: {}", self.kind.replace('-', " "))?;
                if let Some(status) = self.status {
                    write!(f, " (HTTP {})", status)?;
                }
                Ok(())
            }
        }
    }
}

/// User-facing description of a failed backend call.
pub fn format_error(failure: &ApiFailure) -> String {
    failure.to_string()
}
