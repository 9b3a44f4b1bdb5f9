use saga::SagaError;
use thiserror::Error;

/// Errors raised by the tournament client outside the request path.
///
/// Backend problems and transport failures never surface here; effects
/// turn them into notifications.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("tournament draft is missing required field `{field}`")]
    IncompleteDraft { field: &'static str },

    #[error("coordinator error: {0}")]
    Coordinator(#[from] SagaError),
}
