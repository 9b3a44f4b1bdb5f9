//! Structured error types for saga.
//!
//! `SagaError` provides pattern-matchable errors instead of generic
//! `anyhow::Error`. Effects themselves keep using `anyhow` internally.
//!
//! # Example
//!
//! ```ignore
//! match coordinator.dispatch(CreateTournament(draft)) {
//!     Ok(handle) => handle.wait().await?,
//!     Err(SagaError::NoEffectRegistered { type_name }) => {
//!         eprintln!("nobody listens for {}", type_name);
//!     }
//!     Err(e) => return Err(e.into()),
//! }
//! ```

use thiserror::Error;

/// Errors raised by the coordination layer itself.
#[derive(Debug, Error)]
pub enum SagaError {
    /// No effect registered for the dispatched intent type.
    #[error("no effect registered for intent type: {type_name}")]
    NoEffectRegistered { type_name: &'static str },

    /// An effect is already registered for this intent type.
    #[error("effect already registered for intent type: {type_name}")]
    EffectAlreadyRegistered { type_name: &'static str },

    /// Intent downcast failed during type-erased dispatch.
    #[error("intent type mismatch: expected {expected}")]
    IntentTypeMismatch { expected: &'static str },

    /// The spawned effect task panicked or was aborted by the runtime.
    #[error("effect for {type_name} did not complete: {reason}")]
    EffectPanicked {
        type_name: &'static str,
        reason: String,
    },
}

impl SagaError {
    /// Returns true if this is a registration error.
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            SagaError::NoEffectRegistered { .. } | SagaError::EffectAlreadyRegistered { .. }
        )
    }
}
