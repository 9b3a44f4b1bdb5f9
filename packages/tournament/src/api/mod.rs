//! Backend API client: JSON POSTs answered with a result envelope.

pub mod client;
pub mod envelope;
pub mod format_error;
pub mod tournaments;

pub use client::{BackendClient, ClientError, REQUEST_ID_HEADER};
pub use envelope::{kind_for_status, ApiProblem, ApiResult};
pub use format_error::{format_error, ApiFailure};
pub use tournaments::{CREATE_TOURNAMENT_PATH, GET_TOURNAMENTS_PATH, UPDATE_TOURNAMENT_PATH};
