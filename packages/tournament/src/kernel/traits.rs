// Trait definitions for dependency injection
//
// Infrastructure seams only. Effects talk to the backend and to the user
// through these so tests can swap in mocks.
//
// Naming convention: Base* for trait names (e.g., BaseTournamentApi)

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::api::{ApiResult, ClientError};
use crate::domains::tournament::models::{Tournament, TournamentDraft};

/// Outcome of one backend call: a decoded envelope or a transport failure.
pub type ApiOutcome<T> = std::result::Result<ApiResult<T>, ClientError>;

// =============================================================================
// Tournament API Trait (Infrastructure - backend endpoints)
// =============================================================================

#[async_trait]
pub trait BaseTournamentApi: Send + Sync {
    /// Fetch every tournament, keyed by id
    async fn get_tournaments(&self) -> ApiOutcome<HashMap<String, Tournament>>;

    /// Create a tournament; the backend assigns the id
    async fn create_tournament(&self, draft: &TournamentDraft) -> ApiOutcome<Tournament>;

    /// Replace an existing tournament
    async fn update_tournament(&self, tournament: &Tournament) -> ApiOutcome<Tournament>;
}

// =============================================================================
// Notification Trait (Infrastructure - user-facing toasts)
// =============================================================================

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub variant: NotificationVariant,
    pub title: String,
    pub description: String,
}

impl Notification {
    /// Destructive "Failed" notification for a failed backend call.
    pub fn failed(description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: "Failed".to_string(),
            description: description.into(),
        }
    }
}

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<()>;
}
