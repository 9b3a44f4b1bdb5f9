//! Tournament intents.
//!
//! Each type is its own latest-wins kind: dispatching a second
//! `CreateTournament` abandons the first, but never a running
//! `UpdateTournament` or `FetchTournaments`.

use super::models::{Tournament, TournamentDraft};

/// Load every tournament from the backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTournaments;

/// Create a tournament from a form submission.
#[derive(Debug, Clone)]
pub struct CreateTournament(pub TournamentDraft);

/// Replace an existing tournament.
#[derive(Debug, Clone)]
pub struct UpdateTournament(pub Tournament);
