// TournamentKernel - the store, the coordinator and their dependencies
//
// Owns one explicitly constructed store; callers read it through
// snapshot() and change it only by dispatching intents.

use std::sync::Arc;

use saga::{EffectHandle, Store};

use super::{BaseNotifier, BaseTournamentApi, TournamentDeps, TracingNotifier};
use crate::api::BackendClient;
use crate::common::TournamentError;
use crate::config::Config;
use crate::domains::tournament::{
    tournament_coordinator, tournament_store, CreateTournament, FetchTournaments, Tournament,
    TournamentCoordinator, TournamentDraft, TournamentReducer, TournamentState, TournamentStore,
    UpdateTournament,
};

#[derive(Clone)]
pub struct TournamentKernel {
    coordinator: TournamentCoordinator,
}

impl TournamentKernel {
    /// Kernel over a fresh, empty store.
    pub fn new(api: Arc<dyn BaseTournamentApi>, notifier: Arc<dyn BaseNotifier>) -> Self {
        Self::with_store(TournamentDeps::new(api, notifier), tournament_store())
    }

    /// Kernel over a store the caller already holds.
    pub fn with_store(deps: TournamentDeps, store: TournamentStore) -> Self {
        Self {
            coordinator: tournament_coordinator(deps, store),
        }
    }

    /// Backend client for the configured stage, notifications to the log.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(BackendClient::new(config.backend_url.clone())),
            Arc::new(TracingNotifier),
        )
    }

    pub fn coordinator(&self) -> &TournamentCoordinator {
        &self.coordinator
    }

    pub fn store(&self) -> &Store<TournamentReducer> {
        self.coordinator.store()
    }

    pub fn snapshot(&self) -> TournamentState {
        self.store().snapshot()
    }

    pub fn request_tournaments(&self) -> Result<EffectHandle, TournamentError> {
        Ok(self.coordinator.dispatch(FetchTournaments)?)
    }

    pub fn create_tournament(&self, draft: TournamentDraft) -> Result<EffectHandle, TournamentError> {
        Ok(self.coordinator.dispatch(CreateTournament(draft))?)
    }

    pub fn update_tournament(&self, tournament: Tournament) -> Result<EffectHandle, TournamentError> {
        Ok(self.coordinator.dispatch(UpdateTournament(tournament))?)
    }
}
