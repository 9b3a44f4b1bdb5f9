//! Client-side tournament state and its reducer.

use std::collections::HashMap;

use saga::{Reducer, Store};
use serde::Serialize;

use super::models::Tournament;

/// Tournaments by id plus one "request in flight" flag shared by every
/// operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TournamentState {
    pub tournaments: HashMap<String, Tournament>,
    pub handling: bool,
}

impl TournamentState {
    pub fn get(&self, id: &str) -> Option<&Tournament> {
        self.tournaments.get(id)
    }

    /// Tournaments ordered by start date, then id.
    pub fn sorted(&self) -> Vec<&Tournament> {
        let mut tournaments: Vec<_> = self.tournaments.values().collect();
        tournaments.sort_by(|a, b| a.date.from.cmp(&b.date.from).then_with(|| a.id.cmp(&b.id)));
        tournaments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TournamentAction {
    SetHandling(bool),
    /// Replace the whole collection; clears `handling`.
    ReplaceTournaments(HashMap<String, Tournament>),
    /// Insert or overwrite one record at its id; clears `handling`.
    MergeTournament(Tournament),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TournamentReducer;

impl Reducer for TournamentReducer {
    type State = TournamentState;
    type Action = TournamentAction;

    fn reduce(&self, state: &mut TournamentState, action: TournamentAction) -> bool {
        match action {
            TournamentAction::SetHandling(handling) => {
                let changed = state.handling != handling;
                state.handling = handling;
                changed
            }
            TournamentAction::ReplaceTournaments(tournaments) => {
                let changed = state.handling || state.tournaments != tournaments;
                state.tournaments = tournaments;
                state.handling = false;
                changed
            }
            TournamentAction::MergeTournament(tournament) => {
                let changed = state.handling
                    || state.tournaments.get(&tournament.id) != Some(&tournament);
                state.tournaments.insert(tournament.id.clone(), tournament);
                state.handling = false;
                changed
            }
        }
    }
}

pub type TournamentStore = Store<TournamentReducer>;

/// Empty store: no tournaments, nothing in flight.
pub fn tournament_store() -> TournamentStore {
    Store::new(TournamentReducer, TournamentState::default())
}
