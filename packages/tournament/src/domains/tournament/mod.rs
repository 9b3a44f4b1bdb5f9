//! Tournament domain - records, client state, intents, effects and the
//! edit form

pub mod effects;
pub mod form;
pub mod intents;
pub mod models;
pub mod store;

pub use effects::{tournament_coordinator, TournamentContext, TournamentCoordinator};
pub use form::{EditTournamentForm, FormErrors, FormField, FormMode, TournamentFormValues};
pub use intents::{CreateTournament, FetchTournaments, UpdateTournament};
pub use models::{DateRange, Organizer, Tournament, TournamentDraft, TournamentStatus, User};
pub use store::{tournament_store, TournamentAction, TournamentReducer, TournamentState, TournamentStore};
