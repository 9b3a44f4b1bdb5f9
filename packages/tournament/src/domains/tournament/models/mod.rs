pub mod tournament;

pub use tournament::{DateRange, Organizer, Tournament, TournamentDraft, TournamentStatus, User};
