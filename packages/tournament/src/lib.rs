// Tournament client - API Core
//
// Client-side tournament management: a JSON API client, a reducer-driven
// store and latest-wins effects coordinated by saga, plus the headless
// create/edit form.

pub mod api;
pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use common::TournamentError;
pub use config::*;
