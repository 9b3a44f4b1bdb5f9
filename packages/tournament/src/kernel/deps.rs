//! Dependencies for tournament effects (using traits for testability)

use std::sync::Arc;

use super::{BaseNotifier, BaseTournamentApi};

/// Dependencies accessible to effects through `ctx.deps()`.
#[derive(Clone)]
pub struct TournamentDeps {
    pub api: Arc<dyn BaseTournamentApi>,
    pub notifier: Arc<dyn BaseNotifier>,
}

impl TournamentDeps {
    pub fn new(api: Arc<dyn BaseTournamentApi>, notifier: Arc<dyn BaseNotifier>) -> Self {
        Self { api, notifier }
    }
}
