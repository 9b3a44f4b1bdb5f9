//! Tournament effects - one latest-wins listener per intent type
//!
//! Every effect follows the same shape:
//!   put SetHandling(true) → backend call → put result action
//!                                        ↘ put SetHandling(false) + "Failed" notification
//!
//! Failures never escalate past the effect; the notification is the only
//! place they surface.

use anyhow::Result;
use async_trait::async_trait;
use saga::{Coordinator, CoordinatorBuilder, Effect, EffectContext};
use tracing::{debug, info, warn};

use super::intents::{CreateTournament, FetchTournaments, UpdateTournament};
use super::store::{TournamentAction, TournamentReducer, TournamentStore};
use crate::api::{format_error, ApiFailure};
use crate::kernel::{ApiOutcome, Notification, TournamentDeps};

pub type TournamentContext = EffectContext<TournamentDeps, TournamentReducer>;
pub type TournamentCoordinator = Coordinator<TournamentDeps, TournamentReducer>;

/// Wire the three tournament listeners onto `store`.
pub fn tournament_coordinator(deps: TournamentDeps, store: TournamentStore) -> TournamentCoordinator {
    CoordinatorBuilder::new(deps, store)
        .take_latest::<FetchTournaments, _>(FetchTournamentsEffect)
        .take_latest::<CreateTournament, _>(CreateTournamentEffect)
        .take_latest::<UpdateTournament, _>(UpdateTournamentEffect)
        .build()
}

pub struct FetchTournamentsEffect;

#[async_trait]
impl Effect<FetchTournaments, TournamentDeps, TournamentReducer> for FetchTournamentsEffect {
    async fn execute(&self, _intent: FetchTournaments, ctx: TournamentContext) -> Result<()> {
        ctx.put(TournamentAction::SetHandling(true));

        match settle(ctx.deps().api.get_tournaments().await) {
            Ok(tournaments) => {
                debug!(count = tournaments.len(), "fetched tournaments");
                ctx.put(TournamentAction::ReplaceTournaments(tournaments));
            }
            Err(failure) => report_failure(&ctx, "fetch", failure).await,
        }
        Ok(())
    }
}

pub struct CreateTournamentEffect;

#[async_trait]
impl Effect<CreateTournament, TournamentDeps, TournamentReducer> for CreateTournamentEffect {
    async fn execute(&self, intent: CreateTournament, ctx: TournamentContext) -> Result<()> {
        let CreateTournament(draft) = intent;
        ctx.put(TournamentAction::SetHandling(true));

        match settle(ctx.deps().api.create_tournament(&draft).await) {
            Ok(tournament) => {
                let tournament_id = tournament.id.clone();
                if ctx.put(TournamentAction::MergeTournament(tournament)) {
                    info!(tournament_id = %tournament_id, "tournament created");
                }
            }
            Err(failure) => report_failure(&ctx, "create", failure).await,
        }
        Ok(())
    }
}

pub struct UpdateTournamentEffect;

#[async_trait]
impl Effect<UpdateTournament, TournamentDeps, TournamentReducer> for UpdateTournamentEffect {
    async fn execute(&self, intent: UpdateTournament, ctx: TournamentContext) -> Result<()> {
        let UpdateTournament(tournament) = intent;
        ctx.put(TournamentAction::SetHandling(true));

        match settle(ctx.deps().api.update_tournament(&tournament).await) {
            Ok(updated) => {
                let tournament_id = updated.id.clone();
                if ctx.put(TournamentAction::MergeTournament(updated)) {
                    info!(tournament_id = %tournament_id, "tournament updated");
                }
            }
            Err(failure) => report_failure(&ctx, "update", failure).await,
        }
        Ok(())
    }
}

/// Collapse both failure sources into one.
fn settle<T>(outcome: ApiOutcome<T>) -> std::result::Result<T, ApiFailure> {
    outcome?.into_result().map_err(ApiFailure::from)
}

/// Clear the in-flight flag and tell the user, unless a newer intent of
/// the same kind already took over.
async fn report_failure(ctx: &TournamentContext, operation: &'static str, failure: ApiFailure) {
    if !ctx.put(TournamentAction::SetHandling(false)) {
        debug!(operation, error = %failure, "superseded request failed, notification suppressed");
        return;
    }

    warn!(operation, error = %failure, "tournament request failed");

    let notification = Notification::failed(format_error(&failure));
    if let Err(e) = ctx.deps().notifier.notify(notification).await {
        warn!(operation, error = %e, "failed to deliver notification");
    }
}
