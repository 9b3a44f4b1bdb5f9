//! Effect trait and context for intent execution.
//!
//! Effects are intent handlers that perform IO and put actions into the
//! store. They are **stateless**: intents carry all needed data and the
//! context carries the dependencies.
//!
//! # Key Properties
//!
//! - **One intent = one listener**: each dispatch runs the effect once
//! - **Latest-wins**: `put` only lands while the listener's ticket is current
//! - **Narrow context**: only `deps()`, `put()` and ticket inspection

use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::core::Intent;
use crate::error::SagaError;
use crate::latest::Ticket;
use crate::store::{Reducer, Store};

/// Context passed to effect handlers.
///
/// `EffectContext` is immutable and cheap to clone. Clones share the same
/// ticket, so a clone handed to a helper is abandoned together with the
/// original.
///
/// # Example
///
/// ```ignore
/// async fn execute(&self, intent: CreateTournament, ctx: EffectContext<Deps, TournamentReducer>) -> Result<()> {
///     ctx.put(TournamentAction::SetHandling(true));
///
///     let tournament = ctx.deps().api.create_tournament(&intent.0).await?;
///
///     ctx.put(TournamentAction::MergeTournament(tournament));
///     Ok(())
/// }
/// ```
pub struct EffectContext<D, R: Reducer> {
    deps: Arc<D>,
    store: Store<R>,
    ticket: Ticket,
}

impl<D, R: Reducer> EffectContext<D, R> {
    pub(crate) fn new(deps: Arc<D>, store: Store<R>, ticket: Ticket) -> Self {
        Self {
            deps,
            store,
            ticket,
        }
    }

    /// Get shared dependencies (API clients, notification sinks, config).
    pub fn deps(&self) -> &D {
        &self.deps
    }

    /// Put an action into the store.
    ///
    /// Returns `false` without touching the store when a newer intent of
    /// the same kind has been dispatched since this listener started.
    pub fn put(&self, action: R::Action) -> bool {
        let applied = self.store.apply_if_current(&self.ticket, action);
        if !applied {
            debug!(
                kind = %self.ticket.kind(),
                generation = %self.ticket.generation(),
                "listener superseded, action dropped"
            );
        }
        applied
    }

    /// True while this listener is still the latest of its kind.
    ///
    /// Effects check this before side effects that bypass the store
    /// (notifications, logging to the user).
    pub fn is_current(&self) -> bool {
        self.ticket.is_current()
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }
}

impl<D, R: Reducer> Clone for EffectContext<D, R> {
    fn clone(&self) -> Self {
        Self {
            deps: self.deps.clone(),
            store: self.store.clone(),
            ticket: self.ticket.clone(),
        }
    }
}

impl<D, R: Reducer> std::fmt::Debug for EffectContext<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectContext")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Effect handler for one intent type.
///
/// # Example
///
/// ```ignore
/// struct FetchTournamentsEffect;
///
/// #[async_trait]
/// impl Effect<FetchTournaments, TournamentDeps, TournamentReducer> for FetchTournamentsEffect {
///     async fn execute(&self, _intent: FetchTournaments, ctx: EffectContext<TournamentDeps, TournamentReducer>) -> Result<()> {
///         let tournaments = ctx.deps().api.get_tournaments().await?;
///         ctx.put(TournamentAction::ReplaceTournaments(tournaments));
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Effect<I: Intent, D, R: Reducer>: Send + Sync + 'static {
    /// Execute one intent.
    ///
    /// # Errors
    ///
    /// Errors are logged by the coordinator and surfaced through
    /// [`EffectHandle::wait`](crate::EffectHandle::wait). They are not
    /// turned into actions; effects that want the store to reflect a
    /// failure must put that action themselves.
    async fn execute(&self, intent: I, ctx: EffectContext<D, R>) -> Result<()>;
}

/// Type-erased effect trait for internal use.
#[async_trait]
pub(crate) trait AnyEffect<D, R: Reducer>: Send + Sync {
    async fn execute_any(&self, intent: Box<dyn Any + Send>, ctx: EffectContext<D, R>) -> Result<()>;
}

/// Wrapper to make concrete effects implement AnyEffect.
pub(crate) struct EffectWrapper<E, I, D, R> {
    effect: E,
    _phantom: PhantomData<fn() -> (I, D, R)>,
}

impl<E, I, D, R> EffectWrapper<E, I, D, R> {
    pub fn new(effect: E) -> Self {
        Self {
            effect,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<E, I, D, R> AnyEffect<D, R> for EffectWrapper<E, I, D, R>
where
    E: Effect<I, D, R>,
    I: Intent,
    D: Send + Sync + 'static,
    R: Reducer,
{
    async fn execute_any(&self, intent: Box<dyn Any + Send>, ctx: EffectContext<D, R>) -> Result<()> {
        let intent = intent
            .downcast::<I>()
            .map_err(|_| SagaError::IntentTypeMismatch {
                expected: std::any::type_name::<I>(),
            })?;
        self.effect.execute(*intent, ctx).await
    }
}
