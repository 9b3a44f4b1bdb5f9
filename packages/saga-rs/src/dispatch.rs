//! Intent dispatcher with latest-wins listeners.
//!
//! The `Coordinator` is responsible for:
//! 1. Routing intents to the effect registered for their type
//! 2. Issuing a fresh [`Ticket`] per dispatch, superseding older listeners
//! 3. Running the effect as a tokio task and handing back an [`EffectHandle`]
//!
//! Superseded listeners are not aborted. Their IO completes, but every
//! `put` they attempt afterwards is dropped.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::core::{Generation, Intent, IntentKind};
use crate::effect_impl::{AnyEffect, Effect, EffectContext, EffectWrapper};
use crate::error::SagaError;
use crate::latest::{LatestRegistry, Ticket};
use crate::store::{Reducer, Store};

type EffectMap<D, R> = HashMap<IntentKind, Arc<dyn AnyEffect<D, R>>>;

/// Builder for a [`Coordinator`].
///
/// # Example
///
/// ```ignore
/// let coordinator = CoordinatorBuilder::new(deps, store)
///     .take_latest::<FetchTournaments, _>(FetchTournamentsEffect)
///     .take_latest::<CreateTournament, _>(CreateTournamentEffect)
///     .build();
/// ```
pub struct CoordinatorBuilder<D, R: Reducer> {
    deps: Arc<D>,
    store: Store<R>,
    effects: EffectMap<D, R>,
}

impl<D: Send + Sync + 'static, R: Reducer> CoordinatorBuilder<D, R> {
    pub fn new(deps: D, store: Store<R>) -> Self {
        Self::from_arc(Arc::new(deps), store)
    }

    /// Create a builder with pre-wrapped Arc dependencies.
    ///
    /// Use this when you need to share the deps with other parts of the system.
    pub fn from_arc(deps: Arc<D>, store: Store<R>) -> Self {
        Self {
            deps,
            store,
            effects: HashMap::new(),
        }
    }

    /// Register a latest-wins listener for intent type `I`.
    ///
    /// # Panics
    ///
    /// Panics if an effect is already registered for `I`.
    /// Use `try_take_latest` for a non-panicking version.
    pub fn take_latest<I, E>(self, effect: E) -> Self
    where
        I: Intent,
        E: Effect<I, D, R>,
    {
        self.try_take_latest::<I, E>(effect)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// Register a latest-wins listener, returning an error if intent type
    /// `I` already has one.
    pub fn try_take_latest<I, E>(mut self, effect: E) -> Result<Self, SagaError>
    where
        I: Intent,
        E: Effect<I, D, R>,
    {
        let kind = IntentKind::of::<I>();
        if self.effects.contains_key(&kind) {
            return Err(SagaError::EffectAlreadyRegistered {
                type_name: kind.name(),
            });
        }
        self.effects
            .insert(kind, Arc::new(EffectWrapper::<E, I, D, R>::new(effect)));
        Ok(self)
    }

    pub fn build(self) -> Coordinator<D, R> {
        Coordinator {
            deps: self.deps,
            store: self.store,
            effects: Arc::new(self.effects),
            latest: Arc::new(LatestRegistry::new()),
        }
    }
}

/// Routes intents to effects, one latest-wins listener per intent type.
///
/// Cheap to clone; clones share the store, the effects and the
/// generation registry.
pub struct Coordinator<D, R: Reducer> {
    deps: Arc<D>,
    store: Store<R>,
    effects: Arc<EffectMap<D, R>>,
    latest: Arc<LatestRegistry>,
}

impl<D: Send + Sync + 'static, R: Reducer> Coordinator<D, R> {
    /// Dispatch an intent.
    ///
    /// Supersedes any listener of the same type that is still running and
    /// spawns a new one on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SagaError::NoEffectRegistered`] if nothing listens for `I`.
    pub fn dispatch<I: Intent>(&self, intent: I) -> Result<EffectHandle, SagaError> {
        let kind = IntentKind::of::<I>();
        let effect = self
            .effects
            .get(&kind)
            .cloned()
            .ok_or(SagaError::NoEffectRegistered {
                type_name: kind.name(),
            })?;

        let ticket = self.latest.begin(kind);
        debug!(kind = %kind, generation = %ticket.generation(), "intent dispatched");

        let ctx = EffectContext::new(self.deps.clone(), self.store.clone(), ticket.clone());
        let generation = ticket.generation();
        let task = tokio::spawn(async move {
            let result = effect.execute_any(Box::new(intent), ctx).await;
            if let Err(ref e) = result {
                error!(kind = %kind, %generation, error = ?e, "effect failed");
            }
            result
        });

        Ok(EffectHandle { ticket, task })
    }

    /// Dispatch an intent and wait for its listener to finish.
    pub async fn run<I: Intent>(&self, intent: I) -> Result<()> {
        self.dispatch(intent)?.wait().await
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    pub fn deps(&self) -> &D {
        &self.deps
    }

    /// Generation currently allowed to act for intent type `I`.
    pub fn current_generation<I: Intent>(&self) -> Generation {
        self.latest.current(IntentKind::of::<I>())
    }

    /// Whether a listener is registered for intent type `I`.
    pub fn listens_for<I: Intent>(&self) -> bool {
        self.effects.contains_key(&IntentKind::of::<I>())
    }
}

impl<D, R: Reducer> Clone for Coordinator<D, R> {
    fn clone(&self) -> Self {
        Self {
            deps: self.deps.clone(),
            store: self.store.clone(),
            effects: self.effects.clone(),
            latest: self.latest.clone(),
        }
    }
}

impl<D, R: Reducer> std::fmt::Debug for Coordinator<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("effects", &self.effects.len())
            .field("latest", &self.latest)
            .finish_non_exhaustive()
    }
}

/// Handle to one spawned listener.
///
/// Dropping the handle detaches the listener; it keeps running.
#[derive(Debug)]
pub struct EffectHandle {
    ticket: Ticket,
    task: JoinHandle<Result<()>>,
}

impl EffectHandle {
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// True while no newer intent of the same type has been dispatched.
    pub fn is_current(&self) -> bool {
        self.ticket.is_current()
    }

    /// Wait for the listener to finish and return its outcome.
    pub async fn wait(self) -> Result<()> {
        match self.task.await {
            Ok(result) => result,
            Err(join_error) => Err(SagaError::EffectPanicked {
                type_name: self.ticket.kind().name(),
                reason: join_error.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::oneshot;

    struct NoDeps;

    #[derive(Debug, Clone, PartialEq)]
    enum LogAction {
        Push(&'static str),
    }

    struct LogReducer;

    impl Reducer for LogReducer {
        type State = Vec<&'static str>;
        type Action = LogAction;

        fn reduce(&self, state: &mut Vec<&'static str>, action: LogAction) -> bool {
            match action {
                LogAction::Push(entry) => state.push(entry),
            }
            true
        }
    }

    /// Intent whose listener waits on a gate before putting its label.
    struct Gated {
        label: &'static str,
        gate: oneshot::Receiver<()>,
    }

    struct GatedEffect;

    #[async_trait]
    impl Effect<Gated, NoDeps, LogReducer> for GatedEffect {
        async fn execute(&self, intent: Gated, ctx: EffectContext<NoDeps, LogReducer>) -> Result<()> {
            intent.gate.await?;
            ctx.put(LogAction::Push(intent.label));
            Ok(())
        }
    }

    struct Immediate(&'static str);

    struct ImmediateEffect;

    #[async_trait]
    impl Effect<Immediate, NoDeps, LogReducer> for ImmediateEffect {
        async fn execute(&self, intent: Immediate, ctx: EffectContext<NoDeps, LogReducer>) -> Result<()> {
            ctx.put(LogAction::Push(intent.0));
            Ok(())
        }
    }

    struct Failing;

    struct FailingEffect;

    #[async_trait]
    impl Effect<Failing, NoDeps, LogReducer> for FailingEffect {
        async fn execute(&self, _intent: Failing, _ctx: EffectContext<NoDeps, LogReducer>) -> Result<()> {
            anyhow::bail!("backend unreachable")
        }
    }

    fn coordinator() -> Coordinator<NoDeps, LogReducer> {
        CoordinatorBuilder::new(NoDeps, Store::new(LogReducer, Vec::new()))
            .take_latest::<Gated, _>(GatedEffect)
            .take_latest::<Immediate, _>(ImmediateEffect)
            .take_latest::<Failing, _>(FailingEffect)
            .build()
    }

    fn gated(label: &'static str) -> (Gated, oneshot::Sender<()>) {
        let (tx, gate) = oneshot::channel();
        (Gated { label, gate }, tx)
    }

    #[tokio::test]
    async fn test_latest_dispatch_wins_when_older_resolves_last() {
        let coordinator = coordinator();
        let (a, release_a) = gated("a");
        let (b, release_b) = gated("b");

        let handle_a = coordinator.dispatch(a).unwrap();
        let handle_b = coordinator.dispatch(b).unwrap();
        assert!(!handle_a.is_current());
        assert!(handle_b.is_current());

        release_b.send(()).unwrap();
        handle_b.wait().await.unwrap();
        release_a.send(()).unwrap();
        handle_a.wait().await.unwrap();

        assert_eq!(coordinator.store().snapshot(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_latest_dispatch_wins_when_older_resolves_first() {
        let coordinator = coordinator();
        let (a, release_a) = gated("a");
        let (b, release_b) = gated("b");

        let handle_a = coordinator.dispatch(a).unwrap();
        let handle_b = coordinator.dispatch(b).unwrap();

        release_a.send(()).unwrap();
        handle_a.wait().await.unwrap();
        release_b.send(()).unwrap();
        handle_b.wait().await.unwrap();

        assert_eq!(coordinator.store().snapshot(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_distinct_kinds_do_not_supersede_each_other() {
        let coordinator = coordinator();
        let (a, release_a) = gated("gated");

        let handle_a = coordinator.dispatch(a).unwrap();
        coordinator.run(Immediate("immediate")).await.unwrap();

        release_a.send(()).unwrap();
        handle_a.wait().await.unwrap();

        assert_eq!(coordinator.store().snapshot(), vec!["immediate", "gated"]);
    }

    #[tokio::test]
    async fn test_sequential_dispatches_all_apply() {
        let coordinator = coordinator();

        coordinator.run(Immediate("one")).await.unwrap();
        coordinator.run(Immediate("two")).await.unwrap();

        assert_eq!(coordinator.store().snapshot(), vec!["one", "two"]);
        assert_eq!(coordinator.current_generation::<Immediate>().get(), 2);
    }

    #[tokio::test]
    async fn test_unregistered_intent_is_rejected() {
        let coordinator = coordinator();

        let err = coordinator.dispatch(42u32).unwrap_err();

        assert!(matches!(err, SagaError::NoEffectRegistered { .. }));
        assert!(!coordinator.listens_for::<u32>());
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let result = CoordinatorBuilder::new(NoDeps, Store::new(LogReducer, Vec::new()))
            .take_latest::<Immediate, _>(ImmediateEffect)
            .try_take_latest::<Immediate, _>(ImmediateEffect);

        assert!(matches!(
            result,
            Err(SagaError::EffectAlreadyRegistered { .. })
        ));
    }

    #[tokio::test]
    async fn test_effect_error_surfaces_through_handle() {
        let coordinator = coordinator();

        let err = coordinator.run(Failing).await.unwrap_err();

        assert!(err.to_string().contains("backend unreachable"));
        assert!(coordinator.store().snapshot().is_empty());
    }
}
