//! Reducer-driven state container.
//!
//! The store is injected into the coordinator explicitly; there is no
//! global instance. Readers take snapshots or subscribe to applied actions.
//! The only write path is [`EffectContext::put`](crate::EffectContext::put),
//! which checks the listener's ticket under the store's write lock.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tracing::trace;

use crate::bus::ActionBus;
use crate::core::AppliedAction;
use crate::latest::Ticket;

/// Pure state transition.
///
/// # Example
///
/// ```ignore
/// struct CounterReducer;
///
/// impl Reducer for CounterReducer {
///     type State = i64;
///     type Action = CounterAction;
///
///     fn reduce(&self, state: &mut i64, action: CounterAction) -> bool {
///         match action {
///             CounterAction::Add(n) => { *state += n; n != 0 }
///         }
///     }
/// }
/// ```
pub trait Reducer: Send + Sync + 'static {
    type State: Clone + Send + Sync + 'static;
    type Action: Clone + fmt::Debug + Send + Sync + 'static;

    /// Apply `action` to `state`. Returns whether the state changed.
    ///
    /// Must not perform IO.
    fn reduce(&self, state: &mut Self::State, action: Self::Action) -> bool;
}

struct StoreInner<R: Reducer> {
    state: RwLock<R::State>,
    reducer: R,
    bus: ActionBus<R::Action>,
}

/// Shared, cheaply cloneable handle to reducer-managed state.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Store<R> {
    pub fn new(reducer: R, initial: R::State) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                reducer,
                bus: ActionBus::new(),
            }),
        }
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> R::State {
        self.read(Clone::clone)
    }

    /// Borrow the current state for the duration of `f`.
    pub fn read<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
        let guard = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Subscribe to actions applied after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AppliedAction<R::Action>> {
        self.inner.bus.subscribe()
    }

    /// Apply `action` if `ticket` is still the latest for its kind.
    ///
    /// The ticket is checked while holding the write lock, so a listener
    /// cannot slip a write in after a newer listener has started writing.
    pub(crate) fn apply_if_current(&self, ticket: &Ticket, action: R::Action) -> bool {
        let changed = {
            let mut guard = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);

            if !ticket.is_current() {
                return false;
            }

            self.inner.reducer.reduce(&mut guard, action.clone())
        };

        trace!(
            kind = %ticket.kind(),
            generation = %ticket.generation(),
            changed,
            ?action,
            "action applied"
        );

        self.inner.bus.publish(AppliedAction {
            kind: ticket.kind(),
            generation: ticket.generation(),
            changed,
            action,
        });
        true
    }
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: Reducer> fmt::Debug for Store<R>
where
    R::State: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|state| f.debug_struct("Store").field("state", state).finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latest::LatestRegistry;

    struct Fetch;

    #[derive(Debug, Clone, PartialEq)]
    enum CounterAction {
        Add(i64),
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = i64;
        type Action = CounterAction;

        fn reduce(&self, state: &mut i64, action: CounterAction) -> bool {
            match action {
                CounterAction::Add(n) => {
                    *state += n;
                    n != 0
                }
            }
        }
    }

    #[test]
    fn current_ticket_applies() {
        let registry = LatestRegistry::new();
        let store = Store::new(CounterReducer, 0);
        let ticket = registry.begin_for::<Fetch>();

        assert!(store.apply_if_current(&ticket, CounterAction::Add(5)));
        assert_eq!(store.snapshot(), 5);
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let registry = LatestRegistry::new();
        let store = Store::new(CounterReducer, 0);
        let stale = registry.begin_for::<Fetch>();
        let _fresh = registry.begin_for::<Fetch>();

        assert!(!store.apply_if_current(&stale, CounterAction::Add(5)));
        assert_eq!(store.snapshot(), 0);
    }

    #[tokio::test]
    async fn subscribers_see_applied_actions() {
        let registry = LatestRegistry::new();
        let store = Store::new(CounterReducer, 0);
        let mut receiver = store.subscribe();
        let ticket = registry.begin_for::<Fetch>();

        store.apply_if_current(&ticket, CounterAction::Add(0));

        let applied = receiver.recv().await.unwrap();
        assert_eq!(applied.action, CounterAction::Add(0));
        assert!(!applied.changed);
        assert_eq!(applied.generation, ticket.generation());
    }

    #[test]
    fn clones_share_state() {
        let registry = LatestRegistry::new();
        let store = Store::new(CounterReducer, 1);
        let other = store.clone();
        let ticket = registry.begin_for::<Fetch>();

        other.apply_if_current(&ticket, CounterAction::Add(2));

        assert_eq!(store.read(|n| *n), 3);
    }
}
