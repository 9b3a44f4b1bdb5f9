//! Testing utilities for reducers and coordinated workflows.
//!
//! # Feature Flag
//!
//! This module is only available with the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! saga = { path = "../saga-rs", features = ["testing"] }
//! ```
//!
//! ## Using `assert_reduces!`
//!
//! ```ignore
//! use saga::assert_reduces;
//!
//! let mut state = TournamentState::default();
//!
//! assert_reduces!(
//!     TournamentReducer, state,
//!     TournamentAction::SetHandling(true) => true,
//!     TournamentAction::SetHandling(true) => false,
//! );
//! ```
//!
//! ## Using `ActionRecorder`
//!
//! ```ignore
//! let recorder = ActionRecorder::attach(coordinator.store());
//!
//! coordinator.dispatch(FetchTournaments)?;
//!
//! let applied = recorder.wait_for(2).await;
//! assert!(matches!(applied[1].action, TournamentAction::ReplaceTournaments(_)));
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::core::AppliedAction;
use crate::store::{Reducer, Store};

/// Asserts a sequence of action → changed transitions for a reducer.
///
/// Each line applies the action to `$state` and compares the reducer's
/// "changed" flag with the expectation.
///
/// # Panics
///
/// Panics if any transition reports an unexpected flag.
#[macro_export]
macro_rules! assert_reduces {
    ($reducer:expr, $state:expr, $($action:expr => $changed:expr),+ $(,)?) => {
        $(
            let action = $action;
            let described = format!("{:?}", action);
            let actual = $crate::Reducer::reduce(&$reducer, &mut $state, action);
            assert_eq!(
                actual, $changed,
                "Unexpected change flag for action {}\n  expected: {:?}\n  actual: {:?}",
                described, $changed, actual
            );
        )+
    };
}

pub use crate::assert_reduces;

struct RecorderInner<A> {
    applied: Mutex<Vec<AppliedAction<A>>>,
    notify: Notify,
    closed: AtomicBool,
}

/// Records every action applied to a store from the moment it is attached.
///
/// Cheap to clone; clones share the recording.
pub struct ActionRecorder<A> {
    inner: Arc<RecorderInner<A>>,
    task: Arc<JoinHandle<()>>,
}

impl<A: Clone + Send + Sync + 'static> ActionRecorder<A> {
    /// Subscribe to `store` and start recording in a background task.
    pub fn attach<R>(store: &Store<R>) -> Self
    where
        R: Reducer<Action = A>,
    {
        let inner = Arc::new(RecorderInner {
            applied: Mutex::new(Vec::new()),
            notify: Notify::new(),
            closed: AtomicBool::new(false),
        });
        let mut receiver = store.subscribe();
        let task = tokio::spawn({
            let inner = inner.clone();
            async move {
                loop {
                    match receiver.recv().await {
                        Ok(applied) => {
                            inner
                                .applied
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .push(applied);
                            inner.notify.notify_waiters();
                        }
                        Err(RecvError::Lagged(_)) => continue,
                        Err(RecvError::Closed) => break,
                    }
                }
                inner.closed.store(true, Ordering::Release);
                inner.notify.notify_waiters();
            }
        });

        Self {
            inner,
            task: Arc::new(task),
        }
    }

    /// Everything recorded so far.
    pub fn applied(&self) -> Vec<AppliedAction<A>> {
        self.inner
            .applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Just the actions, without envelope metadata.
    pub fn actions(&self) -> Vec<A> {
        self.applied().into_iter().map(|a| a.action).collect()
    }

    /// Wait until at least `count` actions were recorded, then return all
    /// of them.
    ///
    /// Returns early with fewer actions if the store was dropped.
    pub async fn wait_for(&self, count: usize) -> Vec<AppliedAction<A>> {
        loop {
            // Register for notification BEFORE checking count
            let notified = self.inner.notify.notified();

            let applied = self.applied();
            if applied.len() >= count || self.inner.closed.load(Ordering::Acquire) {
                return applied;
            }

            notified.await;
        }
    }
}

impl<A> Clone for ActionRecorder<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            task: self.task.clone(),
        }
    }
}

impl<A> Drop for ActionRecorder<A> {
    fn drop(&mut self) {
        // Last clone stops the background subscriber.
        if Arc::strong_count(&self.task) == 1 {
            self.task.abort();
        }
    }
}
