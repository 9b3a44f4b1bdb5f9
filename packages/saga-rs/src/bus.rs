//! Broadcast bus for applied actions.
//!
//! # Guarantees
//!
//! - **At-most-once delivery**: Slow receivers may miss actions
//! - **In-memory only**: Actions are not persisted
//! - **No replay**: Lagged receivers get `RecvError::Lagged`
//!
//! The store is the source of truth. Subscribers use the bus to learn that
//! something changed, then read a snapshot.

use tokio::sync::broadcast;

use crate::core::AppliedAction;

/// Default channel capacity for the action bus.
const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast channel of [`AppliedAction`]s.
///
/// # Example
///
/// ```ignore
/// let mut receiver = store.subscribe();
///
/// coordinator.dispatch(FetchTournaments)?;
///
/// let applied = receiver.recv().await?;
/// println!("{} put {:?}", applied.kind, applied.action);
/// ```
pub struct ActionBus<A> {
    sender: broadcast::Sender<AppliedAction<A>>,
}

impl<A: Clone + Send + 'static> ActionBus<A> {
    /// Create a new bus with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new bus with the specified capacity.
    ///
    /// The capacity determines how many actions can be buffered before
    /// slow receivers start lagging.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an applied action to all subscribers.
    ///
    /// Returns the number of receivers that received it.
    pub fn publish(&self, applied: AppliedAction<A>) -> usize {
        self.sender.send(applied).unwrap_or(0)
    }

    /// Subscribe to actions published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<AppliedAction<A>> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<A: Clone + Send + 'static> Default for ActionBus<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Clone for ActionBus<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A> std::fmt::Debug for ActionBus<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionBus")
            .field("subscriber_count", &self.sender.receiver_count())
            .finish()
    }
}
