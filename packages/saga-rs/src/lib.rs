//! # Saga
//!
//! Intent/effect coordination for client state: intents are dispatched,
//! effects perform the IO, and only the latest listener of each intent
//! kind may put actions into the store.
//!
//! ## Core Concepts
//!
//! - [`Intent`] = a typed request for a side effect (its Rust type is its kind)
//! - [`Effect`] = the async handler for one intent type
//! - [`Store`] = reducer-driven state, written only through [`EffectContext::put`]
//! - [`Ticket`] = the (kind, generation) pair a listener holds while it is current
//!
//! ## Architecture
//!
//! ```text
//! UI / CLI
//!     │
//!     ▼ dispatch(intent)
//! Coordinator ── begin(kind) ──► LatestRegistry (generation += 1)
//!     │
//!     ▼ tokio::spawn
//! Effect.execute(intent, ctx)
//!     │
//!     ├─► API call (never cancelled)
//!     │
//!     └─► ctx.put(action) ──► ticket current? ──► Reducer ──► ActionBus
//!                                   │
//!                                   └─ no: dropped
//! ```
//!
//! ## Key Invariants
//!
//! 1. **Latest-wins per kind** - a newer dispatch of the same intent type
//!    abandons the older listener before it can put anything else
//! 2. **Kinds are independent** - different intent types never supersede
//!    each other
//! 3. **No cancellation** - superseded listeners run to completion; only
//!    their writes are dropped
//! 4. **Single write path** - the store changes only through `put`
//!
//! ## Example
//!
//! ```ignore
//! use saga::{CoordinatorBuilder, Effect, EffectContext, Reducer, Store};
//!
//! let store = Store::new(TournamentReducer, TournamentState::default());
//! let coordinator = CoordinatorBuilder::new(deps, store)
//!     .take_latest::<FetchTournaments, _>(FetchTournamentsEffect)
//!     .build();
//!
//! coordinator.dispatch(FetchTournaments)?.wait().await?;
//! println!("{:?}", coordinator.store().snapshot());
//! ```

mod bus;
mod core;
mod dispatch;
mod effect_impl;
mod error;
mod latest;
mod store;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export core types
pub use crate::core::{AppliedAction, Generation, Intent, IntentKind};

// Re-export error types
pub use crate::error::SagaError;

// Re-export bus and store types
pub use bus::ActionBus;
pub use store::{Reducer, Store};

// Re-export latest-wins bookkeeping
pub use latest::{LatestRegistry, Ticket};

// Re-export effect types
pub use effect_impl::{Effect, EffectContext};

// Re-export dispatcher types
pub use dispatch::{Coordinator, CoordinatorBuilder, EffectHandle};

// Re-export commonly used external types
pub use async_trait::async_trait;
