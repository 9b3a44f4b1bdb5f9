//! Latest-wins bookkeeping.
//!
//! Every dispatch of an intent kind bumps that kind's generation and hands
//! the listener a [`Ticket`]. A ticket stays current until the next dispatch
//! of the same kind; after that the listener is abandoned and the
//! coordinator drops whatever it tries to put.
//!
//! Nothing here cancels work. A superseded listener keeps running (its
//! network call resolves normally); it just loses the right to touch
//! shared state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::core::{Generation, Intent, IntentKind};

/// Per-kind generation counters.
#[derive(Default)]
pub struct LatestRegistry {
    generations: DashMap<IntentKind, Arc<AtomicU64>>,
}

impl LatestRegistry {
    pub fn new() -> Self {
        Self {
            generations: DashMap::new(),
        }
    }

    /// Start a new listener for `kind`, superseding any previous one.
    pub fn begin(&self, kind: IntentKind) -> Ticket {
        let live = self
            .generations
            .entry(kind)
            .or_insert_with(|| Arc::new(AtomicU64::new(0)))
            .clone();
        let generation = Generation::new(live.fetch_add(1, Ordering::AcqRel) + 1);

        Ticket {
            kind,
            generation,
            live,
        }
    }

    /// Typed shorthand for [`begin`](Self::begin).
    pub fn begin_for<I: Intent>(&self) -> Ticket {
        self.begin(IntentKind::of::<I>())
    }

    /// The generation currently allowed to act for `kind`.
    ///
    /// Returns [`Generation::NONE`] if the kind was never dispatched.
    pub fn current(&self, kind: IntentKind) -> Generation {
        self.generations
            .get(&kind)
            .map(|live| Generation::new(live.load(Ordering::Acquire)))
            .unwrap_or(Generation::NONE)
    }
}

impl std::fmt::Debug for LatestRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LatestRegistry")
            .field("kinds", &self.generations.len())
            .finish()
    }
}

/// Proof that a listener was started for a given kind and generation.
#[derive(Clone)]
pub struct Ticket {
    kind: IntentKind,
    generation: Generation,
    live: Arc<AtomicU64>,
}

impl Ticket {
    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True while no newer intent of the same kind has been dispatched.
    pub fn is_current(&self) -> bool {
        self.live.load(Ordering::Acquire) == self.generation.get()
    }
}

impl std::fmt::Debug for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ticket")
            .field("kind", &self.kind)
            .field("generation", &self.generation)
            .field("current", &self.is_current())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fetch;
    struct Create;

    #[test]
    fn first_ticket_is_current() {
        let registry = LatestRegistry::new();
        let ticket = registry.begin_for::<Fetch>();

        assert!(ticket.is_current());
        assert_eq!(ticket.generation().get(), 1);
        assert_eq!(registry.current(IntentKind::of::<Fetch>()), ticket.generation());
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let registry = LatestRegistry::new();
        let first = registry.begin_for::<Fetch>();
        let second = registry.begin_for::<Fetch>();

        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(second.generation().get(), 2);
    }

    #[test]
    fn kinds_are_independent() {
        let registry = LatestRegistry::new();
        let fetch = registry.begin_for::<Fetch>();
        let create = registry.begin_for::<Create>();
        let _newer_create = registry.begin_for::<Create>();

        assert!(fetch.is_current());
        assert!(!create.is_current());
    }

    #[test]
    fn unknown_kind_has_no_generation() {
        let registry = LatestRegistry::new();
        assert!(registry.current(IntentKind::of::<Create>()).is_none());
    }
}
