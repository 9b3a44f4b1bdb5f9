//! Core traits and types for saga.
//!
//! Saga separates **intent** from **fact**:
//! - [`Intent`] = a request for a side effect ("create this tournament")
//! - Actions = facts the store reduces ("tournament merged", "handling cleared")
//!
//! Intents are routed by their Rust type. The type *is* the kind, so two
//! intents of the same type compete under the latest-wins policy while
//! intents of different types never interact.

use std::any::{Any, TypeId};
use std::fmt;

/// A typed request for a side effect.
///
/// **Note**: This trait is automatically implemented for any type that is
/// `Send + 'static`. You don't need to implement it manually.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Clone)]
/// struct CreateTournament(TournamentDraft);
///
/// // Intent is automatically implemented!
/// coordinator.dispatch(CreateTournament(draft))?;
/// ```
pub trait Intent: Any + Send + 'static {}

impl<T: Any + Send + 'static> Intent for T {}

/// Identity of an intent kind.
///
/// Wraps the intent's `TypeId` together with its type name so log lines
/// and errors stay readable.
#[derive(Clone, Copy)]
pub struct IntentKind {
    type_id: TypeId,
    name: &'static str,
}

impl IntentKind {
    /// The kind of intent type `I`.
    pub fn of<I: Intent>() -> Self {
        Self {
            type_id: TypeId::of::<I>(),
            name: std::any::type_name::<I>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Full type name of the intent.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name (`CreateTournament` rather than
    /// `tournament_core::domains::tournament::intents::CreateTournament`).
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for IntentKind {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for IntentKind {}

impl std::hash::Hash for IntentKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntentKind").field(&self.name).finish()
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Monotonic dispatch counter for one intent kind.
///
/// Generation `0` is never issued; the first dispatch of a kind receives `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Sentinel for "nothing dispatched yet".
    pub const NONE: Self = Self(0);

    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Envelope wrapping an action that was applied to a store.
///
/// Broadcast to store subscribers after the reducer ran. Carries the
/// kind and generation of the listener that put it, so observers can tell
/// which dispatch produced a given state change.
#[derive(Debug, Clone)]
pub struct AppliedAction<A> {
    /// Kind of the intent whose listener put the action.
    pub kind: IntentKind,
    /// Generation of that listener.
    pub generation: Generation,
    /// Whether the reducer reported a state change.
    pub changed: bool,
    /// The action itself.
    pub action: A,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FetchAll;
    struct CreateOne;

    #[test]
    fn kinds_compare_by_type() {
        assert_eq!(IntentKind::of::<FetchAll>(), IntentKind::of::<FetchAll>());
        assert_ne!(IntentKind::of::<FetchAll>(), IntentKind::of::<CreateOne>());
    }

    #[test]
    fn short_name_strips_module_path() {
        let kind = IntentKind::of::<CreateOne>();
        assert_eq!(kind.short_name(), "CreateOne");
        assert!(kind.name().ends_with("::CreateOne"));
        assert_eq!(kind.to_string(), "CreateOne");
    }

    #[test]
    fn generation_none_sentinel() {
        assert!(Generation::NONE.is_none());
        assert!(!Generation::new(1).is_none());
        assert!(Generation::new(2) > Generation::new(1));
        assert_eq!(Generation::new(3).to_string(), "#3");
    }
}
