//! Kernel module - infrastructure seams and wiring.

pub mod deps;
pub mod notifier;
pub mod test_dependencies;
pub mod tournament_kernel;
pub mod traits;

pub use deps::TournamentDeps;
pub use notifier::TracingNotifier;
pub use test_dependencies::{ApiCall, MockTournamentApi, RecordingNotifier, TestDependencies};
pub use tournament_kernel::TournamentKernel;
pub use traits::*;
