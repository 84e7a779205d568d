//! Interaction services: the gate, the duplicate detector, the counter
//! updater and the orchestrator that composes them.

mod counters;
mod duplicates;
mod gate;
mod interactions;
mod reads;

pub use counters::{CounterError, CounterUpdater};
pub use duplicates::DuplicateDetector;
pub use gate::{BotGate, MIN_HUMAN_SCORE, require_token};
pub use interactions::{InteractionService, NewComment, NewLike, NewPost, Repositories};
