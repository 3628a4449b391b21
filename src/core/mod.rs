//! Game-agnostic building blocks: seats, the dice source, narration.

pub mod narration;
pub mod player;
pub mod rng;

pub use narration::LogEntry;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, SPECULATIVE_SEED};
