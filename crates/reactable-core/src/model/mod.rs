//! Domain types read by the aggregation and pagination layers.

pub mod actor;
pub mod custom_emoji;
pub mod node;
pub mod reaction;
pub mod subject;

pub use actor::Actor;
pub use custom_emoji::CustomEmoji;
pub use reaction::Reaction;
pub use subject::{ReactableSubject, ReactionCounts};
