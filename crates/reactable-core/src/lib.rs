//! reactable-core library.
//!
//! Groups a reactable subject's cached reaction counts by symbol, resolves
//! each group's concrete kind, and pages through the actors behind a group.
//!
//! # Conventions
//!
//! - **Errors**: typed [`error::ReactionError`] on the resolution path,
//!   `anyhow::Result` at store and config boundaries.
//! - **Logging**: `tracing` macros (`debug!` for query windows, `warn!` for
//!   clamped page sizes and failed fields).

pub mod classify;
pub mod config;
pub mod error;
pub mod group;
pub mod model;
pub mod pagination;
pub mod reactors;
pub mod resolve;
pub mod store;
pub mod view;

pub use classify::{ReactionSymbol, classify};
pub use error::{ErrorCode, ReactionError};
pub use group::{ReactionGroup, reaction_groups};
pub use pagination::{Connection, ConnectionArgs, PageLimits};
pub use reactors::reactors;
pub use resolve::{GroupType, resolve_custom_emoji, resolve_type};
pub use view::{ResolveContext, ResolveOptions, Resolved, resolve_subject};
