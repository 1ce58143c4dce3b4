use std::fmt;

use uuid::Uuid;

use crate::pagination::cursor::CursorDecodeError;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    SubjectNotFound,
    CustomEmojiNotFound,
    InvalidCursor,
    InvalidPaginationArgs,
    GroupNotFound,
    CorruptStore,
    StoreReadFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::SubjectNotFound => "E2001",
            Self::CustomEmojiNotFound => "E2002",
            Self::InvalidCursor => "E2003",
            Self::InvalidPaginationArgs => "E2004",
            Self::GroupNotFound => "E2005",
            Self::CorruptStore => "E3001",
            Self::StoreReadFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Reaction store not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::SubjectNotFound => "Reactable subject not found",
            Self::CustomEmojiNotFound => "Custom emoji not found",
            Self::InvalidCursor => "Invalid pagination cursor",
            Self::InvalidPaginationArgs => "Invalid pagination arguments",
            Self::GroupNotFound => "Reaction group not found",
            Self::CorruptStore => "Corrupt reaction store",
            Self::StoreReadFailed => "Reaction store read failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `rx init` to create the reaction store."),
            Self::ConfigParseError => Some("Fix syntax in .reactable/config.toml and retry."),
            Self::SubjectNotFound => None,
            Self::CustomEmojiNotFound => {
                Some("The subject references a custom emoji missing from the registry.")
            }
            Self::InvalidCursor => Some("Pass a cursor returned by a previous page unchanged."),
            Self::InvalidPaginationArgs => {
                Some("Use either --first/--after or --last/--before, not both.")
            }
            Self::GroupNotFound => Some("Run `rx groups <subject>` to list its symbols."),
            Self::CorruptStore => Some("Re-create the store with `rx init` and re-import."),
            Self::StoreReadFailed => Some("Retry once the store is reachable."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failures raised while resolving reaction groups and reactor pages.
///
/// Each variant is scoped to the single field that raised it; callers
/// resolving several fields keep going after one of them fails.
#[derive(Debug, thiserror::Error)]
pub enum ReactionError {
    #[error("custom emoji not found: {id}")]
    CustomEmojiNotFound { id: Uuid },

    #[error("subject not found: {id}")]
    SubjectNotFound { id: Uuid },

    #[error("invalid cursor: {0}")]
    InvalidCursor(#[from] CursorDecodeError),

    #[error("invalid pagination arguments: {reason}")]
    InvalidPaginationArgs { reason: &'static str },

    #[error("unknown reaction group type '{0}'")]
    UnknownGroupType(String),

    /// Store failure, passed through unchanged. No retry at this layer.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ReactionError {
    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CustomEmojiNotFound { .. } => ErrorCode::CustomEmojiNotFound,
            Self::SubjectNotFound { .. } => ErrorCode::SubjectNotFound,
            Self::InvalidCursor(_) => ErrorCode::InvalidCursor,
            Self::InvalidPaginationArgs { .. } => ErrorCode::InvalidPaginationArgs,
            Self::UnknownGroupType(_) => ErrorCode::InternalUnexpected,
            Self::Store(_) => ErrorCode::StoreReadFailed,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
