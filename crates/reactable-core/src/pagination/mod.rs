//! Cursor pagination primitives shared by reactor listings.
//!
//! Arguments follow the usual connection convention: `first`/`after` page
//! forward, `last`/`before` page backward. A request is turned into a
//! [`Window`] (direction, cursor boundary, page size), the store fetches one
//! row past the page size, and [`Window::into_connection`] trims that
//! sentinel row off to derive `has_next_page`/`has_previous_page`.
//!
//! `total_count` on a [`Connection`] is supplied by the caller and is never
//! derived from the fetched rows.

pub mod cursor;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ReactionError;
use cursor::CursorKey;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

/// Page size bounds applied to every connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    /// Page size used when neither `first` nor `last` is given.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Requested sizes above this are clamped.
    #[serde(default = "max_page_size")]
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn max_page_size() -> u32 {
    MAX_PAGE_SIZE
}

/// Raw connection arguments as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionArgs {
    pub first: Option<u32>,
    pub after: Option<String>,
    pub last: Option<u32>,
    pub before: Option<String>,
}

impl ConnectionArgs {
    /// Forward page of `first` items.
    #[must_use]
    pub const fn first(first: u32) -> Self {
        Self {
            first: Some(first),
            after: None,
            last: None,
            before: None,
        }
    }

    /// Backward page of `last` items.
    #[must_use]
    pub const fn last(last: u32) -> Self {
        Self {
            first: None,
            after: None,
            last: Some(last),
            before: None,
        }
    }

    #[must_use]
    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    #[must_use]
    pub fn before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending sort key, rows after the boundary.
    Forward,
    /// Descending sort key, rows before the boundary.
    Backward,
}

/// Validated pagination window for a single store read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub direction: Direction,
    /// Exclusive boundary decoded from `after`/`before`.
    pub boundary: Option<CursorKey>,
    pub page_size: u32,
}

impl Window {
    /// Validate connection arguments and build the window.
    ///
    /// # Errors
    ///
    /// Returns [`ReactionError::InvalidPaginationArgs`] for contradictory
    /// arguments and [`ReactionError::InvalidCursor`] for undecodable
    /// cursors.
    pub fn from_args(args: &ConnectionArgs, limits: PageLimits) -> Result<Self, ReactionError> {
        if args.first.is_some() && args.last.is_some() {
            return Err(ReactionError::InvalidPaginationArgs {
                reason: "first and last cannot be combined",
            });
        }
        if args.after.is_some() && args.before.is_some() {
            return Err(ReactionError::InvalidPaginationArgs {
                reason: "after and before cannot be combined",
            });
        }

        let backward = args.last.is_some() || (args.first.is_none() && args.before.is_some());
        let (direction, requested, cursor) = if backward {
            (Direction::Backward, args.last, args.before.as_deref())
        } else {
            if args.before.is_some() {
                return Err(ReactionError::InvalidPaginationArgs {
                    reason: "before requires last",
                });
            }
            (Direction::Forward, args.first, args.after.as_deref())
        };
        if backward && args.after.is_some() {
            return Err(ReactionError::InvalidPaginationArgs {
                reason: "after requires first",
            });
        }

        let requested = requested.unwrap_or(limits.default_page_size);
        let page_size = if requested > limits.max_page_size {
            warn!(
                requested,
                max = limits.max_page_size,
                "page size exceeds limit, clamping"
            );
            limits.max_page_size
        } else {
            requested
        };

        let boundary = cursor.map(CursorKey::decode).transpose()?;

        Ok(Self {
            direction,
            boundary,
            page_size,
        })
    }

    /// Rows the store should fetch: the page plus one sentinel row.
    #[must_use]
    pub const fn fetch_limit(&self) -> u32 {
        self.page_size.saturating_add(1)
    }

    /// Assemble a connection from rows fetched in window order.
    ///
    /// `rows` must be sorted ascending for forward windows and descending
    /// for backward windows. Edges come back ascending either way.
    #[must_use]
    pub fn into_connection<T>(self, rows: Vec<(CursorKey, T)>, total_count: u64) -> Connection<T> {
        let page_size = usize::try_from(self.page_size).unwrap_or(usize::MAX);
        let has_more = rows.len() > page_size;

        let mut edges: Vec<Edge<T>> = rows
            .into_iter()
            .take(page_size)
            .map(|(key, node)| Edge {
                cursor: key.encode(),
                node,
            })
            .collect();

        let from_cursor = self.boundary.is_some();
        let (has_next_page, has_previous_page) = match self.direction {
            Direction::Forward => (has_more, from_cursor),
            Direction::Backward => {
                edges.reverse();
                (from_cursor, has_more)
            }
        };

        let page_info = PageInfo {
            has_next_page,
            has_previous_page,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };

        Connection {
            total_count,
            edges,
            page_info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge<T> {
    pub cursor: String,
    pub node: T,
}

/// One page of a connection.
///
/// `total_count` and `edges` come from independent sources and are not
/// transactionally tied: under concurrent writes the count may disagree
/// with what the page (or a full traversal) returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Connection<T> {
    pub total_count: u64,
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
}

impl<T> Connection<T> {
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use uuid::Uuid;

    fn key(n: i64) -> CursorKey {
        CursorKey::new(n, Uuid::from_u128(u128::from(n.unsigned_abs())))
    }

    fn rows(range: impl Iterator<Item = i64>) -> Vec<(CursorKey, i64)> {
        range.map(|n| (key(n), n)).collect()
    }

    #[test]
    fn no_args_pages_forward_with_default_size() {
        let window = Window::from_args(&ConnectionArgs::default(), PageLimits::default()).unwrap();
        assert_eq!(window.direction, Direction::Forward);
        assert_eq!(window.page_size, 20);
        assert_eq!(window.fetch_limit(), 21);
        assert!(window.boundary.is_none());
    }

    #[test]
    fn oversized_pages_are_clamped() {
        let window =
            Window::from_args(&ConnectionArgs::first(5_000), PageLimits::default()).unwrap();
        assert_eq!(window.page_size, 100);
    }

    #[test]
    fn contradictory_args_are_rejected() {
        let both = ConnectionArgs {
            first: Some(1),
            last: Some(1),
            ..ConnectionArgs::default()
        };
        let err = Window::from_args(&both, PageLimits::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaginationArgs);

        let mixed = ConnectionArgs::first(1).before(key(1).encode());
        let err = Window::from_args(&mixed, PageLimits::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaginationArgs);

        let mixed = ConnectionArgs::last(1).after(key(1).encode());
        let err = Window::from_args(&mixed, PageLimits::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidPaginationArgs);
    }

    #[test]
    fn bad_cursor_is_rejected() {
        let args = ConnectionArgs::first(2).after("garbage!");
        let err = Window::from_args(&args, PageLimits::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCursor);
    }

    #[test]
    fn before_without_last_pages_backward() {
        let args = ConnectionArgs::default().before(key(3).encode());
        let window = Window::from_args(&args, PageLimits::default()).unwrap();
        assert_eq!(window.direction, Direction::Backward);
        assert_eq!(window.boundary, Some(key(3)));
    }

    #[test]
    fn forward_sentinel_sets_has_next_page() {
        let window = Window::from_args(&ConnectionArgs::first(2), PageLimits::default()).unwrap();
        let connection = window.into_connection(rows(1..=3), 5);

        assert_eq!(connection.total_count, 5);
        assert_eq!(connection.nodes().copied().collect::<Vec<_>>(), [1, 2]);
        assert!(connection.page_info.has_next_page);
        assert!(!connection.page_info.has_previous_page);
        assert_eq!(connection.page_info.start_cursor, Some(key(1).encode()));
        assert_eq!(connection.page_info.end_cursor, Some(key(2).encode()));
    }

    #[test]
    fn forward_from_cursor_reports_previous_page() {
        let args = ConnectionArgs::first(2).after(key(2).encode());
        let window = Window::from_args(&args, PageLimits::default()).unwrap();
        let connection = window.into_connection(rows(3..=4), 4);

        assert!(!connection.page_info.has_next_page);
        assert!(connection.page_info.has_previous_page);
    }

    #[test]
    fn backward_rows_are_returned_ascending() {
        let window = Window::from_args(&ConnectionArgs::last(2), PageLimits::default()).unwrap();
        let connection = window.into_connection(rows((3..=5).rev()), 5);

        assert_eq!(connection.nodes().copied().collect::<Vec<_>>(), [4, 5]);
        assert!(connection.page_info.has_previous_page);
        assert!(!connection.page_info.has_next_page);
        assert_eq!(connection.page_info.start_cursor, Some(key(4).encode()));
    }

    #[test]
    fn empty_page_keeps_stale_total() {
        let window = Window::from_args(&ConnectionArgs::first(10), PageLimits::default()).unwrap();
        let connection = window.into_connection(Vec::<(CursorKey, i64)>::new(), 3);

        assert_eq!(connection.total_count, 3);
        assert!(connection.edges.is_empty());
        assert!(!connection.page_info.has_next_page);
        assert_eq!(connection.page_info.start_cursor, None);
    }

    #[test]
    fn zero_first_returns_no_edges() {
        let window = Window::from_args(&ConnectionArgs::first(0), PageLimits::default()).unwrap();
        assert_eq!(window.fetch_limit(), 1);
        let connection = window.into_connection(rows(1..=1), 1);
        assert!(connection.edges.is_empty());
        assert!(connection.page_info.has_next_page);
    }
}
