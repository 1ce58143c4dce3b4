//! Reactor listings for a single reaction group.

use tracing::debug;

use crate::error::ReactionError;
use crate::group::ReactionGroup;
use crate::model::Actor;
use crate::pagination::{ConnectionArgs, Connection, PageLimits, Window};
use crate::store::{ReactionQuery, ReactionStore};

/// Page through the actors who contributed to `group`.
///
/// Issues exactly one read against `store`: the group's filter composed
/// with the window derived from `args`. `total_count` is the group's cached
/// count, not a recount, so it may disagree with the rows actually stored
/// while writes are in flight. A group whose records have all been deleted
/// still reports its stale count alongside an empty page.
///
/// # Errors
///
/// Returns [`ReactionError::InvalidPaginationArgs`] or
/// [`ReactionError::InvalidCursor`] for bad arguments, and
/// [`ReactionError::Store`] with the store's error unchanged.
pub fn reactors<S>(
    group: &ReactionGroup<'_>,
    args: &ConnectionArgs,
    store: &S,
    limits: PageLimits,
) -> Result<Connection<Actor>, ReactionError>
where
    S: ReactionStore + ?Sized,
{
    let window = Window::from_args(args, limits)?;
    let query = ReactionQuery::new(group.filter().clone(), window);

    debug!(
        subject = %query.filter.subject_id,
        symbol = %group.symbol(),
        direction = ?query.window.direction,
        limit = query.window.fetch_limit(),
        "fetching reactor page"
    );

    let rows = store.find_reactors(&query)?;
    let rows = rows.into_iter().map(|row| (row.key, row.actor)).collect();

    Ok(query.window.into_connection(rows, group.count()))
}
