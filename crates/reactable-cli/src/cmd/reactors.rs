use crate::cmd::{Project, fail, load_subject, parse_node_arg};
use crate::output::{CliError, OutputMode, pretty_section, render_mode, report};
use anyhow::Result;
use clap::Args;
use reactable_core::classify::ReactionSymbol;
use reactable_core::error::ErrorCode;
use reactable_core::group::find_group;
use reactable_core::model::Actor;
use reactable_core::model::node::{self, NodeType};
use reactable_core::pagination::{Connection, ConnectionArgs};
use reactable_core::reactors;
use reactable_core::resolve::{GroupType, resolve_type};
use reactable_core::store::sqlite::query;
use serde::Serialize;
use std::io::Write;
use tracing::debug;
use uuid::Uuid;

#[derive(Args, Debug)]
pub struct ReactorsArgs {
    /// Subject UUID or global node id.
    pub subject: String,

    /// Emoji, custom emoji UUID, or custom emoji node id.
    pub symbol: String,

    /// Page forward: number of reactors after `--after`.
    #[arg(long, value_name = "N")]
    pub first: Option<u32>,

    /// Cursor to page forward from.
    #[arg(long, value_name = "CURSOR")]
    pub after: Option<String>,

    /// Page backward: number of reactors before `--before`.
    #[arg(long, value_name = "N")]
    pub last: Option<u32>,

    /// Cursor to page backward from.
    #[arg(long, value_name = "CURSOR")]
    pub before: Option<String>,
}

impl ReactorsArgs {
    fn connection_args(&self) -> ConnectionArgs {
        ConnectionArgs {
            first: self.first,
            after: self.after.clone(),
            last: self.last,
            before: self.before.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ReactorsReport {
    subject_id: Uuid,
    #[serde(rename = "type")]
    group_type: GroupType,
    symbol: ReactionSymbol,
    #[serde(flatten)]
    page: Connection<Actor>,
    /// Live record count, when it differs from the cached `total_count`.
    #[serde(skip_serializing_if = "Option::is_none")]
    stored_count: Option<u64>,
}

/// Count-map key for a symbol argument. Custom emoji node ids are unwrapped
/// to the UUID key; anything else is taken literally.
fn group_key(symbol: &str) -> String {
    match node::decode(symbol) {
        Ok((NodeType::CustomEmoji, id)) => id.to_string(),
        _ => symbol.to_string(),
    }
}

/// Execute `rx reactors <subject> <symbol>`.
///
/// # Errors
///
/// Returns an error if the ids are invalid, the store is unavailable, the
/// subject has no such group, or the pagination arguments are rejected.
pub fn run_reactors(args: &ReactorsArgs, project: &Project, output: OutputMode) -> Result<()> {
    let id = parse_node_arg(&args.subject, NodeType::Post, output)?;
    let store = project.open_store(output)?;
    let subject = load_subject(&store, id, output)?;

    let key = group_key(&args.symbol);
    let Some(group) = find_group(&subject, &key) else {
        return report(
            output,
            CliError::coded(
                ErrorCode::GroupNotFound,
                format!("subject {id} has no '{}' reactions", args.symbol),
            ),
        );
    };

    let page = match reactors(
        &group,
        &args.connection_args(),
        &store,
        project.config.pagination,
    ) {
        Ok(page) => page,
        Err(e) => return fail(output, e),
    };

    let stored_count = match query::count_reactions(store.connection(), id, &group.filter().symbol)
    {
        Ok(count) => Some(count).filter(|count| *count != page.total_count),
        Err(e) => {
            debug!(error = %e, "live reaction count unavailable");
            None
        }
    };

    let report = ReactorsReport {
        subject_id: id,
        group_type: resolve_type(&group),
        symbol: group.symbol(),
        page,
        stored_count,
    };

    render_mode(
        output,
        &report,
        |r, w| {
            for edge in &r.page.edges {
                writeln!(w, "{}  {}  {}", edge.node.id, edge.node.username, edge.cursor)?;
            }
            if r.page.page_info.has_next_page
                && let Some(cursor) = &r.page.page_info.end_cursor
            {
                writeln!(w, "next  {cursor}")?;
            }
            Ok(())
        },
        |r, w| {
            pretty_section(
                w,
                &format!(
                    "{} reactors ({} shown, {} total)",
                    r.symbol,
                    r.page.edges.len(),
                    r.page.total_count
                ),
            )?;
            if let Some(stored) = r.stored_count {
                writeln!(w, "note: cached count is stale, {stored} records stored")?;
            }
            for actor in r.page.nodes() {
                writeln!(w, "  @{:<20} {}", actor.username, actor.display_name())?;
            }
            if r.page.page_info.has_next_page
                && let Some(cursor) = &r.page.page_info.end_cursor
            {
                writeln!(w, "more: --after {cursor}")?;
            }
            if r.page.page_info.has_previous_page
                && let Some(cursor) = &r.page.page_info.start_cursor
            {
                writeln!(w, "earlier: --before {cursor}")?;
            }
            Ok(())
        },
    )
}
