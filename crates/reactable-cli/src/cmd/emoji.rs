use crate::cmd::{Project, fail, parse_node_arg};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use anyhow::Result;
use clap::Args;
use reactable_core::error::ReactionError;
use reactable_core::model::node::NodeType;
use reactable_core::store::CustomEmojiRegistry;
use reactable_core::view::CustomEmojiView;
use std::io::Write;

#[derive(Args, Debug)]
pub struct EmojiArgs {
    /// Custom emoji UUID or global node id.
    pub id: String,
}

/// Execute `rx emoji <id>`.
///
/// # Errors
///
/// Returns an error if the id is invalid, the store is unavailable, or the
/// emoji is not registered.
pub fn run_emoji(args: &EmojiArgs, project: &Project, output: OutputMode) -> Result<()> {
    let id = parse_node_arg(&args.id, NodeType::CustomEmoji, output)?;
    let store = project.open_store(output)?;

    let emoji = match store.find_custom_emoji(id) {
        Ok(Some(emoji)) => CustomEmojiView::from(emoji),
        Ok(None) => return fail(output, ReactionError::CustomEmojiNotFound { id }),
        Err(e) => return fail(output, ReactionError::Store(e)),
    };

    render_mode(
        output,
        &emoji,
        |e, w| writeln!(w, "{}\t{}\t{}\t{}", e.id, e.name, e.image_url, e.iri),
        |e, w| {
            pretty_section(w, &e.name)?;
            pretty_kv(w, "id", e.id.to_string())?;
            pretty_kv(w, "node id", &e.node_id)?;
            pretty_kv(w, "image", &e.image_url)?;
            pretty_kv(w, "iri", &e.iri)
        },
    )
}
