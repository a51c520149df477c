//! ADR cross-reference resolution: finds ADRs that came from a given task.

use log::{debug, warn};

use super::{adr_paths, read_adr};
use crate::context::ServiceContext;
use crate::error::{IoResultExt, Result};

/// Returns markdown links to every ADR whose `**Source:**` equals `task_id`.
///
/// Links are relative to the task's ticket directory, e.g.
/// `[ADR-0003](../../docs/decisions/0003-use-jwt.md)`. The match is exact, not
/// a substring match. Files that cannot be read are logged and skipped; a
/// missing decisions directory yields no links.
///
/// # Errors
///
/// Returns an error if the decisions directory exists but cannot be listed.
pub fn find_related_adrs(ctx: &ServiceContext, task_id: &str) -> Result<Vec<String>> {
    let dir = ctx.layout.decisions_dir();
    let paths = adr_paths(ctx).io_context("list ADR directory", task_id, &dir)?;
    let ticket_dir = ctx.tickets.ticket_dir(task_id);

    let mut links = Vec::new();
    for path in paths {
        let adr = match read_adr(ctx, &path) {
            Ok(adr) => adr,
            Err(e) => {
                warn!("Skipping unreadable ADR {}: {e}", path.display());
                continue;
            }
        };
        if adr.source.as_deref() != Some(task_id) {
            continue;
        }
        debug!("{} references task {task_id}", adr.id);
        links.push(format!("[{}]({})", adr.id, ctx.layout.relative_link(&ticket_dir, &path)));
    }
    Ok(links)
}
