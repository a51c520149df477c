//! `dossier adrs` command.

use crate::adr::find_related_adrs;
use crate::context::ServiceContext;

/// Execute the `adrs` command: lists links to ADRs sourced from the task.
///
/// # Errors
///
/// Returns an error string if the decisions directory cannot be listed.
pub fn run(ctx: &ServiceContext, task_id: &str) -> Result<(), String> {
    let links = find_related_adrs(ctx, task_id).map_err(|e| e.to_string())?;
    if links.is_empty() {
        println!("No ADRs reference {task_id}.");
    } else {
        for link in &links {
            println!("{link}");
        }
    }
    Ok(())
}
