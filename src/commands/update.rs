//! `dossier update` command.

use crate::context::ServiceContext;
use crate::design::DesignStore;

/// Execute the `update` command.
///
/// # Errors
///
/// Returns an error string for an unknown section (before anything is
/// written), a missing document, or a failed write.
pub fn run(
    ctx: &ServiceContext,
    task_id: &str,
    section: &str,
    content: &str,
) -> Result<(), String> {
    DesignStore::new(ctx)
        .update_section(task_id, section, content)
        .map_err(|e| e.to_string())?;
    println!("Updated {} for {task_id}", section.trim().to_lowercase());
    Ok(())
}
