//! `dossier diagram` command.

use crate::context::ServiceContext;
use crate::design::DesignStore;

/// Execute the `diagram` command. Prints the Mermaid source without a fence.
///
/// # Errors
///
/// Returns an error string if the document cannot be loaded.
pub fn run(ctx: &ServiceContext, task_id: &str) -> Result<(), String> {
    let diagram =
        DesignStore::new(ctx).generate_architecture_diagram(task_id).map_err(|e| e.to_string())?;
    println!("{diagram}");
    Ok(())
}
