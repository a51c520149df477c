//! `dossier init` command.

use crate::context::ServiceContext;
use crate::design::DesignStore;

/// Execute the `init` command.
///
/// # Errors
///
/// Returns an error string if the ticket directory or document cannot be written.
pub fn run(ctx: &ServiceContext, task_id: &str) -> Result<(), String> {
    let store = DesignStore::new(ctx);
    let existed = store.exists(task_id);
    store.initialize(task_id).map_err(|e| e.to_string())?;

    let path = ctx.layout.display_relative(&store.design_path(task_id));
    if existed {
        println!("Design document already exists: {path}");
    } else {
        println!("Created {path}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context_at;

    #[test]
    fn init_is_repeatable() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        run(&ctx, "TASK-1").unwrap();
        run(&ctx, "TASK-1").unwrap();
        assert!(root.path().join("tickets/TASK-1/design.md").is_file());
    }
}
