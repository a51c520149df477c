//! `dossier show` command.

use crate::context::ServiceContext;
use crate::design::{self, DesignStore};

/// Execute the `show` command: prints the task's design document in its
/// canonical markdown form.
///
/// # Errors
///
/// Returns an error string if the document is missing or unreadable.
pub fn run(ctx: &ServiceContext, task_id: &str) -> Result<(), String> {
    let doc = DesignStore::new(ctx).get(task_id).map_err(|e| e.to_string())?;
    print!("{}", design::format(&doc));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context_at;

    #[test]
    fn show_missing_document_errors() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        let err = run(&ctx, "TASK-404").unwrap_err();
        assert!(err.contains("not found"), "{err}");
    }

    #[test]
    fn show_existing_document() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        DesignStore::new(&ctx).initialize("TASK-1").unwrap();
        assert!(run(&ctx, "TASK-1").is_ok());
    }
}
