//! `dossier populate` command.

use crate::context::ServiceContext;
use crate::design::DesignStore;

/// Execute the `populate` command.
///
/// # Errors
///
/// Returns an error string if the document is missing or communications,
/// ADRs or the write fail.
pub fn run(ctx: &ServiceContext, task_id: &str) -> Result<(), String> {
    let summary = DesignStore::new(ctx).populate_from_context(task_id).map_err(|e| e.to_string())?;
    println!(
        "Populated {task_id}: {} requirement(s), {} decision(s), {} ADR link(s) added",
        summary.requirements_added, summary.decisions_added, summary.adrs_added
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context_at;

    #[test]
    fn populate_requires_document() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        assert!(run(&ctx, "TASK-1").is_err());

        DesignStore::new(&ctx).initialize("TASK-1").unwrap();
        assert!(run(&ctx, "TASK-1").is_ok());
    }
}
