//! `dossier check` command.

use std::fmt::Write as _;

use crate::conflict::{check_for_conflicts, Conflict, ConflictContext};
use crate::context::ServiceContext;

/// Execute the `check` command.
///
/// Prints each conflict, or `[]` / a short notice when there are none.
/// Finding conflicts is not a failure.
///
/// # Errors
///
/// Returns an error string if the corpus cannot be read or JSON output fails.
pub fn run(
    ctx: &ServiceContext,
    task_id: &str,
    changes: &str,
    files: &[String],
    json: bool,
) -> Result<(), String> {
    let request = ConflictContext {
        task_id: task_id.to_string(),
        proposed_changes: changes.to_string(),
        affected_files: files.to_vec(),
    };
    let conflicts = check_for_conflicts(ctx, &request).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&conflicts)
            .map_err(|e| format!("Failed to serialize conflicts: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", render(task_id, &conflicts));
    }
    Ok(())
}

fn render(task_id: &str, conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return format!("No conflicts found for {task_id}.\n");
    }
    let mut out = format!("{} potential conflict(s) for {task_id}:\n", conflicts.len());
    for conflict in conflicts {
        let _ = write!(out, "\n{conflict}\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{ConflictType, Severity};
    use crate::context::testing::context_at;

    #[test]
    fn render_empty() {
        assert_eq!(render("TASK-1", &[]), "No conflicts found for TASK-1.\n");
    }

    #[test]
    fn render_lists_conflicts() {
        let conflict = Conflict {
            conflict_type: ConflictType::AdrViolation,
            source: "ADR-0001".to_string(),
            description: "Proposal overlaps ADR-0001".to_string(),
            recommendation: "Review ADR-0001".to_string(),
            severity: Severity::High,
            matched_terms: vec!["postgres".to_string(), "storage".to_string()],
        };
        let out = render("TASK-2", &[conflict]);
        assert!(out.starts_with("1 potential conflict(s) for TASK-2:"));
        assert!(out.contains("[high] ADR violation (ADR-0001)"));
        assert!(out.contains("-> Review ADR-0001"));
    }

    #[test]
    fn check_on_empty_workspace() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        assert!(run(&ctx, "TASK-1", "Rewrite billing exports", &[], true).is_ok());
    }
}
