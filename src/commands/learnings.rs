//! `dossier learnings` command.

use std::fmt::Write as _;

use crate::context::ServiceContext;
use crate::design::DesignStore;
use crate::knowledge::{summarize, KnowledgeSummary};

/// Execute the `learnings` command.
///
/// # Errors
///
/// Returns an error string if the document cannot be loaded or JSON output fails.
pub fn run(ctx: &ServiceContext, task_id: &str, json: bool) -> Result<(), String> {
    let doc = DesignStore::new(ctx).get(task_id).map_err(|e| e.to_string())?;
    let summary = summarize(&doc);

    if json {
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {e}"))?;
        println!("{out}");
    } else {
        print!("{}", render(&summary));
    }
    Ok(())
}

fn render(summary: &KnowledgeSummary) -> String {
    let mut out = format!("{}: {}\n", summary.task_id, summary.title);
    if summary.is_empty() {
        out.push_str("No learnings recorded yet.\n");
        return out;
    }

    if let Some(overview) = &summary.overview {
        let _ = write!(out, "\nOverview:\n  {overview}\n");
    }
    if !summary.components.is_empty() {
        let _ = write!(out, "\nComponents: {}\n", summary.components.join(", "));
    }
    if !summary.decisions.is_empty() {
        out.push_str("\nDecisions:\n");
        for decision in &summary.decisions {
            let marker = if decision.adr_candidate {
                " (ADR candidate)"
            } else {
                ""
            };
            let _ = writeln!(out, "  - {}{marker}", decision.decision);
        }
    }
    if !summary.requirements.is_empty() {
        out.push_str("\nRequirements:\n");
        for requirement in &summary.requirements {
            let _ = writeln!(out, "  - {requirement}");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::context_at;
    use crate::design::{DesignUpdate, TaskDesignDocument};

    #[test]
    fn render_scaffold() {
        let summary = summarize(&TaskDesignDocument::scaffold("TASK-1"));
        assert_eq!(render(&summary), "TASK-1: TASK-1\nNo learnings recorded yet.\n");
    }

    #[test]
    fn render_with_content() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        let store = DesignStore::new(&ctx);
        store.initialize("TASK-1").unwrap();
        store.update("TASK-1", DesignUpdate::Overview("Token auth".to_string())).unwrap();
        store.update("TASK-1", DesignUpdate::AppendDecision("Use JWT".to_string())).unwrap();

        let out = render(&summarize(&store.get("TASK-1").unwrap()));
        assert!(out.contains("Overview:\n  Token auth"));
        assert!(out.contains("  - Use JWT\n"));
        assert!(run(&ctx, "TASK-1", true).is_ok());
    }
}
