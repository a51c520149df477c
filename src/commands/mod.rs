//! Command dispatch and handlers.

pub mod adrs;
pub mod check;
pub mod diagram;
pub mod init;
pub mod learnings;
pub mod populate;
pub mod show;
pub mod update;

use std::path::Path;

use log::debug;

use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// Settings are loaded from the workspace at `root` and a live context is
/// built for the duration of the command.
///
/// # Errors
///
/// Returns an error string if settings cannot be loaded or the selected
/// command handler fails.
pub fn dispatch(root: &Path, command: &Command) -> Result<(), String> {
    let settings = Settings::load(root).map_err(|e| e.to_string())?;
    debug!("Loaded settings: {settings:?}");
    let ctx = ServiceContext::live(settings);
    dispatch_with_context(command, &ctx)
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Init { task_id } => init::run(ctx, task_id),
        Command::Show { task_id } => show::run(ctx, task_id),
        Command::Update { task_id, section, content } => {
            update::run(ctx, task_id, section, content)
        }
        Command::Populate { task_id } => populate::run(ctx, task_id),
        Command::Diagram { task_id } => diagram::run(ctx, task_id),
        Command::Adrs { task_id } => adrs::run(ctx, task_id),
        Command::Check { task_id, changes, files, json } => {
            check::run(ctx, task_id, changes, files, *json)
        }
        Command::Learnings { task_id, json } => learnings::run(ctx, task_id, *json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_reports_invalid_settings() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(".dossier.yaml"), "min_shared_terms: lots\n").unwrap();

        let command = Command::Show {
            task_id: "TASK-1".to_string(),
        };
        let err = dispatch(root.path(), &command).unwrap_err();
        assert!(err.contains("Configuration error"), "{err}");
    }

    #[test]
    fn dispatch_runs_against_root() {
        let root = tempfile::tempdir().unwrap();
        let command = Command::Init {
            task_id: "TASK-1".to_string(),
        };
        dispatch(root.path(), &command).unwrap();
        assert!(root.path().join("tickets/TASK-1/design.md").is_file());
    }
}
