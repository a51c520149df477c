//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `dossier`.
#[derive(Debug, Parser)]
#[command(name = "dossier", version, about = "Design documents, ADR links and conflict checks")]
pub struct Cli {
    /// Workspace root containing `tickets/` and `docs/`.
    #[arg(long, global = true, env = "DOSSIER_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a design document scaffold for a task.
    Init {
        /// Task ID, e.g. TASK-00021.
        task_id: String,
    },
    /// Print a task's design document.
    Show {
        /// Task ID.
        task_id: String,
    },
    /// Replace or append to one section of a design document.
    Update {
        /// Task ID.
        task_id: String,
        /// One of overview, architecture, decisions, components.
        #[arg(long)]
        section: String,
        /// New text for the section, or the entry to append.
        #[arg(long)]
        content: String,
    },
    /// Merge requirements, decisions and related ADRs into the design document.
    Populate {
        /// Task ID.
        task_id: String,
    },
    /// Print a Mermaid diagram of the task's components.
    Diagram {
        /// Task ID.
        task_id: String,
    },
    /// List ADRs whose source is the task.
    Adrs {
        /// Task ID.
        task_id: String,
    },
    /// Check a proposed change against recorded knowledge.
    Check {
        /// Task proposing the change.
        task_id: String,
        /// Description of the change.
        #[arg(long)]
        changes: String,
        /// A path the change touches. Repeatable.
        #[arg(long = "file")]
        files: Vec<String>,
        /// Print conflicts as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Summarize what a task's design document has learned.
    Learnings {
        /// Task ID.
        task_id: String,
        /// Print the summary as JSON.
        #[arg(long)]
        json: bool,
    },
}
