//! Per-task technical design documents.
//!
//! [`codec`] converts a [`TaskDesignDocument`] to and from markdown,
//! [`diagram`] renders component graphs, and [`store`] persists documents
//! as `design.md` in the task's ticket directory.

pub mod codec;
pub mod diagram;
pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use codec::{format, parse};
pub use diagram::{generate_architecture_diagram, sanitize_for_mermaid};
pub use store::{DesignStore, DesignUpdate, PopulateSummary};

/// Placeholder written when a document has no overview.
pub const OVERVIEW_PLACEHOLDER: &str = "[Provide a high-level overview of the technical approach]";

/// Diagram used when a document has no architecture or no components.
pub const DEFAULT_ARCHITECTURE: &str = "graph TB\n    empty[No components defined]";

/// A component of the task's design.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescription {
    /// Component name; also the `###` heading.
    pub name: String,
    /// What the component is for.
    pub purpose: String,
    /// Interfaces the component exposes.
    pub interfaces: Vec<String>,
    /// Names of components or systems it depends on.
    pub dependencies: Vec<String>,
}

/// One row of the technical decisions table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalDecision {
    /// What was decided.
    pub decision: String,
    /// Why.
    pub rationale: String,
    /// Who or what the decision came from.
    pub source: String,
    /// When it was decided; `None` when absent or unparsable.
    pub date: Option<NaiveDate>,
    /// Marks decisions lifted from communications as candidates for an ADR.
    /// Stored as an `(ADR candidate)` suffix on the Source cell.
    #[serde(default)]
    pub adr_candidate: bool,
}

/// Structured view of a task's `design.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDesignDocument {
    /// Owning task. Supplied by the caller, never read from the markdown body.
    pub task_id: String,
    /// Document title.
    pub title: String,
    /// High-level overview.
    pub overview: String,
    /// Mermaid diagram body, without the code fence.
    pub architecture: String,
    /// Components in insertion order.
    pub components: Vec<ComponentDescription>,
    /// Decisions in insertion order.
    pub technical_decisions: Vec<TechnicalDecision>,
    /// Markdown links to related ADRs.
    pub related_adrs: Vec<String>,
    /// Stakeholder requirements in insertion order.
    pub stakeholder_requirements: Vec<String>,
    /// Time of the last persisted write.
    pub last_updated: Option<DateTime<Utc>>,
}

impl TaskDesignDocument {
    /// Creates the scaffold for a new task: placeholder text, empty collections.
    #[must_use]
    pub fn scaffold(task_id: &str) -> Self {
        Self {
            task_id: task_id.to_string(),
            title: task_id.to_string(),
            overview: OVERVIEW_PLACEHOLDER.to_string(),
            architecture: DEFAULT_ARCHITECTURE.to_string(),
            components: Vec::new(),
            technical_decisions: Vec::new(),
            related_adrs: Vec::new(),
            stakeholder_requirements: Vec::new(),
            last_updated: None,
        }
    }
}

/// Returns `true` when `text` carries no real content.
///
/// Empty text, a single bracketed template line, and the default diagram
/// all count as placeholders.
#[must_use]
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed == DEFAULT_ARCHITECTURE
        || (trimmed.starts_with('[') && trimmed.ends_with(']') && !trimmed.contains('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffold_is_all_placeholder() {
        let doc = TaskDesignDocument::scaffold("TASK-00001");
        assert_eq!(doc.title, "TASK-00001");
        assert!(is_placeholder(&doc.overview));
        assert!(is_placeholder(&doc.architecture));
        assert!(doc.components.is_empty());
        assert!(doc.technical_decisions.is_empty());
        assert!(doc.related_adrs.is_empty());
        assert!(doc.stakeholder_requirements.is_empty());
    }

    #[test]
    fn real_text_is_not_placeholder() {
        assert!(!is_placeholder("Token based auth with refresh rotation"));
        assert!(!is_placeholder("[ADR-0001](../../docs/decisions/0001.md) and more"));
        assert!(!is_placeholder("graph TB\n    api --> db"));
        assert!(is_placeholder("  [Describe the approach]  "));
    }
}
