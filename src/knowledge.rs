//! Learnings extracted from a design document.
//!
//! Template text left over from initialization is treated as absent, so a
//! freshly scaffolded document summarizes to nothing.

use serde::Serialize;

use crate::design::{is_placeholder, TaskDesignDocument, TechnicalDecision};

/// Substantive content of one task's design document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgeSummary {
    /// Owning task.
    pub task_id: String,
    /// Document title.
    pub title: String,
    /// Overview, unless it is still placeholder text.
    pub overview: Option<String>,
    /// Architecture diagram, unless it is the default.
    pub architecture: Option<String>,
    /// Component names.
    pub components: Vec<String>,
    /// Every recorded decision.
    pub decisions: Vec<TechnicalDecision>,
    /// Decisions flagged as ADR candidates.
    pub adr_candidates: Vec<String>,
    /// Stakeholder requirements.
    pub requirements: Vec<String>,
}

impl KnowledgeSummary {
    /// `true` when the document has nothing worth extracting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overview.is_none()
            && self.architecture.is_none()
            && self.components.is_empty()
            && self.decisions.is_empty()
            && self.requirements.is_empty()
    }
}

/// Summarizes `doc`, mapping placeholder overview and architecture to `None`.
#[must_use]
pub fn summarize(doc: &TaskDesignDocument) -> KnowledgeSummary {
    let substantive = |text: &str| (!is_placeholder(text)).then(|| text.trim().to_string());

    KnowledgeSummary {
        task_id: doc.task_id.clone(),
        title: doc.title.clone(),
        overview: substantive(&doc.overview),
        architecture: substantive(&doc.architecture),
        components: doc.components.iter().map(|c| c.name.clone()).collect(),
        decisions: doc
            .technical_decisions
            .iter()
            .filter(|d| !d.decision.trim().is_empty())
            .cloned()
            .collect(),
        adr_candidates: doc
            .technical_decisions
            .iter()
            .filter(|d| d.adr_candidate)
            .map(|d| d.decision.clone())
            .collect(),
        requirements: doc.stakeholder_requirements.clone(),
    }
}
