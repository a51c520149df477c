//! Conflict detection between a proposed change and recorded knowledge.
//!
//! Candidates come from ADRs, other tasks' design decisions, and wiki
//! requirements ([`sources`]). Each candidate is scored by lexical overlap
//! with the proposal ([`score`]) and flagged candidates become [`Conflict`]s
//! ([`engine`]).

pub mod engine;
pub mod score;
pub mod sources;

use std::fmt;

use serde::Serialize;

pub use engine::{check_for_conflicts, ConflictDetector};
pub use score::OverlapScorer;
pub use sources::{AdrSource, CandidateSource, DesignDecisionSource, WikiSource};

/// Kind of prior knowledge a proposal collides with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// An accepted architecture decision record.
    AdrViolation,
    /// A decision recorded in another task's design document.
    PreviousDecision,
    /// A requirement stated in the wiki.
    StakeholderRequirement,
}

impl ConflictType {
    /// Fixed severity for each conflict type.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::AdrViolation => Severity::High,
            Self::PreviousDecision => Severity::Medium,
            Self::StakeholderRequirement => Severity::Low,
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AdrViolation => "ADR violation",
            Self::PreviousDecision => "previous decision",
            Self::StakeholderRequirement => "stakeholder requirement",
        };
        f.write_str(label)
    }
}

/// How urgently a conflict should be reviewed. Orders `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Review before proceeding.
    High,
    /// Coordinate with the owner.
    Medium,
    /// Worth a look.
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(label)
    }
}

/// A proposed change to check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictContext {
    /// Task requesting the check. Its own decisions are never reported.
    pub task_id: String,
    /// Free-text description of the intended change.
    pub proposed_changes: String,
    /// Paths the change is expected to touch.
    pub affected_files: Vec<String>,
}

/// A flagged overlap between the proposal and one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    /// Kind of knowledge that was matched.
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// ADR ID, task ID, or wiki path the candidate came from.
    pub source: String,
    /// What overlaps, naming the terms and the source.
    pub description: String,
    /// Suggested next step.
    pub recommendation: String,
    /// Derived from `conflict_type`.
    pub severity: Severity,
    /// Overlapping terms, sorted.
    pub matched_terms: Vec<String>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {} ({})", self.severity, self.conflict_type, self.source)?;
        writeln!(f, "  {}", self.description)?;
        write!(f, "  -> {}", self.recommendation)
    }
}

/// One unit of prior knowledge considered during detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Kind of knowledge.
    pub conflict_type: ConflictType,
    /// ADR ID, task ID, or wiki path.
    pub source: String,
    /// Short human-readable name of the item (ADR title, decision, requirement).
    pub label: String,
    /// Text scored against the proposal.
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_is_fixed_per_type() {
        assert_eq!(ConflictType::AdrViolation.severity(), Severity::High);
        assert_eq!(ConflictType::PreviousDecision.severity(), Severity::Medium);
        assert_eq!(ConflictType::StakeholderRequirement.severity(), Severity::Low);
    }

    #[test]
    fn high_sorts_first() {
        let mut severities = vec![Severity::Low, Severity::High, Severity::Medium];
        severities.sort();
        assert_eq!(severities, vec![Severity::High, Severity::Medium, Severity::Low]);
    }

    #[test]
    fn conflict_serializes_with_snake_case_enums() {
        let conflict = Conflict {
            conflict_type: ConflictType::PreviousDecision,
            source: "TASK-1".to_string(),
            description: "d".to_string(),
            recommendation: "r".to_string(),
            severity: Severity::Medium,
            matched_terms: vec!["cache".to_string()],
        };
        let json = serde_json::to_value(&conflict).unwrap();
        assert_eq!(json["type"], "previous_decision");
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["matched_terms"][0], "cache");
    }
}
