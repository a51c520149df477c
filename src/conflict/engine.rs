//! Conflict engine: scores every candidate against a proposal.

use std::collections::BTreeSet;

use log::{debug, info};

use super::score::OverlapScorer;
use super::sources::{AdrSource, CandidateSource, DesignDecisionSource, WikiSource};
use super::{Candidate, Conflict, ConflictContext, ConflictType};
use crate::context::ServiceContext;
use crate::error::Result;

/// Labels longer than this are shortened in descriptions.
const MAX_LABEL_CHARS: usize = 80;

/// Runs candidate sources and turns flagged candidates into conflicts.
pub struct ConflictDetector<'a> {
    ctx: &'a ServiceContext,
    scorer: OverlapScorer,
    sources: Vec<Box<dyn CandidateSource>>,
}

impl<'a> ConflictDetector<'a> {
    /// Detector over ADRs, other tasks' decisions and the wiki, scored with
    /// the context's settings.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            scorer: OverlapScorer::from_settings(&ctx.settings),
            sources: vec![
                Box::new(AdrSource),
                Box::new(DesignDecisionSource),
                Box::new(WikiSource),
            ],
        }
    }

    /// Replaces the candidate sources.
    #[must_use]
    pub fn with_sources(mut self, sources: Vec<Box<dyn CandidateSource>>) -> Self {
        self.sources = sources;
        self
    }

    /// Checks `request` against every source.
    ///
    /// Results are ordered by severity (high first), then source, then
    /// description, with exact duplicates removed. An empty corpus, or a
    /// proposal with no significant terms, yields no conflicts.
    ///
    /// # Errors
    ///
    /// Returns the first source error. Missing directories and documents are
    /// not errors.
    pub fn check(&self, request: &ConflictContext) -> Result<Vec<Conflict>> {
        let mut proposal = self.scorer.terms(&request.proposed_changes);
        proposal.extend(self.scorer.path_terms(&request.affected_files));
        if proposal.is_empty() {
            debug!("Proposal for {} has no significant terms", request.task_id);
            return Ok(Vec::new());
        }

        let mut conflicts = Vec::new();
        for source in &self.sources {
            let candidates = source.candidates(self.ctx, request)?;
            debug!("{} candidate(s) from {}", candidates.len(), source.name());
            conflicts.extend(candidates.iter().filter_map(|c| self.score(&proposal, c)));
        }

        conflicts.sort_by(|a, b| {
            (a.severity, &a.source, &a.description).cmp(&(b.severity, &b.source, &b.description))
        });
        conflicts.dedup();
        info!("Found {} potential conflict(s) for {}", conflicts.len(), request.task_id);
        Ok(conflicts)
    }

    fn score(&self, proposal: &BTreeSet<String>, candidate: &Candidate) -> Option<Conflict> {
        let matched_terms = self.scorer.shared_terms(proposal, &candidate.text);
        if !self.scorer.is_flagged(matched_terms.len()) {
            return None;
        }
        let label = shorten(&candidate.label);
        let terms = matched_terms.join(", ");
        let (description, recommendation) = match candidate.conflict_type {
            ConflictType::AdrViolation => (
                format!("Proposal overlaps {} \"{label}\" on: {terms}", candidate.source),
                format!(
                    "Review {} before proceeding; supersede it with a new ADR if the \
                     decision has to change",
                    candidate.source
                ),
            ),
            ConflictType::PreviousDecision => (
                format!(
                    "Proposal overlaps decision \"{label}\" recorded in {} on: {terms}",
                    candidate.source
                ),
                format!("Coordinate with the owner of {} before diverging", candidate.source),
            ),
            ConflictType::StakeholderRequirement => (
                format!(
                    "Proposal touches requirement \"{label}\" from {} on: {terms}",
                    candidate.source
                ),
                "Confirm the change still satisfies this requirement".to_string(),
            ),
        };
        Some(Conflict {
            conflict_type: candidate.conflict_type,
            source: candidate.source.clone(),
            description,
            recommendation,
            severity: candidate.conflict_type.severity(),
            matched_terms,
        })
    }
}

/// Checks a proposal with the default sources and the context's settings.
///
/// # Errors
///
/// See [`ConflictDetector::check`].
pub fn check_for_conflicts(
    ctx: &ServiceContext,
    request: &ConflictContext,
) -> Result<Vec<Conflict>> {
    ConflictDetector::new(ctx).check(request)
}

fn shorten(label: &str) -> String {
    let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label;
    }
    let mut short: String = label.chars().take(MAX_LABEL_CHARS - 3).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use proptest::prelude::*;

    use super::*;
    use crate::conflict::Severity;
    use crate::context::testing::context_at;
    use crate::design::{DesignStore, DesignUpdate};
    use crate::error::DossierError;

    fn request(task_id: &str, proposal: &str) -> ConflictContext {
        ConflictContext {
            task_id: task_id.to_string(),
            proposed_changes: proposal.to_string(),
            affected_files: Vec::new(),
        }
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn record_decision(ctx: &ServiceContext, task_id: &str, decision: &str) {
        let store = DesignStore::new(ctx);
        store.initialize(task_id).unwrap();
        store.update(task_id, DesignUpdate::AppendDecision(decision.to_string())).unwrap();
    }

    #[test]
    fn empty_corpus_has_no_conflicts() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        let conflicts =
            check_for_conflicts(&ctx, &request("TASK-1", "Replace Redis session caching")).unwrap();
        assert!(conflicts.is_empty());
    }

    #[test]
    fn own_decisions_are_excluded() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        record_decision(&ctx, "TASK-1", "Use Redis for session caching");

        let proposal = "Move session caching off Redis";
        assert!(check_for_conflicts(&ctx, &request("TASK-1", proposal)).unwrap().is_empty());

        let conflicts = check_for_conflicts(&ctx, &request("TASK-2", proposal)).unwrap();
        assert_eq!(conflicts.len(), 1);
        let conflict = &conflicts[0];
        assert_eq!(conflict.conflict_type, ConflictType::PreviousDecision);
        assert_eq!(conflict.severity, Severity::Medium);
        assert_eq!(conflict.source, "TASK-1");
        assert_eq!(conflict.matched_terms, vec!["caching", "redis", "session"]);
        assert!(conflict.description.contains("Use Redis for session caching"));
        assert!(conflict.description.contains("TASK-1"));
    }

    #[test]
    fn archived_tasks_are_scanned() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "tickets/archive/TASK-7/design.md",
            "# Technical Design: Queue\n\n## Technical Decisions\n\n\
             | Decision | Rationale | Source | Date |\n\
             |----------|-----------|--------|------|\n\
             | Use RabbitMQ for job dispatch | Existing ops tooling | TASK-7 | 2026-01-02 |\n",
        );
        let ctx = context_at(root.path());

        let req = request("TASK-8", "Switch job dispatch from RabbitMQ to Kafka");
        let conflicts = check_for_conflicts(&ctx, &req).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].source, "TASK-7");
        assert_eq!(conflicts[0].matched_terms, vec!["dispatch", "rabbitmq"]);
    }

    #[test]
    fn adr_conflicts_sort_first_and_skip_superseded() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "docs/decisions/0001-postgres.md",
            "# ADR-0001: Use PostgreSQL for persistence\n\n**Status:** Accepted\n\n\
             ## Decision\n\nAll services persist state in PostgreSQL.\n",
        );
        write(
            root.path(),
            "docs/decisions/0002-mysql.md",
            "# ADR-0002: Use MySQL for persistence\n\n**Status:** Superseded by ADR-0001\n\n\
             ## Decision\n\nServices persist state in MySQL.\n",
        );
        write(
            root.path(),
            "docs/wiki/platform/storage.md",
            "# Storage\n\nServices MUST persist state in a managed database.\n",
        );
        let ctx = context_at(root.path());

        let conflicts = check_for_conflicts(
            &ctx,
            &request("TASK-3", "Persist service state in MongoDB instead of PostgreSQL"),
        )
        .unwrap();
        let sources: Vec<&str> = conflicts.iter().map(|c| c.source.as_str()).collect();
        assert_eq!(sources, vec!["ADR-0001", "docs/wiki/platform/storage.md"]);
        assert_eq!(conflicts[0].severity, Severity::High);
        assert_eq!(conflicts[1].conflict_type, ConflictType::StakeholderRequirement);
        assert_eq!(conflicts[1].severity, Severity::Low);
    }

    #[test]
    fn affected_files_contribute_terms() {
        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        record_decision(&ctx, "TASK-1", "Keep billing invoices immutable");

        let mut req = request("TASK-2", "Small refactor");
        assert!(check_for_conflicts(&ctx, &req).unwrap().is_empty());

        req.affected_files = vec!["src/billing/invoices.rs".to_string()];
        let conflicts = check_for_conflicts(&ctx, &req).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].matched_terms, vec!["billing", "invoices"]);
    }

    #[test]
    fn threshold_comes_from_settings() {
        let root = tempfile::tempdir().unwrap();
        let mut ctx = context_at(root.path());
        record_decision(&ctx, "TASK-1", "Use Redis for session caching");

        ctx.settings.min_shared_terms = 4;
        let req = request("TASK-2", "Move session caching off Redis");
        assert!(check_for_conflicts(&ctx, &req).unwrap().is_empty());
    }

    #[test]
    fn unreadable_design_document_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("tickets/TASK-1/design.md")).unwrap();
        let ctx = context_at(root.path());

        let err = check_for_conflicts(&ctx, &request("TASK-2", "Replace Redis session caching"))
            .unwrap_err();
        assert!(matches!(err, DossierError::Io { .. }), "{err}");
    }

    #[test]
    fn non_utf8_files_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        write(
            root.path(),
            "docs/decisions/0001-postgres.md",
            "# ADR-0001: Use PostgreSQL for persistence\n\n**Status:** Accepted\n\n\
             ## Decision\n\nAll services persist state in PostgreSQL.\n",
        );
        for rel in [
            "docs/wiki/legacy.md",
            "docs/decisions/0002-legacy.md",
            "tickets/TASK-9/design.md",
        ] {
            let path = root.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, b"caf\xe9 notes").unwrap();
        }
        let ctx = context_at(root.path());

        let req = request("TASK-3", "Persist service state in MongoDB instead of PostgreSQL");
        let conflicts = check_for_conflicts(&ctx, &req).unwrap();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].source, "ADR-0001");
        assert_eq!(conflicts[0].conflict_type, ConflictType::AdrViolation);
    }

    #[test]
    fn duplicate_candidates_are_reported_once() {
        struct Twice;
        impl CandidateSource for Twice {
            fn name(&self) -> &'static str {
                "twice"
            }
            fn candidates(
                &self,
                _ctx: &ServiceContext,
                _request: &ConflictContext,
            ) -> Result<Vec<Candidate>> {
                let candidate = Candidate {
                    conflict_type: ConflictType::StakeholderRequirement,
                    source: "docs/wiki/a.md".to_string(),
                    label: "Audit every login".to_string(),
                    text: "Audit every login attempt".to_string(),
                };
                Ok(vec![candidate.clone(), candidate])
            }
        }

        let root = tempfile::tempdir().unwrap();
        let ctx = context_at(root.path());
        let detector = ConflictDetector::new(&ctx).with_sources(vec![Box::new(Twice)]);
        let conflicts = detector.check(&request("TASK-1", "Stop audit of login attempts")).unwrap();
        assert_eq!(conflicts.len(), 1);
    }

    #[test]
    fn long_labels_are_shortened() {
        let long = "word ".repeat(40);
        let short = shorten(&long);
        assert_eq!(short.chars().count(), MAX_LABEL_CHARS);
        assert!(short.ends_with("..."));
        assert_eq!(shorten("  two   words "), "two words");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_conflicts_are_complete(
            words in proptest::collection::vec("[a-z]{4,8}", 2..6),
        ) {
            let root = tempfile::tempdir().unwrap();
            let ctx = context_at(root.path());
            let decision = words.join(" ");
            record_decision(&ctx, "TASK-1", &decision);

            let conflicts = check_for_conflicts(&ctx, &request("TASK-2", &decision)).unwrap();
            for conflict in &conflicts {
                prop_assert!(!conflict.source.is_empty());
                prop_assert!(!conflict.description.is_empty());
                prop_assert!(!conflict.recommendation.is_empty());
                prop_assert_eq!(conflict.severity, conflict.conflict_type.severity());
                prop_assert!(conflict.matched_terms.len() >= ctx.settings.min_shared_terms);
            }
        }

        #[test]
        fn prop_own_decisions_never_conflict(
            words in proptest::collection::vec("[a-z]{5,9}", 2..5),
        ) {
            let root = tempfile::tempdir().unwrap();
            let ctx = context_at(root.path());
            let decision = words.join(" ");
            record_decision(&ctx, "TASK-1", &decision);
            record_decision(&ctx, "TASK-2", &decision);

            let conflicts = check_for_conflicts(&ctx, &request("TASK-1", &decision)).unwrap();
            for conflict in &conflicts {
                prop_assert!(
                    !(conflict.conflict_type == ConflictType::PreviousDecision
                        && conflict.source == "TASK-1"),
                    "own decision reported: {:?}",
                    conflict
                );
            }
        }
    }
}
