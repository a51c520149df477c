//! Candidate sources: one per knowledge corpus.
//!
//! Each source yields `(source id, text)` candidates for the engine. A
//! corpus whose directory does not exist contributes nothing. Files that
//! vanish between listing and reading are skipped, and files that are not
//! valid UTF-8 are skipped with a warning. Any other read failure is
//! returned to the caller.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use super::{Candidate, ConflictContext, ConflictType};
use crate::adr::{adr_paths, read_adr};
use crate::context::ServiceContext;
use crate::design::DesignStore;
use crate::error::{DossierError, IoResultExt, Result};

/// Uppercase keywords that mark a wiki line as a requirement.
const NORMATIVE_KEYWORDS: [&str; 4] = ["MUST", "SHALL", "SHOULD", "REQUIRED"];

/// A corpus of prior knowledge.
pub trait CandidateSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Collects candidates relevant to `request`.
    ///
    /// # Errors
    ///
    /// Returns an error for I/O failures other than a missing corpus or file.
    fn candidates(&self, ctx: &ServiceContext, request: &ConflictContext)
        -> Result<Vec<Candidate>>;
}

/// Accepted ADRs under `docs/decisions/`.
///
/// Superseded, deprecated and rejected ADRs are skipped.
pub struct AdrSource;

impl CandidateSource for AdrSource {
    fn name(&self) -> &'static str {
        "adrs"
    }

    fn candidates(
        &self,
        ctx: &ServiceContext,
        request: &ConflictContext,
    ) -> Result<Vec<Candidate>> {
        let dir = ctx.layout.decisions_dir();
        let paths = adr_paths(ctx).io_context("list ADR directory", &request.task_id, &dir)?;

        let mut candidates = Vec::new();
        for path in paths {
            let adr = match read_adr(ctx, &path) {
                Ok(adr) => adr,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("Skipping ADR {} that is not valid UTF-8: {e}", path.display());
                    continue;
                }
                Err(e) => return Err(DossierError::io("read ADR", &request.task_id, path, e)),
            };
            if !adr.is_active() {
                debug!("Skipping inactive {}", adr.id);
                continue;
            }
            candidates.push(Candidate {
                conflict_type: ConflictType::AdrViolation,
                text: format!("{}\n{}", adr.title, adr.decision),
                label: adr.title,
                source: adr.id,
            });
        }
        Ok(candidates)
    }
}

/// Technical decisions from every other task's `design.md`, active or archived.
///
/// The requesting task's own decisions are never candidates.
pub struct DesignDecisionSource;

impl CandidateSource for DesignDecisionSource {
    fn name(&self) -> &'static str {
        "design decisions"
    }

    fn candidates(
        &self,
        ctx: &ServiceContext,
        request: &ConflictContext,
    ) -> Result<Vec<Candidate>> {
        let task_ids = ctx.tickets.list_task_ids().io_context(
            "list tickets",
            &request.task_id,
            &ctx.layout.tickets_dir(),
        )?;
        let store = DesignStore::new(ctx);

        let mut candidates = Vec::new();
        for task_id in task_ids.iter().filter(|id| **id != request.task_id) {
            let doc = match store.get(task_id) {
                Ok(doc) => doc,
                Err(e) if e.is_not_found() => continue,
                Err(e) if e.is_invalid_data() => {
                    warn!("Skipping design document for {task_id}: {e}");
                    continue;
                }
                Err(e) => return Err(e),
            };
            for decision in doc.technical_decisions {
                if decision.decision.trim().is_empty() {
                    continue;
                }
                candidates.push(Candidate {
                    conflict_type: ConflictType::PreviousDecision,
                    source: task_id.clone(),
                    text: format!("{}\n{}", decision.decision, decision.rationale),
                    label: decision.decision,
                });
            }
        }
        Ok(candidates)
    }
}

/// Requirement-bearing lines from wiki pages under `docs/wiki/`.
pub struct WikiSource;

impl CandidateSource for WikiSource {
    fn name(&self) -> &'static str {
        "wiki"
    }

    fn candidates(
        &self,
        ctx: &ServiceContext,
        request: &ConflictContext,
    ) -> Result<Vec<Candidate>> {
        let mut pages = Vec::new();
        collect_pages(ctx, &ctx.layout.wiki_dir(), &mut pages)
            .io_context("list wiki pages", &request.task_id, &ctx.layout.wiki_dir())?;

        let mut candidates = Vec::new();
        for page in pages {
            let text = match ctx.fs.read_to_string(&page) {
                Ok(text) => text,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("Skipping wiki page {} that is not valid UTF-8: {e}", page.display());
                    continue;
                }
                Err(e) => {
                    return Err(DossierError::io("read wiki page", &request.task_id, page, e));
                }
            };
            let source = ctx.layout.display_relative(&page);
            for requirement in requirement_lines(&text) {
                candidates.push(Candidate {
                    conflict_type: ConflictType::StakeholderRequirement,
                    source: source.clone(),
                    label: requirement.clone(),
                    text: requirement,
                });
            }
        }
        Ok(candidates)
    }
}

/// Recursively collects `.md` files under `dir`, sorted by path.
fn collect_pages(ctx: &ServiceContext, dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    if !ctx.fs.is_dir(dir) {
        return Ok(());
    }
    for name in ctx.fs.list_dir(dir)? {
        if name.starts_with('.') {
            continue;
        }
        let path = dir.join(&name);
        if ctx.fs.is_dir(&path) {
            collect_pages(ctx, &path, out)?;
        } else if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md")) {
            out.push(path);
        }
    }
    Ok(())
}

/// Extracts requirement statements from wiki markdown.
///
/// A line counts when it uses an uppercase normative keyword (MUST, SHALL,
/// SHOULD, REQUIRED), or when it is a list item under a heading that
/// mentions requirements. Fenced code is ignored.
#[must_use]
pub fn requirement_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut in_fence = false;
    let mut in_requirements = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with('#') {
            in_requirements = trimmed.to_lowercase().contains("requirement");
            continue;
        }

        let item = list_item(trimmed);
        let normative = trimmed
            .split(|c: char| !c.is_ascii_alphabetic())
            .any(|word| NORMATIVE_KEYWORDS.contains(&word));
        if normative || (in_requirements && item.is_some()) {
            let statement = item.unwrap_or(trimmed).trim();
            if !statement.is_empty() {
                lines.push(statement.to_string());
            }
        }
    }

    lines
}

/// Strips a `-`, `*`, `+` or `1.` list marker.
fn list_item(line: &str) -> Option<&str> {
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
    {
        return Some(rest);
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        return line[digits..].strip_prefix(". ");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_lines_by_keyword_and_section() {
        let text = "# Auth\n\
                    Sessions MUST expire after 30 minutes.\n\
                    This paragraph must be ignored (lowercase).\n\
                    ```\n\
                    code MUST be ignored\n\
                    ```\n\
                    ## Requirements\n\
                    - Support SSO via SAML\n\
                    1. Audit every login\n\
                    Plain prose here.\n\
                    ## Notes\n\
                    - Not a requirement\n\
                    * Tokens SHOULD be rotated\n";
        assert_eq!(
            requirement_lines(text),
            vec![
                "Sessions MUST expire after 30 minutes.",
                "Support SSO via SAML",
                "Audit every login",
                "Tokens SHOULD be rotated",
            ]
        );
    }

    #[test]
    fn list_item_markers() {
        assert_eq!(list_item("- a"), Some("a"));
        assert_eq!(list_item("+ b"), Some("b"));
        assert_eq!(list_item("12. c"), Some("c"));
        assert_eq!(list_item("12 c"), None);
        assert_eq!(list_item("plain"), None);
    }
}
