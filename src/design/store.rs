//! Design document store: persistence for `design.md` files.
//!
//! Each task's document lives in its ticket directory, as resolved by the
//! context's [`TicketResolver`](crate::ports::TicketResolver):
//!
//! ```text
//! <root>/tickets/<task-id>/design.md
//! <root>/tickets/archive/<task-id>/design.md
//! ```
//!
//! Every write re-serializes the whole document, writes it next to the target
//! and renames it into place. Concurrent writers are not coordinated; the
//! last rename wins.

use std::io;
use std::path::PathBuf;

use log::{debug, info};

use super::codec;
use super::diagram;
use super::{ComponentDescription, TaskDesignDocument, TechnicalDecision};
use crate::adr::find_related_adrs;
use crate::context::ServiceContext;
use crate::error::{DossierError, IoResultExt, Result};
use crate::ports::communications::{Communication, CommunicationTag};
use crate::workspace::DESIGN_FILE;

/// Attribution used when a communication names neither a contact nor a source.
const UNATTRIBUTED: &str = "communication";

/// A single-section change to a design document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignUpdate {
    /// Replace the overview.
    Overview(String),
    /// Replace the architecture diagram body.
    Architecture(String),
    /// Append a decision with the given text.
    AppendDecision(String),
    /// Append a component with the given name.
    AppendComponent(String),
}

impl DesignUpdate {
    /// Builds an update from a section name as typed by a user.
    ///
    /// Accepts `overview`, `architecture`, `decisions` and `components`
    /// (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::UnknownSection`] for any other name.
    pub fn from_section(section: &str, content: impl Into<String>) -> Result<Self> {
        let content = content.into();
        match section.trim().to_lowercase().as_str() {
            "overview" => Ok(Self::Overview(content)),
            "architecture" => Ok(Self::Architecture(content)),
            "decisions" => Ok(Self::AppendDecision(content)),
            "components" => Ok(Self::AppendComponent(content)),
            _ => Err(DossierError::UnknownSection(section.to_string())),
        }
    }

    /// The section name this update targets.
    #[must_use]
    pub fn section(&self) -> &'static str {
        match self {
            Self::Overview(_) => "overview",
            Self::Architecture(_) => "architecture",
            Self::AppendDecision(_) => "decisions",
            Self::AppendComponent(_) => "components",
        }
    }

    fn apply(self, doc: &mut TaskDesignDocument) {
        match self {
            Self::Overview(content) => doc.overview = content,
            Self::Architecture(content) => doc.architecture = content,
            Self::AppendDecision(content) => doc.technical_decisions.push(TechnicalDecision {
                decision: content,
                ..Default::default()
            }),
            Self::AppendComponent(content) => doc.components.push(ComponentDescription {
                name: content,
                ..Default::default()
            }),
        }
    }
}

/// Counts of entries added by [`DesignStore::populate_from_context`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    /// Stakeholder requirements appended.
    pub requirements_added: usize,
    /// Technical decisions appended.
    pub decisions_added: usize,
    /// ADR links appended.
    pub adrs_added: usize,
}

/// Persistence layer for task design documents.
///
/// All I/O goes through `ctx.fs`, `ctx.tickets` and `ctx.comms`.
pub struct DesignStore<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DesignStore<'a> {
    /// Creates a store over the given context.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Path of the task's `design.md`.
    #[must_use]
    pub fn design_path(&self, task_id: &str) -> PathBuf {
        self.ctx.tickets.ticket_dir(task_id).join(DESIGN_FILE)
    }

    /// Returns `true` if the task has a design document file.
    #[must_use]
    pub fn exists(&self, task_id: &str) -> bool {
        let path = self.design_path(task_id);
        self.ctx.fs.exists(&path) && !self.ctx.fs.is_dir(&path)
    }

    /// Creates the ticket directory if needed and writes a scaffold document.
    ///
    /// An existing `design.md` is left untouched and returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the ticket directory cannot be created (for
    /// example, a file is in the way) or `design.md` cannot be written.
    pub fn initialize(&self, task_id: &str) -> Result<TaskDesignDocument> {
        if self.exists(task_id) {
            info!("Design document for {task_id} already exists; leaving it unchanged");
            return self.get(task_id);
        }

        let dir = self.ctx.tickets.ticket_dir(task_id);
        self.ctx.fs.create_dir_all(&dir).io_context("create ticket directory", task_id, &dir)?;

        let mut doc = TaskDesignDocument::scaffold(task_id);
        self.write(&mut doc)?;
        info!("Initialized design document for {task_id}");
        Ok(doc)
    }

    /// Loads and parses the task's design document.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::DesignNotFound`] if the file is missing and an
    /// I/O error if it cannot be read (including when it is a directory).
    pub fn get(&self, task_id: &str) -> Result<TaskDesignDocument> {
        let path = self.design_path(task_id);
        match self.ctx.fs.read_to_string(&path) {
            Ok(text) => Ok(codec::parse(task_id, &text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(DossierError::DesignNotFound {
                    task_id: task_id.to_string(),
                    path,
                })
            }
            Err(e) => Err(DossierError::io("read design document", task_id, path, e)),
        }
    }

    /// Applies a single-section update and rewrites the document.
    ///
    /// # Errors
    ///
    /// Propagates load and write errors.
    pub fn update(&self, task_id: &str, update: DesignUpdate) -> Result<TaskDesignDocument> {
        let mut doc = self.get(task_id)?;
        let section = update.section();
        update.apply(&mut doc);
        self.write(&mut doc)?;
        info!("Updated {section} of design document for {task_id}");
        Ok(doc)
    }

    /// Validates `section`, then applies the update.
    ///
    /// # Errors
    ///
    /// Returns [`DossierError::UnknownSection`] before touching the disk if
    /// `section` is not recognised; otherwise as [`DesignStore::update`].
    pub fn update_section(
        &self,
        task_id: &str,
        section: &str,
        content: &str,
    ) -> Result<TaskDesignDocument> {
        let update = DesignUpdate::from_section(section, content)?;
        self.update(task_id, update)
    }

    /// Converts the task's decision-tagged communications into decisions.
    ///
    /// Each decision keeps the communication content verbatim, uses the topic
    /// as rationale, carries a non-empty attribution as source, and is marked
    /// as an ADR candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the communication store cannot be read.
    pub fn extract_from_communications(&self, task_id: &str) -> Result<Vec<TechnicalDecision>> {
        let communications = self.communications(task_id)?;
        let decisions: Vec<TechnicalDecision> = communications
            .iter()
            .filter(|c| c.has_tag(CommunicationTag::Decision))
            .map(decision_from_communication)
            .collect();
        debug!("Extracted {} decision(s) from communications for {task_id}", decisions.len());
        Ok(decisions)
    }

    /// Merges requirements, decisions and related ADRs into the document.
    ///
    /// Entries whose text is already present are not added again, so running
    /// this twice changes nothing the second time (apart from `last_updated`).
    ///
    /// # Errors
    ///
    /// Fails if the document does not exist, or if communications, ADRs or the
    /// write fail.
    pub fn populate_from_context(&self, task_id: &str) -> Result<PopulateSummary> {
        let mut doc = self.get(task_id)?;
        let mut summary = PopulateSummary::default();

        let requirements = self
            .communications(task_id)?
            .into_iter()
            .filter(|c| c.has_tag(CommunicationTag::Requirement))
            .map(|c| c.content);
        for requirement in requirements {
            if !doc.stakeholder_requirements.iter().any(|r| same_text(r, &requirement)) {
                doc.stakeholder_requirements.push(requirement);
                summary.requirements_added += 1;
            }
        }

        for decision in self.extract_from_communications(task_id)? {
            let known =
                doc.technical_decisions.iter().any(|d| same_text(&d.decision, &decision.decision));
            if !known {
                doc.technical_decisions.push(decision);
                summary.decisions_added += 1;
            }
        }

        for link in find_related_adrs(self.ctx, task_id)? {
            if !doc.related_adrs.iter().any(|existing| same_text(existing, &link)) {
                doc.related_adrs.push(link);
                summary.adrs_added += 1;
            }
        }

        self.write(&mut doc)?;
        info!(
            "Populated design document for {task_id}: {} requirement(s), {} decision(s), {} ADR(s)",
            summary.requirements_added, summary.decisions_added, summary.adrs_added
        );
        Ok(summary)
    }

    /// Renders the task's components as a Mermaid diagram.
    ///
    /// # Errors
    ///
    /// Fails if the document cannot be loaded.
    pub fn generate_architecture_diagram(&self, task_id: &str) -> Result<String> {
        let doc = self.get(task_id)?;
        Ok(diagram::generate_architecture_diagram(&doc))
    }

    fn communications(&self, task_id: &str) -> Result<Vec<Communication>> {
        self.ctx
            .comms
            .get_all_communications(task_id)
            .map_err(|e| DossierError::Communications {
                task_id: task_id.to_string(),
                message: e.to_string(),
            })
    }

    /// Stamps `last_updated`, serializes, and replaces `design.md`.
    fn write(&self, doc: &mut TaskDesignDocument) -> Result<()> {
        doc.last_updated = Some(self.ctx.clock.now());
        let text = codec::format(doc);
        let path = self.design_path(&doc.task_id);
        let staging = path.with_file_name(format!("{DESIGN_FILE}.tmp"));

        self.ctx
            .fs
            .write(&staging, &text)
            .io_context("write design document", &doc.task_id, &staging)?;
        if let Err(e) = self.ctx.fs.rename(&staging, &path) {
            let _ = self.ctx.fs.remove_file(&staging);
            return Err(DossierError::io("write design document", doc.task_id.clone(), path, e));
        }
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

fn decision_from_communication(comm: &Communication) -> TechnicalDecision {
    TechnicalDecision {
        decision: comm.content.clone(),
        rationale: comm.topic.trim().to_string(),
        source: attribution(comm),
        date: Some(comm.date.date_naive()),
        adr_candidate: true,
    }
}

/// `source-contact`, whichever half is present, or a fixed fallback.
fn attribution(comm: &Communication) -> String {
    match (comm.source.trim(), comm.contact.trim()) {
        ("", "") => UNATTRIBUTED.to_string(),
        (source, "") => source.to_string(),
        ("", contact) => contact.to_string(),
        (source, contact) => format!("{source}-{contact}"),
    }
}

/// Compares texts ignoring differences in whitespace, which the markdown
/// form does not preserve.
fn same_text(a: &str, b: &str) -> bool {
    a.split_whitespace().eq(b.split_whitespace())
}
