//! Communication store port.
//!
//! Communications (stakeholder messages, meeting notes, chat excerpts) are
//! owned by an external store. The design store only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classifies what a communication carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationTag {
    /// A decision that was agreed on.
    Decision,
    /// A stakeholder requirement.
    Requirement,
    /// An open question.
    Question,
    /// A status update.
    Update,
    /// Something blocking progress.
    Blocker,
}

/// A single recorded communication for a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    /// Identifier assigned by the store.
    #[serde(default)]
    pub id: String,
    /// Classification tags.
    #[serde(default)]
    pub tags: Vec<CommunicationTag>,
    /// The verbatim message content.
    pub content: String,
    /// Short topic line.
    #[serde(default)]
    pub topic: String,
    /// Person the communication came from.
    #[serde(default)]
    pub contact: String,
    /// Channel or system the communication came from (e.g. "slack").
    #[serde(default)]
    pub source: String,
    /// When the communication happened.
    pub date: DateTime<Utc>,
}

impl Communication {
    /// Returns `true` if the communication carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: CommunicationTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Read access to the communications recorded for a task.
pub trait CommunicationStore: Send + Sync {
    /// Returns every communication recorded for `task_id`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or parsed.
    fn get_all_communications(
        &self,
        task_id: &str,
    ) -> Result<Vec<Communication>, Box<dyn std::error::Error + Send + Sync>>;
}
