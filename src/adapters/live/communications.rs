//! Live communication store reading `communications.yaml` from the ticket directory.

use crate::adapters::live::tickets::DirectoryTickets;
use crate::ports::communications::{Communication, CommunicationStore};
use crate::ports::tickets::TicketResolver;
use crate::workspace::Layout;

/// File name of the per-ticket communication log.
pub const COMMUNICATIONS_FILE: &str = "communications.yaml";

/// Communication store backed by a YAML list in each ticket directory.
///
/// A ticket without the file has no communications.
pub struct YamlCommunicationStore {
    tickets: DirectoryTickets,
}

impl YamlCommunicationStore {
    /// Creates a store for the given workspace layout.
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            tickets: DirectoryTickets::new(layout),
        }
    }
}

impl CommunicationStore for YamlCommunicationStore {
    fn get_all_communications(
        &self,
        task_id: &str,
    ) -> Result<Vec<Communication>, Box<dyn std::error::Error + Send + Sync>> {
        let path = self.tickets.ticket_dir(task_id).join(COMMUNICATIONS_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(format!("Failed to read {}: {e}", path.display()).into()),
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut communications: Vec<Communication> = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {e}", path.display()))?;
        communications.sort_by_key(|c| c.date);
        Ok(communications)
    }
}
