//! Ticket path resolver port.

use std::io;
use std::path::PathBuf;

/// Maps task IDs to ticket directories.
///
/// Tickets may live in the active area or in the archive; both the design
/// store and the conflict engine go through this trait so archived tasks
/// stay readable and scannable.
pub trait TicketResolver: Send + Sync {
    /// Returns the directory owning `task_id`.
    ///
    /// An existing active directory wins, then an existing archived one.
    /// When neither exists the active location is returned so new tickets
    /// are created there.
    fn ticket_dir(&self, task_id: &str) -> PathBuf;

    /// Lists every known task ID, active and archived, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing tickets directory cannot be read.
    /// A missing tickets directory yields an empty list.
    fn list_task_ids(&self) -> io::Result<Vec<String>>;
}
