//! Live ticket resolver over `tickets/` and `tickets/archive/`.

use std::io;
use std::path::PathBuf;

use crate::ports::tickets::TicketResolver;
use crate::workspace::{Layout, ARCHIVE_DIR};

/// Resolves tickets as directories on disk.
pub struct DirectoryTickets {
    layout: Layout,
}

impl DirectoryTickets {
    /// Creates a resolver for the given workspace layout.
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }
}

impl TicketResolver for DirectoryTickets {
    fn ticket_dir(&self, task_id: &str) -> PathBuf {
        let active = self.layout.tickets_dir().join(task_id);
        if active.is_dir() {
            return active;
        }
        let archived = self.layout.archive_dir().join(task_id);
        if archived.is_dir() {
            return archived;
        }
        active
    }

    fn list_task_ids(&self) -> io::Result<Vec<String>> {
        let mut ids = list_subdirs(&self.layout.tickets_dir())?;
        ids.retain(|name| name != ARCHIVE_DIR);
        ids.extend(list_subdirs(&self.layout.archive_dir())?);
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

fn list_subdirs(dir: &std::path::Path) -> io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with('.') {
                names.push(name.to_string());
            }
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with(dirs: &[&str]) -> (tempfile::TempDir, Layout) {
        let root = tempfile::tempdir().unwrap();
        for dir in dirs {
            std::fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        let layout = Layout::new(root.path());
        (root, layout)
    }

    #[test]
    fn prefers_active_then_archived() {
        let (_root, layout) = layout_with(&["tickets/TASK-1", "tickets/archive/TASK-2"]);
        let tickets = DirectoryTickets::new(layout.clone());

        assert_eq!(tickets.ticket_dir("TASK-1"), layout.tickets_dir().join("TASK-1"));
        assert_eq!(tickets.ticket_dir("TASK-2"), layout.archive_dir().join("TASK-2"));
        assert_eq!(tickets.ticket_dir("TASK-3"), layout.tickets_dir().join("TASK-3"));
    }

    #[test]
    fn lists_active_and_archived_ids() {
        let (root, layout) =
            layout_with(&["tickets/TASK-2", "tickets/archive/TASK-1", "tickets/.hidden"]);
        std::fs::write(root.path().join("tickets/README.md"), "x").unwrap();
        let tickets = DirectoryTickets::new(layout);

        assert_eq!(tickets.list_task_ids().unwrap(), vec!["TASK-1", "TASK-2"]);
    }

    #[test]
    fn missing_tickets_dir_lists_nothing() {
        let (_root, layout) = layout_with(&[]);
        let tickets = DirectoryTickets::new(layout);
        assert!(tickets.list_task_ids().unwrap().is_empty());
    }
}
