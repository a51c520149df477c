//! Service context bundling all port trait objects.

use crate::adapters::live::clock::LiveClock;
use crate::adapters::live::communications::YamlCommunicationStore;
use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::tickets::DirectoryTickets;
use crate::config::Settings;
use crate::ports::clock::Clock;
use crate::ports::communications::CommunicationStore;
use crate::ports::filesystem::FileSystem;
use crate::ports::tickets::TicketResolver;
use crate::workspace::Layout;

/// Bundles all port trait objects and the workspace layout into a single context.
///
/// Each field provides access to one external boundary. Tests replace
/// individual fields (usually `clock` or `comms`) after calling [`ServiceContext::live`].
pub struct ServiceContext {
    /// Clock for `last_updated` stamps.
    pub clock: Box<dyn Clock>,
    /// Filesystem for file I/O.
    pub fs: Box<dyn FileSystem>,
    /// Maps task IDs to ticket directories.
    pub tickets: Box<dyn TicketResolver>,
    /// Source of task communications.
    pub comms: Box<dyn CommunicationStore>,
    /// Workspace paths.
    pub layout: Layout,
    /// Conflict scoring parameters and root.
    pub settings: Settings,
}

impl ServiceContext {
    /// Creates a live context with real adapters rooted at `settings.root`.
    #[must_use]
    pub fn live(settings: Settings) -> Self {
        let layout = Layout::new(settings.root.clone());
        Self {
            clock: Box::new(LiveClock),
            fs: Box::new(LiveFileSystem),
            tickets: Box::new(DirectoryTickets::new(layout.clone())),
            comms: Box::new(YamlCommunicationStore::new(layout.clone())),
            layout,
            settings,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for unit tests.

    use std::path::Path;
    use std::sync::Mutex;

    use chrono::{DateTime, TimeZone, Utc};

    use super::ServiceContext;
    use crate::config::Settings;
    use crate::ports::communications::{Communication, CommunicationStore};
    use crate::ports::Clock;

    /// Clock pinned to one instant.
    pub struct FixedClock(pub DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// In-memory communication store keyed by task ID.
    #[derive(Default)]
    pub struct FakeComms {
        pub entries: Mutex<Vec<(String, Communication)>>,
    }

    impl FakeComms {
        pub fn with(entries: Vec<(&str, Communication)>) -> Self {
            Self {
                entries: Mutex::new(
                    entries.into_iter().map(|(id, c)| (id.to_string(), c)).collect(),
                ),
            }
        }
    }

    impl CommunicationStore for FakeComms {
        fn get_all_communications(
            &self,
            task_id: &str,
        ) -> Result<Vec<Communication>, Box<dyn std::error::Error + Send + Sync>> {
            let entries = self.entries.lock().unwrap();
            Ok(entries.iter().filter(|(id, _)| id == task_id).map(|(_, c)| c.clone()).collect())
        }
    }

    /// Fixed instant used by [`context_at`].
    pub fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    /// Live context rooted at `root` with a fixed clock and no communications.
    pub fn context_at(root: &Path) -> ServiceContext {
        let mut ctx = ServiceContext::live(Settings::with_root(root));
        ctx.clock = Box::new(FixedClock(fixed_now()));
        ctx.comms = Box::new(FakeComms::default());
        ctx
    }
}
