//! Workspace directory layout.
//!
//! ```text
//! <root>/
//!   ├── tickets/
//!   │   ├── <task-id>/design.md
//!   │   └── archive/<task-id>/design.md
//!   └── docs/
//!       ├── decisions/*.md
//!       └── wiki/**/*.md
//! ```

use std::path::{Component, Path, PathBuf};

/// File name of the per-task design document.
pub const DESIGN_FILE: &str = "design.md";

/// Name of the archive directory under `tickets/`.
pub const ARCHIVE_DIR: &str = "archive";

/// Resolves well-known paths relative to a workspace root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    /// Creates a layout rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding active tickets.
    #[must_use]
    pub fn tickets_dir(&self) -> PathBuf {
        self.root.join("tickets")
    }

    /// Directory holding archived tickets.
    #[must_use]
    pub fn archive_dir(&self) -> PathBuf {
        self.tickets_dir().join(ARCHIVE_DIR)
    }

    /// Directory holding ADRs.
    #[must_use]
    pub fn decisions_dir(&self) -> PathBuf {
        self.root.join("docs").join("decisions")
    }

    /// Directory holding wiki pages.
    #[must_use]
    pub fn wiki_dir(&self) -> PathBuf {
        self.root.join("docs").join("wiki")
    }

    /// Renders `path` relative to the root with `/` separators.
    ///
    /// Paths outside the root are rendered as given.
    #[must_use]
    pub fn display_relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => join_components(relative),
            Err(_) => path.display().to_string(),
        }
    }

    /// Builds a relative link from directory `from_dir` to `target`.
    ///
    /// Both paths are taken relative to the workspace root, so
    /// `tickets/T-1` to `docs/decisions/0001-x.md` gives
    /// `../../docs/decisions/0001-x.md`.
    #[must_use]
    pub fn relative_link(&self, from_dir: &Path, target: &Path) -> String {
        let from = from_dir.strip_prefix(&self.root).unwrap_or(from_dir);
        let to = target.strip_prefix(&self.root).unwrap_or(target);

        let from_parts: Vec<Component<'_>> = from.components().collect();
        let to_parts: Vec<Component<'_>> = to.components().collect();
        let common = from_parts.iter().zip(&to_parts).take_while(|(a, b)| a == b).count();

        let mut segments: Vec<String> = vec!["..".to_string(); from_parts.len() - common];
        segments.extend(
            to_parts[common..].iter().map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
        segments.join("/")
    }
}

fn join_components(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_directories() {
        let layout = Layout::new("/w");
        assert_eq!(layout.tickets_dir(), PathBuf::from("/w/tickets"));
        assert_eq!(layout.archive_dir(), PathBuf::from("/w/tickets/archive"));
        assert_eq!(layout.decisions_dir(), PathBuf::from("/w/docs/decisions"));
        assert_eq!(layout.wiki_dir(), PathBuf::from("/w/docs/wiki"));
    }

    #[test]
    fn relative_link_from_active_ticket() {
        let layout = Layout::new("/w");
        let link = layout.relative_link(
            Path::new("/w/tickets/TASK-1"),
            Path::new("/w/docs/decisions/0001-use-jwt.md"),
        );
        assert_eq!(link, "../../docs/decisions/0001-use-jwt.md");
    }

    #[test]
    fn relative_link_from_archived_ticket() {
        let layout = Layout::new("/w");
        let link = layout.relative_link(
            Path::new("/w/tickets/archive/TASK-1"),
            Path::new("/w/docs/decisions/0001-use-jwt.md"),
        );
        assert_eq!(link, "../../../docs/decisions/0001-use-jwt.md");
    }

    #[test]
    fn display_relative_strips_root() {
        let layout = Layout::new("/w");
        assert_eq!(layout.display_relative(Path::new("/w/docs/wiki/auth.md")), "docs/wiki/auth.md");
        assert_eq!(layout.display_relative(Path::new("/elsewhere/x.md")), "/elsewhere/x.md");
    }
}
