//! Architecture decision records under `docs/decisions/`.
//!
//! ADRs are plain markdown with bold metadata lines:
//!
//! ```text
//! # ADR-0003: Use JWT for sessions
//!
//! **Status:** Accepted
//! **Source:** TASK-00021
//!
//! ## Decision
//!
//! Sessions are carried in signed JWTs.
//! ```

pub mod resolve;

use std::io;
use std::path::{Path, PathBuf};

use crate::context::ServiceContext;
use crate::design::codec::split_sections;

pub use resolve::find_related_adrs;

const STATUS_LABEL: &str = "**Status:**";
const SOURCE_LABEL: &str = "**Source:**";

/// Statuses whose ADRs no longer constrain new work.
const INACTIVE_STATUSES: [&str; 3] = ["superseded", "deprecated", "rejected"];

/// A parsed ADR file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdrRecord {
    /// Identifier derived from the file name, e.g. `ADR-0003`.
    pub id: String,
    /// File name within the decisions directory.
    pub file_name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Text of the `# ` heading, or the ID when there is none.
    pub title: String,
    /// Value of the `**Status:**` line.
    pub status: Option<String>,
    /// Value of the `**Source:**` line: the task the ADR came from.
    pub source: Option<String>,
    /// Body of the `## Decision` section, or the whole body without metadata.
    pub decision: String,
}

impl AdrRecord {
    /// Parses ADR markdown. Never fails; missing parts are empty or `None`.
    #[must_use]
    pub fn parse(path: &Path, text: &str) -> Self {
        let file_name =
            path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let id = adr_id(&file_name);

        let title = text
            .lines()
            .find_map(|line| line.strip_prefix("# "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map_or_else(|| id.clone(), str::to_string);

        let (_, sections) = split_sections(text);
        let decision = sections
            .iter()
            .find(|s| s.header.eq_ignore_ascii_case("Decision"))
            .map(|s| s.body.clone())
            .unwrap_or_else(|| body_without_metadata(text));

        Self {
            id,
            file_name,
            path: path.to_path_buf(),
            title,
            status: metadata_value(text, STATUS_LABEL),
            source: metadata_value(text, SOURCE_LABEL),
            decision,
        }
    }

    /// Returns `false` for superseded, deprecated and rejected ADRs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.as_deref().map_or(true, |status| {
            let status = status.to_lowercase();
            !INACTIVE_STATUSES.iter().any(|inactive| status.starts_with(inactive))
        })
    }
}

/// Derives an ADR identifier from its file name.
///
/// `0007-use-postgres.md` and `ADR-0007-use-postgres.md` both give `ADR-0007`;
/// names without a number fall back to the file stem.
#[must_use]
pub fn adr_id(file_name: &str) -> String {
    let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
    let rest = stem
        .strip_prefix("ADR-")
        .or_else(|| stem.strip_prefix("adr-"))
        .unwrap_or(stem);
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        stem.to_string()
    } else {
        format!("ADR-{digits}")
    }
}

/// Lists the `.md` files directly under the decisions directory, sorted.
///
/// Subdirectories (even ones named `*.md`) and other files are skipped.
/// A missing directory yields an empty list.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be listed.
pub fn adr_paths(ctx: &ServiceContext) -> io::Result<Vec<PathBuf>> {
    let dir = ctx.layout.decisions_dir();
    if !ctx.fs.is_dir(&dir) {
        return Ok(Vec::new());
    }
    let names = match ctx.fs.list_dir(&dir) {
        Ok(names) => names,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    Ok(names
        .into_iter()
        .filter(|name| {
            Path::new(name).extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        })
        .map(|name| dir.join(name))
        .filter(|path| !ctx.fs.is_dir(path))
        .collect())
}

/// Reads and parses one ADR file.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be read.
pub fn read_adr(ctx: &ServiceContext, path: &Path) -> io::Result<AdrRecord> {
    let text = ctx.fs.read_to_string(path)?;
    Ok(AdrRecord::parse(path, &text))
}

fn metadata_value(text: &str, label: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim();
        let line = line.strip_prefix("- ").unwrap_or(line);
        let value = line.strip_prefix(label)?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn body_without_metadata(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let line = line.trim();
            !line.starts_with("# ") && !(line.starts_with("**") || line.starts_with("- **"))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
