//! Workspace settings.
//!
//! Resolution order: built-in defaults, then `<root>/.dossier.yaml`, then
//! `DOSSIER_*` environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{DossierError, Result};

/// Name of the optional settings file at the workspace root.
pub const SETTINGS_FILE: &str = ".dossier.yaml";

/// Default number of shared terms needed to flag a conflict.
pub const DEFAULT_MIN_SHARED_TERMS: usize = 2;

/// Default minimum token length considered by conflict scoring.
pub const DEFAULT_MIN_TERM_LENGTH: usize = 4;

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Workspace root containing `tickets/` and `docs/`.
    pub root: PathBuf,
    /// Shared terms needed before a candidate is flagged.
    pub min_shared_terms: usize,
    /// Shortest token that counts toward overlap.
    pub min_term_length: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    min_shared_terms: Option<usize>,
    #[serde(default)]
    min_term_length: Option<usize>,
}

impl Settings {
    /// Settings with defaults for the given root, ignoring file and environment.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            min_shared_terms: DEFAULT_MIN_SHARED_TERMS,
            min_term_length: DEFAULT_MIN_TERM_LENGTH,
        }
    }

    /// Loads settings for `root` from the settings file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the settings file is unreadable or
    /// invalid, or an environment override is not a number.
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_with(root, |key| std::env::var(key).ok())
    }

    /// Like [`Settings::load`] but reads variables through `env`.
    ///
    /// # Errors
    ///
    /// Same as [`Settings::load`].
    pub fn load_with<F>(root: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::with_root(root);

        let file = read_settings_file(&root.join(SETTINGS_FILE))?;
        if let Some(value) = file.min_shared_terms {
            settings.min_shared_terms = value;
        }
        if let Some(value) = file.min_term_length {
            settings.min_term_length = value;
        }

        if let Some(value) = env("DOSSIER_MIN_SHARED_TERMS") {
            settings.min_shared_terms = parse_count("DOSSIER_MIN_SHARED_TERMS", &value)?;
        }
        if let Some(value) = env("DOSSIER_MIN_TERM_LENGTH") {
            settings.min_term_length = parse_count("DOSSIER_MIN_TERM_LENGTH", &value)?;
        }

        // Zero would let a candidate with no overlap flag.
        settings.min_shared_terms = settings.min_shared_terms.max(1);
        settings.min_term_length = settings.min_term_length.max(1);
        Ok(settings)
    }
}

fn read_settings_file(path: &Path) -> Result<SettingsFile> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SettingsFile::default()),
        Err(e) => {
            return Err(DossierError::Configuration {
                message: format!("failed to read {}: {e}", path.display()),
            })
        }
    };
    if contents.trim().is_empty() {
        return Ok(SettingsFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| DossierError::Configuration {
        message: format!("failed to parse {}: {e}", path.display()),
    })
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| DossierError::Configuration {
        message: format!("{key} must be a non-negative integer, got '{value}'"),
    })
}
