//! Brief persistence: one Markdown and one JSON file per run

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::render_markdown;
use crate::domain::CampaignBrief;

/// Characters of the product name kept in file names
const SLUG_CHARS: usize = 30;

/// Errors writing a brief to disk
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode or decode brief JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Paths of the files written for one brief
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedBrief {
    pub markdown_path: PathBuf,
    pub json_path: PathBuf,
}

/// Writes briefs into a single output directory
#[derive(Debug, Clone)]
pub struct BriefStore {
    dir: PathBuf,
}

impl BriefStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File stem for a brief: `<slug>_<YYYYmmdd_HHMMSS>`
    pub fn file_stem(brief: &CampaignBrief) -> String {
        format!(
            "{}_{}",
            slugify(&brief.request.product_name),
            brief.created_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Write `<stem>.md` and `<stem>.json`, creating the directory if needed
    pub fn save(&self, brief: &CampaignBrief) -> Result<SavedBrief, PersistenceError> {
        debug!(dir = %self.dir.display(), run_id = %brief.run_id, "BriefStore::save: called");
        fs::create_dir_all(&self.dir).map_err(|source| PersistenceError::CreateDir {
            path: self.dir.clone(),
            source,
        })?;

        let stem = Self::file_stem(brief);
        let markdown_path = self.dir.join(format!("{stem}.md"));
        let json_path = self.dir.join(format!("{stem}.json"));

        // Encode first so a serialization failure leaves nothing behind
        let json = serde_json::to_string_pretty(brief)?;
        let markdown = render_markdown(brief);

        write_file(&markdown_path, &markdown)?;
        write_file(&json_path, &json)?;

        info!(markdown = %markdown_path.display(), json = %json_path.display(), "Saved campaign brief");
        Ok(SavedBrief {
            markdown_path,
            json_path,
        })
    }

    /// Read a previously saved JSON brief
    pub fn load(path: &Path) -> Result<CampaignBrief, PersistenceError> {
        debug!(path = %path.display(), "BriefStore::load: called");
        let text = fs::read_to_string(path).map_err(|source| PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    fs::write(path, contents).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Lowercase, spaces and path separators to `_`, first 30 characters
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c => c,
        })
        .take(SLUG_CHARS)
        .collect()
}
