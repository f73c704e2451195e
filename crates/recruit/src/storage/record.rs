//! File-based record directories
//!
//! Directory structure:
//! ```text
//! <base>/
//!   candidates/
//!     john.doe@example.com/
//!       workable-index.json   # baseline (list view snapshot)
//!       workable-show.json    # detail snapshot
//!       0-PROFILE.md          # rendered profile
//!       0-RESUME.pdf          # resume download
//!       0-COVER.txt           # cover letter
//!   jobs/
//!     SE001/
//!       job-index.json
//!       stages.json
//!       stages.md
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// File and directory names of the local layout
pub mod files {
    pub const CANDIDATES_DIR: &str = "candidates";
    pub const JOBS_DIR: &str = "jobs";

    pub const CANDIDATE_INDEX: &str = "workable-index.json";
    pub const CANDIDATE_DETAIL: &str = "workable-show.json";
    pub const CANDIDATE_PROFILE: &str = "0-PROFILE.md";
    pub const CANDIDATE_RESUME: &str = "0-RESUME.pdf";
    pub const CANDIDATE_COVER_LETTER: &str = "0-COVER.txt";

    pub const JOB_INDEX: &str = "job-index.json";
    pub const JOB_STAGES: &str = "stages.json";
    pub const JOB_STAGES_MARKDOWN: &str = "stages.md";
}

/// Make `raw` safe as a directory name: every character outside
/// `[A-Za-z0-9@.-]` becomes `_`.
pub fn sanitize_key(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `data` to `path` atomically (write to temp, then rename)
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    fs::write(&temp_path, data)
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to move {} into place", path.display()))?;

    Ok(())
}

/// One entity's local directory
#[derive(Debug, Clone)]
pub struct RecordDir {
    root: PathBuf,
}

impl RecordDir {
    /// Open the record directory at `root`, creating it if needed
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create directory {}", root.display()))?;
        Ok(Self { root })
    }

    /// Open the record for `key` inside `collection`, sanitizing the key
    pub fn open_in(collection: &Path, key: &str) -> Result<Self> {
        Self::open(collection.join(sanitize_key(key)))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write a pretty-printed JSON file
    pub fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", name))?;
        write_atomic(&self.file(name), content.as_bytes())
    }

    pub fn write_text(&self, name: &str, text: &str) -> Result<()> {
        write_atomic(&self.file(name), text.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, data: &[u8]) -> Result<()> {
        write_atomic(&self.file(name), data)
    }

    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let path = self.file(name);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.file(name).exists()
    }
}
