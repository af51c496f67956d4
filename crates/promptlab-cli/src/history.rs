//! Evaluation history persisted as a JSON file

use async_trait::async_trait;
use chrono::Utc;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use promptlab_core::{Error, Evaluation, Feedback, HistoryStore, Result};

/// Default history file, relative to the working directory
pub const DEFAULT_HISTORY_FILE: &str = "llm_evaluations.json";

/// History store backed by a single JSON array file
pub struct JsonHistoryStore {
    evaluations: Vec<Evaluation>,
    file_path: PathBuf,
}

impl JsonHistoryStore {
    /// Create an empty store bound to `file_path` without touching the disk
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            evaluations: Vec::new(),
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Open a history file. A missing or empty file starts an empty history;
    /// an unparsable one is moved aside before starting empty.
    pub async fn open(file_path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new(file_path);
        store.load().await?;
        Ok(store)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name: OsString = self
            .file_path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(DEFAULT_HISTORY_FILE));
        name.push(suffix);
        self.file_path.with_file_name(name)
    }

    /// Rename an unparsable history file so the next save cannot overwrite it
    async fn quarantine(&self) -> Result<PathBuf> {
        let target = self.sibling_path(&format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%3f")));
        fs::rename(&self.file_path, &target).await?;
        Ok(target)
    }

    async fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.evaluations)?;
        let staging = self.sibling_path(".tmp");
        fs::write(&staging, json).await?;
        fs::rename(&staging, &self.file_path).await?;
        debug!(path = %self.file_path.display(), count = self.evaluations.len(), "Saved evaluation history");
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn load(&mut self) -> Result<()> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.evaluations.clear();
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            self.evaluations.clear();
            return Ok(());
        }

        match serde_json::from_str(&content) {
            Ok(evaluations) => self.evaluations = evaluations,
            Err(e) => {
                let moved_to = self.quarantine().await?;
                warn!(
                    path = %self.file_path.display(),
                    moved_to = %moved_to.display(),
                    error = %e,
                    "Evaluation history is corrupt, starting empty"
                );
                self.evaluations.clear();
            }
        }
        Ok(())
    }

    async fn record(&mut self, evaluation: Evaluation) -> Result<()> {
        self.evaluations.insert(0, evaluation);
        self.save().await
    }

    async fn save_feedback(&mut self, index: usize, model: &str, feedback: Feedback) -> Result<()> {
        let evaluation = self
            .evaluations
            .get_mut(index)
            .ok_or_else(|| Error::NotFound(format!("No evaluation at index {}", index)))?;

        if !evaluation.responses.contains_key(model) {
            return Err(Error::NotFound(format!(
                "Evaluation {} has no response from model '{}'",
                index, model
            )));
        }

        feedback.apply(evaluation, model)?;
        self.save().await
    }

    async fn clear(&mut self) -> Result<()> {
        self.evaluations.clear();
        self.save().await
    }

    fn list(&self) -> &[Evaluation] {
        &self.evaluations
    }
}
