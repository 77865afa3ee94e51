// Draft persistence port
//
// Single-snapshot storage behind a trait so the wizard can run against a
// file, an in-memory slot, or anything an embedder injects. Every call
// acquires and releases the underlying resource internally; no handle is
// ever held across an await point.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::models::state::DraftSnapshot;

/// File name of the persisted draft under the platform data directory.
const DRAFT_FILE_NAME: &str = "evaluation-draft.json";

#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Persist the snapshot, replacing any previous one.
    async fn save(&self, snapshot: &DraftSnapshot) -> Result<()>;

    /// Load the current snapshot. `Ok(None)` means no draft exists; `Err`
    /// means a draft exists but could not be read or parsed.
    async fn load(&self) -> Result<Option<DraftSnapshot>>;

    /// Remove the snapshot. Clearing an absent draft is not an error.
    async fn clear(&self) -> Result<()>;
}

/// File-backed store: one JSON document at a fixed path, written atomically
/// (temp file + rename) so a crash mid-save never corrupts the draft.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the platform-local data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("evaluation-intake")
            .join(DRAFT_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn save(&self, snapshot: &DraftSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating draft directory {:?}", parent))?;
        }

        let body = serde_json::to_vec_pretty(snapshot).context("serializing draft snapshot")?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body).with_context(|| format!("writing draft to {:?}", tmp))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("moving draft into place at {:?}", self.path))?;

        debug!("[PHASE: draft] Saved draft to {:?}", self.path);
        Ok(())
    }

    async fn load(&self) -> Result<Option<DraftSnapshot>> {
        let body = match std::fs::read(&self.path) {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading draft from {:?}", self.path))
            }
        };

        let snapshot = serde_json::from_slice(&body)
            .with_context(|| format!("parsing draft snapshot at {:?}", self.path))?;
        Ok(Some(snapshot))
    }

    async fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing draft at {:?}", self.path)),
        }
    }
}

/// In-memory store for tests and embedders that do not want durability.
#[derive(Default)]
pub struct MemoryDraftStore {
    slot: Mutex<Option<DraftSnapshot>>,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn save(&self, snapshot: &DraftSnapshot) -> Result<()> {
        *self.slot.lock().await = Some(snapshot.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<DraftSnapshot>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::state::WizardState;
    use chrono::Utc;

    fn sample_snapshot() -> DraftSnapshot {
        let mut state = WizardState::new();
        state.field_values.insert("startupName".into(), "Acme".into());
        state.step_index = 2;
        state.completed_steps.insert(1);
        state.snapshot(Utc::now())
    }

    #[tokio::test]
    async fn file_store_round_trips_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("draft.json"));

        let snapshot = sample_snapshot();
        store.save(&snapshot).await.unwrap();

        let loaded = store.load().await.unwrap().expect("draft should exist");
        assert_eq!(loaded, snapshot);
    }

    #[tokio::test]
    async fn file_store_load_is_none_when_no_draft_exists() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("missing.json"));
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_drafts_as_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let store = FileDraftStore::new(&path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn file_store_clear_removes_the_draft_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("draft.json"));

        store.save(&sample_snapshot()).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        // Clearing again is fine.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn file_store_save_replaces_the_previous_draft() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDraftStore::new(dir.path().join("draft.json"));

        let first = sample_snapshot();
        store.save(&first).await.unwrap();

        let mut second = first.clone();
        second.current_step = 5;
        store.save(&second).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.current_step, 5);
    }

    #[tokio::test]
    async fn memory_store_round_trips_and_clears() {
        let store = MemoryDraftStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        let snapshot = sample_snapshot();
        store.save(&snapshot).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(snapshot));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }
}
