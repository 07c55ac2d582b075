use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{RecordSet, ResolvedState, StateQuery, StateRecord, TrackedEntityKey};
use super::{StateStore, StoreError};

/// Filesystem-backed state store: one JSON document per tracked entity.
///
/// Writes go through a temporary file and a rename so a crash mid-write never
/// leaves a half-written document behind.
#[derive(Debug)]
pub struct FileSystemStateStore {
    directory: PathBuf,
}

impl FileSystemStateStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn records_path(&self, entity_type: &str, entity_id: u64) -> PathBuf {
        self.directory
            .join(format!("{entity_type}-{entity_id}.records.json"))
    }

    fn load_set(
        &self,
        path: &Path,
        entity_type: &str,
        entity_id: u64,
    ) -> Result<RecordSet, StoreError> {
        if !path.exists() {
            return Ok(RecordSet::default());
        }
        let contents = fs::read_to_string(path)?;
        let set: RecordSet = serde_json::from_str(&contents)?;
        if let Some(stray) = set
            .records()
            .iter()
            .find(|r| r.key.entity_type != entity_type || r.key.entity_id != entity_id)
        {
            return Err(StoreError::Corruption {
                reason: format!(
                    "record for {}/{} found in document of {}/{}",
                    stray.key.entity_type, stray.key.entity_id, entity_type, entity_id
                ),
            });
        }
        Ok(set)
    }

    fn save_set(&self, path: &Path, set: &RecordSet) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory)?;
        let serialized = serde_json::to_string_pretty(set)?;
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, serialized)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }
}

impl StateStore for FileSystemStateStore {
    fn resolve(&self, query: &StateQuery) -> Result<Option<ResolvedState>, StoreError> {
        let path = self.records_path(&query.entity_type, query.entity_id);
        let mut set = self.load_set(&path, &query.entity_type, query.entity_id)?;
        if set.is_empty() {
            return Ok(None);
        }
        let (resolved, changed) = set.resolve(query);
        if changed {
            self.save_set(&path, &set)?;
            debug!(
                entity_type = %query.entity_type,
                entity_id = %query.entity_id,
                langcode = ?query.langcode,
                file = ?path,
                "Translation branch created copy-on-read"
            );
        }
        Ok(resolved)
    }

    fn commit(&self, record: StateRecord) -> Result<(), StoreError> {
        let key = record.key.clone();
        let path = self.records_path(&key.entity_type, key.entity_id);
        let mut set = self.load_set(&path, &key.entity_type, key.entity_id)?;
        if set.upsert(record) {
            self.save_set(&path, &set)?;
            info!(
                entity_type = %key.entity_type,
                entity_id = %key.entity_id,
                revision_id = %key.revision_id,
                workflow = %key.workflow_id,
                file = ?path,
                "State record committed"
            );
        } else {
            debug!(
                entity_type = %key.entity_type,
                entity_id = %key.entity_id,
                revision_id = %key.revision_id,
                "Identical state record, commit skipped"
            );
        }
        Ok(())
    }

    fn load(&self, key: &TrackedEntityKey) -> Result<Option<StateRecord>, StoreError> {
        let path = self.records_path(&key.entity_type, key.entity_id);
        let set = self.load_set(&path, &key.entity_type, key.entity_id)?;
        Ok(set.get(key).cloned())
    }
}
