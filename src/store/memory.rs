use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, info};

use super::types::{RecordSet, ResolvedState, StateQuery, StateRecord, TrackedEntityKey};
use super::{StateStore, StoreError};

/// In-process state store, for tests and for hosts that flush moderation
/// records into their own persistence layer.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    entities: RwLock<HashMap<(String, u64), RecordSet>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for InMemoryStateStore {
    fn resolve(&self, query: &StateQuery) -> Result<Option<ResolvedState>, StoreError> {
        // Write access up front: resolve may branch a translation copy-on-read.
        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let Some(set) = entities.get_mut(&(query.entity_type.clone(), query.entity_id)) else {
            return Ok(None);
        };
        let (resolved, changed) = set.resolve(query);
        if changed {
            debug!(
                entity_type = %query.entity_type,
                entity_id = %query.entity_id,
                langcode = ?query.langcode,
                "Translation branch created copy-on-read"
            );
        }
        Ok(resolved)
    }

    fn commit(&self, record: StateRecord) -> Result<(), StoreError> {
        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let set = entities
            .entry((record.key.entity_type.clone(), record.key.entity_id))
            .or_default();
        let key = record.key.clone();
        if set.upsert(record) {
            info!(
                entity_type = %key.entity_type,
                entity_id = %key.entity_id,
                revision_id = %key.revision_id,
                workflow = %key.workflow_id,
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
        let entities = self
            .entities
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entities
            .get(&(key.entity_type.clone(), key.entity_id))
            .and_then(|set| set.get(key))
            .cloned())
    }
}
