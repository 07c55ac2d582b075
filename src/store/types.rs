use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel language branch for entities that are not language-variant-aware,
/// so every record carries the same shape.
pub const UNDETERMINED_LANGCODE: &str = "und";

/// Identity of one tracked revision's state record.
///
/// Invariant: at most one `StateRecord` exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackedEntityKey {
    pub entity_type: String,
    pub entity_id: u64,
    pub revision_id: u64,
    pub workflow_id: String,
}

impl TrackedEntityKey {
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: u64,
        revision_id: u64,
        workflow_id: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id,
            revision_id,
            workflow_id: workflow_id.into(),
        }
    }
}

/// The persisted moderation state of one entity revision, per language branch.
///
/// Created lazily on first moderated save, mutated on transition, never
/// deleted: historical revisions keep their record for audit and revert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub key: TrackedEntityKey,
    /// Store-assigned, monotonically increasing per entity; 0 until committed.
    pub sequence: u64,
    pub default_langcode: String,
    /// Language branch -> moderation state id.
    pub states: BTreeMap<String, String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl StateRecord {
    pub fn new(key: TrackedEntityKey, langcode: Option<&str>, state_id: &str) -> Self {
        let langcode = langcode.unwrap_or(UNDETERMINED_LANGCODE).to_string();
        let mut states = BTreeMap::new();
        states.insert(langcode.clone(), state_id.to_string());
        let now = Utc::now();
        Self {
            key,
            sequence: 0,
            default_langcode: langcode,
            states,
            created: now,
            updated: now,
        }
    }

    pub fn state_for(&self, langcode: &str) -> Option<&str> {
        self.states.get(langcode).map(String::as_str)
    }

    pub fn default_state(&self) -> Option<&str> {
        self.state_for(&self.default_langcode)
    }

    pub fn set_state(&mut self, langcode: Option<&str>, state_id: &str) {
        let langcode = langcode.unwrap_or(UNDETERMINED_LANGCODE);
        self.states
            .insert(langcode.to_string(), state_id.to_string());
    }

    fn same_content(&self, other: &StateRecord) -> bool {
        self.default_langcode == other.default_langcode && self.states == other.states
    }
}

/// How the target revision of a resolve is chosen.
///
/// Passed explicitly by the caller rather than inferred from entity flags, so
/// a revert cannot be mistaken for an ordinary new revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionLookup {
    #[default]
    Normal,
    Reverting,
}

/// Input of a current-state resolution.
#[derive(Debug, Clone)]
pub struct StateQuery {
    pub entity_type: String,
    pub entity_id: u64,
    pub workflow_id: String,
    pub current_revision_id: u64,
    pub loaded_revision_id: u64,
    pub lookup: RevisionLookup,
    pub langcode: Option<String>,
}

impl StateQuery {
    /// A revert resolves against the revision the caller loaded, not the
    /// live current revision.
    pub fn target_revision_id(&self) -> u64 {
        match self.lookup {
            RevisionLookup::Reverting => self.loaded_revision_id,
            RevisionLookup::Normal => self.current_revision_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedState {
    pub state_id: String,
    pub langcode: String,
    pub revision_id: u64,
}

/// All state records of one entity, across revisions and workflows.
///
/// Both store backends keep one `RecordSet` per (entity type, entity id) and
/// delegate the revision and translation semantics here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    next_sequence: u64,
    records: Vec<StateRecord>,
}

impl RecordSet {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, key: &TrackedEntityKey) -> Option<&StateRecord> {
        self.records.iter().find(|r| &r.key == key)
    }

    pub fn records(&self) -> &[StateRecord] {
        &self.records
    }

    /// Insert or update the record for its key. Returns whether the set
    /// changed; committing identical content twice is a no-op and leaves
    /// even the `updated` timestamp untouched.
    pub fn upsert(&mut self, mut record: StateRecord) -> bool {
        if let Some(existing) = self.records.iter_mut().find(|r| r.key == record.key) {
            if existing.same_content(&record) {
                return false;
            }
            existing.default_langcode = record.default_langcode;
            existing.states = record.states;
            existing.updated = Utc::now();
            return true;
        }
        self.next_sequence += 1;
        record.sequence = self.next_sequence;
        self.records.push(record);
        true
    }

    /// Resolve the current state for a query against this entity's records.
    ///
    /// Filters to the target revision, takes the highest-sequence record, and
    /// applies translation semantics: a missing requested branch is created
    /// copy-on-read from the default branch. The returned flag tells the
    /// backend whether the set mutated and must be persisted.
    pub fn resolve(&mut self, query: &StateQuery) -> (Option<ResolvedState>, bool) {
        let target = query.target_revision_id();
        let record = self
            .records
            .iter_mut()
            .filter(|r| r.key.workflow_id == query.workflow_id && r.key.revision_id == target)
            .max_by_key(|r| r.sequence);
        let Some(record) = record else {
            return (None, false);
        };

        let requested = query
            .langcode
            .as_deref()
            .unwrap_or(UNDETERMINED_LANGCODE);

        if let Some(state_id) = record.state_for(requested) {
            let resolved = ResolvedState {
                state_id: state_id.to_string(),
                langcode: requested.to_string(),
                revision_id: record.key.revision_id,
            };
            return (Some(resolved), false);
        }

        // Copy-on-read: branch the default translation for the requested
        // language before answering.
        let Some(base_state) = record.default_state().map(str::to_string) else {
            return (None, false);
        };
        record
            .states
            .insert(requested.to_string(), base_state.clone());
        record.updated = Utc::now();
        let resolved = ResolvedState {
            state_id: base_state,
            langcode: requested.to_string(),
            revision_id: record.key.revision_id,
        };
        (Some(resolved), true)
    }
}
