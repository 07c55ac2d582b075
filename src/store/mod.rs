// State Store Module - Revision-Scoped Record Persistence
//
// Maps (entity type, entity id, revision id, workflow id) keys to moderation
// state records, honoring revision and translation semantics. The store is a
// pure data-access layer: atomicity across an entity save belongs to the
// host's transaction, and no locking beyond interior mutability happens here.

pub mod filesystem;
pub mod memory;
pub mod types;

use thiserror::Error;

pub use filesystem::FileSystemStateStore;
pub use memory::InMemoryStateStore;
pub use types::{
    RecordSet, ResolvedState, RevisionLookup, StateQuery, StateRecord, TrackedEntityKey,
    UNDETERMINED_LANGCODE,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("State records corrupted: {reason}")]
    Corruption { reason: String },
}

/// Persistence boundary for moderation state records.
///
/// `resolve` returning `Ok(None)` is the expected no-record branch (new or
/// never-moderated entities); callers fall back to the workflow's initial
/// state without persisting anything.
pub trait StateStore: Send + Sync {
    /// Resolve the current state id for the query's target revision.
    ///
    /// May persist a translation branch created copy-on-read.
    fn resolve(&self, query: &StateQuery) -> Result<Option<ResolvedState>, StoreError>;

    /// Insert or update the record for its key. Never touches a different
    /// revision's record; committing identical content twice is a no-op.
    fn commit(&self, record: StateRecord) -> Result<(), StoreError>;

    /// Point lookup of one revision's record.
    fn load(&self, key: &TrackedEntityKey) -> Result<Option<StateRecord>, StoreError>;
}
