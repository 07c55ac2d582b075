// draftgate - Revision-Scoped Workflow State Tracking
// This exposes the core components for embedding hosts and integration tests

pub mod config;
pub mod entity;
pub mod moderation;
pub mod store;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::{DraftgateConfig, StorageBackend};
pub use entity::{EntityRevisionView, SupportsPublishing, SupportsTranslation};
pub use moderation::{
    FieldError, ModerationEngine, ModerationField, TransitionController, TransitionError,
};
pub use store::{
    FileSystemStateStore, InMemoryStateStore, ResolvedState, RevisionLookup, StateQuery,
    StateRecord, StateStore, StoreError, TrackedEntityKey,
};
pub use telemetry::{create_moderation_span, init_telemetry};
pub use workflow::{StateDefinition, WorkflowDefinition, WorkflowError, WorkflowRegistry};
