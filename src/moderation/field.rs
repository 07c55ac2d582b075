use thiserror::Error;

use super::controller::TransitionError;
use super::engine::ModerationEngine;
use crate::entity::EntityRevisionView;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("Moderation state holds a single value; index {index} is out of range")]
    InvalidIndex { index: usize },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// The single-slot computed moderation state field.
///
/// The value is derived lazily on first access and memoized; assignment
/// invalidates the cache instead of writing through, so the next read
/// re-derives from the store. An absent derivation result is never cached,
/// letting later reads retry.
#[derive(Debug, Clone, Default)]
pub struct ModerationField {
    cached: Option<String>,
}

impl ModerationField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the field. Only slot 0 exists; a revision has exactly one
    /// moderation state.
    pub fn value(
        &mut self,
        index: usize,
        engine: &ModerationEngine,
        entity: &dyn EntityRevisionView,
    ) -> Result<Option<&str>, FieldError> {
        if index != 0 {
            return Err(FieldError::InvalidIndex { index });
        }
        if self.cached.is_none() {
            self.cached = engine.compute_current_state(entity)?;
        }
        Ok(self.cached.as_deref())
    }

    /// Assign a new state: drives the transition decision and the record
    /// commit, then drops the memoized value.
    pub fn assign(
        &mut self,
        engine: &ModerationEngine,
        entity: &mut dyn EntityRevisionView,
        new_state_id: &str,
    ) -> Result<(), FieldError> {
        engine.on_field_changed(entity, new_state_id)?;
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entity::mocks::MockEntity;
    use crate::store::{InMemoryStateStore, StateRecord, StateStore, TrackedEntityKey};
    use crate::workflow::{StateDefinition, WorkflowDefinition, WorkflowRegistry};

    fn engine_with_store() -> (ModerationEngine, Arc<InMemoryStateStore>) {
        let mut registry = WorkflowRegistry::new();
        registry.insert(
            WorkflowDefinition::new("editorial", "Editorial")
                .with_state(StateDefinition::new("draft", "Draft"))
                .with_state(
                    StateDefinition::new("published", "Published")
                        .published(true)
                        .default_revision(true),
                )
                .with_initial_state("draft"),
        );
        registry.assign_bundle("node", "article", "editorial").unwrap();
        let store = Arc::new(InMemoryStateStore::new());
        let engine = ModerationEngine::new(Arc::new(registry), store.clone());
        (engine, store)
    }

    #[test]
    fn non_zero_index_is_rejected() {
        let (engine, _store) = engine_with_store();
        let entity = MockEntity::new("node", "article", 1);
        let mut field = ModerationField::new();

        let err = field.value(1, &engine, &entity).unwrap_err();
        assert!(matches!(err, FieldError::InvalidIndex { index: 1 }));
    }

    #[test]
    fn repeated_reads_return_the_memoized_value() {
        let (engine, store) = engine_with_store();
        let entity = MockEntity::new("node", "article", 1).saved(1);
        store
            .commit(StateRecord::new(
                TrackedEntityKey::new("node", 1, 1, "editorial"),
                None,
                "draft",
            ))
            .unwrap();

        let mut field = ModerationField::new();
        assert_eq!(field.value(0, &engine, &entity).unwrap(), Some("draft"));

        // A write behind the field's back is not observed until invalidation.
        let mut record = StateRecord::new(
            TrackedEntityKey::new("node", 1, 1, "editorial"),
            None,
            "draft",
        );
        record.set_state(None, "published");
        store.commit(record).unwrap();
        assert_eq!(field.value(0, &engine, &entity).unwrap(), Some("draft"));

        field.invalidate();
        assert_eq!(field.value(0, &engine, &entity).unwrap(), Some("published"));
    }

    #[test]
    fn assignment_invalidates_the_cache() {
        let (engine, _store) = engine_with_store();
        let mut entity = MockEntity::new("node", "article", 1);
        let mut field = ModerationField::new();

        assert_eq!(field.value(0, &engine, &entity).unwrap(), Some("draft"));
        field.assign(&engine, &mut entity, "published").unwrap();

        let entity = entity.saved(1);
        assert_eq!(field.value(0, &engine, &entity).unwrap(), Some("published"));
    }

    #[test]
    fn absent_result_is_not_cached() {
        let (engine, _store) = engine_with_store();
        // Unmoderated bundle derives to nothing.
        let entity = MockEntity::new("node", "page", 1);
        let mut field = ModerationField::new();
        assert_eq!(field.value(0, &engine, &entity).unwrap(), None);

        // Once the derivation can answer, the same field picks it up.
        let entity = MockEntity::new("node", "article", 1);
        assert_eq!(field.value(0, &engine, &entity).unwrap(), Some("draft"));
    }
}
