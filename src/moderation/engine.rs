use std::sync::Arc;

use tracing::debug;

use super::controller::{TransitionController, TransitionError};
use crate::config::{DraftgateConfig, StorageBackend};
use crate::entity::EntityRevisionView;
use crate::store::{
    FileSystemStateStore, InMemoryStateStore, RevisionLookup, StateQuery, StateRecord, StateStore,
    TrackedEntityKey,
};
use crate::telemetry::create_moderation_span;
use crate::workflow::WorkflowRegistry;

/// The facade the host entity layer talks to.
///
/// All collaborators arrive through the constructor; nothing is fetched from
/// ambient global state. Within one entity save the engine runs
/// resolve -> decide -> commit synchronously, so the commit lands inside the
/// host's transaction boundary.
pub struct ModerationEngine {
    registry: Arc<WorkflowRegistry>,
    store: Arc<dyn StateStore>,
    controller: TransitionController,
}

impl ModerationEngine {
    pub fn new(registry: Arc<WorkflowRegistry>, store: Arc<dyn StateStore>) -> Self {
        Self {
            registry,
            store,
            controller: TransitionController::new(),
        }
    }

    /// Build an engine with the store backend named by the configuration.
    pub fn from_config(config: &DraftgateConfig, registry: Arc<WorkflowRegistry>) -> Self {
        let store: Arc<dyn StateStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemoryStateStore::new()),
            StorageBackend::Filesystem => {
                Arc::new(FileSystemStateStore::new(&config.storage.directory))
            }
        };
        Self::new(registry, store)
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    /// Hosts that do not pass an explicit lookup mode get it derived from the
    /// revision ids: a pending new revision whose loaded id differs from the
    /// live id is a revert in progress.
    fn lookup_mode(entity: &dyn EntityRevisionView) -> RevisionLookup {
        if entity.is_new_revision() && entity.loaded_revision_id() != entity.current_revision_id()
        {
            RevisionLookup::Reverting
        } else {
            RevisionLookup::Normal
        }
    }

    fn query_for(
        entity: &dyn EntityRevisionView,
        workflow_id: &str,
        lookup: RevisionLookup,
    ) -> StateQuery {
        StateQuery {
            entity_type: entity.entity_type().to_string(),
            entity_id: entity.entity_id(),
            workflow_id: workflow_id.to_string(),
            current_revision_id: entity.current_revision_id(),
            loaded_revision_id: entity.loaded_revision_id(),
            lookup,
            langcode: entity.translation().map(|t| t.langcode().to_string()),
        }
    }

    /// Current moderation state of the entity revision, or `None` when the
    /// bundle is not moderated at all.
    pub fn compute_current_state(
        &self,
        entity: &dyn EntityRevisionView,
    ) -> Result<Option<String>, TransitionError> {
        self.compute_current_state_with(entity, Self::lookup_mode(entity))
    }

    pub fn compute_current_state_with(
        &self,
        entity: &dyn EntityRevisionView,
        lookup: RevisionLookup,
    ) -> Result<Option<String>, TransitionError> {
        let Some(workflow) = self
            .registry
            .workflow_for(entity.entity_type(), entity.bundle())
        else {
            debug!(
                entity_type = %entity.entity_type(),
                bundle = %entity.bundle(),
                "Bundle not moderated"
            );
            return Ok(None);
        };
        let publish_capable = entity.publishing().is_some();

        // New entities cannot have a record yet; nothing is persisted here.
        if entity.is_new() {
            return Ok(Some(workflow.initial_state(publish_capable)?.id.clone()));
        }

        let query = Self::query_for(entity, workflow.id(), lookup);
        match self.store.resolve(&query)? {
            Some(resolved) => Ok(Some(resolved.state_id)),
            None => Ok(Some(workflow.initial_state(publish_capable)?.id.clone())),
        }
    }

    /// React to the state field being assigned: decide the revision flags,
    /// then commit the record for the revision being saved.
    pub fn on_field_changed(
        &self,
        entity: &mut dyn EntityRevisionView,
        new_state_id: &str,
    ) -> Result<(), TransitionError> {
        let Some(workflow) = self
            .registry
            .workflow_for(entity.entity_type(), entity.bundle())
        else {
            debug!(
                entity_type = %entity.entity_type(),
                bundle = %entity.bundle(),
                "Bundle not moderated, assignment ignored"
            );
            return Ok(());
        };
        let _span = create_moderation_span(
            "on_field_changed",
            entity.entity_type(),
            entity.entity_id(),
            Some(workflow.id()),
        )
        .entered();

        // Resolution of the current state happens before the decision.
        let previous = if entity.is_new() {
            None
        } else {
            let query = Self::query_for(entity, workflow.id(), Self::lookup_mode(entity));
            self.store.resolve(&query)?.map(|r| r.state_id)
        };

        self.controller
            .on_state_assigned(entity, &workflow, new_state_id)?;

        if !workflow.has_state(new_state_id) {
            // Transitional id; the controller already left the flags alone,
            // and there is nothing to persist.
            return Ok(());
        }

        let key = TrackedEntityKey::new(
            entity.entity_type(),
            entity.entity_id(),
            entity.current_revision_id(),
            workflow.id(),
        );
        let langcode = entity.translation().map(|t| t.langcode().to_string());
        let record = match self.store.load(&key)? {
            Some(mut record) => {
                record.set_state(langcode.as_deref(), new_state_id);
                record
            }
            None => StateRecord::new(key, langcode.as_deref(), new_state_id),
        };
        self.store.commit(record)?;

        debug!(
            entity_type = %entity.entity_type(),
            entity_id = %entity.entity_id(),
            revision_id = %entity.current_revision_id(),
            previous = ?previous,
            new = %new_state_id,
            "State transition committed"
        );
        Ok(())
    }
}
