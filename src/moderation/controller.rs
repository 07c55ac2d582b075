use thiserror::Error;
use tracing::{debug, info};

use crate::entity::EntityRevisionView;
use crate::store::StoreError;
use crate::workflow::{WorkflowDefinition, WorkflowError};

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Decides the revision flags for a proposed state assignment.
///
/// Everything irregular short of a malformed workflow degrades gracefully:
/// unknown state ids are tolerated without side effects, and entities
/// without the publish capability simply keep their flags.
#[derive(Debug, Default)]
pub struct TransitionController;

impl TransitionController {
    pub fn new() -> Self {
        Self
    }

    pub fn on_state_assigned(
        &self,
        entity: &mut dyn EntityRevisionView,
        workflow: &WorkflowDefinition,
        new_state_id: &str,
    ) -> Result<(), TransitionError> {
        if !workflow.has_state(new_state_id) {
            // Transitional ids the workflow does not know yet; leave every
            // flag alone.
            debug!(
                workflow = %workflow.id(),
                state = %new_state_id,
                "State not in workflow, flags untouched"
            );
            return Ok(());
        }
        let state = workflow.state(new_state_id)?;
        let published_state = state.published;
        let forces_default = state.default_revision;

        let is_new_translation = entity
            .translation()
            .is_some_and(|t| t.is_new_translation());

        // Promote to default unless a published default revision already
        // exists and this state does not force the promotion itself.
        let update_default = entity.is_new()
            || is_new_translation
            || forces_default
            || !entity.default_revision_published();
        entity.set_default_revision(update_default);

        info!(
            entity_type = %entity.entity_type(),
            entity_id = %entity.entity_id(),
            workflow = %workflow.id(),
            state = %new_state_id,
            default_revision = %update_default,
            "Moderation state assigned"
        );

        if let Some(publishing) = entity.publishing_mut() {
            if publishing.is_published() != published_state {
                publishing.set_published(published_state);
                debug!(
                    state = %new_state_id,
                    published = %published_state,
                    "Published flag toggled"
                );
            }
        }

        Ok(())
    }
}
