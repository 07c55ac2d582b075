use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::definition::{WorkflowDefinition, WorkflowError};

/// Registry of workflow definitions and the bundles they moderate.
///
/// Populated at configuration time, then handed to the engine behind an
/// `Arc` and treated as read-only. A bundle with no assignment is simply
/// not moderated; an unknown workflow id is a hard error.
#[derive(Debug, Default)]
pub struct WorkflowRegistry {
    workflows: HashMap<String, Arc<WorkflowDefinition>>,
    bundles: HashMap<(String, String), String>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a workflow definition, replacing any previous definition
    /// with the same id.
    pub fn insert(&mut self, workflow: WorkflowDefinition) -> Arc<WorkflowDefinition> {
        let shared = Arc::new(workflow);
        self.workflows
            .insert(shared.id().to_string(), Arc::clone(&shared));
        shared
    }

    /// Put a bundle of an entity type under moderation by `workflow_id`.
    ///
    /// A bundle is governed by at most one workflow at a time.
    pub fn assign_bundle(
        &mut self,
        entity_type: &str,
        bundle: &str,
        workflow_id: &str,
    ) -> Result<(), WorkflowError> {
        if !self.workflows.contains_key(workflow_id) {
            return Err(WorkflowError::UnknownWorkflow {
                id: workflow_id.to_string(),
            });
        }
        let key = (entity_type.to_string(), bundle.to_string());
        if let Some(existing) = self.bundles.get(&key) {
            if existing != workflow_id {
                return Err(WorkflowError::BundleAlreadyModerated {
                    entity_type: entity_type.to_string(),
                    bundle: bundle.to_string(),
                    workflow: existing.clone(),
                });
            }
            return Ok(());
        }
        debug!(
            entity_type = %entity_type,
            bundle = %bundle,
            workflow = %workflow_id,
            "Bundle placed under moderation"
        );
        self.bundles.insert(key, workflow_id.to_string());
        Ok(())
    }

    pub fn get(&self, workflow_id: &str) -> Result<Arc<WorkflowDefinition>, WorkflowError> {
        self.workflows
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownWorkflow {
                id: workflow_id.to_string(),
            })
    }

    /// The workflow moderating a bundle, or `None` when the bundle is not
    /// moderated at all.
    pub fn workflow_for(&self, entity_type: &str, bundle: &str) -> Option<Arc<WorkflowDefinition>> {
        let key = (entity_type.to_string(), bundle.to_string());
        let workflow_id = self.bundles.get(&key)?;
        self.workflows.get(workflow_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::definition::StateDefinition;

    fn registry_with_editorial() -> WorkflowRegistry {
        let mut registry = WorkflowRegistry::new();
        registry.insert(
            WorkflowDefinition::new("editorial", "Editorial")
                .with_state(StateDefinition::new("draft", "Draft"))
                .with_state(
                    StateDefinition::new("published", "Published")
                        .published(true)
                        .default_revision(true),
                ),
        );
        registry
    }

    #[test]
    fn unknown_workflow_id_is_an_error() {
        let registry = registry_with_editorial();
        assert!(matches!(
            registry.get("edit0rial"),
            Err(WorkflowError::UnknownWorkflow { .. })
        ));
    }

    #[test]
    fn unassigned_bundle_is_not_moderated() {
        let mut registry = registry_with_editorial();
        registry.assign_bundle("node", "article", "editorial").unwrap();

        assert!(registry.workflow_for("node", "article").is_some());
        assert!(registry.workflow_for("node", "page").is_none());
        assert!(registry.workflow_for("block", "article").is_none());
    }

    #[test]
    fn bundle_cannot_switch_workflows_silently() {
        let mut registry = registry_with_editorial();
        registry.insert(
            WorkflowDefinition::new("legal", "Legal")
                .with_state(StateDefinition::new("pending", "Pending")),
        );
        registry.assign_bundle("node", "article", "editorial").unwrap();

        // Re-assigning the same workflow is fine, a different one is not.
        registry.assign_bundle("node", "article", "editorial").unwrap();
        assert!(matches!(
            registry.assign_bundle("node", "article", "legal"),
            Err(WorkflowError::BundleAlreadyModerated { .. })
        ));
    }

    #[test]
    fn assigning_to_missing_workflow_fails() {
        let mut registry = registry_with_editorial();
        assert!(matches!(
            registry.assign_bundle("node", "article", "missing"),
            Err(WorkflowError::UnknownWorkflow { .. })
        ));
    }
}
