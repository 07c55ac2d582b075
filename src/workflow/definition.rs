use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Unknown workflow: {id}")]
    UnknownWorkflow { id: String },
    #[error("Workflow '{workflow}' has no state '{state}'")]
    UnknownState { workflow: String, state: String },
    #[error("Workflow '{id}' defines no states")]
    EmptyWorkflow { id: String },
    #[error("Bundle '{entity_type}.{bundle}' is already moderated by workflow '{workflow}'")]
    BundleAlreadyModerated {
        entity_type: String,
        bundle: String,
        workflow: String,
    },
}

/// One state of a workflow, with the flags driving revision handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub id: String,
    pub label: String,
    /// Revisions in this state carry the entity's published flag.
    pub published: bool,
    /// Revisions entering this state always become the default revision.
    pub default_revision: bool,
}

impl StateDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            published: false,
            default_revision: false,
        }
    }

    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    pub fn default_revision(mut self, default_revision: bool) -> Self {
        self.default_revision = default_revision;
        self
    }
}

/// Immutable description of a workflow's states.
///
/// Loaded once at configuration time and shared read-only by every tracker
/// referencing it, so lookups need no locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    id: String,
    label: String,
    states: Vec<StateDefinition>,
    initial_state_id: Option<String>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            states: Vec::new(),
            initial_state_id: None,
        }
    }

    pub fn with_state(mut self, state: StateDefinition) -> Self {
        self.states.push(state);
        self
    }

    pub fn with_initial_state(mut self, state_id: impl Into<String>) -> Self {
        self.initial_state_id = Some(state_id.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn states(&self) -> &[StateDefinition] {
        &self.states
    }

    pub fn has_state(&self, state_id: &str) -> bool {
        self.states.iter().any(|s| s.id == state_id)
    }

    pub fn state(&self, state_id: &str) -> Result<&StateDefinition, WorkflowError> {
        self.states
            .iter()
            .find(|s| s.id == state_id)
            .ok_or_else(|| WorkflowError::UnknownState {
                workflow: self.id.clone(),
                state: state_id.to_string(),
            })
    }

    /// The state a freshly moderated entity starts in.
    ///
    /// The configured initial state wins. Without one, a publish-capable
    /// entity starts in the first unpublished state so nothing goes live
    /// before an explicit transition; otherwise the first state in order.
    pub fn initial_state(&self, publish_capable: bool) -> Result<&StateDefinition, WorkflowError> {
        if let Some(initial_id) = &self.initial_state_id {
            return self.state(initial_id);
        }
        if publish_capable {
            if let Some(state) = self.states.iter().find(|s| !s.published) {
                return Ok(state);
            }
        }
        self.states.first().ok_or_else(|| WorkflowError::EmptyWorkflow {
            id: self.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editorial() -> WorkflowDefinition {
        WorkflowDefinition::new("editorial", "Editorial")
            .with_state(StateDefinition::new("draft", "Draft"))
            .with_state(
                StateDefinition::new("published", "Published")
                    .published(true)
                    .default_revision(true),
            )
            .with_state(StateDefinition::new("archived", "Archived").default_revision(true))
    }

    #[test]
    fn state_lookup() {
        let workflow = editorial();
        assert!(workflow.has_state("draft"));
        assert!(!workflow.has_state("review"));

        let published = workflow.state("published").unwrap();
        assert!(published.published);
        assert!(published.default_revision);

        let err = workflow.state("review").unwrap_err();
        assert!(matches!(err, WorkflowError::UnknownState { .. }));
    }

    #[test]
    fn initial_state_prefers_configured_id() {
        let workflow = editorial().with_initial_state("archived");
        assert_eq!(workflow.initial_state(true).unwrap().id, "archived");
    }

    #[test]
    fn initial_state_falls_back_to_first_unpublished() {
        let workflow = WorkflowDefinition::new("legal", "Legal")
            .with_state(
                StateDefinition::new("approved", "Approved")
                    .published(true)
                    .default_revision(true),
            )
            .with_state(StateDefinition::new("pending", "Pending"));

        // Publish-capable entities must not start in a live state.
        assert_eq!(workflow.initial_state(true).unwrap().id, "pending");
        // Entities without the capability just take the first state.
        assert_eq!(workflow.initial_state(false).unwrap().id, "approved");
    }

    #[test]
    fn initial_state_on_empty_workflow_fails() {
        let workflow = WorkflowDefinition::new("empty", "Empty");
        assert!(matches!(
            workflow.initial_state(false),
            Err(WorkflowError::EmptyWorkflow { .. })
        ));
    }

    #[test]
    fn configured_initial_state_must_exist() {
        let workflow = editorial().with_initial_state("review");
        assert!(matches!(
            workflow.initial_state(false),
            Err(WorkflowError::UnknownState { .. })
        ));
    }
}
