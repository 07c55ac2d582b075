// Workflow Module - Immutable State Tables
//
// A workflow is a named, ordered set of states, each carrying the two flags
// the transition logic cares about: does this state publish the revision, and
// does it promote the revision to default. Definitions are loaded once and
// shared read-only; the registry maps entity bundles to their workflow.

pub mod definition;
pub mod registry;

pub use definition::{StateDefinition, WorkflowDefinition, WorkflowError};
pub use registry::WorkflowRegistry;
