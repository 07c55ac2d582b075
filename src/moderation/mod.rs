// Moderation Module - Transition Decisions and the Computed State Field
//
// Ties the workflow tables and the state store to one entity revision at a
// time: the controller decides the default-revision and published flags for
// a state assignment, the engine sequences resolve -> decide -> commit inside
// the host's save, and the field memoizes the single computed state slot.

pub mod controller;
pub mod engine;
pub mod field;

pub use controller::{TransitionController, TransitionError};
pub use engine::ModerationEngine;
pub use field::{FieldError, ModerationField};
