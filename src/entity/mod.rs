// Entity Module - Host Entity Boundary
//
// The engine never touches the host's entity storage directly. It sees one
// revision at a time through `EntityRevisionView`, and reaches optional
// behavior (publishing, translation) through capability traits resolved once
// per call site instead of dynamic probes.

pub mod view;

pub mod mocks;

pub use view::{EntityRevisionView, SupportsPublishing, SupportsTranslation};
