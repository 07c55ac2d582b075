/// Read-mostly snapshot of one host entity revision.
///
/// The engine mutates exactly two things through this trait: the
/// default-revision flag, and (via the publish capability) the published
/// flag. Persisting the entity afterwards stays the host's responsibility,
/// inside the host's own transaction.
pub trait EntityRevisionView {
    fn entity_type(&self) -> &str;
    fn bundle(&self) -> &str;
    fn entity_id(&self) -> u64;

    /// Entity has never been saved; no state record can exist yet.
    fn is_new(&self) -> bool;
    /// The pending save creates a new revision.
    fn is_new_revision(&self) -> bool;

    /// Revision id the caller loaded this view from.
    fn loaded_revision_id(&self) -> u64;
    /// The entity's live revision id (equals the loaded id outside reverts).
    fn current_revision_id(&self) -> u64;

    fn is_default_revision(&self) -> bool;
    fn set_default_revision(&mut self, default: bool);

    /// Host collaborator query: is the entity's current default revision
    /// published? Entities without a persisted default yet report `false`,
    /// which is what promotes the first revision chain to default.
    fn default_revision_published(&self) -> bool;

    /// Publish capability, when the entity type supports it.
    fn publishing(&self) -> Option<&dyn SupportsPublishing>;
    fn publishing_mut(&mut self) -> Option<&mut dyn SupportsPublishing>;

    /// Translation capability, when the entity type is language-variant-aware.
    fn translation(&self) -> Option<&dyn SupportsTranslation>;
}

pub trait SupportsPublishing {
    fn is_published(&self) -> bool;
    fn set_published(&mut self, published: bool);
}

pub trait SupportsTranslation {
    fn langcode(&self) -> &str;
    /// The pending save introduces a translation that did not exist before.
    fn is_new_translation(&self) -> bool;
}
