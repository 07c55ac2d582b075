// Mock entity for tests - no host storage behind it

use super::view::{EntityRevisionView, SupportsPublishing, SupportsTranslation};

/// A self-contained entity revision for exercising the engine without a host
/// storage layer. Capability fields are `Option`s: `None` means the entity
/// type lacks that capability entirely.
#[derive(Debug, Clone)]
pub struct MockEntity {
    pub entity_type: String,
    pub bundle: String,
    pub entity_id: u64,
    pub new: bool,
    pub new_revision: bool,
    pub loaded_revision_id: u64,
    pub current_revision_id: u64,
    pub default_revision: bool,
    pub default_revision_published: bool,
    pub published: Option<bool>,
    pub langcode: Option<String>,
    pub new_translation: bool,
}

impl MockEntity {
    pub fn new(entity_type: &str, bundle: &str, entity_id: u64) -> Self {
        Self {
            entity_type: entity_type.to_string(),
            bundle: bundle.to_string(),
            entity_id,
            new: true,
            new_revision: false,
            loaded_revision_id: 1,
            current_revision_id: 1,
            default_revision: true,
            default_revision_published: false,
            published: Some(false),
            langcode: None,
            new_translation: false,
        }
    }

    /// Mark the entity as already saved at the given revision.
    pub fn saved(mut self, revision_id: u64) -> Self {
        self.new = false;
        self.loaded_revision_id = revision_id;
        self.current_revision_id = revision_id;
        self
    }

    /// The pending save creates `revision_id` on top of the current one.
    pub fn with_new_revision(mut self, revision_id: u64) -> Self {
        self.new_revision = true;
        self.loaded_revision_id = revision_id;
        self.current_revision_id = revision_id;
        self
    }

    /// Simulate a revert: the caller loaded `loaded`, the save creates a new
    /// current revision.
    pub fn reverting(mut self, loaded: u64, current: u64) -> Self {
        self.new_revision = true;
        self.loaded_revision_id = loaded;
        self.current_revision_id = current;
        self
    }

    pub fn with_published_default(mut self, published: bool) -> Self {
        self.default_revision_published = published;
        self
    }

    pub fn without_publishing(mut self) -> Self {
        self.published = None;
        self
    }

    pub fn with_langcode(mut self, langcode: &str) -> Self {
        self.langcode = Some(langcode.to_string());
        self
    }

    pub fn as_new_translation(mut self) -> Self {
        self.new_translation = true;
        self
    }
}

impl EntityRevisionView for MockEntity {
    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn bundle(&self) -> &str {
        &self.bundle
    }

    fn entity_id(&self) -> u64 {
        self.entity_id
    }

    fn is_new(&self) -> bool {
        self.new
    }

    fn is_new_revision(&self) -> bool {
        self.new_revision
    }

    fn loaded_revision_id(&self) -> u64 {
        self.loaded_revision_id
    }

    fn current_revision_id(&self) -> u64 {
        self.current_revision_id
    }

    fn is_default_revision(&self) -> bool {
        self.default_revision
    }

    fn set_default_revision(&mut self, default: bool) {
        self.default_revision = default;
    }

    fn default_revision_published(&self) -> bool {
        self.default_revision_published
    }

    fn publishing(&self) -> Option<&dyn SupportsPublishing> {
        if self.published.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn publishing_mut(&mut self) -> Option<&mut dyn SupportsPublishing> {
        if self.published.is_some() {
            Some(self)
        } else {
            None
        }
    }

    fn translation(&self) -> Option<&dyn SupportsTranslation> {
        if self.langcode.is_some() {
            Some(self)
        } else {
            None
        }
    }
}

impl SupportsPublishing for MockEntity {
    fn is_published(&self) -> bool {
        self.published.unwrap_or(false)
    }

    fn set_published(&mut self, published: bool) {
        self.published = Some(published);
    }
}

impl SupportsTranslation for MockEntity {
    fn langcode(&self) -> &str {
        self.langcode.as_deref().unwrap_or_default()
    }

    fn is_new_translation(&self) -> bool {
        self.new_translation
    }
}
