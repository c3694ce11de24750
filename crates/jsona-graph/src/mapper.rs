//! # ModelMapper Trait
//!
//! The `ModelMapper` trait is the contract between the generic
//! [`JsonDeserializer`](crate::JsonDeserializer) and whatever domain models the
//! caller wants out of a document. The builder decides *which* models exist and
//! how they are linked; the mapper decides *what* a model is and how data is
//! written onto it.
//!
//! # Architecture Note
//! The builder never looks inside a model. It only stores and clones the
//! [`ModelMapper::Model`] handle, so a handle must be cheap to clone and must
//! keep pointing at the same underlying model. Index handles into an arena
//! ([`ModelGraph`](crate::graph::ModelGraph)) and shared pointers both work.
//! Equality of two handles is what "the same model" means to callers.
//!
//! # Optional Capabilities
//! Meta and links support is optional and probed at runtime through the
//! provided methods:
//! - [`ModelMapper::meta_support`]
//! - [`ModelMapper::links_support`]
//! - [`ModelMapper::relationship_meta_support`]
//! - [`ModelMapper::relationship_links_support`]
//!
//! Each returns `None` by default, in which case the builder skips the
//! corresponding data silently. Override the ones you implement the matching
//! capability trait for and return `Some(self)`.

use crate::document::{JsonMap, ResourceId};
use std::collections::BTreeMap;

/// A resolved relationship value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Related<M> {
    /// Explicitly empty to-one relation (`"data": null`).
    Null,
    One(M),
    Many(Vec<M>),
}

impl<M> Related<M> {
    /// The target of a to-one relation.
    pub fn one(&self) -> Option<&M> {
        match self {
            Related::One(model) => Some(model),
            _ => None,
        }
    }

    /// The targets of a to-many relation; empty for anything else.
    pub fn many(&self) -> &[M] {
        match self {
            Related::Many(models) => models,
            _ => &[],
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Related::Null)
    }
}

/// Relationship name to resolved value, as handed to
/// [`ModelMapper::set_relationships`].
pub type Relationships<M> = BTreeMap<String, Related<M>>;

/// Creates domain models and writes document data onto them.
pub trait ModelMapper {
    /// Handle to a built model. Clones must refer to the same model.
    type Model: Clone;

    /// Creates an empty model for a resource type, or declines with `None`.
    ///
    /// A declined type is treated as absent wherever it appears. Resources
    /// without a `type` member are offered as the empty string.
    fn create_model(&mut self, kind: &str) -> Option<Self::Model>;

    /// Assigns the resource id. Not called for resources without an id.
    fn set_id(&mut self, model: &Self::Model, id: &ResourceId);

    /// Copies the resource attributes onto the model.
    fn set_attributes(&mut self, model: &Self::Model, attributes: &JsonMap);

    /// Attaches resolved relationships. Never called with an empty map.
    fn set_relationships(&mut self, model: &Self::Model, relationships: Relationships<Self::Model>);

    // --- Optional Capabilities ---

    fn meta_support(&mut self) -> Option<&mut dyn MetaSupport<Self::Model>> {
        None
    }

    fn links_support(&mut self) -> Option<&mut dyn LinksSupport<Self::Model>> {
        None
    }

    fn relationship_meta_support(&mut self) -> Option<&mut dyn RelationshipMetaSupport<Self::Model>> {
        None
    }

    fn relationship_links_support(
        &mut self,
    ) -> Option<&mut dyn RelationshipLinksSupport<Self::Model>> {
        None
    }
}

/// Resource-level `meta`.
pub trait MetaSupport<M> {
    fn set_meta(&mut self, model: &M, meta: &JsonMap);
}

/// Resource-level `links`.
pub trait LinksSupport<M> {
    fn set_links(&mut self, model: &M, links: &JsonMap);
}

/// Relationship-level `meta`, keyed by relationship name.
pub trait RelationshipMetaSupport<M> {
    fn set_relationship_meta(&mut self, model: &M, relation: &str, meta: &JsonMap);
}

/// Relationship-level `links`, keyed by relationship name.
pub trait RelationshipLinksSupport<M> {
    fn set_relationship_links(&mut self, model: &M, relation: &str, links: &JsonMap);
}
