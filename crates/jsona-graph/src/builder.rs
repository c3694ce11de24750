//! # Graph Builder
//!
//! This module defines the [`JsonDeserializer`], which turns the resources of a
//! [`Document`] into a graph of mapper-defined models with relationships
//! resolved into model handles.

use crate::document::{Document, EntityKey, Linkage, PrimaryData, ResourceIdentifier, ResourceObject};
use crate::included::IncludedIndex;
use crate::mapper::{ModelMapper, Related, Relationships};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Result of a deserialization, mirroring the shape of the primary data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deserialized<M> {
    One(M),
    Many(Vec<M>),
}

impl<M> Deserialized<M> {
    /// The model of a single-resource document.
    pub fn one(&self) -> Option<&M> {
        match self {
            Deserialized::One(model) => Some(model),
            Deserialized::Many(_) => None,
        }
    }

    /// The models in primary-data order; a single model becomes a one-element vec.
    pub fn into_vec(self) -> Vec<M> {
        match self {
            Deserialized::One(model) => vec![model],
            Deserialized::Many(models) => models,
        }
    }
}

/// Identity cache entry.
///
/// `described` is false while the model has only been seen as a `{type, id}`
/// reference; the first described occurrence of the entity populates it.
struct Cached<M> {
    model: M,
    described: bool,
}

/// Builds the model graph of one document.
///
/// # Architecture Note
/// The identity cache and the included index are fields of the deserializer and
/// [`build`](Self::build) consumes it, so both live exactly as long as one call.
/// Nothing is shared between documents.
///
/// # Cycles
/// A model is registered in the identity cache right after the mapper creates
/// it and *before* its relationships are resolved. When resolution leads back
/// to an entity that is still being built, the cache returns the very same
/// handle instead of recursing again, so `A -> B -> A` ends with `B`'s relation
/// pointing at `A` itself.
///
/// ```rust
/// use jsona_graph::{Document, JsonDeserializer, ModelGraph};
///
/// let document: Document = r#"{
///     "data": {
///         "type": "people", "id": "1",
///         "relationships": { "friend": { "data": { "type": "people", "id": "2" } } }
///     },
///     "included": [{
///         "type": "people", "id": "2",
///         "relationships": { "friend": { "data": { "type": "people", "id": "1" } } }
///     }]
/// }"#.parse().unwrap();
///
/// let mut graph = ModelGraph::new();
/// let root = JsonDeserializer::new(&document, &mut graph).build().unwrap();
/// let alice = *root.one().unwrap();
/// let bob = *graph.related(alice, "friend").unwrap().one().unwrap();
/// assert_eq!(graph.related(bob, "friend").unwrap().one(), Some(&alice));
/// ```
///
/// # Recursion depth
/// Cycles are cut by the cache, not by a depth limit. Very deep acyclic chains
/// of relationships recurse once per link.
pub struct JsonDeserializer<'d, 'm, M: ModelMapper> {
    document: &'d Document,
    mapper: &'m mut M,
    included: Option<IncludedIndex<'d>>,
    cache: HashMap<EntityKey, Cached<M::Model>>,
}

impl<'d, 'm, M: ModelMapper> JsonDeserializer<'d, 'm, M> {
    pub fn new(document: &'d Document, mapper: &'m mut M) -> Self {
        Self {
            document,
            mapper,
            included: None,
            cache: HashMap::new(),
        }
    }

    /// Builds the models of the primary data.
    ///
    /// Returns `None` when the document has no usable primary data or when the
    /// mapper declines the single primary resource. Collection entries that are
    /// `null` or declined are left out; the remaining models keep their order.
    #[tracing::instrument(skip_all)]
    pub fn build(mut self) -> Option<Deserialized<M::Model>> {
        let document = self.document;
        let result = match document.data.as_ref()? {
            PrimaryData::Many(items) => {
                let mut models = Vec::with_capacity(items.len());
                for item in items.iter().flatten() {
                    models.extend(self.build_model(item));
                }
                Some(Deserialized::Many(models))
            }
            PrimaryData::One(resource) => self.build_model(resource).map(Deserialized::One),
        };
        debug!(entities = self.cache.len(), "Built document");
        result
    }

    /// Returns the model for one resource, reusing the cached model of its entity.
    fn build_model(&mut self, resource: &ResourceObject) -> Option<M::Model> {
        let key = resource.key();

        if let Some(key) = &key {
            if let Some(cached) = self.cache.get_mut(key) {
                if resource.is_stub() || cached.described {
                    trace!(%key, "Cache hit");
                    return Some(cached.model.clone());
                }
                cached.described = true;
                let model = cached.model.clone();
                debug!(%key, "Populating model first seen as a reference");
                self.populate(&model, resource);
                return Some(model);
            }
        }

        let kind = resource.kind.as_deref().unwrap_or_default();
        let Some(model) = self.mapper.create_model(kind) else {
            debug!(kind, id = ?resource.id, "Mapper declined model");
            return None;
        };

        match key {
            Some(key) => {
                trace!(%key, stub = resource.is_stub(), "Created");
                self.cache.insert(
                    key,
                    Cached {
                        model: model.clone(),
                        described: !resource.is_stub(),
                    },
                );
            }
            None => trace!(kind, "Created model without identity"),
        }

        if let Some(id) = &resource.id {
            self.mapper.set_id(&model, id);
        }
        self.populate(&model, resource);
        Some(model)
    }

    /// Writes attributes, meta, links and relationships onto a model.
    fn populate(&mut self, model: &M::Model, resource: &ResourceObject) {
        if let Some(attributes) = &resource.attributes {
            self.mapper.set_attributes(model, attributes);
        }
        if let Some(meta) = &resource.meta {
            if let Some(support) = self.mapper.meta_support() {
                support.set_meta(model, meta);
            }
        }
        if let Some(links) = &resource.links {
            if let Some(support) = self.mapper.links_support() {
                support.set_links(model, links);
            }
        }
        if let Some(relationships) = self.build_relationships(resource, model) {
            self.mapper.set_relationships(model, relationships);
        }
    }

    /// Resolves the relationships of `resource`, or `None` when there is nothing
    /// to attach.
    ///
    /// A `null` entry in any to-many linkage voids the whole relationship set of
    /// the resource, not just that relation.
    fn build_relationships(
        &mut self,
        resource: &ResourceObject,
        model: &M::Model,
    ) -> Option<Relationships<M::Model>> {
        let relationships = resource.relationships.as_ref()?;
        let mut ready = Relationships::new();

        for (name, relationship) in relationships {
            match &relationship.data {
                Linkage::Absent => {}
                Linkage::Null => {
                    ready.insert(name.clone(), Related::Null);
                }
                Linkage::One(identifier) => {
                    let target = self.resolve(identifier);
                    if let Some(related) = self.build_model(&target) {
                        ready.insert(name.clone(), Related::One(related));
                    }
                }
                Linkage::Many(items) => {
                    let mut related = Vec::with_capacity(items.len());
                    for item in items {
                        let Some(identifier) = item else {
                            debug!(relation = %name, "Null entry in to-many linkage, dropping relationships");
                            return None;
                        };
                        let target = self.resolve(identifier);
                        related.extend(self.build_model(&target));
                    }
                    ready.insert(name.clone(), Related::Many(related));
                }
            }

            if let Some(links) = &relationship.links {
                if let Some(support) = self.mapper.relationship_links_support() {
                    support.set_relationship_links(model, name, links);
                }
            }
            if let Some(meta) = &relationship.meta {
                if let Some(support) = self.mapper.relationship_meta_support() {
                    support.set_relationship_meta(model, name, meta);
                }
            }
        }

        (!ready.is_empty()).then_some(ready)
    }

    /// Looks an identifier up in the included pool, indexing it on first use.
    fn resolve(&mut self, identifier: &ResourceIdentifier) -> Cow<'d, ResourceObject> {
        let document = self.document;
        self.included
            .get_or_insert_with(|| IncludedIndex::build(document))
            .lookup(identifier)
    }
}
