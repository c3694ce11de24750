//! # JSON:API Object Graphs
//!
//! This crate turns a [JSON:API](https://jsonapi.org) document into an in-memory
//! graph of domain models. Relationships, which arrive on the wire as
//! `{type, id}` pairs pointing into the side-loaded `included` pool, come out as
//! direct model handles, including cyclic and mutually recursive ones.
//!
//! ## Architecture Overview
//!
//! The crate separates concerns into three layers:
//!
//! 1. **Wire Layer** ([`document`]) - The document shapes, read with `serde`
//! 2. **Graph Layer** ([`JsonDeserializer`], [`IncludedIndex`]) - Identity resolution and recursion
//! 3. **Model Layer** ([`ModelMapper`]) - Your domain models and how data lands on them
//!
//! The graph layer is written once; a mapper decides what a "model" is.
//! [`ModelGraph`] is the ready-made mapper for untyped use.
//!
//! ## Identity and Cycles
//!
//! Within one call every entity (`type` + `id`) maps to exactly one model.
//! The deserializer registers a model in its identity cache *before* resolving
//! that model's relationships, so a relationship that leads back to an entity
//! still under construction gets the same handle instead of recursing forever.
//!
//! ```rust
//! use jsona_graph::{deserialize_str, Deserialized, ModelGraph, Related};
//!
//! let json = r#"{
//!     "data": [
//!         { "type": "articles", "id": "1", "attributes": { "title": "JSON:API paints my bikeshed!" },
//!           "relationships": { "author": { "data": { "type": "people", "id": "9" } } } },
//!         { "type": "articles", "id": "2", "attributes": { "title": "Rust and you" },
//!           "relationships": { "author": { "data": { "type": "people", "id": "9" } } } }
//!     ],
//!     "included": [
//!         { "type": "people", "id": "9", "attributes": { "name": "Dan" } }
//!     ]
//! }"#;
//!
//! let mut graph = ModelGraph::new();
//! let Some(Deserialized::Many(articles)) = deserialize_str(json, &mut graph).unwrap() else {
//!     panic!("expected a collection");
//! };
//!
//! // Both articles point at the same author node.
//! let first = graph.related(articles[0], "author").and_then(Related::one);
//! let second = graph.related(articles[1], "author").and_then(Related::one);
//! assert_eq!(first, second);
//! assert_eq!(graph.node(*first.unwrap()).attributes["name"], "Dan");
//! ```
//!
//! ## Absence, not Errors
//!
//! Deserialization does not fail. A mapper that declines a type makes that
//! entity absent; a relationship target missing from `included` becomes a model
//! with only its id set; malformed primary data yields `None`. The only error
//! is input that is not a JSON document ([`JsonaError`]).
//!
//! ## Concurrency Model
//!
//! - Deserialization is synchronous and single-threaded
//! - The identity cache and included index belong to one [`JsonDeserializer`] value
//! - Separate documents never share state, so they can be processed on separate threads
//!
//! ## Testing
//!
//! The [`mock`] module provides [`RecordingMapper`](mock::RecordingMapper), which
//! records every mapper call so tests can assert on what the deserializer did
//! and did not ask for.

pub mod builder;
pub mod document;
pub mod error;
pub mod graph;
pub mod included;
pub mod mapper;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use builder::{Deserialized, JsonDeserializer};
pub use document::{
    Document, EntityKey, JsonMap, Linkage, PrimaryData, Relationship, ResourceId,
    ResourceIdentifier, ResourceObject,
};
pub use error::JsonaError;
pub use graph::{ModelGraph, Node, NodeId};
pub use included::IncludedIndex;
pub use mapper::{
    LinksSupport, MetaSupport, ModelMapper, Related, RelationshipLinksSupport,
    RelationshipMetaSupport, Relationships,
};

/// Builds the models of `document` with `mapper`.
pub fn deserialize<M: ModelMapper>(
    document: &Document,
    mapper: &mut M,
) -> Option<Deserialized<M::Model>> {
    JsonDeserializer::new(document, mapper).build()
}

/// Parses `json` and builds its models with `mapper`.
pub fn deserialize_str<M: ModelMapper>(
    json: &str,
    mapper: &mut M,
) -> Result<Option<Deserialized<M::Model>>, JsonaError> {
    let document: Document = json.parse()?;
    Ok(deserialize(&document, mapper))
}
