//! # Recording Mapper & Testing Guide
//!
//! [`RecordingMapper`] implements [`ModelMapper`] without building anything:
//! every model is a plain [`MockModel`] number, and every call the deserializer
//! makes is appended to a log of [`MapperCall`]s. Tests use it to assert on the
//! *conversation* between builder and mapper, for example that
//! `set_relationships` was never invoked or that relationship meta was skipped
//! because the capability was switched off.
//!
//! ## When to use RecordingMapper vs ModelGraph
//!
//! | Question | RecordingMapper | ModelGraph |
//! |---------|------------|------------|
//! | **Was a call made at all?** | Yes, inspect `calls()` | Not observable |
//! | **What does the graph look like?** | Awkward | Yes, walk nodes |
//! | **Optional capabilities** | Switchable | Always supported |
//! | **Declining types** | `decline("tags")` | `ModelGraph::accepting` |
//!
//! ## Example
//!
//! ```rust
//! use jsona_graph::mock::{MapperCall, RecordingMapper};
//! use jsona_graph::deserialize_str;
//!
//! let mut mapper = RecordingMapper::new().without_relationship_meta();
//! let json = r#"{
//!     "data": {
//!         "type": "posts", "id": "1",
//!         "relationships": { "author": { "data": null, "meta": { "note": "x" } } }
//!     }
//! }"#;
//! let post = deserialize_str(json, &mut mapper).unwrap().unwrap().into_vec()[0];
//!
//! assert!(mapper.relationships_of(post).unwrap()["author"].is_null());
//! assert!(!mapper
//!     .calls()
//!     .iter()
//!     .any(|call| matches!(call, MapperCall::SetRelationshipMeta { .. })));
//! ```

use crate::document::{JsonMap, ResourceId};
use crate::mapper::{
    LinksSupport, MetaSupport, ModelMapper, RelationshipLinksSupport, RelationshipMetaSupport,
    Relationships,
};
use std::collections::HashSet;

/// Model handle handed out by [`RecordingMapper`]: the creation sequence number.
pub type MockModel = u32;

/// One recorded mapper invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum MapperCall {
    Create { kind: String, model: MockModel },
    Decline { kind: String },
    SetId { model: MockModel, id: ResourceId },
    SetAttributes { model: MockModel, attributes: JsonMap },
    SetRelationships { model: MockModel, relationships: Relationships<MockModel> },
    SetMeta { model: MockModel, meta: JsonMap },
    SetLinks { model: MockModel, links: JsonMap },
    SetRelationshipMeta { model: MockModel, relation: String, meta: JsonMap },
    SetRelationshipLinks { model: MockModel, relation: String, links: JsonMap },
}

/// Mapper that records calls instead of building models.
#[derive(Debug)]
pub struct RecordingMapper {
    calls: Vec<MapperCall>,
    declined: HashSet<String>,
    next_model: MockModel,
    meta: bool,
    links: bool,
    relationship_meta: bool,
    relationship_links: bool,
}

impl Default for RecordingMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingMapper {
    /// A mapper that accepts every type and supports every optional capability.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            declined: HashSet::new(),
            next_model: 1,
            meta: true,
            links: true,
            relationship_meta: true,
            relationship_links: true,
        }
    }

    /// Declines `create_model` for the given type.
    pub fn decline(mut self, kind: impl Into<String>) -> Self {
        self.declined.insert(kind.into());
        self
    }

    pub fn without_meta(mut self) -> Self {
        self.meta = false;
        self
    }

    pub fn without_links(mut self) -> Self {
        self.links = false;
        self
    }

    pub fn without_relationship_meta(mut self) -> Self {
        self.relationship_meta = false;
        self
    }

    pub fn without_relationship_links(mut self) -> Self {
        self.relationship_links = false;
        self
    }

    /// Switches every optional capability off.
    pub fn required_only(self) -> Self {
        self.without_meta()
            .without_links()
            .without_relationship_meta()
            .without_relationship_links()
    }

    /// Every call, in the order the deserializer made them.
    pub fn calls(&self) -> &[MapperCall] {
        &self.calls
    }

    /// Number of models handed out so far.
    pub fn created(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, MapperCall::Create { .. }))
            .count()
    }

    /// Calls that concern one model.
    pub fn calls_for(&self, model: MockModel) -> Vec<&MapperCall> {
        self.calls
            .iter()
            .filter(|call| call.model() == Some(model))
            .collect()
    }

    /// The type a model was created for.
    pub fn kind_of(&self, model: MockModel) -> Option<&str> {
        self.calls.iter().find_map(|call| match call {
            MapperCall::Create { kind, model: m } if *m == model => Some(kind.as_str()),
            _ => None,
        })
    }

    /// The id last assigned to a model.
    pub fn id_of(&self, model: MockModel) -> Option<&ResourceId> {
        self.calls.iter().rev().find_map(|call| match call {
            MapperCall::SetId { model: m, id } if *m == model => Some(id),
            _ => None,
        })
    }

    /// The attributes last assigned to a model.
    pub fn attributes_of(&self, model: MockModel) -> Option<&JsonMap> {
        self.calls.iter().rev().find_map(|call| match call {
            MapperCall::SetAttributes { model: m, attributes } if *m == model => Some(attributes),
            _ => None,
        })
    }

    /// The relationships last assigned to a model.
    pub fn relationships_of(&self, model: MockModel) -> Option<&Relationships<MockModel>> {
        self.calls.iter().rev().find_map(|call| match call {
            MapperCall::SetRelationships {
                model: m,
                relationships,
            } if *m == model => Some(relationships),
            _ => None,
        })
    }
}

impl MapperCall {
    fn model(&self) -> Option<MockModel> {
        match self {
            MapperCall::Decline { .. } => None,
            MapperCall::Create { model, .. }
            | MapperCall::SetId { model, .. }
            | MapperCall::SetAttributes { model, .. }
            | MapperCall::SetRelationships { model, .. }
            | MapperCall::SetMeta { model, .. }
            | MapperCall::SetLinks { model, .. }
            | MapperCall::SetRelationshipMeta { model, .. }
            | MapperCall::SetRelationshipLinks { model, .. } => Some(*model),
        }
    }
}

impl ModelMapper for RecordingMapper {
    type Model = MockModel;

    fn create_model(&mut self, kind: &str) -> Option<MockModel> {
        if self.declined.contains(kind) {
            self.calls.push(MapperCall::Decline {
                kind: kind.to_string(),
            });
            return None;
        }
        let model = self.next_model;
        self.next_model += 1;
        self.calls.push(MapperCall::Create {
            kind: kind.to_string(),
            model,
        });
        Some(model)
    }

    fn set_id(&mut self, model: &MockModel, id: &ResourceId) {
        self.calls.push(MapperCall::SetId {
            model: *model,
            id: id.clone(),
        });
    }

    fn set_attributes(&mut self, model: &MockModel, attributes: &JsonMap) {
        self.calls.push(MapperCall::SetAttributes {
            model: *model,
            attributes: attributes.clone(),
        });
    }

    fn set_relationships(&mut self, model: &MockModel, relationships: Relationships<MockModel>) {
        self.calls.push(MapperCall::SetRelationships {
            model: *model,
            relationships,
        });
    }

    fn meta_support(&mut self) -> Option<&mut dyn MetaSupport<MockModel>> {
        if self.meta {
            Some(self)
        } else {
            None
        }
    }

    fn links_support(&mut self) -> Option<&mut dyn LinksSupport<MockModel>> {
        if self.links {
            Some(self)
        } else {
            None
        }
    }

    fn relationship_meta_support(&mut self) -> Option<&mut dyn RelationshipMetaSupport<MockModel>> {
        if self.relationship_meta {
            Some(self)
        } else {
            None
        }
    }

    fn relationship_links_support(
        &mut self,
    ) -> Option<&mut dyn RelationshipLinksSupport<MockModel>> {
        if self.relationship_links {
            Some(self)
        } else {
            None
        }
    }
}

impl MetaSupport<MockModel> for RecordingMapper {
    fn set_meta(&mut self, model: &MockModel, meta: &JsonMap) {
        self.calls.push(MapperCall::SetMeta {
            model: *model,
            meta: meta.clone(),
        });
    }
}

impl LinksSupport<MockModel> for RecordingMapper {
    fn set_links(&mut self, model: &MockModel, links: &JsonMap) {
        self.calls.push(MapperCall::SetLinks {
            model: *model,
            links: links.clone(),
        });
    }
}

impl RelationshipMetaSupport<MockModel> for RecordingMapper {
    fn set_relationship_meta(&mut self, model: &MockModel, relation: &str, meta: &JsonMap) {
        self.calls.push(MapperCall::SetRelationshipMeta {
            model: *model,
            relation: relation.to_string(),
            meta: meta.clone(),
        });
    }
}

impl RelationshipLinksSupport<MockModel> for RecordingMapper {
    fn set_relationship_links(&mut self, model: &MockModel, relation: &str, links: &JsonMap) {
        self.calls.push(MapperCall::SetRelationshipLinks {
            model: *model,
            relation: relation.to_string(),
            links: links.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_are_numbered_in_creation_order() {
        let mut mapper = RecordingMapper::new().decline("tags");
        assert_eq!(mapper.create_model("posts"), Some(1));
        assert_eq!(mapper.create_model("tags"), None);
        assert_eq!(mapper.create_model("people"), Some(2));
        assert_eq!(mapper.created(), 2);
        assert_eq!(mapper.kind_of(2), Some("people"));
        assert_eq!(
            mapper.calls()[1],
            MapperCall::Decline {
                kind: "tags".into()
            }
        );
    }

    #[test]
    fn test_capabilities_can_be_switched_off() {
        let mut mapper = RecordingMapper::new().required_only();
        assert!(mapper.meta_support().is_none());
        assert!(mapper.links_support().is_none());
        assert!(mapper.relationship_meta_support().is_none());
        assert!(mapper.relationship_links_support().is_none());

        let mut mapper = RecordingMapper::new().without_links();
        assert!(mapper.meta_support().is_some());
        assert!(mapper.links_support().is_none());
    }

    #[test]
    fn test_calls_for_filters_by_model() {
        let mut mapper = RecordingMapper::new();
        let a = mapper.create_model("posts").unwrap();
        let b = mapper.create_model("posts").unwrap();
        mapper.set_id(&a, &ResourceId::from("1"));
        mapper.set_id(&b, &ResourceId::from("2"));
        assert_eq!(mapper.calls_for(a).len(), 2);
        assert_eq!(mapper.id_of(b), Some(&ResourceId::from("2")));
    }
}
