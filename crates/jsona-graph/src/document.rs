//! # Wire Types
//!
//! This module defines the JSON:API document shapes consumed by the
//! [`JsonDeserializer`](crate::JsonDeserializer).
//!
//! The types are permissive: every member of a resource object is optional, and
//! malformed parts are dropped with a warning instead of failing the document.
//!
//! - a `data` member that is neither an object, an array nor `null` is absent
//! - a malformed entry of a `data` array reads as a `null` entry
//! - a malformed item of `included` is left out of the pool
//! - malformed relationship linkage is absent
//!
//! Only text whose top level is not a JSON object is rejected.
//!
//! # Identity
//! Each resource is identified by its [`EntityKey`], the pair of `type` and `id`.
//! A resource missing either half has no key; it can still be built into a
//! model, but it is never cached or deduplicated.

use crate::error::JsonaError;
use serde::de::Deserializer;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;
use tracing::warn;

/// Free-form JSON object, used for attributes, meta and links.
pub type JsonMap = Map<String, Value>;

/// A JSON:API document: primary `data` plus the side-loaded `included` pool.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Document {
    #[serde(default, deserialize_with = "primary_data")]
    pub data: Option<PrimaryData>,
    #[serde(default, deserialize_with = "included_pool")]
    pub included: Option<Vec<ResourceObject>>,
}

impl FromStr for Document {
    type Err = JsonaError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Document {
    /// Parses a document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, JsonaError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Reads a document out of an already parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, JsonaError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Primary data of a document: one resource or an ordered collection.
///
/// `null` and malformed entries inside a collection are kept as `None` so that
/// the builder can skip them without shifting the remaining entries.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryData {
    Many(Vec<Option<ResourceObject>>),
    One(ResourceObject),
}

/// A resource object as found in `data` or `included`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default, alias = "properties")]
    pub attributes: Option<JsonMap>,
    #[serde(default)]
    pub meta: Option<JsonMap>,
    #[serde(default)]
    pub links: Option<JsonMap>,
    #[serde(default)]
    pub relationships: Option<BTreeMap<String, Relationship>>,
}

impl ResourceObject {
    /// Builds a reference stub carrying only `type` and `id`.
    pub fn stub(kind: impl Into<String>, id: impl Into<ResourceId>) -> Self {
        Self {
            kind: Some(kind.into()),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The identity key of this resource, if it has both a type and an id.
    pub fn key(&self) -> Option<EntityKey> {
        EntityKey::new(self.kind.as_deref()?, self.id.as_ref()?)
    }

    /// True when the object holds exactly `type` and `id` and nothing else.
    ///
    /// A stub means "resolve me elsewhere"; an empty but present member such
    /// as `"attributes": {}` makes the object a described resource.
    pub fn is_stub(&self) -> bool {
        self.kind.is_some()
            && self.id.is_some()
            && self.attributes.is_none()
            && self.meta.is_none()
            && self.links.is_none()
            && self.relationships.is_none()
    }
}

/// The `id` member of a resource, which the wire format allows to be a
/// string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Str(String),
    Num(Number),
}

impl ResourceId {
    fn is_empty(&self) -> bool {
        matches!(self, ResourceId::Str(s) if s.is_empty())
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Str(s) => f.write_str(s),
            ResourceId::Num(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ResourceId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

impl From<u64> for ResourceId {
    fn from(id: u64) -> Self {
        Self::Num(id.into())
    }
}

/// Minimal `{type, id}` reference used inside relationship linkage.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub id: Option<ResourceId>,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<ResourceId>) -> Self {
        Self {
            kind: Some(kind.into()),
            id: Some(id.into()),
        }
    }
}

/// A relationship descriptor: linkage plus relationship-level links and meta.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Relationship {
    #[serde(default, deserialize_with = "linkage")]
    pub data: Linkage,
    #[serde(default)]
    pub links: Option<JsonMap>,
    #[serde(default)]
    pub meta: Option<JsonMap>,
}

/// Resource linkage of a relationship.
///
/// `Absent` (no `data` member) and `Null` (`"data": null`) are different
/// things: the first contributes nothing, the second is an explicitly empty
/// to-one relation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Linkage {
    #[default]
    Absent,
    Null,
    Many(Vec<Option<ResourceIdentifier>>),
    One(ResourceIdentifier),
}

/// Only invoked when the `data` member is present, so `null` maps to
/// [`Linkage::Null`] while a missing member falls back to the default.
fn linkage<'de, D>(deserializer: D) -> Result<Linkage, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Present {
        Many(Vec<Option<ResourceIdentifier>>),
        One(ResourceIdentifier),
    }

    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(Linkage::Null);
    }
    Ok(match serde_json::from_value::<Present>(value) {
        Ok(Present::Many(items)) => Linkage::Many(items),
        Ok(Present::One(identifier)) => Linkage::One(identifier),
        Err(e) => {
            warn!(error = %e, "Ignoring malformed relationship data");
            Linkage::Absent
        }
    })
}

/// Reads primary data one resource at a time, so a malformed entry only
/// costs that entry.
fn primary_data<'de, D>(deserializer: D) -> Result<Option<PrimaryData>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(PrimaryData::Many(
            items.into_iter().map(resource_entry).collect(),
        )),
        value @ Value::Object(_) => resource_entry(value).map(PrimaryData::One),
        other => {
            warn!(data = %other, "Ignoring malformed primary data");
            None
        }
    })
}

/// Reads the included pool, leaving out `null` and malformed items.
fn included_pool<'de, D>(deserializer: D) -> Result<Option<Vec<ResourceObject>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::Array(items) => Some(items.into_iter().filter_map(resource_entry).collect()),
        other => {
            warn!(included = %other, "Ignoring malformed included pool");
            None
        }
    })
}

fn resource_entry(value: Value) -> Option<ResourceObject> {
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value)
        .map_err(|e| warn!(error = %e, "Ignoring malformed resource object"))
        .ok()
}

/// Composite identity of a resource, rendered as `type-id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(String);

impl EntityKey {
    /// Returns `None` when either half is empty.
    pub fn new(kind: &str, id: &ResourceId) -> Option<Self> {
        if kind.is_empty() || id.is_empty() {
            return None;
        }
        Some(Self(format!("{kind}-{id}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relationship_data_absent_null_one_many() {
        let doc = Document::from_value(json!({
            "data": {
                "type": "posts",
                "id": "1",
                "relationships": {
                    "author": { "data": null },
                    "editor": { "links": { "related": "/posts/1/editor" } },
                    "blog": { "data": { "type": "blogs", "id": 7 } },
                    "comments": { "data": [{ "type": "comments", "id": "1" }, null] }
                }
            }
        }))
        .unwrap();

        let Some(PrimaryData::One(post)) = doc.data else {
            panic!("expected a single resource");
        };
        let rels = post.relationships.unwrap();
        assert_eq!(rels["author"].data, Linkage::Null);
        assert_eq!(rels["editor"].data, Linkage::Absent);
        assert_eq!(
            rels["blog"].data,
            Linkage::One(ResourceIdentifier::new("blogs", 7u64))
        );
        assert_eq!(
            rels["comments"].data,
            Linkage::Many(vec![Some(ResourceIdentifier::new("comments", "1")), None])
        );
    }

    #[test]
    fn test_properties_alias_and_stub_detection() {
        let described: ResourceObject =
            serde_json::from_value(json!({"type": "tags", "id": "9", "properties": {"name": "rust"}}))
                .unwrap();
        assert_eq!(described.attributes.as_ref().unwrap()["name"], "rust");
        assert!(!described.is_stub());

        let empty_attrs: ResourceObject =
            serde_json::from_value(json!({"type": "tags", "id": "9", "attributes": {}})).unwrap();
        assert!(!empty_attrs.is_stub());

        assert!(ResourceObject::stub("tags", "9").is_stub());
    }

    #[test]
    fn test_entity_key_requires_type_and_id() {
        assert_eq!(
            ResourceObject::stub("posts", 1u64).key().unwrap().as_str(),
            "posts-1"
        );
        assert_eq!(
            ResourceObject::stub("posts", "1").key(),
            ResourceObject::stub("posts", 1u64).key()
        );
        assert!(ResourceObject::stub("posts", "").key().is_none());
        assert!(ResourceObject::stub("", "1").key().is_none());
        let no_id = ResourceObject {
            kind: Some("posts".into()),
            ..Default::default()
        };
        assert!(no_id.key().is_none());
    }

    #[test]
    fn test_malformed_primary_data_reads_as_absent() {
        let doc = r#"{"data": "nonsense", "included": []}"#.parse::<Document>().unwrap();
        assert!(doc.data.is_none());
        assert_eq!(doc.included, Some(vec![]));

        assert!("[1, 2]".parse::<Document>().is_err());
        assert!("not json".parse::<Document>().is_err());
    }

    #[test]
    fn test_malformed_collection_entry_reads_as_gap() {
        let doc = Document::from_value(json!({
            "data": [
                { "type": "posts", "id": "1" },
                { "type": "posts", "id": "2", "relationships": { "tags": "oops" } },
                null,
                { "type": "posts", "id": "3" }
            ]
        }))
        .unwrap();

        let Some(PrimaryData::Many(items)) = doc.data else {
            panic!("expected a collection");
        };
        let ids: Vec<Option<String>> = items
            .iter()
            .map(|item| item.as_ref().and_then(|r| r.id.as_ref()).map(ToString::to_string))
            .collect();
        assert_eq!(ids, vec![Some("1".into()), None, None, Some("3".into())]);
    }

    #[test]
    fn test_malformed_included_items_are_left_out() {
        let doc = Document::from_value(json!({
            "data": { "type": "posts", "id": "1", "attributes": [] },
            "included": [
                { "type": "people", "id": "9", "attributes": [] },
                null,
                { "type": "people", "id": "10", "attributes": { "name": "Ann" } }
            ]
        }))
        .unwrap();

        assert!(doc.data.is_none());
        let included = doc.included.unwrap();
        assert_eq!(included.len(), 1);
        assert_eq!(included[0].key().unwrap().as_str(), "people-10");

        let doc = r#"{"data": null, "included": {"type": "people"}}"#
            .parse::<Document>()
            .unwrap();
        assert!(doc.included.is_none());
    }
}
