//! # Included Index
//!
//! Lookup table from [`EntityKey`] to the fully described resource objects of a
//! document's `included` pool. Relationship linkage only carries `{type, id}`;
//! the index hands back the described resource when the document side-loads it
//! and a reference stub otherwise.

use crate::document::{Document, EntityKey, ResourceIdentifier, ResourceObject};
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::trace;

/// Index over the `included` pool of one document.
#[derive(Debug, Default)]
pub struct IncludedIndex<'d> {
    entries: HashMap<EntityKey, &'d ResourceObject>,
}

impl<'d> IncludedIndex<'d> {
    /// Indexes every keyed resource in `document.included`.
    ///
    /// Resources without a key cannot be referenced and are skipped. When the
    /// pool lists the same key twice the later occurrence wins.
    pub fn build(document: &'d Document) -> Self {
        let mut entries = HashMap::new();
        for item in document.included.iter().flatten() {
            match item.key() {
                Some(key) => {
                    entries.insert(key, item);
                }
                None => trace!(kind = ?item.kind, "Skipping included resource without identity"),
            }
        }
        Self { entries }
    }

    /// The fullest known resource object for an identifier.
    ///
    /// Misses are not errors: the relationship exists, its target is just not
    /// described in this document, so a `{type, id}` stub is returned.
    pub fn lookup(&self, identifier: &ResourceIdentifier) -> Cow<'d, ResourceObject> {
        let found = identifier
            .kind
            .as_deref()
            .zip(identifier.id.as_ref())
            .and_then(|(kind, id)| EntityKey::new(kind, id))
            .and_then(|key| self.entries.get(&key).copied());

        match found {
            Some(resource) => Cow::Borrowed(resource),
            None => Cow::Owned(ResourceObject {
                kind: identifier.kind.clone(),
                id: identifier.id.clone(),
                ..ResourceObject::default()
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
