//! A comment on an article.

use crate::model::PersonRef;
use serde::Deserialize;
use std::fmt::Display;

/// Index of a [`Comment`] in its [`Blog`](crate::model::Blog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentRef(pub usize);

impl Display for CommentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "comment_{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Comment {
    pub id: String,
    pub body: String,
    pub author: Option<PersonRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentAttributes {
    pub body: String,
}

impl Comment {
    pub fn apply(&mut self, attributes: CommentAttributes) {
        self.body = attributes.body;
    }
}
