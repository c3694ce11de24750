//! A blog article.
//!
//! Built by [`BlogMapper`](crate::mapper::BlogMapper) from resources of type
//! `articles`. The `author` and `comments` relationships are wired to the
//! [`Person`](crate::model::Person) and [`Comment`](crate::model::Comment)
//! models of the same [`Blog`](crate::model::Blog).

use crate::model::{CommentRef, PersonRef};
use serde::Deserialize;
use std::fmt::Display;

/// Index of an [`Article`] in its [`Blog`](crate::model::Blog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArticleRef(pub usize);

impl Display for ArticleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "article_{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub self_link: Option<String>,
    pub author: Option<PersonRef>,
    pub comments: Vec<CommentRef>,
}

/// Wire attributes of an article.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArticleAttributes {
    pub title: String,
    pub body: Option<String>,
}

impl Article {
    pub fn apply(&mut self, attributes: ArticleAttributes) {
        self.title = attributes.title;
        self.body = attributes.body;
    }
}
