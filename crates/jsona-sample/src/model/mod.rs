//! Typed blog models produced by [`BlogMapper`](crate::mapper::BlogMapper).
//!
//! Models live in the [`Blog`] arena and point at each other through the typed
//! `*Ref` handles, so relationships between them stay plain `Copy` values.

pub mod article;
pub mod comment;
pub mod person;

pub use article::*;
pub use comment::*;
pub use person::*;

use std::fmt::Display;

/// Handle to any blog model; the `Model` type of [`BlogMapper`](crate::mapper::BlogMapper).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogRef {
    Article(ArticleRef),
    Person(PersonRef),
    Comment(CommentRef),
}

impl Display for BlogRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlogRef::Article(r) => r.fmt(f),
            BlogRef::Person(r) => r.fmt(f),
            BlogRef::Comment(r) => r.fmt(f),
        }
    }
}

/// Every model built from one or more documents.
#[derive(Debug, Default)]
pub struct Blog {
    pub articles: Vec<Article>,
    pub people: Vec<Person>,
    pub comments: Vec<Comment>,
}

impl Blog {
    pub fn article(&self, r: ArticleRef) -> &Article {
        &self.articles[r.0]
    }

    pub fn person(&self, r: PersonRef) -> &Person {
        &self.people[r.0]
    }

    pub fn comment(&self, r: CommentRef) -> &Comment {
        &self.comments[r.0]
    }

    /// Human-readable summary of a model and its direct relations.
    pub fn describe(&self, root: BlogRef) -> String {
        match root {
            BlogRef::Article(r) => {
                let article = self.article(r);
                let mut out = format!("Article {} {:?}", article.id, article.title);
                if let Some(author) = article.author {
                    out.push_str(&format!(" by {}", self.person(author).display_name()));
                }
                out.push_str(&format!(", {} comment(s)", article.comments.len()));
                for comment in &article.comments {
                    out.push_str("\n  ");
                    out.push_str(&self.describe(BlogRef::Comment(*comment)));
                }
                out
            }
            BlogRef::Person(r) => {
                let person = self.person(r);
                format!("Person {} {}", person.id, person.display_name())
            }
            BlogRef::Comment(r) => {
                let comment = self.comment(r);
                let author = comment
                    .author
                    .map(|a| self.person(a).display_name())
                    .unwrap_or_else(|| "(anonymous)".to_string());
                format!("Comment {} {:?} by {}", comment.id, comment.body, author)
            }
        }
    }
}
