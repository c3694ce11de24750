//! # Blog Mapper
//!
//! [`BlogMapper`] maps the `articles`, `people` and `comments` resource types
//! onto the typed models of [`crate::model`] and declines everything else.
//!
//! It opts into resource-level links (to keep an article's `self` link) and
//! leaves every other optional capability off, so meta is dropped silently.

use crate::model::{
    Article, ArticleAttributes, ArticleRef, Blog, BlogRef, Comment, CommentAttributes,
    CommentRef, Person, PersonAttributes, PersonRef,
};
use jsona_graph::{JsonMap, LinksSupport, ModelMapper, Related, Relationships, ResourceId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Builds typed blog models into a [`Blog`].
#[derive(Debug, Default)]
pub struct BlogMapper {
    blog: Blog,
}

impl BlogMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blog(&self) -> &Blog {
        &self.blog
    }

    pub fn into_blog(self) -> Blog {
        self.blog
    }
}

/// Reads typed attributes; malformed attributes leave the defaults in place.
fn read_attributes<T: DeserializeOwned + Default>(model: BlogRef, attributes: &JsonMap) -> T {
    match serde_json::from_value(Value::Object(attributes.clone())) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(%model, error = %e, "Ignoring malformed attributes");
            T::default()
        }
    }
}

impl ModelMapper for BlogMapper {
    type Model = BlogRef;

    fn create_model(&mut self, kind: &str) -> Option<BlogRef> {
        let blog = &mut self.blog;
        let model = match kind {
            "articles" => {
                blog.articles.push(Article::default());
                BlogRef::Article(ArticleRef(blog.articles.len() - 1))
            }
            "people" => {
                blog.people.push(Person::default());
                BlogRef::Person(PersonRef(blog.people.len() - 1))
            }
            "comments" => {
                blog.comments.push(Comment::default());
                BlogRef::Comment(CommentRef(blog.comments.len() - 1))
            }
            _ => {
                debug!(kind, "Unsupported resource type");
                return None;
            }
        };
        Some(model)
    }

    fn set_id(&mut self, model: &BlogRef, id: &ResourceId) {
        let id = id.to_string();
        match *model {
            BlogRef::Article(r) => self.blog.articles[r.0].id = id,
            BlogRef::Person(r) => self.blog.people[r.0].id = id,
            BlogRef::Comment(r) => self.blog.comments[r.0].id = id,
        }
    }

    fn set_attributes(&mut self, model: &BlogRef, map: &JsonMap) {
        match *model {
            BlogRef::Article(r) => {
                let parsed: ArticleAttributes = read_attributes(*model, map);
                self.blog.articles[r.0].apply(parsed);
            }
            BlogRef::Person(r) => {
                let parsed: PersonAttributes = read_attributes(*model, map);
                self.blog.people[r.0].apply(parsed);
            }
            BlogRef::Comment(r) => {
                let parsed: CommentAttributes = read_attributes(*model, map);
                self.blog.comments[r.0].apply(parsed);
            }
        }
    }

    fn set_relationships(&mut self, model: &BlogRef, relationships: Relationships<BlogRef>) {
        for (name, related) in relationships {
            match (*model, name.as_str()) {
                (BlogRef::Article(r), "author") => {
                    self.blog.articles[r.0].author = person(&related);
                }
                (BlogRef::Article(r), "comments") => {
                    self.blog.articles[r.0].comments = related
                        .many()
                        .iter()
                        .filter_map(|target| match target {
                            BlogRef::Comment(c) => Some(*c),
                            _ => None,
                        })
                        .collect();
                }
                (BlogRef::Comment(r), "author") => {
                    self.blog.comments[r.0].author = person(&related);
                }
                _ => debug!(%model, relation = %name, "Ignoring relationship"),
            }
        }
    }

    fn links_support(&mut self) -> Option<&mut dyn LinksSupport<BlogRef>> {
        Some(self)
    }
}

impl LinksSupport<BlogRef> for BlogMapper {
    fn set_links(&mut self, model: &BlogRef, links: &JsonMap) {
        if let BlogRef::Article(r) = *model {
            self.blog.articles[r.0].self_link =
                links.get("self").and_then(Value::as_str).map(str::to_string);
        }
    }
}

fn person(related: &Related<BlogRef>) -> Option<PersonRef> {
    match related.one() {
        Some(BlogRef::Person(p)) => Some(*p),
        _ => None,
    }
}
