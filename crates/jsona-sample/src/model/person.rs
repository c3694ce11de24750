//! A person: article author or commenter.

use serde::Deserialize;
use std::fmt::Display;

/// Index of a [`Person`] in its [`Blog`](crate::model::Blog).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PersonRef(pub usize);

impl Display for PersonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "person_{}", self.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub twitter: Option<String>,
}

/// Wire attributes of a person, using the dasherized JSON:API member names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PersonAttributes {
    pub first_name: String,
    pub last_name: String,
    pub twitter: Option<String>,
}

impl Person {
    pub fn apply(&mut self, attributes: PersonAttributes) {
        self.first_name = attributes.first_name;
        self.last_name = attributes.last_name;
        self.twitter = attributes.twitter;
    }

    /// "First Last", or the id when no name is known.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            format!("#{}", self.id)
        } else {
            name.to_string()
        }
    }
}
