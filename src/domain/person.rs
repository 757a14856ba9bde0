use std::collections::BTreeSet;

use super::gender::Gender;

/// A person record. Identity is `id`, supplied by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub id: String,
    pub given_names: String,
    pub surname: String,
    pub gender: Gender,
}

impl Person {
    pub fn new(id: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: id.into(),
            given_names: String::new(),
            surname: String::new(),
            gender,
        }
    }

    pub fn with_names(mut self, given_names: impl Into<String>, surname: impl Into<String>) -> Self {
        self.given_names = given_names.into();
        self.surname = surname.into();
        self
    }
}

/// Restricts a person listing.
///
/// `ids: None` matches everyone; `Some` of an empty set matches no one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    pub ids: Option<BTreeSet<String>>,
}

impl PersonFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: Some(ids.into_iter().map(Into::into).collect()),
        }
    }

    pub fn matches(&self, person: &Person) -> bool {
        match &self.ids {
            Some(ids) => ids.contains(&person.id),
            None => true,
        }
    }
}
