use std::collections::HashMap;

use tracing::debug;

use crate::domain::person::Person;

/// Keyed collection of person records. Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct PersonStore {
    people: HashMap<String, Person>,
}

impl PersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        debug!("retrieving person record by id ({id})");
        let person = self.people.get(id);
        if person.is_none() {
            debug!("person record ({id}) not found");
        }
        person
    }

    pub fn contains(&self, id: &str) -> bool {
        self.people.contains_key(id)
    }

    /// Inserts or fully replaces the record keyed by `person.id`, returning the
    /// previous record if there was one.
    pub fn put(&mut self, person: Person) -> Option<Person> {
        self.people.insert(person.id.clone(), person)
    }

    /// Removes a record. Does not touch relations referencing it.
    pub fn delete(&mut self, id: &str) -> bool {
        self.people.remove(id).is_some()
    }

    pub fn list(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
