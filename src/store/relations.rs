use std::collections::HashMap;

use tracing::debug;

use crate::domain::relation::{Relation, RelationId, RelationKey, RelationPattern};

use super::StoreError;

/// Keyed collection of relation records. Persons are referenced by id only.
#[derive(Debug, Clone, Default)]
pub struct RelationStore {
    relations: HashMap<RelationId, Relation>,
}

impl RelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: RelationId) -> Option<&Relation> {
        debug!("retrieving relation record by id ({id})");
        let relation = self.relations.get(&id);
        if relation.is_none() {
            debug!("relation record ({id}) not found");
        }
        relation
    }

    pub fn contains(&self, id: RelationId) -> bool {
        self.relations.contains_key(&id)
    }

    /// Stores a relation under its pre-allocated id.
    pub fn insert(&mut self, relation: Relation) -> RelationId {
        let id = relation.id;
        debug_assert!(!self.relations.contains_key(&id), "relation id {id} reused");
        self.relations.insert(id, relation);
        id
    }

    /// Removes a relation, returning it if it existed.
    pub fn delete(&mut self, id: RelationId) -> Option<Relation> {
        self.relations.remove(&id)
    }

    /// Overwrites the tuple of an existing relation, keeping its id. Returns the
    /// previous record, or `None` (and stores nothing) if `id` is unknown.
    pub fn replace(&mut self, id: RelationId, key: RelationKey) -> Option<Relation> {
        let slot = self.relations.get_mut(&id)?;
        Some(std::mem::replace(slot, Relation::new(id, key)))
    }

    /// Every relation whose tuple matches `pattern`.
    pub fn find_matching(&self, pattern: &RelationPattern) -> Vec<&Relation> {
        debug!("looking for matching relations {pattern}");
        let found: Vec<&Relation> = self
            .relations
            .values()
            .filter(|r| pattern.matches(&r.key))
            .collect();
        debug!("found {} matching relations", found.len());
        found
    }

    /// The single relation matching `pattern`, skipping `excluding`.
    ///
    /// More than one match means the store holds duplicate tuples, which the
    /// write path never allows; that is reported as [`StoreError::DuplicateFound`].
    pub fn find_unique(
        &self,
        pattern: &RelationPattern,
        excluding: Option<RelationId>,
    ) -> Result<Option<&Relation>, StoreError> {
        let mut found = self
            .find_matching(pattern)
            .into_iter()
            .filter(|r| Some(r.id) != excluding);
        let first = found.next();
        let rest = found.count();
        if rest > 0 {
            return Err(StoreError::DuplicateFound {
                count: rest + 1,
                pattern: pattern.to_string(),
            });
        }
        Ok(first)
    }

    /// Removes every relation with `person_id` at either end. Returns how many
    /// were removed.
    pub fn delete_involving(&mut self, person_id: &str) -> usize {
        let before = self.relations.len();
        self.relations.retain(|_, r| !r.key.involves(person_id));
        before - self.relations.len()
    }

    pub fn list(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
