use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::person::{Person, PersonFilter};
use crate::domain::relation::{Relation, RelationFilter, RelationId, RelationKey, RelationPattern};

use super::allocator::IdAllocator;
use super::people::PersonStore;
use super::query::{paginate, Page, PageBounds, PageRequest};
use super::relations::RelationStore;
use super::validator::{RelationValidator, Verdict};
use super::{Store, StoreError};

/// Internal mutable state behind the RwLock.
#[derive(Debug)]
struct InnerState {
    people: PersonStore,
    relations: RelationStore,
    allocator: IdAllocator,
}

/// In-memory implementation of the [`Store`] trait.
///
/// Both stores sit behind one [`RwLock`]: lookups and listings share the read
/// guard, while every create/replace/delete holds the write guard from its
/// first check through its last write.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_allocator(IdAllocator::new())
    }

    pub fn with_allocator(allocator: IdAllocator) -> Self {
        Self {
            state: Arc::new(RwLock::new(InnerState {
                people: PersonStore::new(),
                relations: RelationStore::new(),
                allocator,
            })),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Rejects `key` if another relation (other than `excluding`) already has it.
fn ensure_not_duplicate(
    relations: &RelationStore,
    key: &RelationKey,
    excluding: Option<RelationId>,
) -> Result<(), StoreError> {
    match relations.find_unique(&RelationPattern::exact(key), excluding)? {
        Some(existing) => {
            info!(
                "a relation ({}) matching given attributes {key} already exists",
                existing.id
            );
            Err(StoreError::RelationAlreadyExists {
                existing: existing.id,
                key: key.clone(),
            })
        }
        None => Ok(()),
    }
}

fn ensure_valid(verdict: Verdict, key: &RelationKey) -> Result<(), StoreError> {
    match verdict {
        Verdict::Valid => Ok(()),
        Verdict::Invalid(violation) => {
            info!("the relation {key} is not valid: {violation}");
            Err(StoreError::InvalidRelation {
                key: key.clone(),
                violation,
            })
        }
    }
}

impl Store for InMemoryStore {
    async fn create_person(&self, person: Person) -> Result<Person, StoreError> {
        let mut state = self.state.write().await;
        if state.people.contains(&person.id) {
            info!("a person with given id ({}) already exists", person.id);
            return Err(StoreError::PersonAlreadyExists(person.id));
        }
        state.people.put(person.clone());
        info!("created a new person ({}) record", person.id);
        Ok(person)
    }

    async fn get_person(&self, id: &str) -> Result<Person, StoreError> {
        let state = self.state.read().await;
        state
            .people
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::PersonNotFound(id.to_string()))
    }

    async fn replace_person(&self, person: Person) -> Result<Person, StoreError> {
        let mut state = self.state.write().await;
        if !state.people.contains(&person.id) {
            info!(
                "the person with given id ({}) doesn't exist and can't be replaced",
                person.id
            );
            return Err(StoreError::PersonNotFound(person.id));
        }
        state.people.put(person.clone());
        info!("replaced the person ({}) record", person.id);
        Ok(person)
    }

    async fn delete_person(&self, id: &str) -> Result<usize, StoreError> {
        let mut state = self.state.write().await;
        if !state.people.contains(id) {
            info!("the person with given id ({id}) doesn't exist");
            return Err(StoreError::PersonNotFound(id.to_string()));
        }
        let deleted = state.relations.delete_involving(id);
        state.people.delete(id);
        info!("deleted the person record ({id}) and {deleted} associated relation records");
        Ok(deleted)
    }

    async fn list_people(
        &self,
        request: PageRequest,
        bounds: PageBounds,
        filter: &PersonFilter,
    ) -> Result<Page<Person>, StoreError> {
        debug!("retrieving people, page {request:?}");
        let state = self.state.read().await;
        let page = paginate(state.people.list(), |p| filter.matches(p), request, bounds)?;
        info!("found {} person(s) of {}", page.records.len(), page.total_count);
        Ok(page.map(Person::clone))
    }

    async fn validate_relation(&self, key: &RelationKey) -> Result<Verdict, StoreError> {
        let state = self.state.read().await;
        RelationValidator::new(&state.people, &state.relations).validate(key)
    }

    async fn create_relation(&self, key: RelationKey) -> Result<Relation, StoreError> {
        let mut state = self.state.write().await;
        let InnerState {
            ref people,
            ref mut relations,
            ref mut allocator,
        } = *state;

        ensure_not_duplicate(relations, &key, None)?;
        ensure_valid(RelationValidator::new(people, relations).validate(&key)?, &key)?;

        let id = allocator.allocate(relations)?;
        let relation = Relation::new(id, key);
        relations.insert(relation.clone());
        info!("created a new relation ({id}) record {}", relation.key);
        Ok(relation)
    }

    async fn get_relation(&self, id: RelationId) -> Result<Relation, StoreError> {
        let state = self.state.read().await;
        state
            .relations
            .get(id)
            .cloned()
            .ok_or(StoreError::RelationNotFound(id))
    }

    async fn replace_relation(&self, relation: Relation) -> Result<Relation, StoreError> {
        let mut state = self.state.write().await;
        let InnerState {
            ref people,
            ref mut relations,
            ..
        } = *state;

        let Relation { id, key } = relation;
        if !relations.contains(id) {
            info!("the relation with given id ({id}) doesn't exist and can't be replaced");
            return Err(StoreError::RelationNotFound(id));
        }

        ensure_not_duplicate(relations, &key, Some(id))?;
        ensure_valid(
            RelationValidator::new(people, relations).validate_replacement(id, &key)?,
            &key,
        )?;

        relations.replace(id, key.clone());
        info!("replaced the relation ({id}) record with {key}");
        Ok(Relation::new(id, key))
    }

    async fn delete_relation(&self, id: RelationId) -> Result<Relation, StoreError> {
        let mut state = self.state.write().await;
        let relation = state.relations.delete(id).ok_or_else(|| {
            info!("the relation with given id ({id}) doesn't exist");
            StoreError::RelationNotFound(id)
        })?;
        info!("deleted the requested relation ({id}) record: {}", relation.key);
        Ok(relation)
    }

    async fn list_relations(
        &self,
        request: PageRequest,
        bounds: PageBounds,
        filter: &RelationFilter,
    ) -> Result<Page<Relation>, StoreError> {
        debug!("retrieving relations, page {request:?}, filter {filter:?}");
        let state = self.state.read().await;
        if let Some(pid) = filter.involving.as_deref() {
            if !state.people.contains(pid) {
                info!("the person with given id ({pid}) doesn't exist");
                return Err(StoreError::PersonNotFound(pid.to_string()));
            }
        }
        let page = paginate(
            state.relations.list(),
            |r| filter.matches(r),
            request,
            bounds,
        )?;
        info!("found {} relation(s) of {}", page.records.len(), page.total_count);
        Ok(page.map(Relation::clone))
    }
}
