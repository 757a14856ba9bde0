pub mod allocator;
pub mod memory;
pub mod people;
pub mod query;
pub mod relations;
pub mod validator;

use crate::domain::person::{Person, PersonFilter};
use crate::domain::relation::{Relation, RelationFilter, RelationId, RelationKey};

use self::allocator::AllocationError;
use self::query::{Page, PageBounds, PageRequest, PaginationError};
use self::validator::{Verdict, Violation};

/// Errors from the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("person not found: {0}")]
    PersonNotFound(String),
    #[error("person already exists: {0}")]
    PersonAlreadyExists(String),
    #[error("relation not found: {0}")]
    RelationNotFound(RelationId),
    #[error("relation {key} already exists ({existing})")]
    RelationAlreadyExists { existing: RelationId, key: RelationKey },
    #[error("relation {key} is invalid: {violation}")]
    InvalidRelation { key: RelationKey, violation: Violation },
    /// More than one stored relation matched where at most one may exist.
    #[error("{count} duplicated relation records found: {pattern}")]
    DuplicateFound { count: usize, pattern: String },
    #[error(transparent)]
    IdGenerationFailed(#[from] AllocationError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

/// The operations the gRPC handlers delegate to.
///
/// Every mutating method performs its invariant checks and its write as one
/// atomic step with respect to every other mutation.
#[allow(async_fn_in_trait)]
pub trait Store: Send + Sync {
    /// Fails with `PersonAlreadyExists` if the id is taken.
    async fn create_person(&self, person: Person) -> Result<Person, StoreError>;

    async fn get_person(&self, id: &str) -> Result<Person, StoreError>;

    /// Overwrites every field of an existing person.
    async fn replace_person(&self, person: Person) -> Result<Person, StoreError>;

    /// Deletes a person and every relation referencing it. Returns the number
    /// of relations removed.
    async fn delete_person(&self, id: &str) -> Result<usize, StoreError>;

    async fn list_people(
        &self,
        request: PageRequest,
        bounds: PageBounds,
        filter: &PersonFilter,
    ) -> Result<Page<Person>, StoreError>;

    /// Checks a candidate against the genealogical rules without storing it.
    async fn validate_relation(&self, key: &RelationKey) -> Result<Verdict, StoreError>;

    /// Duplicate check, then validation, then id allocation and insert.
    async fn create_relation(&self, key: RelationKey) -> Result<Relation, StoreError>;

    async fn get_relation(&self, id: RelationId) -> Result<Relation, StoreError>;

    /// Replaces the tuple of `relation.id`, re-running the duplicate check and
    /// the full validation against every other relation.
    async fn replace_relation(&self, relation: Relation) -> Result<Relation, StoreError>;

    async fn delete_relation(&self, id: RelationId) -> Result<Relation, StoreError>;

    /// Fails with `PersonNotFound` when the filter names an unknown person.
    async fn list_relations(
        &self,
        request: PageRequest,
        bounds: PageBounds,
        filter: &RelationFilter,
    ) -> Result<Page<Relation>, StoreError>;
}
