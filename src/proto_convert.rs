use crate::domain::gender::Gender;
use crate::domain::person::Person;
use crate::domain::relation::{Relation, RelationKey};
use crate::domain::relation_type::RelationType;
use crate::proto;
use crate::store::query::Page;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("invalid gender value: {0}")]
    InvalidGender(i32),
    #[error("invalid relation type value: {0}")]
    InvalidRelationType(i32),
}

// --- Gender conversions ---

impl TryFrom<i32> for Gender {
    type Error = ConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            x if x == proto::Gender::Unknown as i32 => Ok(Gender::Unknown),
            x if x == proto::Gender::Male as i32 => Ok(Gender::Male),
            x if x == proto::Gender::Female as i32 => Ok(Gender::Female),
            other => Err(ConversionError::InvalidGender(other)),
        }
    }
}

impl From<Gender> for i32 {
    fn from(value: Gender) -> Self {
        match value {
            Gender::Unknown => proto::Gender::Unknown as i32,
            Gender::Male => proto::Gender::Male as i32,
            Gender::Female => proto::Gender::Female as i32,
        }
    }
}

// --- RelationType conversions ---

impl TryFrom<i32> for RelationType {
    type Error = ConversionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            x if x == proto::RelationType::Father as i32 => Ok(RelationType::Father),
            x if x == proto::RelationType::Mother as i32 => Ok(RelationType::Mother),
            x if x == proto::RelationType::Husband as i32 => Ok(RelationType::Husband),
            other => Err(ConversionError::InvalidRelationType(other)),
        }
    }
}

impl From<RelationType> for i32 {
    fn from(value: RelationType) -> Self {
        match value {
            RelationType::Father => proto::RelationType::Father as i32,
            RelationType::Mother => proto::RelationType::Mother as i32,
            RelationType::Husband => proto::RelationType::Husband as i32,
        }
    }
}

// --- Person conversions ---

/// Assumes validation has already passed.
pub fn proto_person_to_domain(person: proto::Person) -> Result<Person, ConversionError> {
    Ok(Person {
        gender: Gender::try_from(person.gender)?,
        id: person.id,
        given_names: person.given_names,
        surname: person.surname,
    })
}

pub fn domain_person_to_proto(person: Person) -> proto::Person {
    proto::Person {
        id: person.id,
        given_names: person.given_names,
        surname: person.surname,
        gender: i32::from(person.gender),
    }
}

// --- Relation conversions ---

/// Assumes validation has already passed.
pub fn proto_relation_to_domain(relation: proto::Relation) -> Result<Relation, ConversionError> {
    let relation_type = RelationType::try_from(relation.r#type)?;
    Ok(Relation::new(
        relation.id,
        RelationKey::new(
            relation.source_person_id,
            relation_type,
            relation.target_person_id,
        ),
    ))
}

pub fn proto_new_relation_to_domain(
    relation: proto::NewRelation,
) -> Result<RelationKey, ConversionError> {
    let relation_type = RelationType::try_from(relation.r#type)?;
    Ok(RelationKey::new(
        relation.source_person_id,
        relation_type,
        relation.target_person_id,
    ))
}

pub fn proto_person_relation_to_domain(
    request: proto::PersonRelationRequest,
) -> Result<RelationKey, ConversionError> {
    let relation_type = RelationType::try_from(request.r#type)?;
    Ok(RelationKey::new(
        request.person_id,
        relation_type,
        request.target_person_id,
    ))
}

pub fn domain_relation_to_proto(relation: Relation) -> proto::Relation {
    proto::Relation {
        id: relation.id,
        source_person_id: relation.key.source,
        target_person_id: relation.key.target,
        r#type: i32::from(relation.key.relation_type),
    }
}

// --- Pagination ---

pub fn page_to_pagination<T>(page: &Page<T>) -> proto::Pagination {
    proto::Pagination {
        page_index: page.index as i64,
        page_size: page.size as i64,
        total_count: page.total_count as u64,
        has_previous: page.has_previous(),
        has_next: page.has_next(),
    }
}
