use crate::proto;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("person id must not be empty")]
    EmptyPersonId,
    #[error("person id must be alphanumeric or a UUID (got {0:?})")]
    InvalidPersonId(String),
    #[error("relation type must be specified (got UNSPECIFIED)")]
    UnspecifiedRelationType,
    #[error("unknown relation type value: {0}")]
    UnknownRelationType(i32),
    #[error("unknown gender value: {0}")]
    UnknownGender(i32),
    #[error("relation id must not be zero")]
    ZeroRelationId,
}

/// Only the hyphenated 8-4-4-4-12 form is accepted.
fn is_uuid(id: &str) -> bool {
    id.len() == 36 && uuid::Uuid::try_parse(id).is_ok()
}

pub fn validate_person_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::EmptyPersonId);
    }
    if id.bytes().all(|b| b.is_ascii_alphanumeric()) || is_uuid(id) {
        return Ok(());
    }
    Err(ValidationError::InvalidPersonId(id.to_owned()))
}

fn validate_relation_type(value: i32) -> Result<(), ValidationError> {
    match proto::RelationType::try_from(value) {
        Ok(proto::RelationType::Unspecified) => Err(ValidationError::UnspecifiedRelationType),
        Ok(_) => Ok(()),
        Err(_) => Err(ValidationError::UnknownRelationType(value)),
    }
}

pub fn validate_person(person: &proto::Person) -> Result<(), ValidationError> {
    validate_person_id(&person.id)?;
    if proto::Gender::try_from(person.gender).is_err() {
        return Err(ValidationError::UnknownGender(person.gender));
    }
    Ok(())
}

pub fn validate_person_filter(filter: &proto::PersonIdFilter) -> Result<(), ValidationError> {
    for id in &filter.ids {
        validate_person_id(id)?;
    }
    Ok(())
}

pub fn validate_new_relation(relation: &proto::NewRelation) -> Result<(), ValidationError> {
    validate_person_id(&relation.source_person_id)?;
    validate_person_id(&relation.target_person_id)?;
    validate_relation_type(relation.r#type)
}

pub fn validate_person_relation_request(
    req: &proto::PersonRelationRequest,
) -> Result<(), ValidationError> {
    validate_person_id(&req.person_id)?;
    validate_person_id(&req.target_person_id)?;
    validate_relation_type(req.r#type)
}

pub fn validate_relation(relation: &proto::Relation) -> Result<(), ValidationError> {
    validate_relation_id(relation.id)?;
    validate_person_id(&relation.source_person_id)?;
    validate_person_id(&relation.target_person_id)?;
    validate_relation_type(relation.r#type)
}

pub fn validate_relation_id(id: i64) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::ZeroRelationId);
    }
    Ok(())
}
