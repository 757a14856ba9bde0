//! Genealogical consistency checks for candidate relations.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the source person exists;
//! 2. the source gender fits the relation type (father/husband: male,
//!    mother: female);
//! 3. the target person exists;
//! 4. for husband relations the target is female;
//! 5. for father/mother relations the target has no other relation of the
//!    same type.
//!
//! The validator only reads the stores. Callers must hold exclusive access to
//! both stores from validation through the resulting write, otherwise two
//! concurrent candidates can both pass check 5.

use tracing::info;

use crate::domain::gender::Gender;
use crate::domain::relation::{RelationId, RelationKey, RelationPattern};
use crate::domain::relation_type::RelationType;

use super::people::PersonStore;
use super::relations::RelationStore;
use super::StoreError;

/// The rule a rejected candidate broke.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("source person ({0}) does not exist")]
    SourceNotFound(String),
    #[error("source person ({person}) is {actual}, a {relation_type} relation requires {expected}")]
    SourceGender {
        person: String,
        relation_type: RelationType,
        expected: Gender,
        actual: Gender,
    },
    #[error("target person ({0}) does not exist")]
    TargetNotFound(String),
    #[error("target person ({person}) is {actual}, a {relation_type} relation requires {expected}")]
    TargetGender {
        person: String,
        relation_type: RelationType,
        expected: Gender,
        actual: Gender,
    },
    #[error("target person ({target}) already has a {relation_type} relation ({existing})")]
    ParentAlreadyRecorded {
        target: String,
        relation_type: RelationType,
        existing: RelationId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Violation),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

pub struct RelationValidator<'a> {
    people: &'a PersonStore,
    relations: &'a RelationStore,
}

impl<'a> RelationValidator<'a> {
    pub fn new(people: &'a PersonStore, relations: &'a RelationStore) -> Self {
        Self { people, relations }
    }

    /// Validates a relation that is about to be created.
    pub fn validate(&self, candidate: &RelationKey) -> Result<Verdict, StoreError> {
        self.check(candidate, None)
    }

    /// Validates new contents for relation `id`. The relation's current record
    /// does not count against the single-parent rule.
    pub fn validate_replacement(
        &self,
        id: RelationId,
        candidate: &RelationKey,
    ) -> Result<Verdict, StoreError> {
        self.check(candidate, Some(id))
    }

    fn check(
        &self,
        candidate: &RelationKey,
        excluding: Option<RelationId>,
    ) -> Result<Verdict, StoreError> {
        let relation_type = candidate.relation_type;

        let Some(source) = self.people.get(&candidate.source) else {
            info!(
                "the person ({}) referenced by the relation {candidate} doesn't exist",
                candidate.source
            );
            return Ok(Verdict::Invalid(Violation::SourceNotFound(
                candidate.source.clone(),
            )));
        };

        let expected = relation_type.source_gender();
        if source.gender != expected {
            info!(
                "unexpected person ({}) gender ({}): for the '{relation_type}' relation, '{expected}' is expected",
                source.id, source.gender
            );
            return Ok(Verdict::Invalid(Violation::SourceGender {
                person: source.id.clone(),
                relation_type,
                expected,
                actual: source.gender,
            }));
        }

        let Some(target) = self.people.get(&candidate.target) else {
            info!(
                "the person ({}) referenced by the relation {candidate} doesn't exist",
                candidate.target
            );
            return Ok(Verdict::Invalid(Violation::TargetNotFound(
                candidate.target.clone(),
            )));
        };

        if let Some(expected) = relation_type.target_gender() {
            if target.gender != expected {
                info!(
                    "unexpected person ({}) gender ({}): for the '{relation_type}' relation, '{expected}' is expected",
                    target.id, target.gender
                );
                return Ok(Verdict::Invalid(Violation::TargetGender {
                    person: target.id.clone(),
                    relation_type,
                    expected,
                    actual: target.gender,
                }));
            }
        }

        if relation_type.is_parental() {
            let pattern = RelationPattern::any()
                .of_type(relation_type)
                .target(candidate.target.clone());
            if let Some(other) = self.relations.find_unique(&pattern, excluding)? {
                info!(
                    "found another ({}) {relation_type} relation for the target person ({})",
                    other.id, candidate.target
                );
                return Ok(Verdict::Invalid(Violation::ParentAlreadyRecorded {
                    target: candidate.target.clone(),
                    relation_type,
                    existing: other.id,
                }));
            }
        }

        Ok(Verdict::Valid)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::domain::person::Person;
    use crate::domain::relation::Relation;

    fn people(entries: &[(&str, Gender)]) -> PersonStore {
        let mut store = PersonStore::new();
        for (id, gender) in entries {
            store.put(Person::new(*id, *gender));
        }
        store
    }

    fn key(source: &str, relation_type: RelationType, target: &str) -> RelationKey {
        RelationKey::new(source, relation_type, target)
    }

    fn family() -> PersonStore {
        people(&[
            ("A", Gender::Male),
            ("B", Gender::Female),
            ("C", Gender::Male),
            ("X", Gender::Unknown),
        ])
    }

    #[test]
    fn husband_between_male_and_female_is_valid() {
        let people = people(&[("A", Gender::Male), ("B", Gender::Female)]);
        let relations = RelationStore::new();
        let v = RelationValidator::new(&people, &relations);
        assert_eq!(
            v.validate(&key("A", RelationType::Husband, "B")).unwrap(),
            Verdict::Valid
        );
    }

    #[test]
    fn second_father_is_invalid() {
        let people = family();
        let mut relations = RelationStore::new();
        relations.insert(Relation::new(10, key("C", RelationType::Father, "X")));
        let v = RelationValidator::new(&people, &relations);
        assert_eq!(
            v.validate(&key("A", RelationType::Father, "X")).unwrap(),
            Verdict::Invalid(Violation::ParentAlreadyRecorded {
                target: "X".into(),
                relation_type: RelationType::Father,
                existing: 10,
            })
        );
    }

    #[test]
    fn second_mother_is_invalid() {
        let people = people(&[
            ("M1", Gender::Female),
            ("M2", Gender::Female),
            ("X", Gender::Unknown),
        ]);
        let mut relations = RelationStore::new();
        relations.insert(Relation::new(5, key("M1", RelationType::Mother, "X")));
        let v = RelationValidator::new(&people, &relations);
        assert_eq!(
            v.validate(&key("M2", RelationType::Mother, "X")).unwrap(),
            Verdict::Invalid(Violation::ParentAlreadyRecorded {
                target: "X".into(),
                relation_type: RelationType::Mother,
                existing: 5,
            })
        );
    }

    #[test]
    fn existing_father_does_not_block_a_mother() {
        let people = family();
        let mut relations = RelationStore::new();
        relations.insert(Relation::new(10, key("C", RelationType::Father, "X")));
        let v = RelationValidator::new(&people, &relations);
        assert!(v
            .validate(&key("B", RelationType::Mother, "X"))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn husband_relations_have_no_cardinality_limit() {
        let people = family();
        let mut relations = RelationStore::new();
        relations.insert(Relation::new(10, key("C", RelationType::Husband, "B")));
        let v = RelationValidator::new(&people, &relations);
        assert!(v
            .validate(&key("A", RelationType::Husband, "B"))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn missing_source_checked_first() {
        let people = family();
        let relations = RelationStore::new();
        let v = RelationValidator::new(&people, &relations);
        assert_eq!(
            v.validate(&key("nobody", RelationType::Father, "ghost")).unwrap(),
            Verdict::Invalid(Violation::SourceNotFound("nobody".into()))
        );
    }

    #[test]
    fn source_gender_checked_before_target_existence() {
        let people = family();
        let relations = RelationStore::new();
        let v = RelationValidator::new(&people, &relations);
        assert!(matches!(
            v.validate(&key("B", RelationType::Father, "ghost")).unwrap(),
            Verdict::Invalid(Violation::SourceGender { .. })
        ));
    }

    #[test]
    fn missing_target_is_invalid() {
        let people = family();
        let relations = RelationStore::new();
        let v = RelationValidator::new(&people, &relations);
        assert_eq!(
            v.validate(&key("A", RelationType::Father, "ghost")).unwrap(),
            Verdict::Invalid(Violation::TargetNotFound("ghost".into()))
        );
    }

    #[test]
    fn husband_of_non_female_is_invalid() {
        let people = family();
        let relations = RelationStore::new();
        let v = RelationValidator::new(&people, &relations);
        assert!(matches!(
            v.validate(&key("A", RelationType::Husband, "X")).unwrap(),
            Verdict::Invalid(Violation::TargetGender {
                expected: Gender::Female,
                actual: Gender::Unknown,
                ..
            })
        ));
    }

    #[test]
    fn replacement_ignores_its_own_record() {
        let people = family();
        let mut relations = RelationStore::new();
        relations.insert(Relation::new(10, key("C", RelationType::Father, "X")));
        let v = RelationValidator::new(&people, &relations);
        assert!(v
            .validate_replacement(10, &key("A", RelationType::Father, "X"))
            .unwrap()
            .is_valid());
        assert!(!v
            .validate_replacement(11, &key("A", RelationType::Father, "X"))
            .unwrap()
            .is_valid());
    }

    #[test]
    fn duplicated_parents_surface_as_error() {
        let people = family();
        let mut relations = RelationStore::new();
        relations.insert(Relation::new(10, key("C", RelationType::Father, "X")));
        relations.insert(Relation::new(11, key("A", RelationType::Father, "X")));
        let v = RelationValidator::new(&people, &relations);
        assert!(matches!(
            v.validate(&key("A", RelationType::Father, "X")),
            Err(StoreError::DuplicateFound { count: 2, .. })
        ));
    }

    fn gender_strategy() -> impl Strategy<Value = Gender> {
        prop_oneof![
            Just(Gender::Male),
            Just(Gender::Female),
            Just(Gender::Unknown)
        ]
    }

    proptest! {
        #[test]
        fn father_requires_male_source(gender in gender_strategy(), target in gender_strategy()) {
            prop_assume!(gender != Gender::Male);
            let people = people(&[("S", gender), ("T", target)]);
            let relations = RelationStore::new();
            let v = RelationValidator::new(&people, &relations);
            prop_assert!(!v.validate(&key("S", RelationType::Father, "T")).unwrap().is_valid());
        }

        #[test]
        fn mother_requires_female_source(gender in gender_strategy(), target in gender_strategy()) {
            prop_assume!(gender != Gender::Female);
            let people = people(&[("S", gender), ("T", target)]);
            let relations = RelationStore::new();
            let v = RelationValidator::new(&people, &relations);
            prop_assert!(!v.validate(&key("S", RelationType::Mother, "T")).unwrap().is_valid());
        }

        #[test]
        fn husband_requires_male_and_female(source in gender_strategy(), target in gender_strategy()) {
            let people = people(&[("S", source), ("T", target)]);
            let relations = RelationStore::new();
            let v = RelationValidator::new(&people, &relations);
            let valid = v.validate(&key("S", RelationType::Husband, "T")).unwrap().is_valid();
            prop_assert_eq!(valid, source == Gender::Male && target == Gender::Female);
        }
    }
}
