pub mod gender;
pub mod person;
pub mod relation;
pub mod relation_type;
