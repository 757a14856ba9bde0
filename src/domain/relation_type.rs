use super::gender::Gender;

/// Kind of a directed relation, read as "source is the `<type>` of target".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelationType {
    Father,
    Mother,
    Husband,
}

impl RelationType {
    /// Parental relations are limited to one per target person.
    pub fn is_parental(self) -> bool {
        matches!(self, Self::Father | Self::Mother)
    }

    /// Gender the source person must have.
    pub fn source_gender(self) -> Gender {
        match self {
            Self::Father | Self::Husband => Gender::Male,
            Self::Mother => Gender::Female,
        }
    }

    /// Gender the target person must have, if constrained at all.
    pub fn target_gender(self) -> Option<Gender> {
        match self {
            Self::Husband => Some(Gender::Female),
            Self::Father | Self::Mother => None,
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Father => write!(f, "father"),
            Self::Mother => write!(f, "mother"),
            Self::Husband => write!(f, "husband"),
        }
    }
}
