use super::relation_type::RelationType;

pub type RelationId = i64;

/// The `(source, type, target)` tuple of a relation. No two stored relations
/// share the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationKey {
    pub source: String,
    pub relation_type: RelationType,
    pub target: String,
}

impl RelationKey {
    pub fn new(
        source: impl Into<String>,
        relation_type: RelationType,
        target: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            relation_type,
            target: target.into(),
        }
    }

    pub fn involves(&self, person_id: &str) -> bool {
        self.source == person_id || self.target == person_id
    }
}

impl std::fmt::Display for RelationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.source, self.relation_type, self.target)
    }
}

/// A stored relation: a system-generated id plus its tuple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub id: RelationId,
    pub key: RelationKey,
}

impl Relation {
    pub fn new(id: RelationId, key: RelationKey) -> Self {
        Self { id, key }
    }
}

/// Partial match over relation tuples. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationPattern {
    pub source: Option<String>,
    pub relation_type: Option<RelationType>,
    pub target: Option<String>,
}

impl RelationPattern {
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches exactly the given tuple.
    pub fn exact(key: &RelationKey) -> Self {
        Self {
            source: Some(key.source.clone()),
            relation_type: Some(key.relation_type),
            target: Some(key.target.clone()),
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn of_type(mut self, relation_type: RelationType) -> Self {
        self.relation_type = Some(relation_type);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn matches(&self, key: &RelationKey) -> bool {
        self.source.as_ref().map_or(true, |s| *s == key.source)
            && self.relation_type.map_or(true, |t| t == key.relation_type)
            && self.target.as_ref().map_or(true, |t| *t == key.target)
    }
}

impl std::fmt::Display for RelationPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let relation_type = self.relation_type.map(|t| t.to_string());
        write!(
            f,
            "({}, {}, {})",
            self.source.as_deref().unwrap_or("*"),
            relation_type.as_deref().unwrap_or("*"),
            self.target.as_deref().unwrap_or("*"),
        )
    }
}

/// Restricts a relation listing to those touching a person, either end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationFilter {
    pub involving: Option<String>,
}

impl RelationFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn involving(person_id: impl Into<String>) -> Self {
        Self {
            involving: Some(person_id.into()),
        }
    }

    pub fn matches(&self, relation: &Relation) -> bool {
        self.involving
            .as_deref()
            .map_or(true, |pid| relation.key.involves(pid))
    }
}
