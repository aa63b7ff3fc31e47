//! Entity module - the nodes of the extracted graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an entity: two records with equal keys are the same entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    /// Canonical (upper-cased) name
    pub name: String,

    /// Entity type as emitted by the model
    pub entity_type: String,
}

/// A named entity found in the source text
///
/// `name` is always canonical: upper-cased with whitespace collapsed.
/// `description` keeps the model's casing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Canonical entity name
    pub name: String,

    /// Entity type (e.g. ORGANIZATION, PERSON)
    #[serde(rename = "type")]
    pub entity_type: String,

    /// Description; fragments from later gleaning rounds are appended
    pub description: String,
}

impl Entity {
    /// Create a new entity
    pub fn new(
        name: impl Into<String>,
        entity_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            description: description.into(),
        }
    }

    /// Identity key of this entity
    pub fn key(&self) -> EntityKey {
        EntityKey {
            name: self.name.clone(),
            entity_type: self.entity_type.clone(),
        }
    }

    /// Append another description fragment for the same entity
    ///
    /// Fragments are never compared for equality; a repeated description is
    /// appended again.
    pub fn append_description(&mut self, fragment: &str, separator: &str) {
        if fragment.is_empty() {
            return;
        }
        if self.description.is_empty() {
            self.description.push_str(fragment);
        } else {
            self.description.push_str(separator);
            self.description.push_str(fragment);
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.entity_type)
    }
}
