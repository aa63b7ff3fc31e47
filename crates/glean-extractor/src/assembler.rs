//! Accumulate classified records into an extraction result
//!
//! Entities merge by `(name, type)`: a repeated key appends its description
//! to the one already held. Relationships and claims are appended as they
//! arrive, in discovery order.

use crate::record::Record;
use glean_domain::{Claim, Entity, EntityKey, Relationship};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Separator used when merging entity descriptions
pub const DEFAULT_DESCRIPTION_SEPARATOR: &str = "\n";

/// Entities and relationships found in one text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphExtraction {
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,

    #[serde(skip)]
    index: HashMap<EntityKey, usize>,

    #[serde(skip)]
    separator: String,
}

impl Default for GraphExtraction {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphExtraction {
    /// Empty result using the default description separator
    pub fn new() -> Self {
        Self::with_separator(DEFAULT_DESCRIPTION_SEPARATOR)
    }

    /// Empty result joining merged descriptions with `separator`
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            entities: Vec::new(),
            relationships: Vec::new(),
            index: HashMap::new(),
            separator: separator.into(),
        }
    }

    /// Merge `records` into this result and return it
    pub fn merge<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        self.absorb(records);
        self
    }

    /// Merge `records` in place
    ///
    /// Claims and unrecognized records are ignored; returns how many records
    /// were taken.
    pub fn absorb<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        let mut taken = 0;
        for record in records {
            match record {
                Record::Entity(entity) => {
                    self.add_entity(entity);
                    taken += 1;
                }
                Record::Relationship(relationship) => {
                    self.relationships.push(relationship);
                    taken += 1;
                }
                Record::Claim(claim) => debug!("Ignoring claim about '{}' in graph output", claim.subject),
                Record::Unrecognized(_) => {}
            }
        }
        taken
    }

    fn add_entity(&mut self, entity: Entity) {
        let key = entity.key();
        match self.index.get(&key) {
            Some(&position) => {
                self.entities[position].append_description(&entity.description, &self.separator);
            }
            None => {
                self.index.insert(key, self.entities.len());
                self.entities.push(entity);
            }
        }
    }

    /// Entities in first-seen order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Relationships in discovery order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Look up an entity by its identity
    pub fn entity(&self, name: &str, entity_type: &str) -> Option<&Entity> {
        let key = EntityKey {
            name: name.to_string(),
            entity_type: entity_type.to_string(),
        };
        self.index.get(&key).map(|&i| &self.entities[i])
    }

    /// Relationships whose source or target names no known entity
    ///
    /// These are kept in the result; this only reports them.
    pub fn dangling_relationships(&self) -> impl Iterator<Item = &Relationship> {
        let names: std::collections::HashSet<&str> = self.entities.iter().map(|e| e.name.as_str()).collect();
        self.relationships
            .iter()
            .filter(move |r| !names.contains(r.source.as_str()) || !names.contains(r.target.as_str()))
    }

    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    /// Split into entities and relationships
    pub fn into_parts(self) -> (Vec<Entity>, Vec<Relationship>) {
        (self.entities, self.relationships)
    }
}

/// Claims found in one text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClaimExtraction {
    claims: Vec<Claim>,
}

impl ClaimExtraction {
    /// Empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the claims among `records` and return the result
    pub fn merge<I>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        self.absorb(records);
        self
    }

    /// Append the claims among `records` in place; returns how many
    pub fn absorb<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = Record>,
    {
        let before = self.claims.len();
        self.claims.extend(records.into_iter().filter_map(|record| match record {
            Record::Claim(claim) => Some(claim),
            _ => None,
        }));
        self.claims.len() - before
    }

    /// Claims in discovery order
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Whether nothing was found
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Take the claims
    pub fn into_claims(self) -> Vec<Claim> {
        self.claims
    }
}
