//! Relationship module - the edges of the extracted graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight used when the model omits the weight or emits something unparsable
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A directed, weighted relationship between two entity names
///
/// Relationships are not deduplicated by `(source, target)`: every parsed
/// record is kept as its own edge. `source` and `target` should name entities
/// of the same extraction, but nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Canonical name of the source entity
    pub source: String,

    /// Canonical name of the target entity
    pub target: String,

    /// Description of how the two are related
    pub description: String,

    /// Strength of the relationship, always finite and non-negative
    pub weight: f64,
}

impl Relationship {
    /// Create a new relationship
    ///
    /// Weights that are not finite fall back to [`DEFAULT_WEIGHT`]; negative
    /// weights are clamped to zero.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
        weight: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            description: description.into(),
            weight: sanitize_weight(weight),
        }
    }
}

/// Map a raw weight onto the valid range
pub fn sanitize_weight(weight: f64) -> f64 {
    if !weight.is_finite() {
        DEFAULT_WEIGHT
    } else {
        weight.max(0.0)
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (weight={})", self.source, self.target, self.weight)
    }
}
