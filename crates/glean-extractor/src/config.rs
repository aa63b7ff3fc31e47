//! Configuration for the Extractor
//!
//! Every value the parser and the gleaning controller need is carried in
//! these structs and passed explicitly; nothing is read from global state.

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};

/// Entity types requested when none are configured
pub const DEFAULT_ENTITY_TYPES: [&str; 4] = ["organization", "person", "geo", "event"];

/// Claim description used when none is configured
pub const DEFAULT_CLAIM_DESCRIPTION: &str =
    "Any claims or facts that could be relevant to information discovery.";

/// Delimiters and sentinels of the model's textual output format
///
/// Records look like `("entity"<|>NAME<|>TYPE<|>DESCRIPTION)`, separated by
/// `##`, and the response ends with `<|COMPLETE|>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireFormat {
    /// Separator between records
    pub record_delimiter: String,

    /// Separator between the fields of one record
    pub tuple_delimiter: String,

    /// Marks the end of the response; anything after it is ignored
    pub completion_marker: String,

    /// Stands for "no value" in optional claim fields
    pub absence_sentinel: String,
}

impl Default for WireFormat {
    fn default() -> Self {
        Self {
            record_delimiter: "##".to_string(),
            tuple_delimiter: "<|>".to_string(),
            completion_marker: "<|COMPLETE|>".to_string(),
            absence_sentinel: "NONE".to_string(),
        }
    }
}

impl WireFormat {
    /// Validate the delimiters
    pub fn validate(&self) -> Result<(), String> {
        if self.record_delimiter.is_empty() {
            return Err("record_delimiter must not be empty".to_string());
        }
        if self.tuple_delimiter.is_empty() {
            return Err("tuple_delimiter must not be empty".to_string());
        }
        if self.completion_marker.is_empty() {
            return Err("completion_marker must not be empty".to_string());
        }
        if self.absence_sentinel.trim().is_empty() {
            return Err("absence_sentinel must not be blank".to_string());
        }
        if self.record_delimiter == self.tuple_delimiter {
            return Err("record_delimiter and tuple_delimiter must differ".to_string());
        }
        Ok(())
    }
}

/// How many continuation rounds the gleaning controller may run
///
/// Stored on disk as an integer: `0` disables gleaning, a positive `k` allows
/// at most `k` rounds, any negative value means "until the model says no".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum GleaningLimit {
    /// At most this many continuation rounds
    Bounded(u32),

    /// No ceiling; stops only on a negative completeness answer
    Unbounded,
}

impl GleaningLimit {
    /// No continuation rounds at all
    pub const DISABLED: GleaningLimit = GleaningLimit::Bounded(0);

    /// Whether continuation round `round` (1-based) may run
    pub fn permits_round(&self, round: u32) -> bool {
        match self {
            GleaningLimit::Bounded(max) => round <= *max,
            GleaningLimit::Unbounded => true,
        }
    }
}

impl Default for GleaningLimit {
    fn default() -> Self {
        GleaningLimit::Bounded(1)
    }
}

impl From<i64> for GleaningLimit {
    fn from(value: i64) -> Self {
        if value < 0 {
            GleaningLimit::Unbounded
        } else {
            GleaningLimit::Bounded(u32::try_from(value).unwrap_or(u32::MAX))
        }
    }
}

impl From<GleaningLimit> for i64 {
    fn from(limit: GleaningLimit) -> Self {
        match limit {
            GleaningLimit::Bounded(max) => i64::from(max),
            GleaningLimit::Unbounded => -1,
        }
    }
}

impl std::fmt::Display for GleaningLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GleaningLimit::Bounded(max) => write!(f, "{}", max),
            GleaningLimit::Unbounded => f.write_str("unbounded"),
        }
    }
}

/// Configuration for entity and relationship extraction (`[extract_graph]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphExtractionConfig {
    /// Entity types the model is asked to find
    pub entity_types: Vec<String>,

    /// Continuation rounds after the initial extraction
    pub max_gleanings: GleaningLimit,

    /// Joins description fragments of one entity seen more than once
    pub description_separator: String,
}

impl Default for GraphExtractionConfig {
    fn default() -> Self {
        Self {
            entity_types: DEFAULT_ENTITY_TYPES.iter().map(|t| t.to_string()).collect(),
            max_gleanings: GleaningLimit::default(),
            description_separator: "\n".to_string(),
        }
    }
}

impl GraphExtractionConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.entity_types.iter().all(|t| t.trim().is_empty()) {
            return Err("entity_types must contain at least one type".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Configuration for claim extraction (`[extract_claims]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimExtractionConfig {
    /// Whether claims are extracted at all
    pub enabled: bool,

    /// Entity types or names the claims should be about
    ///
    /// Falls back to the graph entity types joined by ", ".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_specs: Option<String>,

    /// What kind of claims to look for
    pub description: String,

    /// Continuation rounds after the initial extraction
    pub max_gleanings: GleaningLimit,
}

impl Default for ClaimExtractionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            entity_specs: None,
            description: DEFAULT_CLAIM_DESCRIPTION.to_string(),
            max_gleanings: GleaningLimit::default(),
        }
    }
}

impl ClaimExtractionConfig {
    /// Entity specs to put in the prompt
    pub fn resolved_entity_specs(&self, entity_types: &[String]) -> String {
        match &self.entity_specs {
            Some(specs) if !specs.trim().is_empty() => specs.clone(),
            _ if !entity_types.is_empty() => entity_types.join(", "),
            _ => DEFAULT_ENTITY_TYPES.join(", "),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("description must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_are_valid() {
        assert!(WireFormat::default().validate().is_ok());
        assert!(GraphExtractionConfig::default().validate().is_ok());
        assert!(ClaimExtractionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_wire_format() {
        let mut wire = WireFormat::default();
        wire.tuple_delimiter = wire.record_delimiter.clone();
        assert!(wire.validate().is_err());

        let mut wire = WireFormat::default();
        wire.completion_marker.clear();
        assert!(wire.validate().is_err());
    }

    #[test]
    fn test_empty_entity_types_invalid() {
        let config = GraphExtractionConfig {
            entity_types: vec![" ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gleaning_limit_from_integer() {
        assert_eq!(GleaningLimit::from(0), GleaningLimit::DISABLED);
        assert_eq!(GleaningLimit::from(3), GleaningLimit::Bounded(3));
        assert_eq!(GleaningLimit::from(-1), GleaningLimit::Unbounded);
        assert_eq!(GleaningLimit::from(-7), GleaningLimit::Unbounded);
        assert_eq!(i64::from(GleaningLimit::Unbounded), -1);
    }

    #[test]
    fn test_gleaning_limit_permits_round() {
        assert!(!GleaningLimit::DISABLED.permits_round(1));
        assert!(GleaningLimit::Bounded(2).permits_round(2));
        assert!(!GleaningLimit::Bounded(2).permits_round(3));
        assert!(GleaningLimit::Unbounded.permits_round(u32::MAX));
    }

    #[test]
    fn test_graph_config_from_toml() {
        let config = GraphExtractionConfig::from_toml(
            r#"
            entity_types = ["person", "technology"]
            max_gleanings = -1
            "#,
        )
        .unwrap();

        assert_eq!(config.entity_types, vec!["person", "technology"]);
        assert_eq!(config.max_gleanings, GleaningLimit::Unbounded);
        assert_eq!(config.description_separator, "\n");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GraphExtractionConfig {
            max_gleanings: GleaningLimit::Bounded(4),
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = GraphExtractionConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);

        let claims = ClaimExtractionConfig::default();
        let parsed = ClaimExtractionConfig::from_toml(&claims.to_toml().unwrap()).unwrap();
        assert_eq!(claims, parsed);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = GraphExtractionConfig::from_toml("max_gleanings = \"lots\"");
        assert!(matches!(result, Err(ExtractorError::Toml(_))));
    }

    #[test]
    fn test_resolved_entity_specs() {
        let types = vec!["organization".to_string(), "person".to_string()];

        let config = ClaimExtractionConfig::default();
        assert_eq!(config.resolved_entity_specs(&types), "organization, person");
        assert_eq!(config.resolved_entity_specs(&[]), "organization, person, geo, event");

        let config = ClaimExtractionConfig {
            entity_specs: Some("Company A, Person B".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_entity_specs(&types), "Company A, Person B");
    }
}
