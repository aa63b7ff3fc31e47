//! Classify tokenized records and map their fields onto domain types
//!
//! Field 0 of a record is its tag (`"entity"`, `"relationship"`, `"claim"`),
//! matched case-insensitively with or without quotes. Records with an unknown
//! tag, too few fields, or an empty identity field come back as
//! [`Record::Unrecognized`]; extra trailing fields are ignored.

use crate::config::WireFormat;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use glean_domain::relationship::sanitize_weight;
use glean_domain::{Claim, ClaimDate, ClaimStatus, Entity, Relationship, DEFAULT_WEIGHT};
use std::fmt;

/// Fields after the tag in an entity record: name, type, description
pub const ENTITY_FIELDS: usize = 3;

/// Required fields after the tag in a relationship record: source, target,
/// description (the weight is optional)
pub const RELATIONSHIP_FIELDS: usize = 3;

/// Fields after the tag in a claim record
pub const CLAIM_FIELDS: usize = 8;

/// One classified record
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// An entity record
    Entity(Entity),

    /// A relationship record
    Relationship(Relationship),

    /// A claim record
    Claim(Claim),

    /// Anything else; dropped by the assembler
    Unrecognized(DropReason),
}

/// Why a record was not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Field 0 is not a known tag
    UnknownTag(String),

    /// The tag is known but the record is too short
    MissingFields {
        /// Normalized tag
        tag: &'static str,
        /// Fields required, including the tag
        required: usize,
        /// Fields present, including the tag
        found: usize,
    },

    /// A name field is empty after cleaning
    EmptyIdentity {
        /// Normalized tag
        tag: &'static str,
        /// Name of the empty field
        field: &'static str,
    },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::UnknownTag(tag) => write!(f, "unknown tag '{}'", tag),
            DropReason::MissingFields { tag, required, found } => {
                write!(f, "{} record needs {} fields, found {}", tag, required, found)
            }
            DropReason::EmptyIdentity { tag, field } => write!(f, "{} record has empty {}", tag, field),
        }
    }
}

/// Classify a tokenized record by its tag and map its fields
pub fn classify_and_map(fields: &[&str], wire: &WireFormat) -> Record {
    let Some((tag, rest)) = fields.split_first() else {
        return Record::Unrecognized(DropReason::UnknownTag(String::new()));
    };

    match normalize_tag(tag).as_str() {
        "entity" => map_entity(rest),
        "relationship" => map_relationship(rest),
        "claim" => map_claim(rest, "claim", wire),
        other => Record::Unrecognized(DropReason::UnknownTag(other.to_string())),
    }
}

/// Classify a record from a claims response
///
/// Claims are often emitted without the leading tag, as eight bare fields.
/// Those are accepted here; records tagged as entities or relationships are
/// never reread as claims.
pub fn classify_claim_record(fields: &[&str], wire: &WireFormat) -> Record {
    match classify_and_map(fields, wire) {
        Record::Unrecognized(DropReason::UnknownTag(_)) if fields.len() >= CLAIM_FIELDS => {
            map_claim(fields, "untagged claim", wire)
        }
        record => record,
    }
}

fn map_entity(fields: &[&str]) -> Record {
    if fields.len() < ENTITY_FIELDS {
        return missing("entity", ENTITY_FIELDS, fields.len());
    }

    let name = canonical_name(fields[0]);
    if name.is_empty() {
        return empty_identity("entity", "name");
    }

    Record::Entity(Entity::new(name, clean(fields[1]), clean(fields[2])))
}

fn map_relationship(fields: &[&str]) -> Record {
    if fields.len() < RELATIONSHIP_FIELDS {
        return missing("relationship", RELATIONSHIP_FIELDS, fields.len());
    }

    let source = canonical_name(fields[0]);
    if source.is_empty() {
        return empty_identity("relationship", "source");
    }
    let target = canonical_name(fields[1]);
    if target.is_empty() {
        return empty_identity("relationship", "target");
    }

    let weight = parse_weight(fields.get(3).copied());
    Record::Relationship(Relationship::new(source, target, clean(fields[2]), weight))
}

fn map_claim(fields: &[&str], tag: &'static str, wire: &WireFormat) -> Record {
    if fields.len() < CLAIM_FIELDS {
        return missing(tag, CLAIM_FIELDS, fields.len());
    }

    let subject = canonical_name(fields[0]);
    if subject.is_empty() {
        return empty_identity(tag, "subject");
    }

    let sentinel = wire.absence_sentinel.as_str();
    Record::Claim(Claim {
        subject,
        object: parse_optional(fields[1], sentinel).map(|o| canonical_name(&o)),
        claim_type: clean(fields[2]),
        status: ClaimStatus::parse_lenient(fields[3]),
        start_date: parse_date(fields[4], sentinel),
        end_date: parse_date(fields[5], sentinel),
        description: clean(fields[6]),
        source_text: clean(fields[7]),
    })
}

fn missing(tag: &'static str, after_tag: usize, found_after_tag: usize) -> Record {
    Record::Unrecognized(DropReason::MissingFields {
        tag,
        required: after_tag + 1,
        found: found_after_tag + 1,
    })
}

fn empty_identity(tag: &'static str, field: &'static str) -> Record {
    Record::Unrecognized(DropReason::EmptyIdentity { tag, field })
}

/// Lower-cased tag with quotes and stray parentheses removed
pub fn normalize_tag(field: &str) -> String {
    field
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '(' || c.is_whitespace())
        .to_lowercase()
}

/// Trim and collapse runs of whitespace to a single space
pub fn clean(field: &str) -> String {
    field.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cleaned, unquoted, upper-cased name used for identity
pub fn canonical_name(field: &str) -> String {
    clean(field.trim().trim_matches('"')).to_uppercase()
}

/// Parse a weight, falling back to the default on anything unusable
///
/// Negative weights clamp to zero.
pub fn parse_weight(field: Option<&str>) -> f64 {
    field
        .map(clean)
        .and_then(|w| w.parse::<f64>().ok())
        .map(sanitize_weight)
        .unwrap_or(DEFAULT_WEIGHT)
}

/// Cleaned value, or `None` for blank fields and the absence sentinel
pub fn parse_optional(field: &str, sentinel: &str) -> Option<String> {
    let value = clean(field);
    let unquoted = value.trim_matches('"');
    if unquoted.is_empty() || unquoted.eq_ignore_ascii_case(sentinel) {
        None
    } else {
        Some(value)
    }
}

/// Date-time layouts tried after RFC 3339, most specific first
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a claim date
///
/// Blank fields and the absence sentinel yield `None`. ISO-8601 dates and
/// date-times (extended or basic `YYYYMMDD`) become [`ClaimDate::Parsed`];
/// anything else is kept as [`ClaimDate::Raw`].
pub fn parse_date(field: &str, sentinel: &str) -> Option<ClaimDate> {
    let value = parse_optional(field, sentinel)?;
    let value = value.trim_matches('"');

    match parse_iso_datetime(value) {
        Some(dt) => Some(ClaimDate::Parsed(dt)),
        None => Some(ClaimDate::Raw(value.to_string())),
    }
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
    {
        return Some(dt);
    }

    let date = if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        let extended = format!("{}-{}-{}", &value[..4], &value[4..6], &value[6..]);
        NaiveDate::parse_from_str(&extended, "%Y-%m-%d").ok()
    } else {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
    };
    date.map(|d| d.and_time(NaiveTime::default()))
}
