//! Claim module - dated assertions about entities

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Truth status of a claim
///
/// Anything the model emits outside `TRUE`/`FALSE`/`SUSPECTED` is read as
/// `Suspected`: the claim is kept but its certainty is downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimStatus {
    /// The claim is confirmed by the source
    True,

    /// The claim is refuted by the source
    False,

    /// The claim is reported but not confirmed
    Suspected,
}

impl ClaimStatus {
    /// Get the wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::True => "TRUE",
            ClaimStatus::False => "FALSE",
            ClaimStatus::Suspected => "SUSPECTED",
        }
    }

    /// Parse a status case-insensitively, falling back to `Suspected`
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "TRUE" => ClaimStatus::True,
            "FALSE" => ClaimStatus::False,
            _ => ClaimStatus::Suspected,
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A claim date as the model wrote it
///
/// Dates chrono understands are kept as [`NaiveDateTime`]; anything else
/// (`2015-06`, `early 2015`) is kept verbatim rather than discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimDate {
    /// A date or date-time that parsed
    Parsed(NaiveDateTime),

    /// Unparsed date text
    Raw(String),
}

impl ClaimDate {
    /// The parsed date-time, if any
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            ClaimDate::Parsed(dt) => Some(*dt),
            ClaimDate::Raw(_) => None,
        }
    }

    /// The calendar date, if parsed
    pub fn date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|dt| dt.date())
    }
}

impl From<NaiveDateTime> for ClaimDate {
    fn from(dt: NaiveDateTime) -> Self {
        ClaimDate::Parsed(dt)
    }
}

impl fmt::Display for ClaimDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimDate::Parsed(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            ClaimDate::Raw(text) => f.write_str(text),
        }
    }
}

/// A claim extracted from text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Canonical name of the entity the claim is about
    pub subject: String,

    /// Canonical name of the other party, if any
    pub object: Option<String>,

    /// Claim type (e.g. ANTI-COMPETITIVE PRACTICES)
    #[serde(rename = "type")]
    pub claim_type: String,

    /// Truth status
    pub status: ClaimStatus,

    /// Start of the period the claim covers
    pub start_date: Option<ClaimDate>,

    /// End of the period the claim covers
    pub end_date: Option<ClaimDate>,

    /// Description of the claim
    pub description: String,

    /// Quote from the source text backing the claim
    pub source_text: String,
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.subject, self.claim_type, self.status)
    }
}
