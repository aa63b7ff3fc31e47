//! Parse one model response into records
//!
//! These functions never fail: malformed records are dropped and logged at
//! debug level, and a response with no usable record yields an empty result.

use crate::assembler::{ClaimExtraction, GraphExtraction};
use crate::config::WireFormat;
use crate::record::{classify_and_map, classify_claim_record, Record};
use crate::tokenizer::tokenize;
use tracing::debug;

/// Parse entity and relationship records using the standard wire format
pub fn parse_graph_output(text: &str) -> GraphExtraction {
    parse_graph_output_with(text, &WireFormat::default())
}

/// Parse entity and relationship records using `wire`
pub fn parse_graph_output_with(text: &str, wire: &WireFormat) -> GraphExtraction {
    GraphExtraction::new().merge(graph_records(text, wire))
}

/// Parse claim records using the standard wire format
pub fn parse_claims_output(text: &str) -> ClaimExtraction {
    parse_claims_output_with(text, &WireFormat::default())
}

/// Parse claim records using `wire`
pub fn parse_claims_output_with(text: &str, wire: &WireFormat) -> ClaimExtraction {
    ClaimExtraction::new().merge(claim_records(text, wire))
}

/// Classified records of a graph response, unrecognized ones removed
pub fn graph_records(text: &str, wire: &WireFormat) -> Vec<Record> {
    collect(text, wire, classify_and_map)
}

/// Classified records of a claims response, unrecognized ones removed
pub fn claim_records(text: &str, wire: &WireFormat) -> Vec<Record> {
    collect(text, wire, classify_claim_record)
}

fn collect(text: &str, wire: &WireFormat, classify: fn(&[&str], &WireFormat) -> Record) -> Vec<Record> {
    let mut records = Vec::new();
    let mut dropped = 0;

    for fields in tokenize(text, wire) {
        match classify(&fields, wire) {
            Record::Unrecognized(reason) => {
                dropped += 1;
                debug!("Dropping record: {} ({} fields)", reason, fields.len());
            }
            record => records.push(record),
        }
    }

    if dropped > 0 {
        debug!("Parsed {} records, dropped {}", records.len(), dropped);
    }
    records
}
