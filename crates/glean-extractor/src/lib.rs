//! Glean Extractor
//!
//! Turns free text into a knowledge graph (entities and relationships) or a
//! list of claims by prompting a language model and parsing its delimited
//! output.
//!
//! # Overview
//!
//! The model answers in a fixed record format:
//!
//! ```text
//! ("entity"<|>APPLE INC<|>ORGANIZATION<|>A technology company)
//! ##
//! ("relationship"<|>STEVE JOBS<|>APPLE INC<|>Founded the company<|>9)
//! <|COMPLETE|>
//! ```
//!
//! Parsing is tolerant: records with an unknown tag or too few fields are
//! dropped, bad weights fall back to `1.0`, and a response with no records
//! is an empty result rather than an error.
//!
//! # Architecture
//!
//! ```text
//! text → prompt → ChatTransport ─┐
//!                                ▼
//!        tokenizer → record classifier → assembler
//!                                ▲           │
//!        continuation / completeness check ◄─┘  (gleaning)
//! ```
//!
//! # Example Usage
//!
//! ```
//! use glean_extractor::{parse_graph_output, GraphExtractionConfig, GraphExtractor, WireFormat};
//! use glean_llm::MockTransport;
//!
//! let result = parse_graph_output("(\"entity\"<|>alice<|>PERSON<|>An engineer)<|COMPLETE|>");
//! assert_eq!(result.entities()[0].name, "ALICE");
//!
//! let transport = MockTransport::new("(\"entity\"<|>ACME<|>ORGANIZATION<|>A company)")
//!     .with_rule("single letter Y or N", "N");
//! let extractor = GraphExtractor::new(transport, GraphExtractionConfig::default(), WireFormat::default());
//!
//! let graph = extractor.extract("Alice works at Acme Corp.").unwrap();
//! assert_eq!(graph.entities().len(), 1);
//! assert_eq!(graph.entities()[0].description, "A company\nA company");
//! ```

#![warn(missing_docs)]

mod assembler;
mod config;
mod error;
mod extractor;
mod gleaning;
mod parser;
pub mod prompt;
mod record;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use assembler::{ClaimExtraction, GraphExtraction, DEFAULT_DESCRIPTION_SEPARATOR};
pub use config::{
    ClaimExtractionConfig, GleaningLimit, GraphExtractionConfig, WireFormat, DEFAULT_CLAIM_DESCRIPTION,
    DEFAULT_ENTITY_TYPES,
};
pub use error::ExtractorError;
pub use extractor::{ClaimExtractor, GraphExtractor};
pub use gleaning::{is_affirmative, Gleanable, GleaningController, GleaningPrompts, GleaningState, GleaningStats};
pub use parser::{
    claim_records, graph_records, parse_claims_output, parse_claims_output_with, parse_graph_output,
    parse_graph_output_with,
};
pub use record::{classify_and_map, classify_claim_record, DropReason, Record};
pub use tokenizer::tokenize;
