//! Glean Domain Layer
//!
//! Value types for the knowledge graph produced by extraction, plus the trait
//! seam through which the extractor talks to a language model.
//!
//! ## Key Concepts
//!
//! - **Entity**: a named thing with a type and a free-text description,
//!   identified by `(name, type)`
//! - **Relationship**: a weighted, described edge between two entity names;
//!   never deduplicated, so the graph is a multigraph
//! - **Claim**: a dated assertion about a subject (and optionally an object)
//!   with a truth status
//! - **ChatMessage**: one turn of the conversation sent to the model
//!
//! ## Architecture
//!
//! - Pure data plus trait definitions, no I/O
//! - Transport implementations live in `glean-llm`
//! - Parsing and gleaning live in `glean-extractor`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod claim;
pub mod entity;
pub mod message;
pub mod relationship;
pub mod traits;

// Re-exports for convenience
pub use claim::{Claim, ClaimDate, ClaimStatus};
pub use entity::{Entity, EntityKey};
pub use message::{ChatMessage, Role};
pub use relationship::{Relationship, DEFAULT_WEIGHT};
pub use traits::ChatTransport;
