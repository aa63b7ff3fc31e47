//! CSV export of extraction results.

use crate::error::Result;
use glean_extractor::{ClaimExtraction, GraphExtraction};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name for exported entities.
pub const ENTITIES_FILE: &str = "entities.csv";

/// File name for exported relationships.
pub const RELATIONSHIPS_FILE: &str = "relationships.csv";

/// File name for exported claims.
pub const CLAIMS_FILE: &str = "claims.csv";

/// Write `entities.csv` and `relationships.csv` into `dir`.
pub fn write_graph(dir: &Path, graph: &GraphExtraction) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    Ok(vec![
        write_rows(&dir.join(ENTITIES_FILE), graph.entities(), &["name", "type", "description"])?,
        write_rows(
            &dir.join(RELATIONSHIPS_FILE),
            graph.relationships(),
            &["source", "target", "description", "weight"],
        )?,
    ])
}

/// Write `claims.csv` into `dir`.
pub fn write_claims(dir: &Path, claims: &ClaimExtraction) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    write_rows(
        &dir.join(CLAIMS_FILE),
        claims.claims(),
        &[
            "subject",
            "object",
            "type",
            "status",
            "start_date",
            "end_date",
            "description",
            "source_text",
        ],
    )
}

/// Header row is written explicitly so empty results still get one.
fn write_rows<T: Serialize>(path: &Path, rows: &[T], header: &[&str]) -> Result<PathBuf> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(path.to_path_buf())
}
