//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use glean_domain::{Claim, ClaimDate, Entity, Relationship};
use glean_extractor::{ClaimExtraction, GleaningStats, GraphExtraction};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest description shown in a table cell.
const MAX_CELL_CHARS: usize = 80;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self { format, color_enabled }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a graph extraction.
    pub fn format_graph(&self, graph: &GraphExtraction) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(graph)?),
            OutputFormat::Table => Ok(format!(
                "{}\n{}\n\n{}\n{}",
                self.colorize("Entities", "cyan"),
                self.entities_table(graph.entities()),
                self.colorize("Relationships", "cyan"),
                self.relationships_table(graph.relationships()),
            )),
        }
    }

    /// Format a claim extraction.
    pub fn format_claims(&self, claims: &ClaimExtraction) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(claims)?),
            OutputFormat::Table => Ok(format!(
                "{}\n{}",
                self.colorize("Claims", "cyan"),
                self.claims_table(claims.claims())
            )),
        }
    }

    fn entities_table(&self, entities: &[Entity]) -> String {
        if entities.is_empty() {
            return self.colorize("No entities found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Type", "Description"]);
        for entity in entities {
            builder.push_record([
                entity.name.as_str(),
                entity.entity_type.as_str(),
                &truncate(&entity.description),
            ]);
        }
        render(builder)
    }

    fn relationships_table(&self, relationships: &[Relationship]) -> String {
        if relationships.is_empty() {
            return self.colorize("No relationships found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Source", "Target", "Weight", "Description"]);
        for relationship in relationships {
            builder.push_record([
                relationship.source.as_str(),
                relationship.target.as_str(),
                &format!("{}", relationship.weight),
                &truncate(&relationship.description),
            ]);
        }
        render(builder)
    }

    fn claims_table(&self, claims: &[Claim]) -> String {
        if claims.is_empty() {
            return self.colorize("No claims found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Subject", "Object", "Type", "Status", "Period", "Description"]);
        for claim in claims {
            let period = match (claim.start_date.as_ref(), claim.end_date.as_ref()) {
                (Some(start), Some(end)) if start == end => day(start),
                (Some(start), Some(end)) => format!("{} .. {}", day(start), day(end)),
                (Some(start), None) => format!("{} ..", day(start)),
                (None, Some(end)) => format!(".. {}", day(end)),
                (None, None) => "-".to_string(),
            };
            builder.push_record([
                claim.subject.as_str(),
                claim.object.as_deref().unwrap_or("-"),
                claim.claim_type.as_str(),
                claim.status.as_str(),
                &period,
                &truncate(&claim.description),
            ]);
        }
        render(builder)
    }

    /// Summarize model usage.
    pub fn stats(&self, label: &str, stats: &GleaningStats) -> String {
        self.info(&format!(
            "{}: {} extraction call(s), {} completeness check(s), {} record(s)",
            label, stats.extraction_calls, stats.completeness_checks, stats.records
        ))
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn render(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}

/// Calendar day of a parsed date, or the raw text.
fn day(date: &ClaimDate) -> String {
    match date.date() {
        Some(day) => day.to_string(),
        None => date.to_string(),
    }
}

/// Single-line, length-limited cell text.
fn truncate(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_CELL_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(MAX_CELL_CHARS - 1).collect();
    format!("{}…", cut)
}
