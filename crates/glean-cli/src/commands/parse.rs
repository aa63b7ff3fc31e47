//! Parse command implementation.

use crate::cli::{Kind, ParseArgs};
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::output::Formatter;
use glean_extractor::{parse_claims_output_with, parse_graph_output_with};

/// Execute the parse command.
pub fn execute_parse(args: ParseArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;

    match args.kind {
        Kind::Graph => {
            let graph = parse_graph_output_with(&text, &config.parsing);
            println!("{}", formatter.format_graph(&graph)?);

            let dangling = graph.dangling_relationships().count();
            if dangling > 0 {
                eprintln!(
                    "{}",
                    formatter.warning(&format!("{} relationship(s) reference unknown entities", dangling))
                );
            }

            if let Some(dir) = &args.out_dir {
                for path in export::write_graph(dir, &graph)? {
                    eprintln!("{}", formatter.success(&format!("Wrote {}", path.display())));
                }
            }
        }
        Kind::Claims => {
            let claims = parse_claims_output_with(&text, &config.parsing);
            println!("{}", formatter.format_claims(&claims)?);

            if let Some(dir) = &args.out_dir {
                let path = export::write_claims(dir, &claims)?;
                eprintln!("{}", formatter.success(&format!("Wrote {}", path.display())));
            }
        }
    }

    Ok(())
}
