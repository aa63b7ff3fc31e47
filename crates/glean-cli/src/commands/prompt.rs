//! Prompt command implementation.

use crate::cli::{Kind, PromptArgs};
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use glean_extractor::prompt::{build_claims_prompt, build_graph_prompt};

/// Execute the prompt command.
pub fn execute_prompt(args: PromptArgs, config: &Config) -> Result<()> {
    let text = read_input(&args.input)?;
    println!("{}", render_prompt(&args, config, &text));
    Ok(())
}

/// Build the prompt the arguments ask for.
pub fn render_prompt(args: &PromptArgs, config: &Config, text: &str) -> String {
    let entity_types = if args.entity_types.is_empty() {
        config.extract_graph.entity_types.clone()
    } else {
        args.entity_types.clone()
    };

    match args.kind {
        Kind::Graph => build_graph_prompt(text, &entity_types, &config.parsing),
        Kind::Claims => {
            let entity_specs = args
                .entity_specs
                .clone()
                .unwrap_or_else(|| config.extract_claims.resolved_entity_specs(&entity_types));
            let description = args
                .description
                .as_deref()
                .unwrap_or(&config.extract_claims.description);
            build_claims_prompt(text, &entity_specs, description, &config.parsing)
        }
    }
}
