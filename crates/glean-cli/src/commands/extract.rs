//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::output::Formatter;
use glean_domain::ChatTransport;
use glean_extractor::{ClaimExtractor, GleaningLimit, GraphExtractor};

/// Execute the extract command.
pub fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;
    let config = apply_overrides(&args, config);
    config.validate()?;

    let transport = config.llm.build()?;
    run_extraction(&args, &config, &transport, &text, formatter)
}

/// Config with the command-line overrides applied.
pub fn apply_overrides(args: &ExtractArgs, config: &Config) -> Config {
    let mut config = config.clone();
    if let Some(model) = &args.model {
        config.llm.model = model.clone();
    }
    if let Some(max_gleanings) = args.max_gleanings {
        let limit = GleaningLimit::from(max_gleanings);
        config.extract_graph.max_gleanings = limit;
        config.extract_claims.max_gleanings = limit;
    }
    config
}

/// Run graph and, if requested, claim extraction over `text`.
pub fn run_extraction<T>(
    args: &ExtractArgs,
    config: &Config,
    transport: &T,
    text: &str,
    formatter: &Formatter,
) -> Result<()>
where
    T: ChatTransport,
{
    let graph_extractor = GraphExtractor::try_new(
        transport,
        config.extract_graph.clone(),
        config.parsing.clone(),
    )?;
    let (graph, stats) = graph_extractor.extract_with_stats(text)?;

    println!("{}", formatter.format_graph(&graph)?);
    eprintln!("{}", formatter.stats("Graph", &stats));
    if let Some(dir) = &args.out_dir {
        for path in export::write_graph(dir, &graph)? {
            eprintln!("{}", formatter.success(&format!("Wrote {}", path.display())));
        }
    }

    if !args.wants_claims(config.extract_claims.enabled) {
        return Ok(());
    }

    let claim_extractor = ClaimExtractor::try_new(
        transport,
        config.extract_claims.clone(),
        config.parsing.clone(),
    )?
    .with_entity_types(config.extract_graph.entity_types.clone());
    let (claims, stats) = claim_extractor.extract_with_stats(text)?;

    println!("{}", formatter.format_claims(&claims)?);
    eprintln!("{}", formatter.stats("Claims", &stats));
    if let Some(dir) = &args.out_dir {
        let path = export::write_claims(dir, &claims)?;
        eprintln!("{}", formatter.success(&format!("Wrote {}", path.display())));
    }

    Ok(())
}
