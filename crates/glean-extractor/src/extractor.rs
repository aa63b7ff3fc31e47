//! Extractors: prompt the model, glean, and return the merged result

use crate::assembler::{ClaimExtraction, GraphExtraction};
use crate::config::{ClaimExtractionConfig, GraphExtractionConfig, WireFormat, DEFAULT_ENTITY_TYPES};
use crate::error::ExtractorError;
use crate::gleaning::{GleaningController, GleaningPrompts, GleaningStats};
use crate::prompt::{build_claims_prompt, build_graph_prompt};
use glean_domain::ChatTransport;
use tracing::{debug, info};

/// Extracts entities and relationships from text
///
/// Holds no state between calls; independent `extract` calls may run in
/// parallel when the transport allows it.
pub struct GraphExtractor<T>
where
    T: ChatTransport,
{
    transport: T,
    config: GraphExtractionConfig,
    controller: GleaningController,
}

impl<T> GraphExtractor<T>
where
    T: ChatTransport,
{
    /// Create a new graph extractor
    pub fn new(transport: T, config: GraphExtractionConfig, wire: WireFormat) -> Self {
        let controller = GleaningController::new(config.max_gleanings, GleaningPrompts::graph(), wire);
        Self {
            transport,
            config,
            controller,
        }
    }

    /// Create an extractor after validating the configuration
    pub fn try_new(transport: T, config: GraphExtractionConfig, wire: WireFormat) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        wire.validate().map_err(ExtractorError::Config)?;
        Ok(Self::new(transport, config, wire))
    }

    /// Extract entities and relationships from `text`
    ///
    /// Empty or whitespace-only text returns an empty result without calling
    /// the transport.
    pub fn extract(&self, text: &str) -> Result<GraphExtraction, ExtractorError> {
        self.extract_with_stats(text).map(|(result, _)| result)
    }

    /// Extract and also report how many model calls were made
    pub fn extract_with_stats(&self, text: &str) -> Result<(GraphExtraction, GleaningStats), ExtractorError> {
        let mut result = GraphExtraction::with_separator(self.config.description_separator.clone());
        if text.trim().is_empty() {
            debug!("Empty input; skipping graph extraction");
            return Ok((result, GleaningStats::default()));
        }

        info!(
            "Extracting graph from {} chars with {} (max gleanings: {})",
            text.len(),
            self.transport.model_name(),
            self.controller.limit()
        );

        let prompt = build_graph_prompt(text, &self.config.entity_types, self.controller.wire());
        debug!("Prompt length: {} chars", prompt.len());

        let stats = self.controller.run(&self.transport, prompt, &mut result)?;

        info!(
            "Extracted {} entities and {} relationships in {} model calls",
            result.entities().len(),
            result.relationships().len(),
            stats.total_calls()
        );
        Ok((result, stats))
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The extraction configuration
    pub fn config(&self) -> &GraphExtractionConfig {
        &self.config
    }
}

/// Extracts claims from text
pub struct ClaimExtractor<T>
where
    T: ChatTransport,
{
    transport: T,
    config: ClaimExtractionConfig,
    entity_types: Vec<String>,
    controller: GleaningController,
}

impl<T> ClaimExtractor<T>
where
    T: ChatTransport,
{
    /// Create a new claim extractor
    pub fn new(transport: T, config: ClaimExtractionConfig, wire: WireFormat) -> Self {
        let controller = GleaningController::new(config.max_gleanings, GleaningPrompts::claims(), wire);
        Self {
            transport,
            config,
            entity_types: DEFAULT_ENTITY_TYPES.iter().map(|t| t.to_string()).collect(),
            controller,
        }
    }

    /// Create an extractor after validating the configuration
    pub fn try_new(transport: T, config: ClaimExtractionConfig, wire: WireFormat) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        wire.validate().map_err(ExtractorError::Config)?;
        Ok(Self::new(transport, config, wire))
    }

    /// Entity types to ask about when no entity specs are configured
    pub fn with_entity_types(mut self, entity_types: Vec<String>) -> Self {
        self.entity_types = entity_types;
        self
    }

    /// Extract claims from `text`
    ///
    /// Empty or whitespace-only text returns an empty result without calling
    /// the transport.
    pub fn extract(&self, text: &str) -> Result<ClaimExtraction, ExtractorError> {
        self.extract_with_stats(text).map(|(result, _)| result)
    }

    /// Extract and also report how many model calls were made
    pub fn extract_with_stats(&self, text: &str) -> Result<(ClaimExtraction, GleaningStats), ExtractorError> {
        let mut result = ClaimExtraction::new();
        if text.trim().is_empty() {
            debug!("Empty input; skipping claim extraction");
            return Ok((result, GleaningStats::default()));
        }

        info!(
            "Extracting claims from {} chars with {} (max gleanings: {})",
            text.len(),
            self.transport.model_name(),
            self.controller.limit()
        );

        let prompt = build_claims_prompt(
            text,
            &self.entity_specs(),
            &self.config.description,
            self.controller.wire(),
        );
        debug!("Prompt length: {} chars", prompt.len());

        let stats = self.controller.run(&self.transport, prompt, &mut result)?;

        info!("Extracted {} claims in {} model calls", result.claims().len(), stats.total_calls());
        Ok((result, stats))
    }

    /// Entity specs put in the prompt
    pub fn entity_specs(&self) -> String {
        self.config.resolved_entity_specs(&self.entity_types)
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The extraction configuration
    pub fn config(&self) -> &ClaimExtractionConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GleaningLimit;
    use glean_llm::MockTransport;

    #[test]
    fn test_empty_text_makes_no_calls() {
        let transport = MockTransport::new("(\"entity\"<|>A<|>PERSON<|>d)");
        let extractor = GraphExtractor::new(&transport, GraphExtractionConfig::default(), WireFormat::default());

        let (result, stats) = extractor.extract_with_stats("  \n ").unwrap();
        assert!(result.is_empty());
        assert_eq!(stats.total_calls(), 0);
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_whitespace_claims_input_makes_no_calls() {
        let transport = MockTransport::new("(A<|>NONE<|>T<|>TRUE<|>NONE<|>NONE<|>d<|>s)");
        let extractor = ClaimExtractor::new(&transport, ClaimExtractionConfig::default(), WireFormat::default());

        assert!(extractor.extract("\t \n").unwrap().is_empty());
        assert!(extractor.extract("").unwrap().is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[test]
    fn test_prompt_uses_configured_entity_types() {
        let transport = MockTransport::new("<|COMPLETE|>");
        let config = GraphExtractionConfig {
            entity_types: vec!["technology".to_string()],
            max_gleanings: GleaningLimit::DISABLED,
            ..Default::default()
        };
        GraphExtractor::new(&transport, config, WireFormat::default())
            .extract("Rust is a language.")
            .unwrap();

        assert_eq!(transport.calls_containing("Entity_types: TECHNOLOGY"), 1);
    }

    #[test]
    fn test_claim_entity_specs_fallback() {
        let transport = MockTransport::new("<|COMPLETE|>");
        let extractor = ClaimExtractor::new(&transport, ClaimExtractionConfig::default(), WireFormat::default())
            .with_entity_types(vec!["person".to_string()]);

        assert_eq!(extractor.entity_specs(), "person");
    }

    #[test]
    fn test_try_new_rejects_bad_config() {
        let config = GraphExtractionConfig {
            entity_types: Vec::new(),
            ..Default::default()
        };
        let result = GraphExtractor::try_new(MockTransport::default(), config, WireFormat::default());
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
