//! Integration tests for the Extractor

#[cfg(test)]
mod tests {
    use crate::prompt::{CLAIM_LOOP_PROMPT, GRAPH_CONTINUE_PROMPT, GRAPH_LOOP_PROMPT};
    use crate::{
        parse_claims_output, parse_graph_output, ClaimExtractionConfig, ClaimExtractor, ExtractorError,
        GleaningLimit, GraphExtractionConfig, GraphExtractor, WireFormat,
    };
    use glean_domain::{ClaimStatus, DEFAULT_WEIGHT};
    use glean_llm::MockTransport;
    use std::sync::Arc;

    const FIRST_ROUND: &str = "(\"entity\"<|>APPLE INC<|>ORGANIZATION<|>A technology company)\n##\n\
        (\"entity\"<|>STEVE JOBS<|>PERSON<|>Co-founder of Apple)\n##\n\
        (\"relationship\"<|>STEVE JOBS<|>APPLE INC<|>Founded the company<|>9)\n<|COMPLETE|>";

    const SECOND_ROUND: &str = "(\"entity\"<|>APPLE INC<|>ORGANIZATION<|>Headquartered in Cupertino)\n##\n\
        (\"entity\"<|>STEVE WOZNIAK<|>PERSON<|>Co-founder of Apple)\n##\n\
        (\"relationship\"<|>STEVE WOZNIAK<|>APPLE INC<|>Co-founded the company<|>8)\n<|COMPLETE|>";

    fn graph_config(limit: GleaningLimit) -> GraphExtractionConfig {
        GraphExtractionConfig {
            max_gleanings: limit,
            ..Default::default()
        }
    }

    fn graph_extractor(transport: &MockTransport, limit: GleaningLimit) -> GraphExtractor<&MockTransport> {
        GraphExtractor::new(transport, graph_config(limit), WireFormat::default())
    }

    #[test]
    fn test_full_graph_extraction_flow() {
        let transport = MockTransport::scripted([FIRST_ROUND, SECOND_ROUND, "NO"]);
        let extractor = graph_extractor(&transport, GleaningLimit::Bounded(5));

        let (result, stats) = extractor
            .extract_with_stats("Apple was founded by Steve Jobs and Steve Wozniak in Cupertino.")
            .unwrap();

        assert_eq!(stats.extraction_calls, 2);
        assert_eq!(stats.completeness_checks, 1);

        assert_eq!(result.entities().len(), 3);
        let apple = result.entity("APPLE INC", "ORGANIZATION").unwrap();
        assert!(apple.description.contains("A technology company"));
        assert!(apple.description.contains("Headquartered in Cupertino"));

        let weights: Vec<f64> = result.relationships().iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![9.0, 8.0]);
        assert_eq!(result.dangling_relationships().count(), 0);
    }

    #[test]
    fn test_no_gleaning_issues_one_call() {
        let transport = MockTransport::new(FIRST_ROUND).with_rule(GRAPH_LOOP_PROMPT, "Y");
        let result = graph_extractor(&transport, GleaningLimit::DISABLED)
            .extract("Apple text")
            .unwrap();

        assert_eq!(transport.call_count(), 1);
        assert_eq!(result.entities().len(), 2);
    }

    #[test]
    fn test_two_gleanings_with_eager_model() {
        let transport = MockTransport::new(FIRST_ROUND).with_rule(GRAPH_LOOP_PROMPT, "Yes");
        let (_, stats) = graph_extractor(&transport, GleaningLimit::Bounded(2))
            .extract_with_stats("Apple text")
            .unwrap();

        assert_eq!(stats.extraction_calls, 3);
        assert!(stats.completeness_checks <= 1);
        assert_eq!(transport.calls_containing(GRAPH_CONTINUE_PROMPT), 2);
        assert_eq!(transport.call_count(), 4);
    }

    #[test]
    fn test_repeated_entity_merges_across_rounds() {
        let transport = MockTransport::scripted([FIRST_ROUND, SECOND_ROUND]);
        let result = graph_extractor(&transport, GleaningLimit::Bounded(1))
            .extract("Apple text")
            .unwrap();

        let apples: Vec<_> = result.entities().iter().filter(|e| e.name == "APPLE INC").collect();
        assert_eq!(apples.len(), 1);
        assert_eq!(apples[0].description, "A technology company\nHeadquartered in Cupertino");
    }

    #[test]
    fn test_unbounded_gleaning_runs_until_no() {
        let transport = MockTransport::scripted([FIRST_ROUND, SECOND_ROUND, "y", SECOND_ROUND, "y", "<|COMPLETE|>", "n"]);
        let (result, stats) = graph_extractor(&transport, GleaningLimit::Unbounded)
            .extract_with_stats("Apple text")
            .unwrap();

        assert_eq!(stats.extraction_calls, 4);
        assert_eq!(stats.completeness_checks, 3);
        assert_eq!(result.relationships().len(), 3);
    }

    #[test]
    fn test_ambiguous_check_stops() {
        let transport = MockTransport::scripted([FIRST_ROUND, SECOND_ROUND, "Possibly, let me think"]);
        let (_, stats) = graph_extractor(&transport, GleaningLimit::Unbounded)
            .extract_with_stats("Apple text")
            .unwrap();

        assert_eq!(stats.total_calls(), 3);
    }

    #[test]
    fn test_transport_failure_is_distinct_error() {
        let transport = MockTransport::default();
        transport.push_error("401 Unauthorized");

        let result = graph_extractor(&transport, GleaningLimit::Bounded(1)).extract("Apple text");
        assert!(matches!(result, Err(ExtractorError::Transport(_))));
    }

    #[test]
    fn test_failure_mid_gleaning_abandons_call() {
        let transport = MockTransport::default();
        transport.push_response(FIRST_ROUND);
        transport.push_error("timeout");

        let result = graph_extractor(&transport, GleaningLimit::Bounded(2)).extract("Apple text");
        assert!(matches!(result, Err(ExtractorError::Transport(_))));
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_garbage_response_is_empty_result() {
        let transport = MockTransport::new("I'm sorry, I can't help with that.");
        let result = graph_extractor(&transport, GleaningLimit::DISABLED)
            .extract("Apple text")
            .unwrap();

        assert!(result.is_empty());
    }

    #[test]
    fn test_claim_extraction_flow() {
        let first = "(COMPANY A<|>GOVERNMENT AGENCY B<|>ANTI-COMPETITIVE PRACTICES<|>TRUE<|>2022-01-10T00:00:00<|>2022-01-10T00:00:00<|>Company A was fined for bid rigging<|>Company A was fined)\n<|COMPLETE|>";
        let second = "(\"claim\"<|>PERSON C<|>NONE<|>CORRUPTION<|>SUSPECTED<|>2015-01-01T00:00:00<|>2015-12-30T00:00:00<|>Person C was suspected of corruption<|>Person C was suspected)\n<|COMPLETE|>";
        let transport = MockTransport::scripted([first, second]).with_rule(CLAIM_LOOP_PROMPT, "N");

        let config = ClaimExtractionConfig {
            max_gleanings: GleaningLimit::Bounded(3),
            ..Default::default()
        };
        let extractor = ClaimExtractor::new(&transport, config, WireFormat::default())
            .with_entity_types(vec!["organization".to_string(), "person".to_string()]);

        let (result, stats) = extractor.extract_with_stats("Company A and Person C").unwrap();

        assert_eq!(stats.extraction_calls, 2);
        assert_eq!(stats.completeness_checks, 1);
        assert_eq!(result.claims().len(), 2);
        assert_eq!(result.claims()[1].object, None);
        assert_eq!(transport.calls_containing("Entity specification: organization, person"), 1);
    }

    #[test]
    fn test_shared_transport_across_extractors() {
        let transport = Arc::new(MockTransport::new(FIRST_ROUND));
        let graph = GraphExtractor::new(Arc::clone(&transport), graph_config(GleaningLimit::DISABLED), WireFormat::default());
        let claims = ClaimExtractor::new(
            Arc::clone(&transport),
            ClaimExtractionConfig {
                max_gleanings: GleaningLimit::DISABLED,
                ..Default::default()
            },
            WireFormat::default(),
        );

        assert_eq!(graph.extract("text").unwrap().entities().len(), 2);
        assert!(claims.extract("text").unwrap().is_empty());
        assert_eq!(transport.call_count(), 2);
    }

    #[test]
    fn test_independent_extractions_in_parallel() {
        let texts = ["first text", "second text", "third text"];

        std::thread::scope(|scope| {
            for text in texts {
                scope.spawn(move || {
                    let transport = MockTransport::new(FIRST_ROUND);
                    let result = graph_extractor(&transport, GleaningLimit::Bounded(1))
                        .extract(text)
                        .unwrap();
                    assert_eq!(result.entities().len(), 2);
                    assert_eq!(transport.call_count(), 2);
                });
            }
        });
    }

    #[test]
    fn test_claim_status_and_sentinels() {
        let result = parse_claims_output(
            "(\"claim\"<|>X<|>none<|>T<|>maybe<|>NONE<|>NONE<|>d<|>s)##(\"claim\"<|>Y<|>Z<|>T<|>false<|>2020-02-02<|>NONE<|>d<|>s)",
        );

        assert_eq!(result.claims()[0].status, ClaimStatus::Suspected);
        assert_eq!(result.claims()[0].object, None);
        assert_eq!(result.claims()[1].status, ClaimStatus::False);
        assert_eq!(result.claims()[1].object.as_deref(), Some("Z"));
        assert!(result.claims()[1].start_date.is_some());
        assert!(result.claims()[1].end_date.is_none());
    }

    #[test]
    fn test_missing_weight_defaults() {
        let result = parse_graph_output("(\"relationship\"<|>A<|>B<|>knows)##(\"relationship\"<|>A<|>B<|>knows<|>very)");
        assert!(result.relationships().iter().all(|r| r.weight == DEFAULT_WEIGHT));
    }
}

#[cfg(test)]
mod properties {
    use crate::{parse_claims_output, parse_graph_output, tokenize, WireFormat};
    use proptest::prelude::*;

    fn field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 ()\"'.,-]{0,12}"
    }

    proptest! {
        #[test]
        fn parsers_never_panic(text in any::<String>()) {
            let _ = parse_graph_output(&text);
            let _ = parse_claims_output(&text);
            let _ = tokenize(&text, &WireFormat::default());
        }

        #[test]
        fn parsers_never_panic_on_record_like_text(
            records in prop::collection::vec(prop::collection::vec(field(), 0..10), 0..8),
        ) {
            let text = records
                .iter()
                .map(|fields| format!("({})", fields.join("<|>")))
                .collect::<Vec<_>>()
                .join("##");
            let _ = parse_graph_output(&text);
            let _ = parse_claims_output(&text);
        }

        #[test]
        fn weights_are_finite_and_non_negative(weight in any::<String>(), number in any::<f64>()) {
            let text = format!(
                "(\"relationship\"<|>A<|>B<|>d<|>{})##(\"relationship\"<|>A<|>B<|>d<|>{})",
                weight.replace("<|>", "").replace("##", "").replace("<|COMPLETE|>", ""),
                number
            );
            for relationship in parse_graph_output(&text).relationships() {
                prop_assert!(relationship.weight.is_finite());
                prop_assert!(relationship.weight >= 0.0);
            }
        }

        #[test]
        fn entity_names_are_upper_case(name in "[a-z][a-z ]{0,15}", description in "[A-Za-z ]{1,20}") {
            let text = format!("(\"entity\"<|>{}<|>PERSON<|>{})", name, description);
            let result = parse_graph_output(&text);
            let expected = name.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();

            prop_assert_eq!(result.entities().len(), 1);
            prop_assert_eq!(&result.entities()[0].name, &expected);
        }

        #[test]
        fn claim_dates_other_than_sentinel_are_kept(
            date in "[0-9A-Za-z:.-]{1,12}".prop_filter("sentinel", |d| !d.eq_ignore_ascii_case("none")),
        ) {
            let text = format!("(\"claim\"<|>A<|>NONE<|>T<|>TRUE<|>{}<|>NONE<|>d<|>s)", date);
            let result = parse_claims_output(&text);

            prop_assert_eq!(result.claims().len(), 1);
            prop_assert!(result.claims()[0].start_date.is_some());
        }

        #[test]
        fn text_after_marker_is_ignored(tail in any::<String>()) {
            let text = format!("(\"entity\"<|>A<|>PERSON<|>d)<|COMPLETE|>{}", tail);
            let result = parse_graph_output(&text);
            prop_assert_eq!(result.entities().len(), 1);
            prop_assert!(result.relationships().is_empty());
        }
    }
}
