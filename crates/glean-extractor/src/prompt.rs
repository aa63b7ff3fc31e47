//! Prompt templates for graph and claim extraction

use crate::config::WireFormat;

/// Template for the initial entity and relationship extraction turn
pub const GRAPH_EXTRACTION_PROMPT: &str = r#"-Goal-
Given a text document and a list of entity types, identify all entities of those types in the text and all relationships among the identified entities.

-Steps-
1. Identify all entities. For each identified entity, extract the following information:
- entity_name: Name of the entity, capitalized
- entity_type: One of the following types: [{entity_types}]
- entity_description: Comprehensive description of the entity's attributes and activities
Format each entity as ("entity"{tuple_delimiter}<entity_name>{tuple_delimiter}<entity_type>{tuple_delimiter}<entity_description>)

2. From the entities identified in step 1, identify all pairs of (source_entity, target_entity) that are *clearly related* to each other.
For each pair of related entities, extract the following information:
- source_entity: name of the source entity, as identified in step 1
- target_entity: name of the target entity, as identified in step 1
- relationship_description: explanation as to why you think the source entity and the target entity are related to each other
- relationship_strength: a numeric score indicating strength of the relationship between the source entity and target entity
Format each relationship as ("relationship"{tuple_delimiter}<source_entity>{tuple_delimiter}<target_entity>{tuple_delimiter}<relationship_description>{tuple_delimiter}<relationship_strength>)

3. Return output in English as a single list of all the entities and relationships identified in steps 1 and 2. Use **{record_delimiter}** as the list delimiter.

4. When finished, output {completion_delimiter}

-Example-
Entity_types: ORGANIZATION,PERSON
Text:
The Verdantis Central Institution will meet on Monday and Thursday. Chair Martin Smith will take questions after the announcement.
Output:
("entity"{tuple_delimiter}VERDANTIS CENTRAL INSTITUTION{tuple_delimiter}ORGANIZATION{tuple_delimiter}The Verdantis Central Institution meets on Monday and Thursday)
{record_delimiter}
("entity"{tuple_delimiter}MARTIN SMITH{tuple_delimiter}PERSON{tuple_delimiter}Martin Smith is the chair of the Verdantis Central Institution)
{record_delimiter}
("relationship"{tuple_delimiter}MARTIN SMITH{tuple_delimiter}VERDANTIS CENTRAL INSTITUTION{tuple_delimiter}Martin Smith chairs the Verdantis Central Institution{tuple_delimiter}9)
{completion_delimiter}

-Real Data-
Entity_types: {entity_types}
Text: {input_text}
Output:"#;

/// Follow-up turn asking for entities the previous turns missed
pub const GRAPH_CONTINUE_PROMPT: &str = "MANY entities and relationships were missed in the last extraction. Remember to ONLY emit entities that match any of the previously extracted types. Add them below using the same format:\n";

/// Completeness check after a graph continuation turn
pub const GRAPH_LOOP_PROMPT: &str = "It appears some entities and relationships may have still been missed. Answer Y if there are still entities or relationships that need to be added, or N if there are none. Please answer with a single letter Y or N.\n";

/// Template for the initial claim extraction turn
pub const CLAIM_EXTRACTION_PROMPT: &str = r#"-Target activity-
You are an intelligent assistant that helps a human analyst to analyze claims against certain entities presented in a text document.

-Goal-
Given a text document, an entity specification, and a claim description, extract all entities that match the entity specification and all claims against those entities.

-Steps-
1. Extract all named entities that match the predefined entity specification. Entity specification can either be a list of entity names or a list of entity types.
2. For each entity identified in step 1, extract all claims associated with the entity. Claims need to match the specified claim description, and the entity should be the subject of the claim.
For each claim, extract the following information:
- Subject: name of the entity that is subject of the claim, capitalized. The subject entity is one that committed the action described in the claim. Subject needs to be one of the named entities identified in step 1.
- Object: name of the entity that is object of the claim, capitalized. The object entity is one that either reports/handles or is affected by the action described in the claim. If object entity is unknown, use **{absence_sentinel}**.
- Claim Type: overall category of the claim, capitalized. Name it in a way that can be repeated across multiple text inputs, so that similar claims share the same claim type
- Claim Status: **TRUE**, **FALSE**, or **SUSPECTED**. TRUE means the claim is confirmed, FALSE means the claim is found to be False, SUSPECTED means the claim is not verified.
- Claim Description: Detailed description explaining the reasoning behind the claim, together with all the related evidence and references.
- Claim Date: Period (start_date, end_date) when the claim was made. Both start_date and end_date should be in ISO-8601 format. If the claim was made on a single date rather than a date range, set the same date for both start_date and end_date. If date is unknown, return **{absence_sentinel}**.
- Claim Source Text: List of **all** quotes from the original text that are relevant to the claim.

Format each claim as (<subject_entity>{tuple_delimiter}<object_entity>{tuple_delimiter}<claim_type>{tuple_delimiter}<claim_status>{tuple_delimiter}<claim_start_date>{tuple_delimiter}<claim_end_date>{tuple_delimiter}<claim_description>{tuple_delimiter}<claim_source>)

3. Return output in English as a single list of all the claims identified in steps 1 and 2. Use **{record_delimiter}** as the list delimiter.

4. When finished, output {completion_delimiter}

-Example-
Entity specification: organization
Claim description: red flags associated with an entity
Text: According to an article on 2022/01/10, Company A was fined for bid rigging while participating in multiple public tenders published by Government Agency B.
Output:
(COMPANY A{tuple_delimiter}GOVERNMENT AGENCY B{tuple_delimiter}ANTI-COMPETITIVE PRACTICES{tuple_delimiter}TRUE{tuple_delimiter}2022-01-10T00:00:00{tuple_delimiter}2022-01-10T00:00:00{tuple_delimiter}Company A was found to engage in anti-competitive practices because it was fined for bid rigging in multiple public tenders published by Government Agency B according to an article published on 2022/01/10{tuple_delimiter}According to an article published on 2022/01/10, Company A was fined for bid rigging while participating in multiple public tenders published by Government Agency B.)
{completion_delimiter}

-Real Data-
Entity specification: {entity_specs}
Claim description: {claim_description}
Text: {input_text}
Output:"#;

/// Follow-up turn asking for claims the previous turns missed
pub const CLAIM_CONTINUE_PROMPT: &str = "MANY entities were missed in the last extraction. Add them below using the same format:\n";

/// Completeness check after a claim continuation turn
pub const CLAIM_LOOP_PROMPT: &str = "It appears some entities may have still been missed. Answer Y if there are still entities that need to be added, or N if there are none. Please answer with a single letter Y or N.\n";

/// Entity types as they appear in the prompt: upper-cased, comma-joined
pub fn format_entity_types(entity_types: &[String]) -> String {
    entity_types
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the initial graph extraction prompt for `text`
pub fn build_graph_prompt(text: &str, entity_types: &[String], wire: &WireFormat) -> String {
    let prompt = GRAPH_EXTRACTION_PROMPT.replace("{entity_types}", &format_entity_types(entity_types));
    fill(prompt, wire, text)
}

/// Build the initial claim extraction prompt for `text`
pub fn build_claims_prompt(text: &str, entity_specs: &str, claim_description: &str, wire: &WireFormat) -> String {
    let prompt = CLAIM_EXTRACTION_PROMPT
        .replace("{entity_specs}", entity_specs)
        .replace("{claim_description}", claim_description);
    fill(prompt, wire, text)
}

/// Substitute the wire format, then the input text
///
/// The input goes in last so placeholder-like text inside it is left alone.
fn fill(prompt: String, wire: &WireFormat, text: &str) -> String {
    prompt
        .replace("{tuple_delimiter}", &wire.tuple_delimiter)
        .replace("{record_delimiter}", &wire.record_delimiter)
        .replace("{completion_delimiter}", &wire.completion_marker)
        .replace("{absence_sentinel}", &wire.absence_sentinel)
        .replace("{input_text}", text)
}
