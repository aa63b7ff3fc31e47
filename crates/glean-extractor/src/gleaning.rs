//! Gleaning: re-prompt the model for records it missed
//!
//! One conversation runs through three states:
//!
//! ```text
//! Initial ──► Continue(1) ──► Continue(2) ──► ... ──► Done
//!    │             │  ▲
//!    └──► Done     └──┘ completeness check answered "yes"
//! ```
//!
//! Every response is parsed and merged into the accumulator as it arrives.
//! A completeness check follows each continuation round unless the round
//! was the last one permitted. Anything but a clear "yes" ends the loop.

use crate::assembler::{ClaimExtraction, GraphExtraction};
use crate::config::{GleaningLimit, WireFormat};
use crate::error::ExtractorError;
use crate::parser::{claim_records, graph_records};
use crate::prompt::{CLAIM_CONTINUE_PROMPT, CLAIM_LOOP_PROMPT, GRAPH_CONTINUE_PROMPT, GRAPH_LOOP_PROMPT};
use glean_domain::{ChatMessage, ChatTransport};
use serde::Serialize;
use tracing::debug;

/// An accumulator a model response can be merged into
pub trait Gleanable {
    /// Parse `response` and merge its records; returns how many were taken
    fn absorb_response(&mut self, response: &str, wire: &WireFormat) -> usize;
}

impl Gleanable for GraphExtraction {
    fn absorb_response(&mut self, response: &str, wire: &WireFormat) -> usize {
        self.absorb(graph_records(response, wire))
    }
}

impl Gleanable for ClaimExtraction {
    fn absorb_response(&mut self, response: &str, wire: &WireFormat) -> usize {
        self.absorb(claim_records(response, wire))
    }
}

/// The fixed follow-up turns of a gleaning conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GleaningPrompts {
    /// Asks for more records
    pub continue_prompt: String,

    /// Asks whether more records remain (yes/no)
    pub loop_prompt: String,
}

impl GleaningPrompts {
    /// Prompts for entity and relationship extraction
    pub fn graph() -> Self {
        Self {
            continue_prompt: GRAPH_CONTINUE_PROMPT.to_string(),
            loop_prompt: GRAPH_LOOP_PROMPT.to_string(),
        }
    }

    /// Prompts for claim extraction
    pub fn claims() -> Self {
        Self {
            continue_prompt: CLAIM_CONTINUE_PROMPT.to_string(),
            loop_prompt: CLAIM_LOOP_PROMPT.to_string(),
        }
    }
}

/// Where the controller is in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GleaningState {
    /// The primary prompt has not been sent
    Initial,

    /// Continuation round `round` (1-based) is next
    Continue {
        /// Round number
        round: u32,
    },

    /// No more calls
    Done,
}

/// Model calls made by one gleaning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GleaningStats {
    /// Initial plus continuation calls
    pub extraction_calls: u32,

    /// Completeness checks asked
    pub completeness_checks: u32,

    /// Records merged into the accumulator
    pub records: usize,
}

impl GleaningStats {
    /// All transport calls
    pub fn total_calls(&self) -> u32 {
        self.extraction_calls + self.completeness_checks
    }
}

/// Drives one gleaning conversation
#[derive(Debug, Clone)]
pub struct GleaningController {
    limit: GleaningLimit,
    prompts: GleaningPrompts,
    wire: WireFormat,
}

impl GleaningController {
    /// Create a controller
    pub fn new(limit: GleaningLimit, prompts: GleaningPrompts, wire: WireFormat) -> Self {
        Self { limit, prompts, wire }
    }

    /// Configured round limit
    pub fn limit(&self) -> GleaningLimit {
        self.limit
    }

    /// Wire format responses are parsed with
    pub fn wire(&self) -> &WireFormat {
        &self.wire
    }

    /// Run the conversation starting from `initial_prompt`, merging into `acc`
    ///
    /// A transport failure ends the run; records merged before it stay in
    /// `acc`, but callers are expected to discard the accumulator.
    pub fn run<T, A>(&self, transport: &T, initial_prompt: String, acc: &mut A) -> Result<GleaningStats, ExtractorError>
    where
        T: ChatTransport + ?Sized,
        A: Gleanable,
    {
        let mut history = vec![ChatMessage::user(initial_prompt)];
        let mut stats = GleaningStats::default();
        let mut state = GleaningState::Initial;

        while state != GleaningState::Done {
            state = match state {
                GleaningState::Initial => {
                    self.extract_turn(transport, &mut history, acc, &mut stats)?;
                    self.after_round(0)
                }
                GleaningState::Continue { round } => {
                    debug!("Gleaning round {} (limit {})", round, self.limit);
                    history.push(ChatMessage::user(self.prompts.continue_prompt.clone()));
                    self.extract_turn(transport, &mut history, acc, &mut stats)?;

                    match self.after_round(round) {
                        GleaningState::Done => GleaningState::Done,
                        next => {
                            history.push(ChatMessage::user(self.prompts.loop_prompt.clone()));
                            let answer = send(transport, &history)?;
                            stats.completeness_checks += 1;

                            let more = is_affirmative(&answer);
                            debug!("Completeness check after round {}: {:?} -> continue={}", round, answer.trim(), more);
                            history.push(ChatMessage::assistant(answer));
                            if more {
                                next
                            } else {
                                GleaningState::Done
                            }
                        }
                    }
                }
                GleaningState::Done => GleaningState::Done,
            };
        }

        Ok(stats)
    }

    /// State after `round` rounds (0 = initial) have completed
    fn after_round(&self, round: u32) -> GleaningState {
        match round.checked_add(1) {
            Some(next) if self.limit.permits_round(next) => GleaningState::Continue { round: next },
            _ => GleaningState::Done,
        }
    }

    fn extract_turn<T, A>(
        &self,
        transport: &T,
        history: &mut Vec<ChatMessage>,
        acc: &mut A,
        stats: &mut GleaningStats,
    ) -> Result<(), ExtractorError>
    where
        T: ChatTransport + ?Sized,
        A: Gleanable,
    {
        let response = send(transport, history)?;
        stats.extraction_calls += 1;

        let taken = acc.absorb_response(&response, &self.wire);
        stats.records += taken;
        debug!("Response {} yielded {} records", stats.extraction_calls, taken);

        history.push(ChatMessage::assistant(response));
        Ok(())
    }
}

fn send<T>(transport: &T, history: &[ChatMessage]) -> Result<String, ExtractorError>
where
    T: ChatTransport + ?Sized,
{
    transport
        .send(history)
        .map_err(|e| ExtractorError::Transport(e.to_string()))
}

/// Whether a completeness-check answer means "yes"
///
/// Only the first non-whitespace character counts; `y` or `Y` is yes,
/// anything else (including an empty answer) is no.
pub fn is_affirmative(answer: &str) -> bool {
    answer
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
}
