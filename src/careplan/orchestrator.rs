//! Care-plan generation and follow-up orchestration.
//!
//! Coordinates: validate → build prompt → model call → parse → record
//! for generation, and validate → gate → build prompt from the stored
//! context → model call → record for follow-ups. The session store is
//! only mutated after the full pipeline for a request has succeeded.

use super::openai::ChatModel;
use super::parser::parse_generation_response;
use super::prompt::{build_followup_prompt, build_generation_prompt};
use super::relevance::RelevancePolicy;
use super::session::SessionStore;
use super::types::{GenerationResult, OutputFormat};
use super::CarePlanError;

/// Outcome of a follow-up request. A gate rejection is a routing
/// decision, not a failure — callers present it as an informational
/// message, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpReply {
    Answer(String),
    NotRelevant,
}

/// Orchestrates one clinical session's generations and follow-ups.
///
/// Holds no session state itself; the per-session [`SessionStore`] is
/// passed into each call, which keeps concurrent sessions isolated and
/// lets the borrow checker serialize mutations within one session.
pub struct CarePlanService<'a, M: ChatModel, R: RelevancePolicy> {
    model: &'a M,
    gate: &'a R,
}

impl<'a, M: ChatModel, R: RelevancePolicy> CarePlanService<'a, M, R> {
    pub fn new(model: &'a M, gate: &'a R) -> Self {
        Self { model, gate }
    }

    /// Generate a structured care plan from free-text patient information.
    ///
    /// On success the store's follow-up context is overwritten and a
    /// generation entry is appended to history. Any failure leaves the
    /// store exactly as it was.
    pub fn generate(
        &self,
        store: &mut SessionStore,
        patient_text: &str,
        output_format: OutputFormat,
    ) -> Result<GenerationResult, CarePlanError> {
        if patient_text.trim().is_empty() {
            return Err(CarePlanError::EmptyPatientText);
        }

        let messages = build_generation_prompt(patient_text, output_format);
        let raw = self.model.complete(&messages, true).map_err(|e| {
            tracing::warn!(error = %e, "generation failed at the model call");
            CarePlanError::GenerationProvider(e.to_string())
        })?;

        let result = parse_generation_response(&raw)?;
        store.record_generation(patient_text, output_format, &result);
        tracing::info!(format = %output_format, "care plan generated");
        Ok(result)
    }

    /// Answer a follow-up question scoped to the last generation.
    ///
    /// The caller normally prevents this path until a generation exists;
    /// `NoContext` backstops that precondition. Gate rejections return
    /// [`FollowUpReply::NotRelevant`] without any model call or history
    /// append.
    pub fn follow_up(
        &self,
        store: &mut SessionStore,
        question: &str,
    ) -> Result<FollowUpReply, CarePlanError> {
        if question.trim().is_empty() {
            return Err(CarePlanError::EmptyQuestion);
        }
        let Some(context) = store.current_context() else {
            return Err(CarePlanError::NoContext);
        };

        if !self.gate.is_relevant(question) {
            tracing::info!("follow-up rejected by relevance gate");
            return Ok(FollowUpReply::NotRelevant);
        }

        let messages = build_followup_prompt(context, question);
        let answer = self.model.complete(&messages, false).map_err(|e| {
            tracing::warn!(error = %e, "follow-up failed at the model call");
            CarePlanError::FollowUpProvider(e.to_string())
        })?;

        store.record_follow_up(question, &answer);
        Ok(FollowUpReply::Answer(answer))
    }
}
