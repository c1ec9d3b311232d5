//! Session-scoped conversation state.
//!
//! One [`SessionStore`] per clinical session, created fresh and destroyed
//! with it — never a process-wide singleton, so concurrent sessions in
//! one process stay isolated. Mutations go through `&mut`, which is what
//! serializes them in a single-threaded host; a host that shares one
//! session across threads wraps the store in its own mutex.

use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use super::types::{GenerationResult, OutputFormat, PlanTable, ReasoningSummary, SoapExcerpt};

/// The single most recent generation, kept as follow-up context.
/// Overwritten wholesale on every successful generation; earlier values
/// survive only as rendered history entries.
#[derive(Debug, Clone, Serialize)]
pub struct LastOutputs {
    pub patient_text: String,
    pub output_format: OutputFormat,
    pub soap: SoapExcerpt,
    pub plan_table: PlanTable,
    pub reasoning_summary: ReasoningSummary,
}

impl LastOutputs {
    pub fn from_result(
        patient_text: &str,
        output_format: OutputFormat,
        result: &GenerationResult,
    ) -> Self {
        Self {
            patient_text: patient_text.to_string(),
            output_format,
            soap: result.soap.clone(),
            plan_table: result.plan_table.clone(),
            reasoning_summary: result.reasoning_summary.clone(),
        }
    }
}

/// One event in the session history. Immutable once appended.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    Generation {
        timestamp: NaiveDateTime,
        patient_text: String,
        output_format: OutputFormat,
        result: GenerationResult,
    },
    FollowUp {
        timestamp: NaiveDateTime,
        question: String,
        answer: String,
    },
}

/// Per-session state: the follow-up context and the append-only event
/// history. History insertion order is chronological order; entries are
/// never reordered or pruned, and there is no size cap within a session.
pub struct SessionStore {
    last_outputs: Option<LastOutputs>,
    history: Vec<HistoryEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            last_outputs: None,
            history: Vec::new(),
        }
    }

    /// Overwrite the follow-up context and append a generation entry.
    /// The context swap is a single assignment, so readers never see a
    /// partial update.
    pub fn record_generation(
        &mut self,
        patient_text: &str,
        output_format: OutputFormat,
        result: &GenerationResult,
    ) {
        self.last_outputs = Some(LastOutputs::from_result(patient_text, output_format, result));
        self.history.push(HistoryEntry::Generation {
            timestamp: Local::now().naive_local(),
            patient_text: patient_text.to_string(),
            output_format,
            result: result.clone(),
        });
    }

    /// Append a follow-up entry. Leaves the follow-up context untouched.
    ///
    /// Callers append follow-ups only while a context exists; the
    /// orchestrator's gate owns that precondition, not this store.
    pub fn record_follow_up(&mut self, question: &str, answer: &str) {
        self.history.push(HistoryEntry::FollowUp {
            timestamp: Local::now().naive_local(),
            question: question.to_string(),
            answer: answer.to_string(),
        });
    }

    pub fn has_last_outputs(&self) -> bool {
        self.last_outputs.is_some()
    }

    pub fn current_context(&self) -> Option<&LastOutputs> {
        self.last_outputs.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
