use serde::{Deserialize, Serialize};

/// Which sections of the result the caller wants rendered.
///
/// Serialized with the Japanese labels the UI shows, so the same value
/// appears verbatim in prompts and history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    #[serde(rename = "SOAP形式")]
    SoapOnly,
    #[serde(rename = "看護計画表形式")]
    PlanTableOnly,
    #[serde(rename = "両方")]
    Both,
}

impl OutputFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::SoapOnly => "SOAP形式",
            Self::PlanTableOnly => "看護計画表形式",
            Self::Both => "両方",
        }
    }

    pub fn includes_soap(&self) -> bool {
        matches!(self, Self::SoapOnly | Self::Both)
    }

    pub fn includes_plan_table(&self) -> bool {
        matches!(self, Self::PlanTableOnly | Self::Both)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Assessment and Plan portions of a SOAP note. Subjective/Objective are
/// implicit in the patient text and not modeled separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SoapExcerpt {
    #[serde(default)]
    pub assessment: Vec<String>,
    #[serde(default)]
    pub plan: Vec<String>,
}

/// Five parallel columns of the nursing plan table, zipped into rows by
/// index at render time. The columns are never forced to equal length
/// here; shorter columns are padded when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlanTable {
    #[serde(default)]
    pub problems: Vec<String>,
    #[serde(default)]
    pub assessments: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub interventions: Vec<String>,
    #[serde(default)]
    pub evaluation: Vec<String>,
}

/// Condensed clinical reasoning. Follow-up context only; never rendered
/// as primary output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReasoningSummary {
    #[serde(default)]
    pub key_findings: Vec<String>,
    #[serde(default)]
    pub rationales: Vec<String>,
    #[serde(default)]
    pub differentials: Vec<String>,
}

/// Normalized model output. All three fields are always present — a
/// substructure the model omitted deserializes to its empty default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GenerationResult {
    #[serde(default)]
    pub soap: SoapExcerpt,
    #[serde(default)]
    pub plan_table: PlanTable,
    #[serde(default)]
    pub reasoning_summary: ReasoningSummary,
}

/// One role-tagged message in a chat-completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}
