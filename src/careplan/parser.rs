use std::sync::LazyLock;

use regex::Regex;

use super::types::GenerationResult;
use super::CarePlanError;

// The model is instructed to return bare JSON, but wraps it in a code
// fence often enough that the repair pass has to handle it.
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^```(?:json)?|```$").unwrap());

static TRAILING_COMMA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Parse the model's raw text into a normalized [`GenerationResult`].
///
/// Strict parse first; on failure, a single repair pass (strip wrapping
/// code fences, remove trailing commas before a closer) and one retry.
/// Substructures the model omitted deserialize to empty defaults, so a
/// success never has a missing top-level field.
pub fn parse_generation_response(raw: &str) -> Result<GenerationResult, CarePlanError> {
    if let Ok(result) = serde_json::from_str::<GenerationResult>(raw) {
        return Ok(result);
    }

    let repaired = repair(raw);
    serde_json::from_str::<GenerationResult>(&repaired).map_err(|e| {
        tracing::warn!(error = %e, "model output unparsable after repair pass");
        CarePlanError::UnparsableOutput
    })
}

/// Bounded repair: fence stripping and trailing-comma removal only.
/// Deliberately not a lenient JSON parser.
fn repair(raw: &str) -> String {
    let stripped = CODE_FENCE.replace_all(raw.trim(), "");
    TRAILING_COMMA.replace_all(&stripped, "$1").into_owned()
}
