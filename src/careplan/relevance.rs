/// Follow-up relevance policy. Kept behind a trait so the keyword
/// heuristic can be swapped for a semantic classifier without touching
/// the orchestrator.
pub trait RelevancePolicy {
    fn is_relevant(&self, question: &str) -> bool;
}

/// Domain tokens the gate accepts, lowercase. "nanda" also covers the
/// "NANDA-I" spelling by substring.
const RELEVANT_KEYWORDS: &[&str] = &[
    "看護",
    "患者",
    "診断",
    "目標",
    "介入",
    "評価",
    "アセスメント",
    "soap",
    "計画",
    "根拠",
    "要点",
    "nanda",
    "nic",
    "noc",
];

/// Keyword allow-list gate: case-insensitive substring match against a
/// fixed token set.
///
/// This is a heuristic, not semantic classification. Relevant questions
/// phrased without any token are rejected, and unrelated questions that
/// happen to contain one slip through; both are accepted tradeoffs.
pub struct KeywordRelevanceGate;

impl RelevancePolicy for KeywordRelevanceGate {
    fn is_relevant(&self, question: &str) -> bool {
        let q = question.trim().to_lowercase();
        if q.is_empty() {
            return false;
        }
        RELEVANT_KEYWORDS.iter().any(|k| q.contains(k))
    }
}
