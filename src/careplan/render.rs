//! Markdown rendering of generation results and session history.
//!
//! Pure presentation: the producer never equalizes plan-table column
//! lengths, so padding to the longest column happens here.

use super::session::HistoryEntry;
use super::types::{GenerationResult, OutputFormat, PlanTable, SoapExcerpt};

pub const APP_TITLE: &str = "看護診断/看護計画アシスタント";

pub const DISCLAIMER: &str =
    "本アプリは支援目的であり、最終判断は医療従事者に委ねられるものとなります。対象は成人一般です。";

/// Shown when the relevance gate rejects a follow-up. Informational,
/// not an error.
pub const NOT_RELEVANT_NOTICE: &str = "本件とは関係がない質問です。対象：『看護情報 → 看護診断 / 看護計画（SOAP / 計画表）』に関するご質問を受け付けます。";

const PLAN_TABLE_HEADERS: [&str; 5] = [
    "看護問題（NANDA-I）",
    "アセスメント（根拠）",
    "目標（NOC）",
    "看護介入（NIC）",
    "評価",
];

/// App header with the fixed model / persona / temperature line.
pub fn render_header(model: &str) -> String {
    format!(
        "# 🩺 {APP_TITLE}\n\
         **モデル**：{model}｜**役割**：臨床現場での豊富な経験を持つベテランの看護師｜**温度**：0.1（再現性重視）\n\n\
         > {DISCLAIMER}"
    )
}

fn render_bullets(items: &[String]) -> String {
    if items.is_empty() {
        return "_該当なし_".to_string();
    }
    items
        .iter()
        .map(|x| format!("- {x}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// SOAP excerpt section. S/O are implicit in the input; only A/P are shown.
pub fn render_soap(soap: &SoapExcerpt) -> String {
    format!(
        "### 🧩 SOAP（抜粋）\n#### A（Assessment）\n{}\n#### P（Plan）\n{}",
        render_bullets(&soap.assessment),
        render_bullets(&soap.plan)
    )
}

/// Rendered row count: the maximum column length.
fn row_count(table: &PlanTable) -> usize {
    [
        table.problems.len(),
        table.assessments.len(),
        table.goals.len(),
        table.interventions.len(),
        table.evaluation.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0)
}

fn cell(column: &[String], idx: usize) -> &str {
    column.get(idx).map(String::as_str).unwrap_or("")
}

/// Plan table as a Markdown table, shorter columns padded with empty
/// cells up to the longest column.
pub fn render_plan_table(table: &PlanTable) -> String {
    let mut out = String::from("### 📋 看護計画表\n");
    out.push_str(&format!("| {} |\n", PLAN_TABLE_HEADERS.join(" | ")));
    out.push_str(&format!("|{}\n", "---|".repeat(PLAN_TABLE_HEADERS.len())));

    for i in 0..row_count(table) {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cell(&table.problems, i),
            cell(&table.assessments, i),
            cell(&table.goals, i),
            cell(&table.interventions, i),
            cell(&table.evaluation, i),
        ));
    }
    out
}

/// Render only the sections the requested format asks for.
pub fn render_result(result: &GenerationResult, output_format: OutputFormat) -> String {
    let mut sections = Vec::new();
    if output_format.includes_soap() {
        sections.push(render_soap(&result.soap));
    }
    if output_format.includes_plan_table() {
        sections.push(render_plan_table(&result.plan_table));
    }
    sections.join("\n\n")
}

/// Render the session history in chronological order, each entry per its
/// variant; generation entries show format-appropriate sections only.
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "_履歴はまだありません_".to_string();
    }

    let mut out = String::from("## 🗒 会話履歴\n");
    for entry in entries {
        match entry {
            HistoryEntry::Generation {
                timestamp,
                patient_text,
                output_format,
                result,
            } => {
                out.push_str(&format!(
                    "\n### 生成（{}） — {}\n",
                    output_format,
                    timestamp.format("%Y-%m-%d %H:%M:%S")
                ));
                out.push_str(&format!("**入力**：{patient_text}\n\n"));
                out.push_str(&render_result(result, *output_format));
                out.push('\n');
            }
            HistoryEntry::FollowUp {
                timestamp,
                question,
                answer,
            } => {
                out.push_str(&format!(
                    "\n### 質問 — {}\n",
                    timestamp.format("%Y-%m-%d %H:%M:%S")
                ));
                out.push_str(&format!("**Q**：{question}\n\n**A**：{answer}\n"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::careplan::session::SessionStore;

    fn table_with_lengths(lengths: [usize; 5]) -> PlanTable {
        let col = |n: usize, prefix: &str| (0..n).map(|i| format!("{prefix}{i}")).collect();
        PlanTable {
            problems: col(lengths[0], "問題"),
            assessments: col(lengths[1], "根拠"),
            goals: col(lengths[2], "目標"),
            interventions: col(lengths[3], "介入"),
            evaluation: col(lengths[4], "評価"),
        }
    }

    #[test]
    fn bullets_render_placeholder_when_empty() {
        assert_eq!(render_bullets(&[]), "_該当なし_");
    }

    #[test]
    fn soap_section_lists_assessment_and_plan() {
        let soap = SoapExcerpt {
            assessment: vec!["A1".to_string(), "A2".to_string()],
            plan: vec!["P1".to_string()],
        };
        let md = render_soap(&soap);
        assert!(md.contains("#### A（Assessment）"));
        assert!(md.contains("- A1"));
        assert!(md.contains("- A2"));
        assert!(md.contains("#### P（Plan）"));
        assert!(md.contains("- P1"));
    }

    #[test]
    fn uneven_columns_pad_to_max_length() {
        let table = table_with_lengths([3, 2, 3, 1, 0]);
        assert_eq!(row_count(&table), 3);

        let md = render_plan_table(&table);
        let data_rows: Vec<&str> = md
            .lines()
            .filter(|l| l.starts_with('|') && !l.contains("---") && !l.contains("看護問題"))
            .collect();
        assert_eq!(data_rows.len(), 3);

        // Third row: only problems and goals have an item at index 2
        assert_eq!(data_rows[2], "| 問題2 |  | 目標2 |  |  |");
    }

    #[test]
    fn empty_table_renders_header_only() {
        let md = render_plan_table(&PlanTable::default());
        assert!(md.contains("看護問題（NANDA-I）"));
        let data_rows = md
            .lines()
            .filter(|l| l.starts_with('|') && !l.contains("---") && !l.contains("看護問題"))
            .count();
        assert_eq!(data_rows, 0);
    }

    #[test]
    fn result_sections_follow_requested_format() {
        let result = GenerationResult {
            soap: SoapExcerpt {
                assessment: vec!["A1".to_string()],
                plan: vec!["P1".to_string()],
            },
            plan_table: table_with_lengths([1, 1, 1, 1, 1]),
            ..GenerationResult::default()
        };

        let soap_only = render_result(&result, OutputFormat::SoapOnly);
        assert!(soap_only.contains("SOAP（抜粋）"));
        assert!(!soap_only.contains("看護計画表"));

        let table_only = render_result(&result, OutputFormat::PlanTableOnly);
        assert!(!table_only.contains("SOAP（抜粋）"));
        assert!(table_only.contains("看護計画表"));

        let both = render_result(&result, OutputFormat::Both);
        assert!(both.contains("SOAP（抜粋）"));
        assert!(both.contains("看護計画表"));
    }

    #[test]
    fn history_renders_entries_in_order() {
        let mut store = SessionStore::new();
        let result = GenerationResult {
            soap: SoapExcerpt {
                assessment: vec!["A1".to_string()],
                plan: vec![],
            },
            ..GenerationResult::default()
        };
        store.record_generation("入力テキスト", OutputFormat::SoapOnly, &result);
        store.record_follow_up("根拠は？", "回答です。");

        let md = render_history(store.history());
        let generation_pos = md.find("生成（SOAP形式）").unwrap();
        let followup_pos = md.find("**Q**：根拠は？").unwrap();
        assert!(generation_pos < followup_pos);
        assert!(md.contains("**入力**：入力テキスト"));
        assert!(md.contains("**A**：回答です。"));
        // SoapOnly entry must not render a plan table
        assert!(!md.contains("看護計画表"));
    }

    #[test]
    fn empty_history_renders_placeholder() {
        assert_eq!(render_history(&[]), "_履歴はまだありません_");
    }

    #[test]
    fn header_names_model_and_disclaimer() {
        let md = render_header("gpt-4o-mini");
        assert!(md.contains(APP_TITLE));
        assert!(md.contains("gpt-4o-mini"));
        assert!(md.contains(DISCLAIMER));
    }
}
