use std::io::{self, BufRead, Write};

use kanplan::careplan::openai::OpenAiClient;
use kanplan::careplan::orchestrator::{CarePlanService, FollowUpReply};
use kanplan::careplan::relevance::KeywordRelevanceGate;
use kanplan::careplan::render;
use kanplan::careplan::session::SessionStore;
use kanplan::careplan::types::OutputFormat;
use kanplan::config::{self, ModelConfig};

fn main() {
    kanplan::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let model_config = match ModelConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let client = OpenAiClient::new(&model_config);
    let gate = KeywordRelevanceGate;
    let service = CarePlanService::new(&client, &gate);
    let mut store = SessionStore::new();

    println!("{}\n", render::render_header(&model_config.model));

    loop {
        println!("📝 看護情報を入力（複数行可、空行で確定。`履歴` で履歴表示、`終了` でセッション終了）");
        let Some(patient_text) = read_patient_text() else {
            break;
        };

        match patient_text.as_str() {
            "終了" => break,
            "履歴" => {
                println!("{}\n", render::render_history(store.history()));
                continue;
            }
            _ => {}
        }

        let Some(output_format) = choose_format() else {
            break;
        };

        println!("思考中… 看護診断と計画を整理しています");
        match service.generate(&mut store, &patient_text, output_format) {
            Ok(result) => {
                println!("\n## 🧾 出力結果\n");
                println!("{}\n", render::render_result(&result, output_format));
            }
            Err(e) => {
                println!("⚠ {e}\n");
                continue;
            }
        }

        // Follow-up loop; leaving it returns to patient input. The input
        // is cleared each turn by construction — each question is read
        // fresh.
        loop {
            let Some(question) = prompt_line("❓ 出力結果に関する質問（空行で入力に戻る）> ") else {
                return farewell();
            };
            if question.is_empty() {
                break;
            }

            println!("思考中… 回答を準備しています");
            match service.follow_up(&mut store, &question) {
                Ok(FollowUpReply::Answer(answer)) => println!("\n#### 回答\n{answer}\n"),
                Ok(FollowUpReply::NotRelevant) => println!("ℹ {}\n", render::NOT_RELEVANT_NOTICE),
                Err(e) => println!("⚠ {e}\n"),
            }
        }
    }

    farewell();
}

fn farewell() {
    println!("お疲れさまでした");
}

/// Print a prompt and read one trimmed line. `None` on EOF.
fn prompt_line(label: &str) -> Option<String> {
    print!("{label}");
    io::stdout().flush().ok();

    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Read patient text: lines until the first empty one. A command word on
/// the first line short-circuits. `None` on EOF before any input.
fn read_patient_text() -> Option<String> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        let line = prompt_line("> ")?;
        if line.is_empty() {
            if lines.is_empty() {
                continue;
            }
            return Some(lines.join("\n"));
        }
        if lines.is_empty() && (line == "終了" || line == "履歴") {
            return Some(line);
        }
        lines.push(line);
    }
}

/// Format selection; empty input defaults to 両方. `None` on EOF.
fn choose_format() -> Option<OutputFormat> {
    loop {
        let choice = prompt_line("出力形式を選択 [1] SOAP形式 [2] 看護計画表形式 [3] 両方（既定）> ")?;
        match choice.as_str() {
            "1" => return Some(OutputFormat::SoapOnly),
            "2" => return Some(OutputFormat::PlanTableOnly),
            "3" | "" => return Some(OutputFormat::Both),
            _ => println!("1〜3で選択してください"),
        }
    }
}
