pub mod types;
pub mod prompt;
pub mod parser;
pub mod relevance;
pub mod session;
pub mod render;
pub mod openai;
pub mod orchestrator;

use thiserror::Error;

/// Errors crossing the care-plan service boundary.
///
/// Display strings are the user-facing messages; the original cause is
/// logged at the point of failure and not carried further. Every variant
/// is terminal for the single request that produced it — a failed call
/// never mutates the session store.
#[derive(Error, Debug)]
pub enum CarePlanError {
    /// Empty patient text. Recovered locally; never reaches the model.
    #[error("看護情報を入力してください。")]
    EmptyPatientText,

    /// Empty follow-up question. Recovered locally.
    #[error("質問内容を入力してください。")]
    EmptyQuestion,

    /// Follow-up invoked before any generation succeeded. The caller owns
    /// this precondition; the service only backstops it.
    #[error("先に看護情報を送信し、出力結果を生成してください。")]
    NoContext,

    /// Model or transport failure during generation. Carries a short
    /// reason only, never raw provider internals.
    #[error("生成に失敗しました: {0}")]
    GenerationProvider(String),

    /// Model or transport failure while answering a follow-up.
    #[error("回答生成に失敗しました: {0}")]
    FollowUpProvider(String),

    /// Model output was unparsable even after the single repair pass.
    #[error("出力の解析に失敗しました。入力内容を見直すか、再度実行してください。")]
    UnparsableOutput,
}
