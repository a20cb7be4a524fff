//! Downstream handoff of the finished answer map.
//!
//! Matching answers against job listings is not done here; a sink only
//! receives the map once the session completes.

use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::config::OutputMode;
use crate::error::HandoffError;
use crate::session::AnswerRecord;

/// Receives the answers of a completed session.
#[async_trait]
pub trait AnswerSink: Send + Sync {
    fn name(&self) -> &str;

    async fn deliver(&self, session_id: Uuid, answers: &AnswerRecord) -> Result<(), HandoffError>;
}

#[derive(Serialize)]
struct Payload<'a> {
    session_id: Uuid,
    answers: &'a AnswerRecord,
}

/// Render the handoff payload as pretty JSON.
pub fn to_json(session_id: Uuid, answers: &AnswerRecord) -> Result<String, HandoffError> {
    Ok(serde_json::to_string_pretty(&Payload {
        session_id,
        answers,
    })?)
}

/// Writes the answers as JSON to stdout.
pub struct JsonStdoutSink;

#[async_trait]
impl AnswerSink for JsonStdoutSink {
    fn name(&self) -> &str {
        "json"
    }

    async fn deliver(&self, session_id: Uuid, answers: &AnswerRecord) -> Result<(), HandoffError> {
        let mut json = to_json(session_id, answers)?;
        json.push('\n');
        let mut stdout = tokio::io::stdout();
        stdout.write_all(json.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Logs the answers as a structured event.
pub struct LogSink;

#[async_trait]
impl AnswerSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, session_id: Uuid, answers: &AnswerRecord) -> Result<(), HandoffError> {
        let json = serde_json::to_string(answers)?;
        info!(
            session_id = %session_id,
            answered = answers.len(),
            answers = %json,
            "Answers collected"
        );
        Ok(())
    }
}

/// Sink for the configured output mode.
pub fn sink_for(mode: OutputMode) -> Box<dyn AnswerSink> {
    match mode {
        OutputMode::Json => Box::new(JsonStdoutSink),
        OutputMode::Log => Box::new(LogSink),
    }
}
