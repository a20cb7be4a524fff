//! CLI front end — stdin/stdout questionnaire.
//!
//! Plays the widget role for the adapter: numbered choices, a 0–100 slider
//! typed as a number, and one prompt per address field. `/skip` skips the
//! current question and `/quit` ends the session without a handoff.

use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt, stream};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::debug;

use crate::adapter::{AddressField, AnswerAdapter, Widget, format_percentage};
use crate::catalog::{QuestionDefinition, QuestionKind};
use crate::render::render_entry;
use crate::session::{
    AnswerRecord, AnswerValue, ConversationController, TranscriptEntry, TurnOutcome,
};

pub const SKIP_COMMAND: &str = "/skip";
pub const QUIT_COMMAND: &str = "/quit";

/// Lines typed by the user.
pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Read stdin line by line on a background task.
pub fn stdin_lines() -> LineStream {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let reader = BufReader::new(stdin);
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Ok(None) => break, // EOF
                Err(e) => {
                    tracing::error!("Error reading stdin: {}", e);
                    break;
                }
            }
        }
    });

    let stream = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (line, rx))
    });

    Box::pin(stream)
}

/// How the CLI session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CliExit {
    /// Every question was answered or skipped.
    Completed(AnswerRecord),
    /// The user typed `/quit`.
    Quit,
    /// Input ended before the session completed.
    Eof,
}

enum Line {
    Text(String),
    Skip,
    Quit,
    Eof,
}

enum Action {
    Submit(AnswerValue),
    Skip,
    Quit,
    Eof,
}

/// Interactive session over a line stream and a writer.
pub struct CliFrontend<W> {
    controller: ConversationController,
    adapter: AnswerAdapter,
    lines: LineStream,
    out: W,
}

impl<W: Write> CliFrontend<W> {
    pub fn new(controller: ConversationController, lines: LineStream, out: W) -> Self {
        let adapter = AnswerAdapter::new(controller.config().focus_delay);
        Self {
            controller,
            adapter,
            lines,
            out,
        }
    }

    /// Run until the catalog is exhausted, the user quits, or input ends.
    pub async fn run(&mut self) -> std::io::Result<CliExit> {
        let mut rx = self.controller.subscribe();

        for entry in self.controller.transcript().await {
            writeln!(self.out, "{}", render_entry(&entry))?;
        }

        loop {
            let question = self.controller.current_question().await;
            if let Some(focus) = self.adapter.set_question(question.clone()) {
                wait(focus.delay).await;
                debug!(focus = ?focus.target, "Focus moved");
            }
            let Some(question) = question else {
                return Ok(CliExit::Completed(self.controller.answers().await));
            };

            let action = self.collect(&question).await?;
            let controller = self.controller.clone();
            self.adapter.set_disabled(true);
            let outcome = match action {
                Action::Submit(answer) => {
                    drive_turn(controller.submit_answer(answer), &mut rx, &mut self.out).await?
                }
                Action::Skip => drive_turn(controller.skip(), &mut rx, &mut self.out).await?,
                Action::Quit => return Ok(CliExit::Quit),
                Action::Eof => return Ok(CliExit::Eof),
            };
            self.adapter.set_disabled(false);

            if let TurnOutcome::Rejected(reason) = outcome {
                debug!(reason = %reason, "Turn rejected");
            }
        }
    }

    async fn read_line(&mut self) -> std::io::Result<Line> {
        write!(self.out, "> ")?;
        self.out.flush()?;

        let Some(raw) = self.lines.next().await else {
            return Ok(Line::Eof);
        };
        let line = raw.trim();
        Ok(match line {
            SKIP_COMMAND => Line::Skip,
            QUIT_COMMAND => Line::Quit,
            _ => Line::Text(line.to_string()),
        })
    }

    async fn collect(&mut self, question: &QuestionDefinition) -> std::io::Result<Action> {
        self.show_widgets()?;

        if matches!(question.kind, QuestionKind::StructuredAddress) {
            return self.collect_address().await;
        }

        loop {
            let text = match self.read_line().await? {
                Line::Text(text) => text,
                Line::Skip => return Ok(Action::Skip),
                Line::Quit => return Ok(Action::Quit),
                Line::Eof => return Ok(Action::Eof),
            };

            let applied = match &question.kind {
                QuestionKind::PlainText => self.adapter.set_text(text),
                QuestionKind::SingleSelect { .. } => {
                    let value = choice_value(question, &text);
                    self.adapter.select(&value)
                }
                QuestionKind::HybridSelectOrText { .. } => {
                    let value = choice_value(question, &text);
                    if question.option(&value).is_some() {
                        self.adapter.select(&value)
                    } else {
                        self.adapter.set_text(text)
                    }
                }
                QuestionKind::Percentage { .. } if text.is_empty() => Ok(()),
                QuestionKind::Percentage { .. } => match text.trim_end_matches('%').parse::<u8>() {
                    Ok(value) if value <= 100 => self.adapter.set_percentage(value),
                    _ => {
                        writeln!(self.out, "0〜100の数値を入力してください")?;
                        continue;
                    }
                },
                QuestionKind::StructuredAddress => Ok(()),
            };

            if let Err(e) = applied {
                writeln!(self.out, "{e}")?;
                continue;
            }

            match self.adapter.finalize() {
                Some(answer) => return Ok(Action::Submit(answer)),
                None => {
                    writeln!(
                        self.out,
                        "回答を入力してください（{SKIP_COMMAND} でスキップ）"
                    )?
                }
            }
        }
    }

    async fn collect_address(&mut self) -> std::io::Result<Action> {
        for field in AddressField::ALL {
            loop {
                writeln!(self.out, "{}（{}）", field.prompt(), field.placeholder())?;
                let text = match self.read_line().await? {
                    Line::Text(text) => text,
                    Line::Skip => return Ok(Action::Skip),
                    Line::Quit => return Ok(Action::Quit),
                    Line::Eof => return Ok(Action::Eof),
                };
                if field.is_required() && text.is_empty() {
                    writeln!(self.out, "{}は必須です", field.label())?;
                    continue;
                }
                if let Err(e) = self.adapter.set_address_field(field, text) {
                    writeln!(self.out, "{e}")?;
                    continue;
                }
                break;
            }
        }

        match self.adapter.finalize() {
            Some(answer) => Ok(Action::Submit(answer)),
            None => Ok(Action::Skip),
        }
    }

    fn show_widgets(&mut self) -> std::io::Result<()> {
        for widget in self.adapter.widgets() {
            match widget {
                Widget::ChoiceGroup { options, .. } => {
                    for (i, option) in options.iter().enumerate() {
                        writeln!(self.out, "  {}) {}", i + 1, option.label)?;
                    }
                }
                Widget::TextField {
                    label: None,
                    placeholder,
                    ..
                } => writeln!(self.out, "  ({placeholder})")?,
                Widget::Slider {
                    value,
                    primary,
                    secondary,
                    ..
                } => writeln!(
                    self.out,
                    "  {}（0〜100、Enterでそのまま）",
                    format_percentage(&primary, &secondary, value)
                )?,
                Widget::SkipTrigger { enabled: true } => {
                    writeln!(
                        self.out,
                        "  {SKIP_COMMAND} でスキップ、{QUIT_COMMAND} で終了"
                    )?
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Map a typed line to an option value: a 1-based number, or the value itself.
fn choice_value(question: &QuestionDefinition, text: &str) -> String {
    let options = question.kind.options();
    if let Ok(n) = text.parse::<usize>() {
        if (1..=options.len()).contains(&n) {
            return options[n - 1].value.clone();
        }
    }
    text.to_string()
}

/// Await a turn while printing each entry as it is revealed.
async fn drive_turn<F, W>(
    turn: F,
    rx: &mut broadcast::Receiver<TranscriptEntry>,
    out: &mut W,
) -> std::io::Result<TurnOutcome>
where
    F: Future<Output = TurnOutcome>,
    W: Write,
{
    tokio::pin!(turn);
    loop {
        tokio::select! {
            outcome = &mut turn => {
                while let Ok(entry) = rx.try_recv() {
                    writeln!(out, "{}", render_entry(&entry))?;
                }
                return Ok(outcome);
            }
            Ok(entry) = rx.recv() => {
                writeln!(out, "{}", render_entry(&entry))?;
            }
        }
    }
}

async fn wait(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
