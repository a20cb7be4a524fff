//! Session state machine — cursor, transcript, answers, and turn stage.
//!
//! A turn moves `Idle → Submitted → Acknowledged → Idle`. The controller
//! sleeps between the steps; this module only enforces their order.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::answer::{AnswerRecord, AnswerValue, display_answer};
use super::transcript::{EntryIdGenerator, EntryKind, Transcript, TranscriptEntry};
use crate::catalog::{Catalog, QuestionDefinition};
use crate::config::SessionConfig;

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SessionPhase {
    AwaitingAnswer { cursor: usize },
    Completed,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AwaitingAnswer { cursor } => write!(f, "awaiting_answer({cursor})"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Where the in-flight turn is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnStage {
    /// No turn in flight.
    #[default]
    Idle,
    /// Echo appended, answer stored; acknowledgment pending.
    Submitted { skipped: bool },
    /// Acknowledgment appended; advance pending.
    Acknowledged,
}

impl std::fmt::Display for TurnStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Submitted { .. } => "submitted",
            Self::Acknowledged => "acknowledged",
        };
        write!(f, "{s}")
    }
}

/// What the user handed over for the current question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Answer(AnswerValue),
    Skip,
}

/// Why a submission or step was ignored. Not an error: nothing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// A turn is already in flight.
    Busy,
    /// Every question has been handled.
    Completed,
    /// A turn step was called in the wrong stage.
    OutOfOrder { stage: TurnStage },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Busy => write!(f, "busy"),
            Self::Completed => write!(f, "completed"),
            Self::OutOfOrder { stage } => write!(f, "out of order (stage: {stage})"),
        }
    }
}

/// Result of driving one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The next question is now active.
    Advanced { cursor: usize },
    /// The catalog is exhausted; the completion entry was appended.
    Completed,
    /// Ignored; transcript and answers are unchanged.
    Rejected(Rejection),
}

impl TurnOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Everything one conversation owns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    transcript: Transcript,
    cursor: usize,
    answers: AnswerRecord,
    stage: TurnStage,
    completed: bool,
    ids: EntryIdGenerator,
}

impl SessionState {
    /// Fresh session: greeting, then the first question.
    pub fn start(catalog: &Catalog, config: &SessionConfig) -> Self {
        let mut state = Self {
            transcript: Transcript::default(),
            cursor: 0,
            answers: AnswerRecord::new(),
            stage: TurnStage::Idle,
            completed: false,
            ids: EntryIdGenerator::default(),
        };

        let id = state.ids.next(EntryKind::Greeting);
        state
            .transcript
            .push(TranscriptEntry::greeting(id, &config.greeting));
        state.present_cursor(catalog, config);
        state
    }

    pub fn phase(&self) -> SessionPhase {
        if self.completed {
            SessionPhase::Completed
        } else {
            SessionPhase::AwaitingAnswer {
                cursor: self.cursor,
            }
        }
    }

    /// True while a turn's reveal sequence is in flight.
    pub fn is_busy(&self) -> bool {
        self.stage != TurnStage::Idle
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn stage(&self) -> TurnStage {
        self.stage
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// The question awaiting an answer, if any.
    pub fn current_question<'a>(&self, catalog: &'a Catalog) -> Option<&'a QuestionDefinition> {
        if self.completed {
            return None;
        }
        catalog.get(self.cursor)
    }

    /// Step 1: echo the submission and store the answer.
    pub fn begin(
        &mut self,
        catalog: &Catalog,
        config: &SessionConfig,
        submission: Submission,
    ) -> Result<(), Rejection> {
        if self.is_busy() {
            return Err(Rejection::Busy);
        }
        let question = self
            .current_question(catalog)
            .ok_or(Rejection::Completed)?;

        match submission {
            Submission::Answer(answer) => {
                let display = display_answer(question, &answer);
                let id = self.ids.next(EntryKind::Answer);
                self.transcript
                    .push(TranscriptEntry::answer(id, display, answer.clone()));
                self.answers.insert(&question.id, answer);
                self.stage = TurnStage::Submitted { skipped: false };
            }
            Submission::Skip => {
                let id = self.ids.next(EntryKind::Skip);
                self.transcript
                    .push(TranscriptEntry::skip(id, &config.skip_label));
                self.stage = TurnStage::Submitted { skipped: true };
            }
        }
        Ok(())
    }

    /// Step 2: append the acknowledgment.
    pub fn acknowledge(&mut self, phrase: &str) -> Result<(), Rejection> {
        if !matches!(self.stage, TurnStage::Submitted { .. }) {
            return Err(Rejection::OutOfOrder { stage: self.stage });
        }
        let id = self.ids.next(EntryKind::Acknowledgment);
        self.transcript
            .push(TranscriptEntry::acknowledgment(id, phrase));
        self.stage = TurnStage::Acknowledged;
        Ok(())
    }

    /// Step 3: move the cursor and show the next question or the completion message.
    pub fn advance(
        &mut self,
        catalog: &Catalog,
        config: &SessionConfig,
    ) -> Result<TurnOutcome, Rejection> {
        if self.stage != TurnStage::Acknowledged {
            return Err(Rejection::OutOfOrder { stage: self.stage });
        }
        self.cursor += 1;
        self.stage = TurnStage::Idle;
        debug!(cursor = self.cursor, "Advanced cursor");
        Ok(self.present_cursor(catalog, config))
    }

    fn present_cursor(&mut self, catalog: &Catalog, config: &SessionConfig) -> TurnOutcome {
        match catalog.get(self.cursor) {
            Some(question) => {
                let id = self.ids.next(EntryKind::Question);
                self.transcript
                    .push(TranscriptEntry::question(id, question));
                TurnOutcome::Advanced {
                    cursor: self.cursor,
                }
            }
            None => {
                if !self.completed {
                    let id = self.ids.next(EntryKind::Completion);
                    self.transcript
                        .push(TranscriptEntry::completion(id, &config.completion_message));
                    self.completed = true;
                }
                TurnOutcome::Completed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ChoiceOption, QuestionKind};
    use crate::session::transcript::Sender;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            QuestionDefinition::new(
                "timing",
                "When?",
                QuestionKind::SingleSelect {
                    options: vec![ChoiceOption::new("immediately", "今すぐ")],
                },
            ),
            QuestionDefinition::new("education", "Education?", QuestionKind::PlainText),
        ])
        .unwrap()
    }

    fn turn(
        state: &mut SessionState,
        catalog: &Catalog,
        config: &SessionConfig,
        s: Submission,
    ) -> TurnOutcome {
        state.begin(catalog, config, s).unwrap();
        state.acknowledge("ok").unwrap();
        state.advance(catalog, config).unwrap()
    }

    #[test]
    fn start_shows_greeting_then_first_question() {
        let catalog = catalog();
        let config = SessionConfig::instant();
        let state = SessionState::start(&catalog, &config);

        let entries = state.transcript().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, EntryKind::Greeting);
        assert_eq!(entries[1].kind, EntryKind::Question);
        assert_eq!(state.phase(), SessionPhase::AwaitingAnswer { cursor: 0 });
        assert!(!state.is_busy());
    }

    #[test]
    fn steps_walk_the_turn() {
        let catalog = catalog();
        let config = SessionConfig::instant();
        let mut state = SessionState::start(&catalog, &config);

        state
            .begin(&catalog, &config, Submission::Answer("immediately".into()))
            .unwrap();
        assert_eq!(state.stage(), TurnStage::Submitted { skipped: false });
        assert!(state.is_busy());
        assert_eq!(state.transcript().last().unwrap().sender, Sender::User);
        assert_eq!(state.transcript().last().unwrap().content, "今すぐ");
        assert_eq!(state.cursor(), 0, "cursor moves only on advance");

        state.acknowledge("承知いたしました。").unwrap();
        assert_eq!(state.stage(), TurnStage::Acknowledged);

        let outcome = state.advance(&catalog, &config).unwrap();
        assert_eq!(outcome, TurnOutcome::Advanced { cursor: 1 });
        assert!(!state.is_busy());
        assert_eq!(state.transcript().last().unwrap().kind, EntryKind::Question);
    }

    #[test]
    fn begin_while_busy_is_rejected_without_changes() {
        let catalog = catalog();
        let config = SessionConfig::instant();
        let mut state = SessionState::start(&catalog, &config);

        state
            .begin(&catalog, &config, Submission::Answer("immediately".into()))
            .unwrap();
        let len = state.transcript().len();

        let second = state.begin(&catalog, &config, Submission::Skip);
        assert_eq!(second, Err(Rejection::Busy));
        assert_eq!(state.transcript().len(), len);
        assert_eq!(state.answers().len(), 1);
    }

    #[test]
    fn steps_out_of_order_are_rejected() {
        let catalog = catalog();
        let config = SessionConfig::instant();
        let mut state = SessionState::start(&catalog, &config);

        assert_eq!(
            state.acknowledge("ok"),
            Err(Rejection::OutOfOrder { stage: TurnStage::Idle })
        );
        assert_eq!(
            state.advance(&catalog, &config),
            Err(Rejection::OutOfOrder { stage: TurnStage::Idle })
        );

        state.begin(&catalog, &config, Submission::Skip).unwrap();
        assert_eq!(
            state.advance(&catalog, &config),
            Err(Rejection::OutOfOrder {
                stage: TurnStage::Submitted { skipped: true }
            })
        );
    }

    #[test]
    fn skip_stores_nothing() {
        let catalog = catalog();
        let config = SessionConfig::instant();
        let mut state = SessionState::start(&catalog, &config);

        turn(&mut state, &catalog, &config, Submission::Skip);
        assert!(!state.answers().contains("timing"));
        let skip = &state.transcript().entries()[2];
        assert_eq!(skip.kind, EntryKind::Skip);
        assert_eq!(skip.content, "スキップ");
        assert!(skip.answer.is_none());
    }

    #[test]
    fn completion_is_terminal() {
        let catalog = catalog();
        let config = SessionConfig::instant();
        let mut state = SessionState::start(&catalog, &config);

        turn(&mut state, &catalog, &config, Submission::Answer("immediately".into()));
        let outcome = turn(&mut state, &catalog, &config, Submission::Answer("大学".into()));

        assert_eq!(outcome, TurnOutcome::Completed);
        assert_eq!(state.phase(), SessionPhase::Completed);
        assert_eq!(state.cursor(), catalog.len());
        assert!(state.current_question(&catalog).is_none());

        let len = state.transcript().len();
        assert_eq!(
            state.begin(&catalog, &config, Submission::Skip),
            Err(Rejection::Completed)
        );
        assert_eq!(state.transcript().len(), len);

        let completions = state
            .transcript()
            .entries()
            .iter()
            .filter(|e| e.kind == EntryKind::Completion)
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn phase_display() {
        assert_eq!(SessionPhase::AwaitingAnswer { cursor: 3 }.to_string(), "awaiting_answer(3)");
        assert_eq!(SessionPhase::Completed.to_string(), "completed");
        assert!(SessionPhase::Completed.is_terminal());
    }
}
