//! Conversation session — the question-flow state machine.
//!
//! A session walks the catalog in order. Each turn echoes the user's answer
//! (or skip), stores it, acknowledges it, and then shows the next question
//! or the completion message. Cursor movement never goes backwards.

pub mod acknowledgment;
pub mod answer;
pub mod controller;
pub mod state;
pub mod transcript;

pub use acknowledgment::Acknowledgments;
pub use answer::{AnswerRecord, AnswerValue, display_answer};
pub use controller::ConversationController;
pub use state::{Rejection, SessionPhase, SessionState, Submission, TurnOutcome, TurnStage};
pub use transcript::{EntryId, EntryKind, Sender, Transcript, TranscriptEntry};
