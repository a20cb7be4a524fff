//! Transcript entries — the append-only chat log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::answer::AnswerValue;
use crate::catalog::QuestionDefinition;

/// Who a bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// What produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Greeting,
    Question,
    Answer,
    Skip,
    Acknowledgment,
    Completion,
}

impl EntryKind {
    pub fn sender(&self) -> Sender {
        match self {
            Self::Answer | Self::Skip => Sender::User,
            Self::Greeting | Self::Question | Self::Acknowledgment | Self::Completion => {
                Sender::Bot
            }
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::Question => "question",
            Self::Answer => "answer",
            Self::Skip => "skip",
            Self::Acknowledgment => "acknowledgment",
            Self::Completion => "completion",
        };
        write!(f, "{s}")
    }
}

/// Session-unique entry identifier, e.g. `question-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Monotonic id source owned by one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryIdGenerator {
    next: u64,
}

impl EntryIdGenerator {
    pub fn next(&mut self, kind: EntryKind) -> EntryId {
        let id = EntryId(format!("{kind}-{}", self.next));
        self.next += 1;
        id
    }
}

/// One chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub sender: Sender,
    pub kind: EntryKind,
    /// Text shown in the bubble.
    pub content: String,
    /// Secondary line under the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The question this bubble asks. Only set on question entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionDefinition>,
    /// Raw answer behind an echo; `content` holds the display form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<AnswerValue>,
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(id: EntryId, kind: EntryKind, content: impl Into<String>) -> Self {
        Self {
            id,
            sender: kind.sender(),
            kind,
            content: content.into(),
            description: None,
            question: None,
            answer: None,
            created_at: Utc::now(),
        }
    }

    pub fn greeting(id: EntryId, content: &str) -> Self {
        Self::new(id, EntryKind::Greeting, content)
    }

    pub fn question(id: EntryId, question: &QuestionDefinition) -> Self {
        let mut entry = Self::new(id, EntryKind::Question, question.text.clone());
        entry.description = question.help.clone();
        entry.question = Some(question.clone());
        entry
    }

    pub fn answer(id: EntryId, display: String, raw: AnswerValue) -> Self {
        let mut entry = Self::new(id, EntryKind::Answer, display);
        entry.answer = Some(raw);
        entry
    }

    pub fn skip(id: EntryId, label: &str) -> Self {
        Self::new(id, EntryKind::Skip, label)
    }

    pub fn acknowledgment(id: EntryId, phrase: &str) -> Self {
        Self::new(id, EntryKind::Acknowledgment, phrase)
    }

    pub fn completion(id: EntryId, content: &str) -> Self {
        Self::new(id, EntryKind::Completion, content)
    }
}

/// Append-only, insertion-ordered list of entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    /// Entries appended at or after position `from`.
    pub fn since(&self, from: usize) -> &[TranscriptEntry] {
        &self.entries[from.min(self.entries.len())..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestionKind;

    #[test]
    fn ids_are_unique_and_monotonic() {
        let mut ids = EntryIdGenerator::default();
        let a = ids.next(EntryKind::Greeting);
        let b = ids.next(EntryKind::Question);
        let c = ids.next(EntryKind::Question);

        assert_eq!(a.as_str(), "greeting-0");
        assert_eq!(b.as_str(), "question-1");
        assert_eq!(c.as_str(), "question-2");
        assert_ne!(b, c);
    }

    #[test]
    fn sender_follows_kind() {
        assert_eq!(EntryKind::Answer.sender(), Sender::User);
        assert_eq!(EntryKind::Skip.sender(), Sender::User);
        assert_eq!(EntryKind::Acknowledgment.sender(), Sender::Bot);
        assert_eq!(EntryKind::Completion.sender(), Sender::Bot);
    }

    #[test]
    fn question_entry_carries_backreference_and_help() {
        let q = QuestionDefinition::new(
            "current_salary",
            "現在の年収を教えていただけますか？",
            QuestionKind::PlainText,
        )
        .with_help("例：350万円");
        let mut ids = EntryIdGenerator::default();
        let entry = TranscriptEntry::question(ids.next(EntryKind::Question), &q);

        assert_eq!(entry.sender, Sender::Bot);
        assert_eq!(entry.content, q.text);
        assert_eq!(entry.description.as_deref(), Some("例：350万円"));
        assert_eq!(entry.question.as_ref().map(|q| q.id.as_str()), Some("current_salary"));
        assert!(entry.answer.is_none());
    }

    #[test]
    fn since_clamps_past_end() {
        let mut transcript = Transcript::default();
        let mut ids = EntryIdGenerator::default();
        transcript.push(TranscriptEntry::greeting(ids.next(EntryKind::Greeting), "hi"));

        assert_eq!(transcript.since(0).len(), 1);
        assert!(transcript.since(1).is_empty());
        assert!(transcript.since(5).is_empty());
    }
}
