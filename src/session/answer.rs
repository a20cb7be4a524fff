//! Answer values and the per-session answer map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionDefinition;

/// Separator used when a list-valued answer is echoed into the transcript.
pub const DISPLAY_SEPARATOR: &str = "、";

/// A finalized answer: a single string, or an ordered list of lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Lines(Vec<String>),
}

impl AnswerValue {
    /// Transcript form of the raw value. Lists are joined with "、".
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Lines(lines) => lines.join(DISPLAY_SEPARATOR),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Lines(_) => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::Lines(lines) => Some(lines),
        }
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(lines: Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

/// Echo text for `answer` given the question it answers.
///
/// Choice questions echo the option label when the raw answer is one of
/// the option values; everything else echoes the display form.
pub fn display_answer(question: &QuestionDefinition, answer: &AnswerValue) -> String {
    if question.kind.is_choice() {
        if let Some(option) = answer.as_text().and_then(|v| question.option(v)) {
            return option.label.clone();
        }
    }
    answer.display()
}

/// Answers collected so far, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord(BTreeMap<String, AnswerValue>);

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, question_id: &str, answer: AnswerValue) {
        self.0.insert(question_id.to_string(), answer);
    }

    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
