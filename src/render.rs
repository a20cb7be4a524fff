//! Transcript renderer — maps an entry to a chat bubble.
//!
//! Pure: the same entry always renders the same bubble.

use crate::session::{Sender, TranscriptEntry};

/// Which side of the chat a bubble sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// A rendered chat bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub alignment: Alignment,
    pub avatar: &'static str,
    pub content: String,
    pub description: Option<String>,
}

pub const BOT_AVATAR: &str = "🤖";
pub const USER_AVATAR: &str = "You";

/// Indent for right-aligned bubbles in the terminal.
const RIGHT_INDENT: &str = "                ";

pub fn render_entry(entry: &TranscriptEntry) -> Bubble {
    let (alignment, avatar) = match entry.sender {
        Sender::Bot => (Alignment::Left, BOT_AVATAR),
        Sender::User => (Alignment::Right, USER_AVATAR),
    };
    Bubble {
        alignment,
        avatar,
        content: entry.content.clone(),
        description: entry.description.clone(),
    }
}

impl std::fmt::Display for Bubble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.alignment {
            Alignment::Left => {
                write!(f, "{} {}", self.avatar, self.content)?;
                if let Some(description) = &self.description {
                    write!(f, "\n   {description}")?;
                }
            }
            Alignment::Right => {
                write!(f, "{RIGHT_INDENT}{} ◀ {}", self.content, self.avatar)?;
                if let Some(description) = &self.description {
                    write!(f, "\n{RIGHT_INDENT}{description}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{QuestionDefinition, QuestionKind};
    use crate::session::transcript::{EntryIdGenerator, EntryKind};

    #[test]
    fn bot_bubble_left_with_description() {
        let mut ids = EntryIdGenerator::default();
        let q = QuestionDefinition::new(
            "desired_salary",
            "ご希望の年収を教えていただけますか？",
            QuestionKind::PlainText,
        )
        .with_help("例：400万円");
        let entry = TranscriptEntry::question(ids.next(EntryKind::Question), &q);

        let bubble = render_entry(&entry);
        assert_eq!(bubble.alignment, Alignment::Left);
        assert_eq!(bubble.avatar, BOT_AVATAR);
        assert_eq!(
            bubble.to_string(),
            "🤖 ご希望の年収を教えていただけますか？\n   例：400万円"
        );
    }

    #[test]
    fn user_bubble_right() {
        let mut ids = EntryIdGenerator::default();
        let entry = TranscriptEntry::answer(
            ids.next(EntryKind::Answer),
            "今すぐ".into(),
            "immediately".into(),
        );

        let bubble = render_entry(&entry);
        assert_eq!(bubble.alignment, Alignment::Right);
        assert!(bubble.to_string().ends_with("今すぐ ◀ You"));
        assert!(bubble.description.is_none());
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut ids = EntryIdGenerator::default();
        let entry = TranscriptEntry::acknowledgment(
            ids.next(EntryKind::Acknowledgment),
            "かしこまりました。",
        );

        let first = render_entry(&entry);
        let second = render_entry(&entry);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }
}
