//! Transient per-kind input state.

use serde::{Deserialize, Serialize};

use crate::catalog::QuestionKind;
use crate::session::AnswerValue;

/// Slider start position for percentage questions.
pub const DEFAULT_PERCENTAGE: u8 = 50;

/// One field of a structured address, in entry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    PostalCode,
    Prefecture,
    City,
    Street,
    Building,
}

impl AddressField {
    pub const ALL: [AddressField; 5] = [
        Self::PostalCode,
        Self::Prefecture,
        Self::City,
        Self::Street,
        Self::Building,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::PostalCode => "郵便番号",
            Self::Prefecture => "都道府県",
            Self::City => "市区町村",
            Self::Street => "市区町村以下",
            Self::Building => "その他",
        }
    }

    /// Label shown next to the input; differs from the answer label only for the optional line.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Building => "建物名・部屋番号など",
            other => other.label(),
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::PostalCode => "例：123-4567",
            Self::Prefecture => "例：東京都",
            Self::City => "例：渋谷区",
            Self::Street => "例：代々木1-2-3",
            Self::Building => "例：○○マンション101",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Self::Building)
    }
}

/// Address being typed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub street: String,
    pub building: String,
}

impl AddressInput {
    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::PostalCode => &self.postal_code,
            AddressField::Prefecture => &self.prefecture,
            AddressField::City => &self.city,
            AddressField::Street => &self.street,
            AddressField::Building => &self.building,
        }
    }

    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let slot = match field {
            AddressField::PostalCode => &mut self.postal_code,
            AddressField::Prefecture => &mut self.prefecture,
            AddressField::City => &mut self.city,
            AddressField::Street => &mut self.street,
            AddressField::Building => &mut self.building,
        };
        *slot = value.into();
    }

    /// Every required field is non-blank.
    pub fn is_complete(&self) -> bool {
        AddressField::ALL
            .iter()
            .filter(|f| f.is_required())
            .all(|f| !self.get(*f).trim().is_empty())
    }

    /// `"<Label>: <value>"` per filled field, in fixed order.
    pub fn lines(&self) -> Vec<String> {
        AddressField::ALL
            .iter()
            .filter_map(|field| {
                let value = self.get(*field).trim();
                if value.is_empty() {
                    None
                } else {
                    Some(format!("{}: {}", field.label(), value))
                }
            })
            .collect()
    }
}

/// Input state for the active question. The variant always matches the
/// question's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InputState {
    /// No active question.
    Inactive,
    Text { text: String },
    Select { selected: Option<String> },
    Percentage { value: u8 },
    Hybrid { selected: Option<String>, text: String },
    Address(AddressInput),
}

impl InputState {
    /// Default state for a question of `kind`.
    pub fn for_kind(kind: &QuestionKind) -> Self {
        match kind {
            QuestionKind::PlainText => Self::Text {
                text: String::new(),
            },
            QuestionKind::SingleSelect { .. } => Self::Select { selected: None },
            QuestionKind::Percentage { .. } => Self::Percentage {
                value: DEFAULT_PERCENTAGE,
            },
            QuestionKind::HybridSelectOrText { .. } => Self::Hybrid {
                selected: None,
                text: String::new(),
            },
            QuestionKind::StructuredAddress => Self::Address(AddressInput::default()),
        }
    }

    /// Whether the current input would produce an answer.
    pub fn is_ready(&self) -> bool {
        match self {
            Self::Inactive => false,
            Self::Text { text } => !text.trim().is_empty(),
            Self::Select { selected } => selected.is_some(),
            Self::Percentage { .. } => true,
            Self::Hybrid { selected, text } => selected.is_some() || !text.trim().is_empty(),
            Self::Address(address) => address.is_complete(),
        }
    }

    /// Finalized answer, if ready. `kind` supplies the percentage labels.
    pub fn finalize(&self, kind: &QuestionKind) -> Option<AnswerValue> {
        if !self.is_ready() {
            return None;
        }
        let answer = match self {
            Self::Inactive => return None,
            Self::Text { text } => AnswerValue::from(text.trim()),
            Self::Select { selected } => AnswerValue::from(selected.clone()?),
            Self::Percentage { value } => {
                let QuestionKind::Percentage { primary, secondary } = kind else {
                    return None;
                };
                AnswerValue::Text(format_percentage(primary, secondary, *value))
            }
            Self::Hybrid { selected, text } => match selected {
                Some(value) => AnswerValue::from(value.as_str()),
                None => AnswerValue::from(text.trim()),
            },
            Self::Address(address) => AnswerValue::Lines(address.lines()),
        };
        Some(answer)
    }
}

/// `"<primary>: P%, <secondary>: (100-P)%"`.
pub fn format_percentage(primary: &str, secondary: &str, value: u8) -> String {
    let value = value.min(100);
    format!("{primary}: {value}%, {secondary}: {}%", 100 - value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> AddressInput {
        AddressInput {
            postal_code: "123-4567".into(),
            prefecture: "東京都".into(),
            city: "渋谷区".into(),
            street: "代々木1-2-3".into(),
            building: String::new(),
        }
    }

    #[test]
    fn percentage_format() {
        assert_eq!(
            format_percentage("Entity A", "Entity B", 50),
            "Entity A: 50%, Entity B: 50%"
        );
        assert_eq!(
            format_percentage("Entity A", "Entity B", 70),
            "Entity A: 70%, Entity B: 30%"
        );
        assert_eq!(format_percentage("A", "B", 0), "A: 0%, B: 100%");
        assert_eq!(format_percentage("A", "B", 255), "A: 100%, B: 0%");
    }

    #[test]
    fn address_lines_skip_empty_building() {
        assert_eq!(
            filled().lines(),
            vec![
                "郵便番号: 123-4567",
                "都道府県: 東京都",
                "市区町村: 渋谷区",
                "市区町村以下: 代々木1-2-3",
            ]
        );
    }

    #[test]
    fn address_lines_include_building_when_present() {
        let mut address = filled();
        address.set(AddressField::Building, "○○マンション101");
        let lines = address.lines();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[4], "その他: ○○マンション101");
    }

    #[test]
    fn address_requires_four_fields() {
        assert!(filled().is_complete());

        for field in AddressField::ALL.iter().filter(|f| f.is_required()) {
            let mut address = filled();
            address.set(*field, "   ");
            assert!(!address.is_complete(), "{field:?} blank should block submit");
        }

        let mut address = filled();
        address.set(AddressField::Building, "");
        assert!(address.is_complete());
    }

    #[test]
    fn defaults_per_kind() {
        assert_eq!(
            InputState::for_kind(&QuestionKind::Percentage {
                primary: "A".into(),
                secondary: "B".into()
            }),
            InputState::Percentage { value: 50 }
        );
        assert!(!InputState::for_kind(&QuestionKind::PlainText).is_ready());
        assert!(!InputState::Inactive.is_ready());
    }

    #[test]
    fn hybrid_prefers_selection_over_text() {
        let kind = QuestionKind::HybridSelectOrText { options: vec![] };
        let state = InputState::Hybrid {
            selected: Some("salary".into()),
            text: "人間関係".into(),
        };
        assert_eq!(state.finalize(&kind), Some(AnswerValue::from("salary")));

        let state = InputState::Hybrid {
            selected: None,
            text: "  人間関係 ".into(),
        };
        assert_eq!(state.finalize(&kind), Some(AnswerValue::from("人間関係")));
    }
}
