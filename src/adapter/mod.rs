//! Answer adapter — turns the active question into input widgets and the
//! user's edits into a finalized answer.
//!
//! The adapter only knows the current question and whether the controller
//! is busy. It never talks to the controller directly; the front end hands
//! `finalize()` to `ConversationController::submit_answer`.

pub mod input;
pub mod widget;

use std::time::Duration;

use tracing::debug;

use crate::catalog::{QuestionDefinition, QuestionKind};
use crate::error::InputError;
use crate::session::AnswerValue;

pub use input::{AddressField, AddressInput, DEFAULT_PERCENTAGE, InputState, format_percentage};
pub use widget::{FocusTarget, Widget};

/// Placeholder of the plain text field.
pub const TEXT_PLACEHOLDER: &str = "こちらに入力してください";
/// Placeholder of the free-text field under a hybrid choice list.
pub const HYBRID_PLACEHOLDER: &str = "その他の理由があればこちらに入力してください";

/// A deferred focus move, requested after the active question changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRequest {
    pub target: FocusTarget,
    pub delay: Duration,
}

/// Input adapter for the active question.
#[derive(Debug, Clone)]
pub struct AnswerAdapter {
    question: Option<QuestionDefinition>,
    input: InputState,
    disabled: bool,
    focus_delay: Duration,
}

impl AnswerAdapter {
    pub fn new(focus_delay: Duration) -> Self {
        Self {
            question: None,
            input: InputState::Inactive,
            disabled: false,
            focus_delay,
        }
    }

    pub fn question(&self) -> Option<&QuestionDefinition> {
        self.question.as_ref()
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Mirror the controller's busy flag.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Make `question` the active one.
    ///
    /// A different question (by id) resets every field to its default.
    /// Returns where focus should move, unless the adapter is disabled.
    pub fn set_question(&mut self, question: Option<QuestionDefinition>) -> Option<FocusRequest> {
        let changed = self.question.as_ref().map(|q| &q.id) != question.as_ref().map(|q| &q.id);
        if changed {
            self.input = match &question {
                Some(q) => InputState::for_kind(&q.kind),
                None => InputState::Inactive,
            };
            debug!(
                question_id = question.as_ref().map(|q| q.id.as_str()).unwrap_or("none"),
                "Adapter reset"
            );
        }
        self.question = question;

        if !changed {
            return None;
        }
        self.focus_request()
    }

    /// Where focus should go for the active question, if anywhere.
    pub fn focus_request(&self) -> Option<FocusRequest> {
        if self.disabled {
            return None;
        }
        let target = match &self.question.as_ref()?.kind {
            QuestionKind::PlainText => FocusTarget::Text,
            QuestionKind::StructuredAddress => FocusTarget::Address(AddressField::PostalCode),
            QuestionKind::SingleSelect { .. }
            | QuestionKind::HybridSelectOrText { .. }
            | QuestionKind::Percentage { .. } => return None,
        };
        Some(FocusRequest {
            target,
            delay: self.focus_delay,
        })
    }

    fn editable(&mut self) -> Result<(&QuestionDefinition, &mut InputState), InputError> {
        let question = self.question.as_ref().ok_or(InputError::NoActiveQuestion)?;
        if self.disabled {
            return Err(InputError::Disabled);
        }
        Ok((question, &mut self.input))
    }

    /// Replace the free text (plain text and hybrid questions).
    pub fn set_text(&mut self, value: impl Into<String>) -> Result<(), InputError> {
        let (question, input) = self.editable()?;
        match input {
            InputState::Text { text } | InputState::Hybrid { text, .. } => {
                *text = value.into();
                Ok(())
            }
            _ => Err(not_applicable("text", &question.kind)),
        }
    }

    /// Select an option by value (single-select and hybrid questions).
    pub fn select(&mut self, value: &str) -> Result<(), InputError> {
        let (question, input) = self.editable()?;
        let selected = match input {
            InputState::Select { selected } | InputState::Hybrid { selected, .. } => selected,
            _ => return Err(not_applicable("choice", &question.kind)),
        };
        if question.option(value).is_none() {
            return Err(InputError::UnknownOption {
                value: value.to_string(),
            });
        }
        *selected = Some(value.to_string());
        Ok(())
    }

    /// Move the slider. Values above 100 are clamped.
    pub fn set_percentage(&mut self, value: u8) -> Result<(), InputError> {
        let (question, input) = self.editable()?;
        match input {
            InputState::Percentage { value: current } => {
                *current = value.min(100);
                Ok(())
            }
            _ => Err(not_applicable("slider", &question.kind)),
        }
    }

    /// Replace one address field.
    pub fn set_address_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), InputError> {
        let (question, input) = self.editable()?;
        match input {
            InputState::Address(address) => {
                address.set(field, value);
                Ok(())
            }
            _ => Err(not_applicable("address", &question.kind)),
        }
    }

    /// Submit trigger state.
    pub fn is_submit_ready(&self) -> bool {
        !self.disabled && self.question.is_some() && self.input.is_ready()
    }

    /// Skip trigger state.
    pub fn can_skip(&self) -> bool {
        !self.disabled && self.question.is_some()
    }

    /// The answer to hand to the controller, if submit is ready.
    pub fn finalize(&self) -> Option<AnswerValue> {
        if !self.is_submit_ready() {
            return None;
        }
        let question = self.question.as_ref()?;
        self.input.finalize(&question.kind)
    }

    /// Widgets for the active question, followed by the skip and submit triggers.
    pub fn widgets(&self) -> Vec<Widget> {
        let Some(question) = &self.question else {
            return Vec::new();
        };
        let disabled = self.disabled;
        let mut widgets = Vec::new();

        match (&question.kind, &self.input) {
            (QuestionKind::PlainText, InputState::Text { text }) => {
                widgets.push(Widget::TextField {
                    target: FocusTarget::Text,
                    label: None,
                    value: text.clone(),
                    placeholder: TEXT_PLACEHOLDER.to_string(),
                    disabled,
                });
            }
            (QuestionKind::SingleSelect { options }, InputState::Select { selected }) => {
                widgets.push(Widget::ChoiceGroup {
                    options: options.clone(),
                    selected: selected.clone(),
                    disabled,
                });
            }
            (
                QuestionKind::HybridSelectOrText { options },
                InputState::Hybrid { selected, text },
            ) => {
                widgets.push(Widget::ChoiceGroup {
                    options: options.clone(),
                    selected: selected.clone(),
                    disabled,
                });
                widgets.push(Widget::TextField {
                    target: FocusTarget::Text,
                    label: None,
                    value: text.clone(),
                    placeholder: HYBRID_PLACEHOLDER.to_string(),
                    disabled,
                });
            }
            (QuestionKind::Percentage { primary, secondary }, InputState::Percentage { value }) => {
                widgets.push(Widget::Slider {
                    value: *value,
                    min: 0,
                    max: 100,
                    primary: primary.clone(),
                    secondary: secondary.clone(),
                    disabled,
                });
            }
            (QuestionKind::StructuredAddress, InputState::Address(address)) => {
                for field in AddressField::ALL {
                    widgets.push(Widget::TextField {
                        target: FocusTarget::Address(field),
                        label: Some(field.prompt().to_string()),
                        value: address.get(field).to_string(),
                        placeholder: field.placeholder().to_string(),
                        disabled,
                    });
                }
            }
            // set_question keeps input and kind in step.
            _ => {}
        }

        widgets.push(Widget::SkipTrigger {
            enabled: self.can_skip(),
        });
        widgets.push(Widget::SubmitTrigger {
            enabled: self.is_submit_ready(),
        });
        widgets
    }
}

fn not_applicable(input: &'static str, kind: &QuestionKind) -> InputError {
    InputError::NotApplicable {
        input,
        kind: kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ChoiceOption;

    fn timing() -> QuestionDefinition {
        QuestionDefinition::new(
            "timing",
            "転職をお考えの時期を教えていただけますか？",
            QuestionKind::SingleSelect {
                options: vec![
                    ChoiceOption::new("immediately", "今すぐ"),
                    ChoiceOption::new("1month", "1ヶ月以内"),
                ],
            },
        )
    }

    fn reason() -> QuestionDefinition {
        QuestionDefinition::new(
            "reason",
            "転職をお考えの理由を教えていただけますか？",
            QuestionKind::HybridSelectOrText {
                options: vec![ChoiceOption::new("salary", "給与面")],
            },
        )
    }

    fn preference() -> QuestionDefinition {
        QuestionDefinition::new(
            "preference",
            "運営主体の希望をお聞かせください",
            QuestionKind::Percentage {
                primary: "Entity A".into(),
                secondary: "Entity B".into(),
            },
        )
    }

    fn address() -> QuestionDefinition {
        QuestionDefinition::new(
            "address",
            "お住まいの地域を教えていただけますか？",
            QuestionKind::StructuredAddress,
        )
    }

    fn adapter_for(q: QuestionDefinition) -> AnswerAdapter {
        let mut adapter = AnswerAdapter::new(Duration::from_millis(100));
        adapter.set_question(Some(q));
        adapter
    }

    #[test]
    fn plain_text_needs_non_blank() {
        let mut adapter = adapter_for(QuestionDefinition::new(
            "education",
            "最終学歴",
            QuestionKind::PlainText,
        ));
        assert!(!adapter.is_submit_ready());

        adapter.set_text("   ").unwrap();
        assert!(!adapter.is_submit_ready());
        assert!(adapter.finalize().is_none());

        adapter.set_text(" 大学卒 ").unwrap();
        assert!(adapter.is_submit_ready());
        assert_eq!(adapter.finalize(), Some(AnswerValue::from("大学卒")));
    }

    #[test]
    fn single_select_needs_selection() {
        let mut adapter = adapter_for(timing());
        assert!(!adapter.is_submit_ready());

        adapter.select("immediately").unwrap();
        assert_eq!(adapter.finalize(), Some(AnswerValue::from("immediately")));
    }

    #[test]
    fn unknown_option_rejected() {
        let mut adapter = adapter_for(timing());
        assert_eq!(
            adapter.select("someday"),
            Err(InputError::UnknownOption {
                value: "someday".into()
            })
        );
        assert!(!adapter.is_submit_ready());
    }

    #[test]
    fn inputs_for_other_kinds_rejected() {
        let mut adapter = adapter_for(timing());
        assert!(matches!(
            adapter.set_text("hello"),
            Err(InputError::NotApplicable { input: "text", .. })
        ));
        assert!(matches!(
            adapter.set_percentage(10),
            Err(InputError::NotApplicable { input: "slider", .. })
        ));
        assert!(matches!(
            adapter.set_address_field(AddressField::City, "渋谷区"),
            Err(InputError::NotApplicable { input: "address", .. })
        ));
    }

    #[test]
    fn hybrid_ready_with_either_input() {
        let mut adapter = adapter_for(reason());
        assert!(!adapter.is_submit_ready());

        adapter.set_text("人間関係").unwrap();
        assert_eq!(adapter.finalize(), Some(AnswerValue::from("人間関係")));

        adapter.select("salary").unwrap();
        assert_eq!(adapter.finalize(), Some(AnswerValue::from("salary")));
    }

    #[test]
    fn percentage_defaults_to_even_split() {
        let mut adapter = adapter_for(preference());
        assert!(adapter.is_submit_ready());
        assert_eq!(
            adapter.finalize(),
            Some(AnswerValue::from("Entity A: 50%, Entity B: 50%"))
        );

        adapter.set_percentage(70).unwrap();
        assert_eq!(
            adapter.finalize(),
            Some(AnswerValue::from("Entity A: 70%, Entity B: 30%"))
        );

        adapter.set_percentage(150).unwrap();
        assert_eq!(adapter.input(), &InputState::Percentage { value: 100 });
    }

    #[test]
    fn address_finalizes_to_lines() {
        let mut adapter = adapter_for(address());
        adapter.set_address_field(AddressField::PostalCode, "123-4567").unwrap();
        adapter.set_address_field(AddressField::Prefecture, "東京都").unwrap();
        adapter.set_address_field(AddressField::City, "渋谷区").unwrap();
        assert!(!adapter.is_submit_ready());

        adapter.set_address_field(AddressField::Street, "代々木1-2-3").unwrap();
        assert_eq!(
            adapter.finalize(),
            Some(AnswerValue::Lines(vec![
                "郵便番号: 123-4567".into(),
                "都道府県: 東京都".into(),
                "市区町村: 渋谷区".into(),
                "市区町村以下: 代々木1-2-3".into(),
            ]))
        );

        adapter.set_address_field(AddressField::Street, "  ").unwrap();
        assert!(!adapter.is_submit_ready());
    }

    #[test]
    fn question_change_resets_fields() {
        let mut adapter = adapter_for(preference());
        adapter.set_percentage(90).unwrap();

        // Same question again keeps the edit.
        assert!(adapter.set_question(Some(preference())).is_none());
        assert_eq!(adapter.input(), &InputState::Percentage { value: 90 });

        adapter.set_question(Some(timing()));
        assert_eq!(adapter.input(), &InputState::Select { selected: None });

        adapter.set_question(Some(preference()));
        assert_eq!(adapter.input(), &InputState::Percentage { value: 50 });

        adapter.set_question(None);
        assert_eq!(adapter.input(), &InputState::Inactive);
        assert!(adapter.widgets().is_empty());
    }

    #[test]
    fn focus_targets_first_field() {
        let mut adapter = AnswerAdapter::new(Duration::from_millis(100));

        let focus = adapter.set_question(Some(address())).unwrap();
        assert_eq!(focus.target, FocusTarget::Address(AddressField::PostalCode));
        assert_eq!(focus.delay, Duration::from_millis(100));

        assert!(adapter.set_question(Some(timing())).is_none());

        adapter.set_disabled(true);
        assert!(
            adapter
                .set_question(Some(QuestionDefinition::new("x", "x", QuestionKind::PlainText)))
                .is_none()
        );
    }

    #[test]
    fn disabled_blocks_everything() {
        let mut adapter = adapter_for(preference());
        adapter.set_disabled(true);

        assert!(!adapter.is_submit_ready());
        assert!(!adapter.can_skip());
        assert!(adapter.finalize().is_none());
        assert_eq!(adapter.set_percentage(10), Err(InputError::Disabled));

        let widgets = adapter.widgets();
        assert!(widgets.contains(&Widget::SkipTrigger { enabled: false }));
        assert!(widgets.contains(&Widget::SubmitTrigger { enabled: false }));
        assert!(matches!(widgets[0], Widget::Slider { disabled: true, .. }));
    }

    #[test]
    fn no_question_means_no_input() {
        let mut adapter = AnswerAdapter::new(Duration::ZERO);
        assert_eq!(adapter.set_text("x"), Err(InputError::NoActiveQuestion));
        assert!(!adapter.can_skip());
    }

    #[test]
    fn address_widgets_list_all_fields_in_order() {
        let adapter = adapter_for(address());
        let targets: Vec<FocusTarget> = adapter
            .widgets()
            .iter()
            .filter_map(|w| match w {
                Widget::TextField { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        let expected: Vec<FocusTarget> = AddressField::ALL
            .iter()
            .map(|f| FocusTarget::Address(*f))
            .collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn hybrid_widgets_show_choices_then_text() {
        let adapter = adapter_for(reason());
        let widgets = adapter.widgets();
        assert!(matches!(widgets[0], Widget::ChoiceGroup { .. }));
        assert!(matches!(
            &widgets[1],
            Widget::TextField { placeholder, .. } if placeholder == HYBRID_PLACEHOLDER
        ));
        assert_eq!(widgets.len(), 4);
    }
}
