//! Question definition data model.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One selectable choice of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Machine value stored in the answer map.
    pub value: String,
    /// Human label echoed into the transcript.
    pub label: String,
}

impl ChoiceOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The input shape of a question.
///
/// Adding a variant forces every adapter dispatch site to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free text.
    PlainText,
    /// Exactly one of a fixed list.
    SingleSelect { options: Vec<ChoiceOption> },
    /// Split of 100% between two named entities, entered on a slider.
    Percentage { primary: String, secondary: String },
    /// Pick one of the options, or type something else.
    HybridSelectOrText { options: Vec<ChoiceOption> },
    /// Postal address, entered field by field.
    StructuredAddress,
}

impl QuestionKind {
    /// Options of a choice question; empty for every other kind.
    pub fn options(&self) -> &[ChoiceOption] {
        match self {
            Self::SingleSelect { options } | Self::HybridSelectOrText { options } => options,
            Self::PlainText | Self::Percentage { .. } | Self::StructuredAddress => &[],
        }
    }

    /// Whether this kind offers a choice list.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            Self::SingleSelect { .. } | Self::HybridSelectOrText { .. }
        )
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PlainText => "plain_text",
            Self::SingleSelect { .. } => "single_select",
            Self::Percentage { .. } => "percentage",
            Self::HybridSelectOrText { .. } => "hybrid_select_or_text",
            Self::StructuredAddress => "structured_address",
        };
        write!(f, "{s}")
    }
}

/// A single question in the catalog.
///
/// Deserialization refuses unknown keys and fields that do not belong to the
/// declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion")]
pub struct QuestionDefinition {
    /// Stable key; used as the answer map key.
    pub id: String,
    /// Prompt shown in the bot bubble.
    pub text: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    /// Supplementary line shown under the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl QuestionDefinition {
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Find the option whose value is `value`.
    pub fn option(&self, value: &str) -> Option<&ChoiceOption> {
        self.kind.options().iter().find(|o| o.value == value)
    }

    pub(crate) fn validate(&self) -> Result<(), CatalogError> {
        if !self.kind.is_choice() {
            return Ok(());
        }

        let options = self.kind.options();
        if options.is_empty() {
            return Err(CatalogError::MissingOptions {
                id: self.id.clone(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for option in options {
            if option.value.is_empty() {
                return Err(CatalogError::EmptyOptionValue {
                    id: self.id.clone(),
                });
            }
            if !seen.insert(option.value.as_str()) {
                return Err(CatalogError::DuplicateOption {
                    id: self.id.clone(),
                    value: option.value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Kind tag as written in a catalog file.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindTag {
    PlainText,
    SingleSelect,
    Percentage,
    HybridSelectOrText,
    StructuredAddress,
}

/// A question as written in a catalog file, before its fields are checked
/// against the kind.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawQuestion {
    id: String,
    text: String,
    kind: KindTag,
    #[serde(default)]
    options: Option<Vec<ChoiceOption>>,
    #[serde(default)]
    primary: Option<String>,
    #[serde(default)]
    secondary: Option<String>,
    #[serde(default)]
    help: Option<String>,
}

impl RawQuestion {
    fn required(
        id: &str,
        field: &'static str,
        value: Option<String>,
    ) -> Result<String, CatalogError> {
        value.ok_or_else(|| CatalogError::MissingField {
            id: id.to_string(),
            field,
        })
    }

    fn refuse(id: &str, field: &'static str, present: bool) -> Result<(), CatalogError> {
        if present {
            return Err(CatalogError::UnexpectedField {
                id: id.to_string(),
                field,
            });
        }
        Ok(())
    }
}

impl TryFrom<RawQuestion> for QuestionDefinition {
    type Error = CatalogError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        let RawQuestion {
            id,
            text,
            kind,
            options,
            primary,
            secondary,
            help,
        } = raw;

        if !matches!(kind, KindTag::Percentage) {
            RawQuestion::refuse(&id, "primary", primary.is_some())?;
            RawQuestion::refuse(&id, "secondary", secondary.is_some())?;
        }

        let kind = match (kind, options) {
            (KindTag::SingleSelect, options) => QuestionKind::SingleSelect {
                options: options.unwrap_or_default(),
            },
            (KindTag::HybridSelectOrText, options) => QuestionKind::HybridSelectOrText {
                options: options.unwrap_or_default(),
            },
            (_, Some(_)) => return Err(CatalogError::UnexpectedOptions { id }),
            (KindTag::PlainText, None) => QuestionKind::PlainText,
            (KindTag::Percentage, None) => QuestionKind::Percentage {
                primary: RawQuestion::required(&id, "primary", primary)?,
                secondary: RawQuestion::required(&id, "secondary", secondary)?,
            },
            (KindTag::StructuredAddress, None) => QuestionKind::StructuredAddress,
        };

        let question = Self {
            id,
            text,
            kind,
            help,
        };
        question.validate()?;
        Ok(question)
    }
}
