//! Widget descriptions — the capabilities a front end must provide.

use serde::{Deserialize, Serialize};

use super::input::AddressField;
use crate::catalog::ChoiceOption;

/// An input that can receive focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusTarget {
    /// The free-text field of a plain text or hybrid question.
    Text,
    Address(AddressField),
}

/// One input affordance for the active question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "widget")]
pub enum Widget {
    TextField {
        target: FocusTarget,
        label: Option<String>,
        value: String,
        placeholder: String,
        disabled: bool,
    },
    ChoiceGroup {
        options: Vec<ChoiceOption>,
        selected: Option<String>,
        disabled: bool,
    },
    Slider {
        value: u8,
        min: u8,
        max: u8,
        primary: String,
        secondary: String,
        disabled: bool,
    },
    SubmitTrigger {
        enabled: bool,
    },
    SkipTrigger {
        enabled: bool,
    },
}
