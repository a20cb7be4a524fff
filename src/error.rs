//! Error types for the intake chat.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Handoff error: {0}")]
    Handoff(#[from] HandoffError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Question catalog errors. Raised before a session starts, never during one.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog contains no questions")]
    Empty,

    #[error("Duplicate question id: {id}")]
    DuplicateId { id: String },

    #[error("Question {id} is a choice question but has no options")]
    MissingOptions { id: String },

    #[error("Question {id} declares options but its kind does not use them")]
    UnexpectedOptions { id: String },

    #[error("Question {id} is missing {field}")]
    MissingField { id: String, field: &'static str },

    #[error("Question {id} declares {field} but its kind does not use it")]
    UnexpectedField { id: String, field: &'static str },

    #[error("Question {id} has duplicate option value: {value}")]
    DuplicateOption { id: String, value: String },

    #[error("Question {id} has an option with an empty value")]
    EmptyOptionValue { id: String },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the answer adapter when an edit does not fit the active question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("No question is active")]
    NoActiveQuestion,

    #[error("Input is disabled while a turn is in flight")]
    Disabled,

    #[error("{input} input does not apply to {kind} questions")]
    NotApplicable { input: &'static str, kind: String },

    #[error("Unknown option value: {value}")]
    UnknownOption { value: String },
}

/// Errors from the downstream answer handoff.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("Failed to serialize answers: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
