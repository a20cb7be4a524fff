//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Opening message shown before the first question.
pub const DEFAULT_GREETING: &str =
    "こんにちは！保育士様の転職相談を承ります。以下の質問にお答えいただけますでしょうか？";

/// Closing message appended once the catalog is exhausted.
pub const DEFAULT_COMPLETION_MESSAGE: &str = "ご回答いただき、ありがとうございました。お客様の希望に沿った求人をお探しいたしますので、少々お待ちください。";

pub const DEFAULT_SKIP_LABEL: &str = "スキップ";

pub const DEFAULT_SKIP_ACKNOWLEDGMENT: &str = "承知いたしました。";

pub const DEFAULT_ACKNOWLEDGMENTS: [&str; 5] = [
    "ご回答ありがとうございます。",
    "承知いたしました。",
    "ご協力ありがとうございます。",
    "かしこまりました。",
    "ご回答、大変参考になります。",
];

/// Timing and scripted text for one conversation.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Wait between the user's echo and the acknowledgment.
    pub ack_delay: Duration,
    /// Wait between the acknowledgment and the next question.
    pub advance_delay: Duration,
    /// Wait before the adapter moves focus to the first field.
    pub focus_delay: Duration,
    pub greeting: String,
    pub completion_message: String,
    /// Echo content for a skipped question.
    pub skip_label: String,
    /// Acknowledgment after a skip. Never randomized.
    pub skip_acknowledgment: String,
    /// Pool the answer acknowledgment is drawn from.
    pub acknowledgments: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ack_delay: Duration::from_millis(600),
            advance_delay: Duration::from_millis(800),
            focus_delay: Duration::from_millis(100),
            greeting: DEFAULT_GREETING.to_string(),
            completion_message: DEFAULT_COMPLETION_MESSAGE.to_string(),
            skip_label: DEFAULT_SKIP_LABEL.to_string(),
            skip_acknowledgment: DEFAULT_SKIP_ACKNOWLEDGMENT.to_string(),
            acknowledgments: DEFAULT_ACKNOWLEDGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SessionConfig {
    /// Zero-duration waits, for scenario tests.
    pub fn instant() -> Self {
        Self {
            ack_delay: Duration::ZERO,
            advance_delay: Duration::ZERO,
            focus_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Where the finished answer map goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Pretty JSON on stdout.
    #[default]
    Json,
    /// A structured log line only.
    Log,
}

impl OutputMode {
    /// Log filter used when `RUST_LOG` is unset. The log mode delivers answers
    /// as an `info` event, so the crate's own events must pass.
    pub fn default_log_filter(self) -> &'static str {
        match self {
            Self::Json => "warn",
            Self::Log => "warn,intake_chat=info",
        }
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "log" => Ok(Self::Log),
            other => Err(format!("Unknown output mode: {other}")),
        }
    }
}

/// Binary-level configuration, built from environment variables.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub session: SessionConfig,
    /// JSON catalog file; `None` uses the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub output: OutputMode,
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// Recognized keys: `INTAKE_ACK_DELAY_MS`, `INTAKE_ADVANCE_DELAY_MS`,
    /// `INTAKE_FOCUS_DELAY_MS`, `INTAKE_CATALOG_PATH`, `INTAKE_OUTPUT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut session = SessionConfig::default();

        if let Some(delay) = millis(&lookup, "INTAKE_ACK_DELAY_MS")? {
            session.ack_delay = delay;
        }
        if let Some(delay) = millis(&lookup, "INTAKE_ADVANCE_DELAY_MS")? {
            session.advance_delay = delay;
        }
        if let Some(delay) = millis(&lookup, "INTAKE_FOCUS_DELAY_MS")? {
            session.focus_delay = delay;
        }

        let catalog_path = lookup("INTAKE_CATALOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let output = match lookup("INTAKE_OUTPUT") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "INTAKE_OUTPUT".to_string(),
                message,
            })?,
            None => OutputMode::default(),
        };

        Ok(Self {
            session,
            catalog_path,
            output,
        })
    }
}

fn millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
