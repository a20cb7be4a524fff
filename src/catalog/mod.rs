//! Question catalog — the fixed, ordered list of questions a session walks.
//!
//! The catalog is supplied once at session start and is read-only for the
//! session's lifetime. Order is traversal order.

pub mod builtin;
pub mod model;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::error::CatalogError;

pub use builtin::builtin_catalog;
pub use model::{ChoiceOption, QuestionDefinition, QuestionKind};

use model::RawQuestion;

/// A validated question catalog.
///
/// Guarantees: non-empty, unique ids, and every choice question carries at
/// least one option with unique, non-empty values.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    questions: Vec<QuestionDefinition>,
}

impl Catalog {
    /// Validate and wrap a list of question definitions.
    pub fn new(questions: Vec<QuestionDefinition>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        for question in &questions {
            if !seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: question.id.clone(),
                });
            }
            question.validate()?;
        }

        Ok(Self { questions })
    }

    /// Parse a catalog from a JSON array of question definitions.
    ///
    /// Unknown keys are a parse error. Fields that do not fit a question's
    /// kind are reported with the question id.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawQuestion> = serde_json::from_str(json)?;
        let questions = raw
            .into_iter()
            .map(QuestionDefinition::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// Load a catalog from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), questions = catalog.len(), "Loaded question catalog");
        Ok(catalog)
    }

    /// Share the catalog between the controller and the adapter.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Question at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<&QuestionDefinition> {
        self.questions.get(index)
    }

    /// Look up a question by id.
    pub fn find(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionDefinition> {
        self.questions.iter()
    }
}
