//! Acknowledgment phrases shown after each answer.
//!
//! The phrase carries no meaning; only the entropy source varies it, and
//! the source is injected so tests can pin it.

use rand::Rng;

use crate::config::DEFAULT_ACKNOWLEDGMENTS;

/// A fixed, non-empty pool of acknowledgment phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgments {
    phrases: Vec<String>,
}

impl Acknowledgments {
    /// Build a pool. An empty list falls back to the default phrases.
    pub fn new(phrases: Vec<String>) -> Self {
        if phrases.is_empty() {
            return Self::default();
        }
        Self { phrases }
    }

    /// Phrase at `index`, wrapping around the pool.
    pub fn pick(&self, index: usize) -> &str {
        &self.phrases[index % self.phrases.len()]
    }

    /// Draw a phrase from `rng`.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.pick(rng.gen_range(0..self.phrases.len()))
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }
}

impl Default for Acknowledgments {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_ACKNOWLEDGMENTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
