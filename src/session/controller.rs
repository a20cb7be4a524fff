//! ConversationController — drives one session through the catalog with
//! timed reveals between the turn steps.

use std::sync::Arc;
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, info};
use uuid::Uuid;

use super::acknowledgment::Acknowledgments;
use super::answer::{AnswerRecord, AnswerValue};
use super::state::{SessionPhase, SessionState, Submission, TurnOutcome, TurnStage};
use super::transcript::TranscriptEntry;
use crate::catalog::{Catalog, QuestionDefinition};
use crate::config::SessionConfig;

/// Broadcast capacity for transcript subscribers.
const DEFAULT_BROADCAST_CAPACITY: usize = 64;

struct Inner {
    state: SessionState,
    rng: StdRng,
}

/// Owns one session and serializes every mutation through a single lock.
///
/// The lock is released while waiting between steps; `busy` stays set for
/// the whole window, so a second submission in that window is ignored.
#[derive(Clone)]
pub struct ConversationController {
    session_id: Uuid,
    catalog: Arc<Catalog>,
    config: Arc<SessionConfig>,
    acknowledgments: Arc<Acknowledgments>,
    inner: Arc<Mutex<Inner>>,
    tx: broadcast::Sender<TranscriptEntry>,
}

impl ConversationController {
    /// Start a session with OS entropy for the acknowledgment choice.
    pub fn new(catalog: Arc<Catalog>, config: SessionConfig) -> Self {
        Self::with_rng(catalog, config, StdRng::from_entropy())
    }

    /// Start a session with an explicit entropy source.
    pub fn with_rng(catalog: Arc<Catalog>, config: SessionConfig, rng: StdRng) -> Self {
        let session_id = Uuid::new_v4();
        let state = SessionState::start(&catalog, &config);
        let acknowledgments = Acknowledgments::new(config.acknowledgments.clone());
        let (tx, _rx) = broadcast::channel(DEFAULT_BROADCAST_CAPACITY);

        info!(
            session_id = %session_id,
            questions = catalog.len(),
            "Session started"
        );

        Self {
            session_id,
            catalog,
            config: Arc::new(config),
            acknowledgments: Arc::new(acknowledgments),
            inner: Arc::new(Mutex::new(Inner { state, rng })),
            tx,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Receive every entry appended from now on, in order.
    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEntry> {
        self.tx.subscribe()
    }

    /// Submit a finalized answer for the current question.
    ///
    /// Ignored (returns `Rejected`) while busy or completed.
    pub async fn submit_answer(&self, answer: impl Into<AnswerValue>) -> TurnOutcome {
        self.run_turn(Submission::Answer(answer.into())).await
    }

    /// Skip the current question. Nothing is stored for it.
    pub async fn skip(&self) -> TurnOutcome {
        self.run_turn(Submission::Skip).await
    }

    async fn run_turn(&self, submission: Submission) -> TurnOutcome {
        let skipped = submission == Submission::Skip;

        {
            let mut inner = self.inner.lock().await;
            let from = inner.state.transcript().len();
            let question_id = inner
                .state
                .current_question(&self.catalog)
                .map(|q| q.id.clone());

            if let Err(rejection) = inner.state.begin(&self.catalog, &self.config, submission) {
                debug!(
                    session_id = %self.session_id,
                    reason = %rejection,
                    "Submission ignored"
                );
                return TurnOutcome::Rejected(rejection);
            }

            info!(
                session_id = %self.session_id,
                question_id = question_id.as_deref().unwrap_or_default(),
                skipped,
                "Answer received"
            );
            self.publish(&inner.state, from);
        }

        wait(self.config.ack_delay).await;

        {
            let mut inner = self.inner.lock().await;
            let from = inner.state.transcript().len();
            let Inner { state, rng } = &mut *inner;
            let phrase = if skipped {
                self.config.skip_acknowledgment.as_str()
            } else {
                self.acknowledgments.choose(rng)
            };
            if let Err(rejection) = state.acknowledge(phrase) {
                return TurnOutcome::Rejected(rejection);
            }
            debug!(session_id = %self.session_id, "Acknowledged");
            self.publish(state, from);
        }

        wait(self.config.advance_delay).await;

        let mut inner = self.inner.lock().await;
        let from = inner.state.transcript().len();
        let outcome = match inner.state.advance(&self.catalog, &self.config) {
            Ok(outcome) => outcome,
            Err(rejection) => return TurnOutcome::Rejected(rejection),
        };
        self.publish(&inner.state, from);

        if outcome == TurnOutcome::Completed {
            info!(
                session_id = %self.session_id,
                answered = inner.state.answers().len(),
                questions = self.catalog.len(),
                "Session completed"
            );
        }
        outcome
    }

    fn publish(&self, state: &SessionState, from: usize) {
        for entry in state.transcript().since(from) {
            // No subscribers is fine.
            let _ = self.tx.send(entry.clone());
        }
    }

    pub async fn phase(&self) -> SessionPhase {
        self.inner.lock().await.state.phase()
    }

    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.state.is_busy()
    }

    pub async fn stage(&self) -> TurnStage {
        self.inner.lock().await.state.stage()
    }

    pub async fn cursor(&self) -> usize {
        self.inner.lock().await.state.cursor()
    }

    pub async fn current_question(&self) -> Option<QuestionDefinition> {
        let inner = self.inner.lock().await;
        inner.state.current_question(&self.catalog).cloned()
    }

    pub async fn transcript(&self) -> Vec<TranscriptEntry> {
        self.inner.lock().await.state.transcript().entries().to_vec()
    }

    pub async fn answers(&self) -> AnswerRecord {
        self.inner.lock().await.state.answers().clone()
    }

    /// Clone of the full session state.
    pub async fn snapshot(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }
}

async fn wait(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
