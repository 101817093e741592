//! Request orchestration for `/ask`
//!
//! Ties the triage gate, the assistant gateway and the history log together.
//! The answer is always returned to the caller; persisting the exchange is
//! best-effort and a failed write is only logged.

use serde::Serialize;
use tracing::{error, warn};

use crate::{
    assistant::AssistantGateway,
    repositories::HistoryRepository,
    triage::{self, EMERGENCY_MESSAGE, Triage},
};

/// Which path produced an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    EmergencyWarning,
    GeneralInfo,
}

/// Answer to one question
#[derive(Debug, Clone, Serialize)]
pub struct AskOutcome {
    pub answer: String,
    #[serde(rename = "type")]
    pub kind: AnswerKind,
}

/// Per-request control flow for questions
#[derive(Clone)]
pub struct Orchestrator {
    gateway: AssistantGateway,
    history: HistoryRepository,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(gateway: AssistantGateway, history: HistoryRepository) -> Self {
        Self { gateway, history }
    }

    /// Answer a question and record the exchange for `user_id`, if given
    ///
    /// Surrounding whitespace is trimmed before triage, and history holds the
    /// trimmed form of the question.
    pub async fn ask(&self, question: &str, user_id: Option<i64>) -> AskOutcome {
        let question = question.trim();

        let outcome = match triage::classify(question) {
            Triage::Emergency => {
                warn!(
                    "Emergency phrase {:?} detected, skipping assistant",
                    triage::matched_phrase(question).unwrap_or_default()
                );
                AskOutcome {
                    answer: EMERGENCY_MESSAGE.to_string(),
                    kind: AnswerKind::EmergencyWarning,
                }
            }
            Triage::Normal => AskOutcome {
                answer: self.gateway.answer(question).await,
                kind: AnswerKind::GeneralInfo,
            },
        };

        if let Some(user_id) = user_id {
            if let Err(e) = self
                .history
                .append_exchange(user_id, question, &outcome.answer)
                .await
            {
                error!("Failed to store history for user {}: {:#}", user_id, e);
            }
        }

        outcome
    }
}
