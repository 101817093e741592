//! Assistant gateway and the remote provider seam
//!
//! [`AssistantGateway`] is the only component that talks to the conversational
//! AI provider. It never fails: every configuration problem and provider error
//! is turned into a fixed, non-alarming answer. The provider itself sits behind
//! the [`AssistantProvider`] trait so that tests can substitute a fake.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub mod gateway;
pub mod openai;
pub mod prompt;

pub use gateway::AssistantGateway;
pub use openai::OpenAiAssistants;

/// Lifecycle state of a provider run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// Whether polling can stop at this status
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::RequiresAction
                | RunStatus::Cancelled
                | RunStatus::Failed
                | RunStatus::Completed
                | RunStatus::Incomplete
                | RunStatus::Expired
        )
    }

    /// Wire name of the status
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }
}

/// One message of a provider thread
#[derive(Debug, Clone, Deserialize)]
pub struct ThreadMessage {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

impl ThreadMessage {
    /// Text parts of the message, in order
    pub fn text_parts(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|part| match part {
                MessageContent::Text { text } => Some(text.value.as_str()),
                MessageContent::Other => None,
            })
            .collect()
    }
}

/// A content part of a thread message
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    Text { text: TextContent },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextContent {
    pub value: String,
}

/// Result of one finished provider run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Terminal status of the run
    pub status: RunStatus,
    /// Thread messages, newest first. Empty unless the run completed.
    pub messages: Vec<ThreadMessage>,
}

/// Errors raised while talking to the provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Network, TLS or body decoding failure
    #[error("request to assistant provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("assistant provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The run did not reach a terminal status before the deadline
    #[error("assistant run did not finish within {0:?}")]
    Timeout(Duration),

    /// The provider answered with something we cannot use
    #[error("malformed assistant provider response: {0}")]
    Malformed(String),
}

/// Remote conversational AI provider
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Start a new conversation with `prompt` and wait for the run to end
    async fn run(&self, prompt: &str) -> Result<RunOutcome, ProviderError>;
}
