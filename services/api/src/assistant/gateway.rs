//! Assistant gateway: question in, answer text out, never an error

use std::sync::Arc;
use tracing::{error, info, warn};

use super::{
    AssistantProvider, ProviderError, RunStatus, ThreadMessage,
    openai::{OpenAiAssistants, OpenAiConfig},
    prompt,
};
use crate::config::AssistantSettings;

pub const MISSING_API_KEY_MESSAGE: &str = "The online AI assistant is not configured because the API key is missing.\n\n\
Please set the OPENAI_API_KEY on the server.\n\n\
For personal health concerns, please talk to a licensed healthcare professional.";

pub const INVALID_ASSISTANT_ID_MESSAGE: &str = "The Health Assistant ID is not set correctly on the server.\n\n\
Please set ASSISTANT_ID to your real assistant ID from the OpenAI dashboard.\n\n\
For personal health concerns, please talk to a licensed healthcare professional.";

pub const NO_REPLY_MESSAGE: &str = "I'm here for you, but I couldn't generate a full response this time.\n\n\
Please try asking again, and for health questions about your own body, \
talk directly with a licensed healthcare professional.";

pub const PROVIDER_FAILURE_MESSAGE: &str = "There was a problem contacting the Health Assistant service.\n\n\
Please try again later, and for personal health concerns, \
talk to a doctor or licensed healthcare professional.";

/// Answer for a run that ended in a status other than `completed`
pub fn not_completed_message(status: RunStatus) -> String {
    format!(
        "The Health Assistant could not complete the request right now.\n\n\
         Status: {}\n\n\
         Please try again later, and for medical concerns, talk to a doctor or \
         licensed healthcare professional.",
        status.as_str()
    )
}

#[derive(Clone)]
enum Backend {
    Ready(Arc<dyn AssistantProvider>),
    MissingApiKey,
    InvalidAssistantId,
}

/// Boundary component wrapping every interaction with the AI provider
#[derive(Clone)]
pub struct AssistantGateway {
    backend: Backend,
}

impl AssistantGateway {
    /// Create a gateway around an already constructed provider
    pub fn new(provider: Arc<dyn AssistantProvider>) -> Self {
        Self {
            backend: Backend::Ready(provider),
        }
    }

    /// Build the gateway from configuration
    ///
    /// A missing API key or a malformed assistant id does not fail startup:
    /// the gateway is created in a degraded state that answers every question
    /// with a configuration notice.
    pub fn from_settings(settings: &AssistantSettings) -> anyhow::Result<Self> {
        let api_key = match settings.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                warn!("OPENAI_API_KEY is not set; the assistant is disabled");
                return Ok(Self {
                    backend: Backend::MissingApiKey,
                });
            }
        };

        if !settings.assistant_id.starts_with("asst_") {
            warn!(
                "Assistant id {:?} is not a valid assistant id; the assistant is disabled",
                settings.assistant_id
            );
            return Ok(Self {
                backend: Backend::InvalidAssistantId,
            });
        }

        let provider = OpenAiAssistants::new(OpenAiConfig {
            base_url: settings.base_url.clone(),
            api_key,
            assistant_id: settings.assistant_id.clone(),
            poll_interval: settings.poll_interval(),
            run_timeout: settings.run_timeout(),
            request_timeout: settings.request_timeout(),
        })?;

        info!("Assistant gateway ready for {}", settings.assistant_id);
        Ok(Self::new(Arc::new(provider)))
    }

    /// Whether questions will actually reach the provider
    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    /// Answer a question
    ///
    /// Every failure degrades to a fixed message that still points the user to
    /// a licensed professional. Provider errors are logged, never returned.
    pub async fn answer(&self, question: &str) -> String {
        let provider = match &self.backend {
            Backend::Ready(provider) => provider,
            Backend::MissingApiKey => return MISSING_API_KEY_MESSAGE.to_string(),
            Backend::InvalidAssistantId => return INVALID_ASSISTANT_ID_MESSAGE.to_string(),
        };

        match provider.run(&prompt::build(question)).await {
            Ok(outcome) if outcome.status != RunStatus::Completed => {
                warn!("Assistant run ended with status {}", outcome.status.as_str());
                not_completed_message(outcome.status)
            }
            Ok(outcome) => {
                first_assistant_text(&outcome.messages).unwrap_or_else(|| NO_REPLY_MESSAGE.to_string())
            }
            Err(e) => {
                log_provider_error(&e);
                PROVIDER_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// Text of the first assistant message that has any text content
fn first_assistant_text(messages: &[ThreadMessage]) -> Option<String> {
    messages
        .iter()
        .filter(|message| message.role == "assistant")
        .map(ThreadMessage::text_parts)
        .find(|parts| !parts.is_empty())
        .map(|parts| parts.join("\n"))
}

fn log_provider_error(err: &ProviderError) {
    match err {
        ProviderError::Timeout(limit) => error!("Assistant run timed out after {:?}", limit),
        other => error!("Error calling Assistants API: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{MessageContent, RunOutcome, TextContent};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct ScriptedProvider {
        result: Mutex<Option<Result<RunOutcome, ProviderError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn returning(result: Result<RunOutcome, ProviderError>) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(result)),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AssistantProvider for ScriptedProvider {
        async fn run(&self, prompt: &str) -> Result<RunOutcome, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .expect("provider called more than once")
        }
    }

    fn message(role: &str, parts: &[&str]) -> ThreadMessage {
        ThreadMessage {
            role: role.to_string(),
            content: parts
                .iter()
                .map(|value| MessageContent::Text {
                    text: TextContent {
                        value: value.to_string(),
                    },
                })
                .collect(),
        }
    }

    fn completed(messages: Vec<ThreadMessage>) -> Result<RunOutcome, ProviderError> {
        Ok(RunOutcome {
            status: RunStatus::Completed,
            messages,
        })
    }

    fn settings(api_key: Option<&str>, assistant_id: &str) -> AssistantSettings {
        AssistantSettings {
            api_key: api_key.map(str::to_string),
            assistant_id: assistant_id.to_string(),
            ..AssistantSettings::default()
        }
    }

    #[tokio::test]
    async fn test_completed_run_returns_first_assistant_text() {
        let provider = ScriptedProvider::returning(completed(vec![
            message("assistant", &["Hydration helps.", "See a doctor."]),
            message("assistant", &["older reply"]),
            message("user", &["question"]),
        ]));
        let gateway = AssistantGateway::new(provider.clone());

        let answer = gateway.answer("I feel dizzy when I stand up").await;

        assert_eq!(answer, "Hydration helps.\nSee a doctor.");
        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("\"I feel dizzy when I stand up\""));
    }

    #[tokio::test]
    async fn test_assistant_messages_without_text_are_skipped() {
        let provider = ScriptedProvider::returning(completed(vec![
            ThreadMessage {
                role: "assistant".to_string(),
                content: vec![MessageContent::Other],
            },
            message("assistant", &["text reply"]),
        ]));

        let answer = AssistantGateway::new(provider).answer("q").await;
        assert_eq!(answer, "text reply");
    }

    #[tokio::test]
    async fn test_completed_run_without_assistant_text() {
        let provider = ScriptedProvider::returning(completed(vec![message("user", &["q"])]));

        let answer = AssistantGateway::new(provider).answer("q").await;
        assert_eq!(answer, NO_REPLY_MESSAGE);
    }

    #[tokio::test]
    async fn test_unfinished_run_reports_status() {
        let provider = ScriptedProvider::returning(Ok(RunOutcome {
            status: RunStatus::Failed,
            messages: Vec::new(),
        }));

        let answer = AssistantGateway::new(provider).answer("q").await;
        assert!(answer.contains("could not complete the request right now"));
        assert!(answer.contains("Status: failed"));
    }

    #[tokio::test]
    async fn test_provider_errors_become_generic_message() {
        let errors = vec![
            ProviderError::Status {
                status: 401,
                body: "invalid key".to_string(),
            },
            ProviderError::Timeout(Duration::from_secs(60)),
            ProviderError::Malformed("missing id".to_string()),
        ];

        for err in errors {
            let provider = ScriptedProvider::returning(Err(err));
            let answer = AssistantGateway::new(provider).answer("q").await;
            assert_eq!(answer, PROVIDER_FAILURE_MESSAGE);
            assert!(!answer.contains("invalid key"));
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_degrades_to_notice() {
        for key in [None, Some(""), Some("   ")] {
            let gateway = AssistantGateway::from_settings(&settings(key, "asst_123")).unwrap();
            assert!(!gateway.is_configured());
            assert_eq!(gateway.answer("q").await, MISSING_API_KEY_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_invalid_assistant_id_degrades_to_notice() {
        let gateway = AssistantGateway::from_settings(&settings(Some("sk-test"), "")).unwrap();
        assert!(!gateway.is_configured());
        assert_eq!(gateway.answer("q").await, INVALID_ASSISTANT_ID_MESSAGE);

        let gateway =
            AssistantGateway::from_settings(&settings(Some("sk-test"), "assistant-1")).unwrap();
        assert_eq!(gateway.answer("q").await, INVALID_ASSISTANT_ID_MESSAGE);
    }

    #[test]
    fn test_valid_settings_build_a_ready_gateway() {
        let gateway = AssistantGateway::from_settings(&settings(Some("sk-test"), "asst_abc")).unwrap();
        assert!(gateway.is_configured());
    }
}
