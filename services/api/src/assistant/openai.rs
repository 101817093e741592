//! OpenAI Assistants (v2) provider over HTTP

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout, timeout_at};
use tracing::{debug, info, warn};

use super::{AssistantProvider, ProviderError, RunOutcome, RunStatus, ThreadMessage};

/// Upper bound for the best-effort cancel of a timed out run
const CANCEL_GRACE: Duration = Duration::from_secs(2);

/// Settings for the Assistants API client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API base URL, e.g. "https://api.openai.com/v1"
    pub base_url: String,
    /// Secret API key
    pub api_key: String,
    /// Assistant that answers the questions
    pub assistant_id: String,
    /// Delay between two run status checks
    pub poll_interval: Duration,
    /// Upper bound for a whole run, from thread creation to the final message listing
    pub run_timeout: Duration,
    /// Timeout of each individual HTTP request
    pub request_timeout: Duration,
}

#[derive(Deserialize)]
struct Thread {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Run {
    id: String,
    status: RunStatus,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<ThreadMessage>,
}

/// Assistants API client
///
/// Each call creates a fresh thread holding the prompt, starts a run of the
/// configured assistant on it and polls the run until it reaches a terminal
/// status or the run deadline passes. Runs that outlive the deadline are
/// cancelled on a best-effort basis.
#[derive(Clone)]
pub struct OpenAiAssistants {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiAssistants {
    /// Create a new client
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("health-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let config = OpenAiConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.config.api_key)
            .header("OpenAI-Beta", "assistants=v2")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = self.authorized(request).send().await?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))
    }

    async fn create_thread(&self, prompt: &str) -> Result<Thread, ProviderError> {
        let body = json!({
            "messages": [{ "role": "user", "content": prompt }]
        });
        self.send(self.http.post(self.url("/threads")).json(&body))
            .await
    }

    async fn create_run(&self, thread_id: &str) -> Result<Run, ProviderError> {
        let body = json!({ "assistant_id": self.config.assistant_id });
        self.send(
            self.http
                .post(self.url(&format!("/threads/{}/runs", thread_id)))
                .json(&body),
        )
        .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ProviderError> {
        self.send(
            self.http
                .get(self.url(&format!("/threads/{}/runs/{}", thread_id, run_id))),
        )
        .await
    }

    async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<Run, ProviderError> {
        self.send(
            self.http
                .post(self.url(&format!("/threads/{}/runs/{}/cancel", thread_id, run_id))),
        )
        .await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<Vec<ThreadMessage>, ProviderError> {
        let list: MessageList = self
            .send(
                self.http
                    .get(self.url(&format!("/threads/{}/messages", thread_id)))
                    .query(&[("order", "desc")]),
            )
            .await?;
        Ok(list.data)
    }

    /// Poll until the run reaches a terminal status
    async fn wait_for_run(&self, thread_id: &str, mut run: Run) -> Result<Run, ProviderError> {
        while !run.status.is_terminal() {
            sleep(self.config.poll_interval).await;

            run = self.retrieve_run(thread_id, &run.id).await?;
            debug!("Run {} on thread {} is {}", run.id, thread_id, run.status.as_str());
        }
        Ok(run)
    }

    /// Run `call` unless `deadline` passes first
    async fn before<T>(
        &self,
        deadline: Instant,
        call: impl Future<Output = Result<T, ProviderError>>,
    ) -> Result<T, ProviderError> {
        timeout_at(deadline, call)
            .await
            .map_err(|_| ProviderError::Timeout(self.config.run_timeout))?
    }
}

#[async_trait]
impl AssistantProvider for OpenAiAssistants {
    async fn run(&self, prompt: &str) -> Result<RunOutcome, ProviderError> {
        let deadline = Instant::now() + self.config.run_timeout;

        let thread = self.before(deadline, self.create_thread(prompt)).await?;
        let run = self.before(deadline, self.create_run(&thread.id)).await?;
        info!("Started assistant run {} on thread {}", run.id, thread.id);

        let run_id = run.id.clone();
        let run = match self.before(deadline, self.wait_for_run(&thread.id, run)).await {
            Ok(run) => run,
            Err(ProviderError::Timeout(limit)) => {
                match timeout(CANCEL_GRACE, self.cancel_run(&thread.id, &run_id)).await {
                    Ok(Ok(_)) => debug!("Cancelled timed out run {}", run_id),
                    Ok(Err(e)) => warn!("Failed to cancel timed out run {}: {}", run_id, e),
                    Err(_) => warn!("Cancelling timed out run {} did not finish in time", run_id),
                }
                return Err(ProviderError::Timeout(limit));
            }
            Err(e) => return Err(e),
        };

        if run.status != RunStatus::Completed {
            return Ok(RunOutcome {
                status: run.status,
                messages: Vec::new(),
            });
        }

        let messages = self.before(deadline, self.list_messages(&thread.id)).await?;
        Ok(RunOutcome {
            status: run.status,
            messages,
        })
    }
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}
