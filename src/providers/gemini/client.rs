use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use super::types::*;
use crate::accumulator::{Generation, GenerationAccumulator};
use crate::generator::TextGenerator;
use crate::sse_stream::SseStream;
use crate::types::{FinishReason, GenerationEvent};
use crate::Error;

const PROVIDER: &str = "Gemini";

const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Finish reasons that mean the candidate was withheld.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Authentication method for the Vertex AI backend.
pub enum VertexAuth {
    /// Static access token (passed as Bearer header)
    AccessToken(String),
    /// Application Default Credentials (ADC)
    ApplicationDefault(Arc<dyn gcp_auth::TokenProvider>),
}

impl std::fmt::Debug for VertexAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexAuth::AccessToken(_) => f.write_str("AccessToken(..)"),
            VertexAuth::ApplicationDefault(_) => f.write_str("ApplicationDefault"),
        }
    }
}

/// Where requests go and how they authenticate.
#[derive(Debug)]
enum Backend {
    /// Generative Language API with an API key.
    Api { api_key: String, base_url: String },
    /// Vertex AI publisher model endpoint.
    Vertex {
        project_id: String,
        location: String,
        auth: VertexAuth,
        base_url: Option<String>,
    },
}

/// Gemini text generation over the streaming `streamGenerateContent` API.
///
/// The reply is streamed from the service and buffered here, callers only
/// ever see complete text.
#[derive(Debug)]
pub struct GeminiProvider {
    client: Client,
    model: String,
    backend: Backend,
}

impl GeminiProvider {
    /// Create a provider for the Generative Language API.
    pub fn new(api_key: String, model: String) -> Result<Self, Error> {
        Self::new_with_base_url(api_key, model, GEMINI_API_BASE_URL.to_string())
    }

    /// Create a Generative Language API provider with a custom base URL (for testing).
    pub fn new_with_base_url(api_key: String, model: String, base_url: String) -> Result<Self, Error> {
        if api_key.trim().is_empty() {
            return Err(Error::config("Gemini API key must not be empty"));
        }
        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            model,
            backend: Backend::Api { api_key, base_url },
        })
    }

    /// Create a Vertex AI provider authenticated with a static access token.
    pub fn vertex(
        project_id: String,
        location: String,
        access_token: String,
        model: String,
    ) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            model,
            backend: Backend::Vertex {
                project_id,
                location,
                auth: VertexAuth::AccessToken(access_token),
                base_url: None,
            },
        })
    }

    /// Create a Vertex AI provider using Application Default Credentials.
    pub async fn vertex_with_adc(
        project_id: String,
        location: String,
        model: String,
    ) -> Result<Self, Error> {
        let token_provider = gcp_auth::provider()
            .await
            .map_err(|e| Error::auth(format!("Failed to load application default credentials: {e}")))?;

        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            model,
            backend: Backend::Vertex {
                project_id,
                location,
                auth: VertexAuth::ApplicationDefault(token_provider),
                base_url: None,
            },
        })
    }

    /// Point a Vertex provider at a custom base URL (for testing).
    pub fn with_vertex_base_url(mut self, url: String) -> Self {
        if let Backend::Vertex { base_url, .. } = &mut self.backend {
            *base_url = Some(url);
        }
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Streaming endpoint for the configured model.
    fn endpoint(&self) -> String {
        match &self.backend {
            Backend::Api { base_url, .. } => format!(
                "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
                base_url.trim_end_matches('/'),
                self.model
            ),
            Backend::Vertex {
                project_id,
                location,
                base_url,
                ..
            } => {
                let base = match base_url {
                    Some(url) => url.trim_end_matches('/').to_string(),
                    None => format!("https://{location}-aiplatform.googleapis.com"),
                };
                format!(
                    "{base}/v1/projects/{project_id}/locations/{location}/publishers/google/models/{}:streamGenerateContent?alt=sse",
                    self.model
                )
            }
        }
    }

    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, Error> {
        match &self.backend {
            Backend::Api { api_key, .. } => Ok(request.header("x-goog-api-key", api_key)),
            Backend::Vertex { auth, .. } => match auth {
                VertexAuth::AccessToken(token) => Ok(request.bearer_auth(token)),
                VertexAuth::ApplicationDefault(provider) => {
                    let token = provider
                        .token(&[CLOUD_PLATFORM_SCOPE])
                        .await
                        .map_err(|e| Error::auth(format!("Failed to get ADC token: {e}")))?;
                    Ok(request.bearer_auth(token.as_str()))
                }
            },
        }
    }

    /// Run one generation and buffer the streamed reply.
    pub async fn generate(&self, prompt: &str) -> Result<Generation, Error> {
        let body = GeminiRequest::from_prompt(prompt);
        let request = self.client.post(self.endpoint()).json(&body);
        let response = self.authorize(request).await?.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let mut events = SseStream::new(Box::pin(response.bytes_stream()));
        let mut accumulator = GenerationAccumulator::new();

        while let Some(event) = events.next().await {
            let event = event?;
            let data = event.data.trim();
            if data.is_empty() || event.is_done() {
                continue;
            }

            let chunk: GeminiResponse = serde_json::from_str(data).map_err(|e| {
                Error::provider(PROVIDER, format!("Failed to parse SSE event: {e}"))
            })?;
            for generation_event in Self::convert_chunk(chunk) {
                accumulator.process_event(generation_event);
            }
        }

        accumulator.finalize()
    }

    /// Translate one streamed chunk into generation events.
    fn convert_chunk(chunk: GeminiResponse) -> Vec<GenerationEvent> {
        let mut events = Vec::new();

        if let Some(reason) = chunk
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            events.push(GenerationEvent::Blocked { reason });
            return events;
        }

        let Some(candidate) = chunk.candidates.first() else {
            return events;
        };

        let text = candidate.text();
        if !text.is_empty() {
            events.push(GenerationEvent::TextDelta { delta: text });
        }

        match candidate.finish_reason.as_deref() {
            Some(code) if BLOCKING_FINISH_REASONS.contains(&code) => {
                events.push(GenerationEvent::Blocked {
                    reason: code.to_string(),
                });
            }
            Some(code) => {
                events.push(GenerationEvent::Done {
                    finish_reason: FinishReason::from_gemini(code),
                    usage: chunk.usage_metadata.map(Into::into).unwrap_or_default(),
                });
            }
            None => {}
        }

        events
    }
}

#[async_trait::async_trait]
impl TextGenerator for GeminiProvider {
    async fn generate_text(&self, prompt: &str) -> Result<String, Error> {
        let generation = self.generate(prompt).await?;
        tracing::debug!(
            model = %self.model,
            input_tokens = generation.usage.input_tokens,
            output_tokens = generation.usage.output_tokens,
            finish_reason = ?generation.finish_reason,
            "generation complete"
        );
        Ok(generation.text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

fn build_client(timeout: Duration) -> Result<Client, Error> {
    Ok(Client::builder().timeout(timeout).build()?)
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Map a non-success upstream response to an error, preferring the
/// structured `{"error": {...}}` message when the body carries one.
fn api_error(status: StatusCode, body: &str) -> Error {
    let detail = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) => format!("{code}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) => body.trim().to_string(),
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::auth(detail),
        _ => Error::provider(PROVIDER, format!("API error ({status}): {detail}")),
    }
}
