use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::sse_frame_decoder::{SseFrame, SseFrameDecoder};
use crate::application::ports::{LlmClient, LlmClientError, LlmTokenStream};
use crate::domain::Message;
use crate::presentation::config::LlmSettings;

const API_KEY_HEADER: &str = "x-api-key";
const API_VERSION_HEADER: &str = "anthropic-version";

/// Streaming client for the Anthropic Messages API.
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta {
        delta: ContentDelta,
    },
    MessageStop,
    Error {
        #[serde(default)]
        error: Option<StreamErrorBody>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ContentDelta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct StreamErrorBody {
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    message: String,
}

enum FrameOutcome {
    Text(String),
    Stop,
    Failed(LlmClientError),
    Ignored,
}

impl AnthropicClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/v1/messages", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone(),
            api_version: settings.api_version.clone(),
            model: settings.chat_model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    #[instrument(skip(self, history), fields(model = %self.model, turns = history.len()))]
    async fn complete_stream(&self, history: &[Message]) -> Result<LlmTokenStream, LlmClientError> {
        let request_body = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: history
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.as_str(),
                    content: &m.content,
                })
                .collect(),
            stream: true,
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(API_VERSION_HEADER, &self.api_version)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        Ok(Box::pin(decode_token_stream(response.bytes_stream())))
    }
}

/// Turns an upstream event-stream body into text fragments.
///
/// Each network read is framed and decoded before the next one is requested.
/// Frames that are not JSON, or JSON the relay does not care about, are
/// skipped. `[DONE]`, `message_stop` or the end of the body end the stream.
pub fn decode_token_stream<S, E>(body: S) -> impl Stream<Item = Result<String, LlmClientError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        let mut body = Box::pin(body);
        let mut decoder = SseFrameDecoder::new();

        while let Some(chunk) = body.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    yield Err(LlmClientError::StreamInterrupted(e.to_string()));
                    return;
                }
            };

            let frames = match decoder.push(&chunk) {
                Ok(frames) => frames,
                Err(e) => {
                    yield Err(LlmClientError::InvalidResponse(e.to_string()));
                    return;
                }
            };

            for frame in frames {
                match interpret_frame(frame) {
                    FrameOutcome::Text(text) => yield Ok(text),
                    FrameOutcome::Stop => return,
                    FrameOutcome::Failed(e) => {
                        yield Err(e);
                        return;
                    }
                    FrameOutcome::Ignored => {}
                }
            }

            if decoder.is_done() {
                return;
            }
        }

        if let Some(frame) = decoder.finish() {
            match interpret_frame(frame) {
                FrameOutcome::Text(text) => yield Ok(text),
                FrameOutcome::Failed(e) => yield Err(e),
                FrameOutcome::Stop | FrameOutcome::Ignored => {}
            }
        }
    }
}

fn interpret_frame(frame: SseFrame) -> FrameOutcome {
    let payload = match frame {
        SseFrame::Done => return FrameOutcome::Stop,
        SseFrame::Data(payload) => payload,
    };

    match serde_json::from_str::<StreamEvent>(&payload) {
        Ok(StreamEvent::ContentBlockDelta { delta }) => {
            delta.text.map_or(FrameOutcome::Ignored, FrameOutcome::Text)
        }
        Ok(StreamEvent::MessageStop) => FrameOutcome::Stop,
        Ok(StreamEvent::Error { error }) => {
            let detail = error
                .map(|e| format!("{}: {}", e.kind, e.message))
                .unwrap_or_else(|| "unspecified upstream error".to_string());
            FrameOutcome::Failed(LlmClientError::InvalidResponse(detail))
        }
        Ok(StreamEvent::Other) => FrameOutcome::Ignored,
        Err(e) => {
            debug!(error = %e, "Skipping undecodable upstream frame");
            FrameOutcome::Ignored
        }
    }
}
