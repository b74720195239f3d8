use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use bytes::Bytes;
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use saas_dashboard::application::ports::{LlmClient, LlmClientError};
use saas_dashboard::domain::{ConversationId, Message};
use saas_dashboard::infrastructure::llm::{AnthropicClient, MAX_LINE_BYTES, decode_token_stream};

use crate::helpers::test_settings;

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    body: &'static str,
    seen: Arc<Mutex<Option<(HeaderMap, serde_json::Value)>>>,
}

async fn messages_endpoint(State(upstream): State<Upstream>, headers: HeaderMap, body: Bytes) -> Response {
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    *upstream.seen.lock() = Some((headers, json));

    Response::builder()
        .status(upstream.status)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .body(Body::from(upstream.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

async fn start_upstream(status: StatusCode, body: &'static str) -> (AnthropicClient, Upstream) {
    let upstream = Upstream {
        status,
        body,
        seen: Arc::new(Mutex::new(None)),
    };
    let app = Router::new()
        .route("/v1/messages", post(messages_endpoint))
        .with_state(upstream.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream");
    });

    let mut settings = test_settings().llm;
    settings.base_url = format!("http://{}", addr);
    let client = AnthropicClient::new(&settings).expect("client");
    (client, upstream)
}

fn history() -> Vec<Message> {
    let id = ConversationId::new();
    vec![
        Message::user(id, "Hello".to_string()),
        Message::assistant(id, "Hi".to_string()),
        Message::user(id, "How are you?".to_string()),
    ]
}

const HAPPY_BODY: &str = "event: message_start\n\
data: {\"type\":\"message_start\",\"message\":{}}\n\n\
event: content_block_delta\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hel\"}}\n\n\
data: not json at all\n\n\
data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"lo\"}}\n\n\
data: {\"type\":\"message_stop\"}\n\n";

#[tokio::test]
async fn given_streaming_upstream_when_completing_then_fragments_in_order_and_bad_frames_skipped() {
    let (client, _) = start_upstream(StatusCode::OK, HAPPY_BODY).await;

    let stream = client.complete_stream(&history()).await.expect("stream");
    let fragments: Vec<String> = stream
        .map(|item| item.expect("fragment"))
        .collect()
        .await;

    assert_eq!(fragments, vec!["Hel", "lo"]);
}

#[tokio::test]
async fn given_request_when_completing_then_headers_and_body_follow_messages_api() {
    let (client, upstream) = start_upstream(StatusCode::OK, HAPPY_BODY).await;

    let _ = client.complete_stream(&history()).await.expect("stream");

    let (headers, body) = upstream.seen.lock().clone().expect("request captured");
    assert_eq!(headers["x-api-key"], "test-api-key");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap_or_default()
            .starts_with("application/json")
    );
    assert_eq!(body["stream"], true);
    assert_eq!(body["max_tokens"], 4096);
    assert_eq!(body["model"], "claude-sonnet-4-20250514");
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["messages"][1]["role"], "assistant");
    assert_eq!(body["messages"][2]["content"], "How are you?");
}

#[tokio::test]
async fn given_upstream_server_error_when_completing_then_request_failed() {
    let (client, _) =
        start_upstream(StatusCode::INTERNAL_SERVER_ERROR, "{\"error\":\"boom\"}").await;

    let result = client.complete_stream(&history()).await;

    assert!(matches!(result, Err(LlmClientError::ApiRequestFailed(_))));
}

#[tokio::test]
async fn given_upstream_throttling_when_completing_then_rate_limited() {
    let (client, _) = start_upstream(StatusCode::TOO_MANY_REQUESTS, "").await;

    let result = client.complete_stream(&history()).await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
}

#[tokio::test]
async fn given_error_event_in_stream_when_decoding_then_stream_ends_with_error() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(
            b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"a\"}}\n",
        )),
        Ok(Bytes::from_static(
            b"data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n",
        )),
        Ok(Bytes::from_static(
            b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"never\"}}\n",
        )),
    ];

    let items: Vec<Result<String, LlmClientError>> =
        decode_token_stream(futures::stream::iter(chunks)).collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().ok().map(String::as_str), Some("a"));
    assert!(matches!(items[1], Err(LlmClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_frames_split_across_reads_when_decoding_then_each_fragment_emitted_once() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"data: {\"type\":\"content_block_del")),
        Ok(Bytes::from_static(b"ta\",\"delta\":{\"text\":\"Hi\"}}\ndata: {\"type\":\"content_")),
        Ok(Bytes::from_static(b"block_delta\",\"delta\":{\"text\":\"!\"}}\ndata: [DONE]\n")),
    ];

    let items: Vec<String> = decode_token_stream(futures::stream::iter(chunks))
        .map(|item| item.expect("fragment"))
        .collect()
        .await;

    assert_eq!(items, vec!["Hi", "!"]);
}

#[tokio::test]
async fn given_body_read_error_when_decoding_then_stream_interrupted() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(
            b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"a\"}}\n",
        )),
        Err(std::io::Error::other("reset by peer")),
    ];

    let items: Vec<Result<String, LlmClientError>> =
        decode_token_stream(futures::stream::iter(chunks)).collect().await;

    assert!(matches!(items.last(), Some(Err(LlmClientError::StreamInterrupted(_)))));
}

#[tokio::test]
async fn given_runaway_line_from_upstream_when_decoding_then_stream_fails_after_earlier_text() {
    let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(
            b"data: {\"type\":\"content_block_delta\",\"delta\":{\"text\":\"a\"}}\n",
        )),
        Ok(Bytes::from(vec![b'x'; MAX_LINE_BYTES + 1])),
        Ok(Bytes::from_static(b"\n")),
    ];

    let items: Vec<Result<String, LlmClientError>> =
        decode_token_stream(futures::stream::iter(chunks)).collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().ok().map(String::as_str), Some("a"));
    assert!(matches!(items[1], Err(LlmClientError::InvalidResponse(_))));
}
