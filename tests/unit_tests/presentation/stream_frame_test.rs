use saas_dashboard::domain::{ChatStreamEvent, ConversationId};
use saas_dashboard::presentation::handlers::dto::StreamFrame;

fn wire(event: ChatStreamEvent) -> serde_json::Value {
    serde_json::to_value(StreamFrame::from(event)).expect("serialize")
}

#[test]
fn given_start_event_when_serializing_then_carries_conversation_id_only() {
    let id = ConversationId::new();

    let json = wire(ChatStreamEvent::Start {
        conversation_id: id,
    });

    assert_eq!(
        json,
        serde_json::json!({ "type": "start", "conversationId": id.to_string() })
    );
}

#[test]
fn given_content_and_end_events_when_serializing_then_match_wire_shape() {
    assert_eq!(
        wire(ChatStreamEvent::Content {
            text: "Hi".to_string()
        }),
        serde_json::json!({ "type": "content", "text": "Hi" })
    );
    assert_eq!(wire(ChatStreamEvent::End), serde_json::json!({ "type": "end" }));
}

#[test]
fn given_error_event_when_serializing_then_message_travels_in_text() {
    let json = wire(ChatStreamEvent::Error {
        message: "failed".to_string(),
    });

    assert_eq!(json, serde_json::json!({ "type": "error", "text": "failed" }));
}
