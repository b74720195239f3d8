use std::sync::Arc;

use futures::StreamExt;

use saas_dashboard::application::ports::ConversationRepository;
use saas_dashboard::application::services::{ChatError, ChatRelayService};
use saas_dashboard::domain::{ChatStreamEvent, Conversation, MessageRole, UserId};
use saas_dashboard::infrastructure::llm::{MockLlmClient, MockLlmScript};
use saas_dashboard::infrastructure::persistence::InMemoryConversationRepository;

use crate::helpers::{collect_events, content_text};

struct Fixture {
    repo: Arc<InMemoryConversationRepository>,
    llm: Arc<MockLlmClient>,
    service: ChatRelayService,
}

fn fixture(llm: MockLlmClient) -> Fixture {
    let repo = Arc::new(InMemoryConversationRepository::new());
    let llm = Arc::new(llm);
    let service = ChatRelayService::new(repo.clone(), llm.clone());
    Fixture { repo, llm, service }
}

#[tokio::test]
async fn given_new_chat_when_relaying_then_events_start_content_end_and_reply_persisted() {
    let f = fixture(MockLlmClient::replying(["Hi", " there", "!"]));
    let user = UserId::new();

    let session = f
        .service
        .open(user, None, "Hello".to_string())
        .await
        .expect("open");
    let conversation_id = session.conversation_id();
    let events = collect_events(session.into_events()).await;

    assert_eq!(events.first(), Some(&ChatStreamEvent::Start { conversation_id }));
    assert_eq!(events.last(), Some(&ChatStreamEvent::End));
    assert_eq!(content_text(&events), "Hi there!");

    let conversation = f.repo.conversation(conversation_id).expect("created");
    assert_eq!(conversation.title, "Hello");
    assert_eq!(conversation.owner, user);

    let messages = f.repo.get_messages(conversation_id).await.expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, MessageRole::User);
    assert_eq!(messages[0].content, "Hello");
    assert_eq!(messages[1].role, MessageRole::Assistant);
    assert_eq!(messages[1].content, "Hi there!");
}

#[tokio::test]
async fn given_open_session_when_upstream_called_then_history_already_contains_user_message() {
    let f = fixture(MockLlmClient::replying(["ok"]));

    let session = f
        .service
        .open(UserId::new(), None, "What is Rust?".to_string())
        .await
        .expect("open");

    assert_eq!(f.repo.message_count(), 1);
    assert!(f.llm.calls().is_empty());

    collect_events(session.into_events()).await;

    let calls = f.llm.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 1);
    assert_eq!(calls[0][0].content, "What is Rust?");
}

#[tokio::test]
async fn given_existing_conversation_when_continuing_then_full_history_is_sent_in_order() {
    let f = fixture(MockLlmClient::replying(["second answer"]));
    let user = UserId::new();
    let conversation = Conversation::start(user, "first question");
    f.repo.create_conversation(&conversation).await.expect("create");
    f.repo
        .append_message(&saas_dashboard::domain::Message::user(
            conversation.id,
            "first question".to_string(),
        ))
        .await
        .expect("append");
    f.repo
        .append_message(&saas_dashboard::domain::Message::assistant(
            conversation.id,
            "first answer".to_string(),
        ))
        .await
        .expect("append");

    let session = f
        .service
        .open(user, Some(conversation.id), "second question".to_string())
        .await
        .expect("open");
    collect_events(session.into_events()).await;

    let sent: Vec<String> = f.llm.calls()[0].iter().map(|m| m.content.clone()).collect();
    assert_eq!(sent, vec!["first question", "first answer", "second question"]);
    assert_eq!(f.repo.conversation_count(), 1);
    assert_eq!(f.repo.message_count(), 4);
}

#[tokio::test]
async fn given_empty_or_blank_message_when_opening_then_validation_error_and_nothing_written() {
    let f = fixture(MockLlmClient::replying(["unused"]));

    let empty = f.service.open(UserId::new(), None, String::new()).await;
    let blank = f.service.open(UserId::new(), None, "   ".to_string()).await;

    assert!(matches!(empty, Err(ChatError::Validation(_))));
    assert!(matches!(blank, Err(ChatError::Validation(_))));
    assert_eq!(f.repo.conversation_count(), 0);
    assert_eq!(f.repo.message_count(), 0);
    assert!(f.llm.calls().is_empty());
}

#[tokio::test]
async fn given_upstream_rejects_request_when_relaying_then_single_error_and_no_reply_stored() {
    let f = fixture(MockLlmClient::new(MockLlmScript::RejectRequest(
        "HTTP 500 Internal Server Error".to_string(),
    )));

    let session = f
        .service
        .open(UserId::new(), None, "Hello".to_string())
        .await
        .expect("open");
    let conversation_id = session.conversation_id();
    let events = collect_events(session.into_events()).await;

    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], ChatStreamEvent::Start { .. }));
    assert!(matches!(events[1], ChatStreamEvent::Error { .. }));

    let messages = f.repo.get_messages(conversation_id).await.expect("messages");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
}

#[tokio::test]
async fn given_upstream_fails_mid_stream_when_relaying_then_partial_reply_is_discarded() {
    let f = fixture(MockLlmClient::new(MockLlmScript::FailAfter(
        vec!["partial".to_string()],
        "connection reset".to_string(),
    )));

    let session = f
        .service
        .open(UserId::new(), None, "Hello".to_string())
        .await
        .expect("open");
    let events = collect_events(session.into_events()).await;

    assert_eq!(content_text(&events), "partial");
    assert!(matches!(events.last(), Some(ChatStreamEvent::Error { .. })));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
    assert_eq!(f.repo.message_count(), 1);
}

#[tokio::test]
async fn given_upstream_sends_no_text_when_relaying_then_empty_reply_stored_and_end_emitted() {
    let f = fixture(MockLlmClient::replying(Vec::<String>::new()));

    let session = f
        .service
        .open(UserId::new(), None, "Hello".to_string())
        .await
        .expect("open");
    let conversation_id = session.conversation_id();
    let events = collect_events(session.into_events()).await;

    assert_eq!(
        events,
        vec![ChatStreamEvent::Start { conversation_id }, ChatStreamEvent::End]
    );
    let messages = f.repo.get_messages(conversation_id).await.expect("messages");
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "");
}

#[tokio::test]
async fn given_reply_cannot_be_stored_when_relaying_then_error_replaces_end() {
    let f = fixture(MockLlmClient::replying(["Hi"]));
    f.repo.fail_appends_for(MessageRole::Assistant);

    let session = f
        .service
        .open(UserId::new(), None, "Hello".to_string())
        .await
        .expect("open");
    let events = collect_events(session.into_events()).await;

    assert!(matches!(events.last(), Some(ChatStreamEvent::Error { .. })));
    assert!(!events.contains(&ChatStreamEvent::End));
}

#[tokio::test]
async fn given_foreign_conversation_when_opening_then_not_found_and_nothing_written() {
    let f = fixture(MockLlmClient::replying(["unused"]));
    let conversation = Conversation::start(UserId::new(), "private");
    f.repo.create_conversation(&conversation).await.expect("create");

    let result = f
        .service
        .open(UserId::new(), Some(conversation.id), "let me in".to_string())
        .await;

    assert!(matches!(result, Err(ChatError::NotFound)));
    assert_eq!(f.repo.message_count(), 0);
}

#[tokio::test]
async fn given_relay_in_progress_when_opening_same_conversation_then_busy() {
    let f = fixture(MockLlmClient::replying(["one", "two"]));
    let user = UserId::new();

    let first = f
        .service
        .open(user, None, "Hello".to_string())
        .await
        .expect("open first");
    let conversation_id = first.conversation_id();

    let second = f
        .service
        .open(user, Some(conversation_id), "Again".to_string())
        .await;

    assert!(matches!(second, Err(ChatError::ConversationBusy)));
    assert_eq!(f.repo.message_count(), 1);

    collect_events(first.into_events()).await;

    let third = f
        .service
        .open(user, Some(conversation_id), "Again".to_string())
        .await;
    assert!(third.is_ok());
}

#[tokio::test]
async fn given_client_disconnects_mid_stream_when_stream_dropped_then_no_reply_and_lock_released() {
    let f = fixture(MockLlmClient::replying(["one", "two", "three"]));
    let user = UserId::new();

    let session = f
        .service
        .open(user, None, "Hello".to_string())
        .await
        .expect("open");
    let conversation_id = session.conversation_id();

    let mut events = Box::pin(session.into_events());
    assert!(matches!(events.next().await, Some(ChatStreamEvent::Start { .. })));
    assert!(matches!(events.next().await, Some(ChatStreamEvent::Content { .. })));
    drop(events);

    assert_eq!(f.repo.message_count(), 1);
    let reopened = f
        .service
        .open(user, Some(conversation_id), "Still there?".to_string())
        .await;
    assert!(reopened.is_ok());
}
