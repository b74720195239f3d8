use std::str::FromStr;

use saas_dashboard::domain::{ConversationId, MessageRole, UserId};

#[test]
fn given_uuid_string_when_parsing_conversation_id_then_round_trips_display() {
    let id = ConversationId::new();

    let parsed = ConversationId::from_str(&id.to_string()).expect("valid id");

    assert_eq!(parsed, id);
}

#[test]
fn given_non_uuid_string_when_parsing_ids_then_rejected() {
    assert!(ConversationId::from_str("not-a-uuid").is_err());
    assert!(UserId::from_str("").is_err());
}

#[test]
fn given_role_names_when_parsing_then_map_to_roles() {
    assert_eq!(MessageRole::from_str("user"), Ok(MessageRole::User));
    assert_eq!(MessageRole::from_str("assistant"), Ok(MessageRole::Assistant));
    assert!(MessageRole::from_str("system").is_err());
    assert_eq!(MessageRole::Assistant.as_str(), "assistant");
}
