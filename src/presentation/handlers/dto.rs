use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::AuthSession;
use crate::domain::{
    ChartData, ChartDataPoint, ChatStreamEvent, Conversation, DashboardMetrics, Message, User,
};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "conversationId")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartsQuery {
    pub range: Option<String>,
}

/// Wire form of a relay event. Error text travels in `text`.
#[derive(Debug, Serialize)]
pub struct StreamFrame {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "conversationId", skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

impl From<ChatStreamEvent> for StreamFrame {
    fn from(event: ChatStreamEvent) -> Self {
        let kind = event.kind();
        match event {
            ChatStreamEvent::Start { conversation_id } => Self {
                kind,
                text: None,
                conversation_id: Some(conversation_id.to_string()),
            },
            ChatStreamEvent::Content { text } => Self {
                kind,
                text: Some(text),
                conversation_id: None,
            },
            ChatStreamEvent::End => Self {
                kind,
                text: None,
                conversation_id: None,
            },
            ChatStreamEvent::Error { message } => Self {
                kind,
                text: Some(message),
                conversation_id: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageDto {
    pub id: String,
    pub conversation_id: String,
    pub role: &'static str,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_string(),
            conversation_id: message.conversation_id.to_string(),
            role: message.role.as_str(),
            content: message.content,
            created_at: message.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<MessageDto>,
}

#[derive(Debug, Serialize)]
pub struct ConversationDto {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationDto {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id.to_string(),
            user_id: conversation.owner.to_string(),
            title: conversation.title,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub total_users: u32,
    pub revenue: f64,
    pub growth: f64,
    pub active_users: u32,
}

impl From<DashboardMetrics> for MetricsResponse {
    fn from(m: DashboardMetrics) -> Self {
        Self {
            total_users: m.total_users,
            revenue: m.revenue,
            growth: m.growth,
            active_users: m.active_users,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChartPointDto {
    pub date: String,
    pub value: f64,
}

impl From<ChartDataPoint> for ChartPointDto {
    fn from(point: ChartDataPoint) -> Self {
        Self {
            date: point.date,
            value: point.value,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub revenue: Vec<ChartPointDto>,
    pub users: Vec<ChartPointDto>,
    pub engagement: Vec<ChartPointDto>,
}

impl From<ChartData> for ChartsResponse {
    fn from(data: ChartData) -> Self {
        let convert = |series: Vec<ChartDataPoint>| -> Vec<ChartPointDto> {
            series.into_iter().map(ChartPointDto::from).collect()
        };
        Self {
            revenue: convert(data.revenue),
            users: convert(data.users),
            engagement: convert(data.engagement),
        }
    }
}
