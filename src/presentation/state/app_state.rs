use std::sync::Arc;

use crate::application::services::{
    AccountService, ChatRelayService, DashboardService, HistoryService, IdentityGuard,
};
use crate::infrastructure::rate_limit::FixedWindowRateLimiter;
use crate::presentation::config::{RateLimitsSettings, Settings};

/// The three independent limiters, one per route group.
#[derive(Clone)]
pub struct RateLimiters {
    pub auth: Arc<FixedWindowRateLimiter>,
    pub dashboard: Arc<FixedWindowRateLimiter>,
    pub chat: Arc<FixedWindowRateLimiter>,
}

impl RateLimiters {
    pub fn from_settings(settings: &RateLimitsSettings) -> Self {
        Self {
            auth: Arc::new(FixedWindowRateLimiter::new(
                "auth",
                settings.auth.limit,
                settings.auth.window(),
            )),
            dashboard: Arc::new(FixedWindowRateLimiter::new(
                "dashboard",
                settings.dashboard.limit,
                settings.dashboard.window(),
            )),
            chat: Arc::new(FixedWindowRateLimiter::new(
                "chat",
                settings.chat.limit,
                settings.chat.window(),
            )),
        }
    }

    pub fn all(&self) -> Vec<Arc<FixedWindowRateLimiter>> {
        vec![
            Arc::clone(&self.auth),
            Arc::clone(&self.dashboard),
            Arc::clone(&self.chat),
        ]
    }
}

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService>,
    pub chat_relay_service: Arc<ChatRelayService>,
    pub history_service: Arc<HistoryService>,
    pub dashboard_service: Arc<DashboardService>,
    pub identity_guard: Arc<IdentityGuard>,
    pub rate_limiters: RateLimiters,
    pub settings: Arc<Settings>,
}
