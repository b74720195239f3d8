mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, DatabaseSettings, LlmSettings, LoggingSettings, RateLimitSettings,
    RateLimitsSettings, ServerSettings, Settings, SettingsError,
};
