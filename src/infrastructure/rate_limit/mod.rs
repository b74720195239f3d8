mod fixed_window_rate_limiter;
mod rate_limit_sweeper;

pub use fixed_window_rate_limiter::FixedWindowRateLimiter;
pub use rate_limit_sweeper::RateLimitSweeper;
