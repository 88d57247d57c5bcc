use serde::{Deserialize, Serialize};

/// Outcome of a rate limit check for one key in the current window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub retry_after_secs: u64,
}

impl RateLimitDecision {
    pub fn allow(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after_secs: 0,
        }
    }

    pub fn deny(retry_after_secs: u64) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitCheckRequest {
    /// Caller-chosen key, e.g. "login:user@example.com".
    pub key: String,
}
