use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::RateLimitDecision;

/// Default budget: five attempts per fifteen-minute window.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_WINDOW_SECS: u64 = 15 * 60;

/// Fixed-window counter backed by Redis.
///
/// Availability beats enforcement here: when Redis is unreachable or not
/// configured at all, every check is allowed and a warning is logged. A
/// broken limiter must never lock users out of login.
pub struct RateLimiterService {
    pool: Option<Pool>,
    max_attempts: u32,
    window_secs: u64,
}

impl RateLimiterService {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_limits(config, DEFAULT_MAX_ATTEMPTS, DEFAULT_WINDOW_SECS)
    }

    pub fn with_limits(config: &AppConfig, max_attempts: u32, window_secs: u64) -> Self {
        let pool = config.redis_url.as_ref().and_then(|url| {
            match Config::from_url(url).create_pool(Some(Runtime::Tokio1)) {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!("Rate limiting disabled, Redis pool creation failed: {}", e);
                    None
                }
            }
        });

        Self {
            pool,
            max_attempts,
            window_secs,
        }
    }

    /// Record one attempt for `key` and decide whether it is allowed.
    ///
    /// The counter is INCRed first and the TTL set only on the first hit of
    /// the window, so concurrent attempts share one window boundary.
    pub async fn check(&self, key: &str) -> RateLimitDecision {
        let Some(pool) = &self.pool else {
            return RateLimitDecision::allow(self.max_attempts);
        };

        let redis_key = format!("ratelimit:{}", key);

        let mut conn = match pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Rate limit check skipped, Redis unavailable: {}", e);
                return RateLimitDecision::allow(self.max_attempts);
            }
        };

        let count: u64 = match conn.incr(&redis_key, 1u64).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Rate limit INCR failed, allowing request: {}", e);
                return RateLimitDecision::allow(self.max_attempts);
            }
        };

        if count == 1 {
            if let Err(e) = conn
                .expire::<_, ()>(&redis_key, self.window_secs as i64)
                .await
            {
                warn!("Rate limit EXPIRE failed for {}: {}", redis_key, e);
            }
        }

        if count > self.max_attempts as u64 {
            let retry_after: i64 = conn.ttl(&redis_key).await.unwrap_or(-1);
            debug!("Rate limit exceeded for {} ({} attempts)", key, count);
            return RateLimitDecision::deny(retry_after.max(0) as u64);
        }

        RateLimitDecision::allow(self.max_attempts - count as u32)
    }
}
