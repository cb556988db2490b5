//! Windowed rate limiting for Redis.

use anyhow::Result;
use async_trait::async_trait;

/// Rate limiter trait for checking and incrementing counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one request for `user_id` in `scope` and compare against `limit`.
    /// The counter resets `window_secs` after the first request of a window.
    async fn check(
        &self,
        scope: &str,
        user_id: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<RateLimitResult>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Under the limit, includes current count.
    Allowed(i64),
    /// Over the limit, includes current count.
    Exceeded(i64),
}

impl RateLimitResult {
    fn from_count(count: i64, limit: i64) -> Self {
        if count > limit {
            RateLimitResult::Exceeded(count)
        } else {
            RateLimitResult::Allowed(count)
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }
}

/// Redis implementation of RateLimiter.
#[derive(Clone)]
pub struct RedisRateLimiter {
    client: redis::Client,
}

impl RedisRateLimiter {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }

    fn key(scope: &str, user_id: &str) -> String {
        format!("ratelimit:{}:{}", scope, user_id)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(
        &self,
        scope: &str,
        user_id: &str,
        limit: i64,
        window_secs: u64,
    ) -> Result<RateLimitResult> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = Self::key(scope, user_id);

        let count: i64 = redis::cmd("INCR").arg(&key).query_async(&mut conn).await?;

        if count == 1 {
            let _: () = redis::cmd("EXPIRE")
                .arg(&key)
                .arg(window_secs)
                .query_async(&mut conn)
                .await?;
        }

        Ok(RateLimitResult::from_count(count, limit))
    }
}
