//! Rate limit bookkeeping for the Workable API
//!
//! Workable reports its per-minute quota through the `x-rate-limit-*`
//! response headers. These types hold what the request scheduler has
//! learned from them. Only the scheduler's worker mutates a
//! [`RateLimitState`].

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Seconds assumed for a quota window when the server omits `x-rate-limit-reset`
const DEFAULT_WINDOW_SECS: i64 = 60;

/// Raw rate limit values read from one response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    /// `x-rate-limit-limit`
    pub limit: Option<u32>,
    /// `x-rate-limit-remaining`
    pub remaining: Option<u32>,
    /// `x-rate-limit-reset`, epoch seconds
    pub reset: Option<i64>,
}

impl RateLimitHeaders {
    pub const LIMIT: &'static str = "x-rate-limit-limit";
    pub const REMAINING: &'static str = "x-rate-limit-remaining";
    pub const RESET: &'static str = "x-rate-limit-reset";

    /// Build from a header lookup function
    pub fn from_lookup<'a>(lookup: impl Fn(&str) -> Option<&'a str>) -> Self {
        Self {
            limit: lookup(Self::LIMIT).and_then(|v| v.trim().parse().ok()),
            remaining: lookup(Self::REMAINING).and_then(|v| v.trim().parse().ok()),
            reset: lookup(Self::RESET).and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// What the scheduler knows about the current quota window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    pub limit: u32,
    pub remaining: u32,
    pub reset_epoch_seconds: i64,
}

impl RateLimitState {
    /// Fold the headers of a completed response into the previous state.
    ///
    /// Missing values fall back to `default_limit`, a locally decremented
    /// remaining count, and the previous (or a fresh one-minute) reset.
    pub fn observe(
        previous: Option<&RateLimitState>,
        headers: &RateLimitHeaders,
        default_limit: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let limit = headers
            .limit
            .or(previous.map(|p| p.limit))
            .unwrap_or(default_limit);

        let remaining = headers.remaining.unwrap_or_else(|| {
            previous
                .map(|p| p.remaining)
                .unwrap_or(limit)
                .saturating_sub(1)
        });

        let reset_epoch_seconds = headers
            .reset
            .or_else(|| previous.map(|p| p.reset_epoch_seconds))
            .filter(|reset| *reset > now.timestamp() || headers.reset.is_some())
            .unwrap_or(now.timestamp() + DEFAULT_WINDOW_SECS);

        Self {
            limit,
            remaining,
            reset_epoch_seconds,
        }
    }

    /// True once the window has at most one call left
    pub fn is_exhausted(&self) -> bool {
        self.remaining <= 1
    }

    /// How long to wait before the window has reset, plus `margin`
    pub fn wait_until_reset(&self, now: DateTime<Utc>, margin: Duration) -> Duration {
        let margin_ms = i64::try_from(margin.as_millis()).unwrap_or(i64::MAX);
        let target_ms = self
            .reset_epoch_seconds
            .saturating_mul(1000)
            .saturating_add(margin_ms);
        let wait_ms = target_ms.saturating_sub(now.timestamp_millis());
        if wait_ms > 0 {
            Duration::from_millis(wait_ms as u64)
        } else {
            Duration::ZERO
        }
    }

    /// Treat the window as fresh after its reset time has passed
    pub fn replenish(&mut self) {
        self.remaining = self.limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(epoch_secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(epoch_secs, 0).unwrap()
    }

    #[test]
    fn test_headers_from_lookup() {
        let headers = RateLimitHeaders::from_lookup(|name| match name {
            RateLimitHeaders::LIMIT => Some("10"),
            RateLimitHeaders::REMAINING => Some(" 7 "),
            RateLimitHeaders::RESET => Some("1700000060"),
            _ => None,
        });
        assert_eq!(headers.limit, Some(10));
        assert_eq!(headers.remaining, Some(7));
        assert_eq!(headers.reset, Some(1_700_000_060));
    }

    #[test]
    fn test_headers_ignore_garbage() {
        let headers = RateLimitHeaders::from_lookup(|name| match name {
            RateLimitHeaders::REMAINING => Some("lots"),
            _ => None,
        });
        assert_eq!(headers, RateLimitHeaders::default());
    }

    #[test]
    fn test_observe_uses_server_values() {
        let headers = RateLimitHeaders {
            limit: Some(10),
            remaining: Some(4),
            reset: Some(1_000_030),
        };
        let state = RateLimitState::observe(None, &headers, 10, at(1_000_000));
        assert_eq!(
            state,
            RateLimitState {
                limit: 10,
                remaining: 4,
                reset_epoch_seconds: 1_000_030
            }
        );
    }

    #[test]
    fn test_observe_without_headers_is_conservative() {
        let now = at(1_000_000);
        let first = RateLimitState::observe(None, &RateLimitHeaders::default(), 10, now);
        assert_eq!(first.limit, 10);
        assert_eq!(first.remaining, 9);
        assert_eq!(first.reset_epoch_seconds, 1_000_060);

        let second = RateLimitState::observe(Some(&first), &RateLimitHeaders::default(), 10, now);
        assert_eq!(second.remaining, 8);
        assert_eq!(second.reset_epoch_seconds, 1_000_060);
    }

    #[test]
    fn test_observe_rolls_stale_reset_forward() {
        let previous = RateLimitState {
            limit: 10,
            remaining: 10,
            reset_epoch_seconds: 999_000,
        };
        let state =
            RateLimitState::observe(Some(&previous), &RateLimitHeaders::default(), 10, at(1_000_000));
        assert_eq!(state.reset_epoch_seconds, 1_000_060);
    }

    #[test]
    fn test_exhausted_at_one_remaining() {
        let mut state = RateLimitState {
            limit: 10,
            remaining: 2,
            reset_epoch_seconds: 0,
        };
        assert!(!state.is_exhausted());
        state.remaining = 1;
        assert!(state.is_exhausted());
        state.remaining = 0;
        assert!(state.is_exhausted());
        state.replenish();
        assert_eq!(state.remaining, 10);
    }

    #[test]
    fn test_wait_until_reset_includes_margin() {
        let state = RateLimitState {
            limit: 10,
            remaining: 1,
            reset_epoch_seconds: 1_000_005,
        };
        let wait = state.wait_until_reset(at(1_000_000), Duration::from_secs(1));
        assert_eq!(wait, Duration::from_secs(6));

        let wait = state.wait_until_reset(at(1_000_010), Duration::from_secs(1));
        assert_eq!(wait, Duration::ZERO);
    }

    #[test]
    fn test_wait_until_reset_saturates_on_absurd_reset() {
        let state = RateLimitState {
            limit: 10,
            remaining: 0,
            reset_epoch_seconds: i64::MAX,
        };
        let wait = state.wait_until_reset(at(1_000_000), Duration::from_secs(1));
        assert!(wait > Duration::from_secs(365 * 24 * 3600));
    }
}
