// ==========================================
// Rental Ledger - Upload Rate Limiting
// ==========================================
// Fixed-window counter per user. Imports are heavyweight (full
// file parse plus row-by-row persistence), so the window is
// deliberately small.
// ==========================================

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Verdict for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    /// Denied; retry after this many seconds.
    Limited { retry_after_secs: u64 },
}

pub trait RateLimiter: Send + Sync {
    /// Register one attempt for the key and decide.
    fn check(&self, key: &str) -> RateDecision;
}

// ==========================================
// FixedWindowRateLimiter
// ==========================================
pub struct FixedWindowRateLimiter {
    max_attempts: usize,
    window: Duration,
    state: Mutex<HashMap<String, (Instant, usize)>>,
}

impl FixedWindowRateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Default import policy: 5 uploads per hour per user.
    pub fn per_hour() -> Self {
        Self::new(5, Duration::from_secs(3600))
    }
}

impl RateLimiter for FixedWindowRateLimiter {
    fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            // A poisoned counter must not block imports.
            Err(poisoned) => poisoned.into_inner(),
        };

        let entry = state.entry(key.to_string()).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }

        if entry.1 >= self.max_attempts {
            let elapsed = now.duration_since(entry.0);
            let remaining = self.window.saturating_sub(elapsed);
            return RateDecision::Limited {
                retry_after_secs: remaining.as_secs().max(1),
            };
        }

        entry.1 += 1;
        RateDecision::Allowed
    }
}
