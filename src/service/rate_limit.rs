//! Rate Limit Service
//!
//! In-process fixed-window request limiter keyed by route and client IP
//! address, so each limited route has its own budget per client. State lives
//! in memory only, so limits reset on restart and are per process.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::debug;

use crate::config::RateLimitConfig;

/// Counter for one (route, client) pair's current window
#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window limiter shared across handlers
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Arc<Mutex<HashMap<(String, IpAddr), Window>>>,
}

impl RateLimiter {
    /// Creates a limiter from configuration
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_secs(config.window_seconds),
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a request from `addr` against `route` and reports whether it
    /// is allowed
    ///
    /// Each route keeps an independent budget per client: exhausting one
    /// route never affects another. The first request in a window starts the
    /// clock; once `max_requests` have been counted, further requests are
    /// rejected until the window expires.
    pub fn check(&self, route: &str, addr: IpAddr) -> bool {
        let now = Instant::now();

        // Lock poisoning only happens if a holder panicked; start fresh
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Drop expired windows before they pile up
        windows.retain(|_, w| now.duration_since(w.started) < self.window);

        let window = windows
            .entry((route.to_string(), addr))
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if window.count >= self.max_requests {
            debug!("rate limit exceeded for {} on {}", addr, route);
            return false;
        }

        window.count += 1;
        true
    }

    /// Number of (route, client) pairs with an active window, for
    /// diagnostics
    pub fn tracked_windows(&self) -> usize {
        match self.windows.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
