//! in-process sliding-window rate limiter for the sensitive auth endpoints.
//!
//! keys are pruned on every call and the table is capped, so an attacker
//! rotating keys cannot grow memory without bound.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// sliding-window limiter keyed by caller identity.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    window: Duration,
    max_keys: usize,
}

impl RateLimiter {
    /// create a limiter with the given window length.
    pub fn new(window: Duration, max_keys: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            window,
            max_keys,
        }
    }

    /// record one request for `key`; false when the window is exhausted.
    pub fn allow(&self, key: &str, limit: u32) -> bool {
        if limit == 0 {
            return true;
        }

        let now = Instant::now();
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let queue = inner.entry(key.to_string()).or_default();
        prune(queue, now, self.window);
        if queue.len() >= limit as usize {
            return false;
        }
        queue.push_back(now);

        inner.retain(|_, events| {
            prune(events, now, self.window);
            !events.is_empty()
        });

        if inner.len() > self.max_keys {
            let mut overflow = inner.len() - self.max_keys;
            let keys: Vec<String> = inner.keys().cloned().collect();
            for key in keys {
                if overflow == 0 {
                    break;
                }
                if inner.remove(&key).is_some() {
                    overflow -= 1;
                }
            }
        }

        true
    }
}

fn prune(queue: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(front) = queue.front() {
        if now.duration_since(*front) > window {
            queue.pop_front();
        } else {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enforces_the_per_key_limit() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 16);
        assert!(limiter.allow("a", 2));
        assert!(limiter.allow("a", 2));
        assert!(!limiter.allow("a", 2));
        // other keys are unaffected
        assert!(limiter.allow("b", 2));
    }

    #[test]
    fn zero_limit_disables_the_gate() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 16);
        for _ in 0..100 {
            assert!(limiter.allow("a", 0));
        }
    }

    #[test]
    fn key_table_stays_capped() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 4);
        for i in 0..64 {
            limiter.allow(&format!("key-{i}"), 10);
        }
        assert!(limiter.inner.lock().unwrap().len() <= 5);
    }
}
