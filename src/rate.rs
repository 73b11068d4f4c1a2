use crate::config::RateConfig;
use crate::helpers::current_ts;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

const SHARD_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Rejected,
}

/// One origin's live window. `count` covers every attempt since the window
/// began, admitted or not; rejected attempts keep counting so an origin that
/// went over budget cannot probe its way back under before the reset.
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: u64,
}

/// Per-origin fixed-window rate limiter.
///
/// Entries live in hash-sharded maps so concurrent attempts from the same
/// origin serialize on one shard lock while unrelated origins proceed in
/// parallel. Windows reset lazily on the next attempt; a periodic sweep
/// removes entries from origins that never came back.
#[derive(Debug)]
pub struct RateLimiter {
    shards: Vec<Mutex<HashMap<String, WindowEntry>>>,
    window_seconds: u64,
    budget: u32,
    retention_seconds: u64,
}

impl RateLimiter {
    pub fn new(cfg: &RateConfig) -> Self {
        let shards = (0..SHARD_COUNT)
            .map(|_| Mutex::new(HashMap::new()))
            .collect();
        Self {
            shards,
            window_seconds: cfg.window_seconds,
            budget: cfg.max_requests,
            retention_seconds: cfg.retention_seconds,
        }
    }

    pub fn window_seconds(&self) -> u64 {
        self.window_seconds
    }

    fn shard(&self, origin: &str) -> &Mutex<HashMap<String, WindowEntry>> {
        let mut hasher = DefaultHasher::new();
        origin.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % SHARD_COUNT]
    }

    pub fn admit(&self, origin: &str) -> Decision {
        self.admit_at(origin, current_ts())
    }

    /// Deterministic admission at an explicit timestamp. The lookup,
    /// window-reset and increment happen under one shard lock, so concurrent
    /// attempts from the same origin never lose updates.
    pub fn admit_at(&self, origin: &str, now: u64) -> Decision {
        let mut shard = self.shard(origin).lock();
        match shard.get_mut(origin) {
            Some(entry) if now < entry.reset_at => {
                entry.count = entry.count.saturating_add(1);
                if entry.count > self.budget {
                    Decision::Rejected
                } else {
                    Decision::Allowed
                }
            }
            _ => {
                shard.insert(
                    origin.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + self.window_seconds,
                    },
                );
                Decision::Allowed
            }
        }
    }

    /// Attempts recorded for `origin` in its current window, zero once the
    /// window has lapsed. Read-only; surfaces in the admin API.
    pub fn usage(&self, origin: &str) -> u32 {
        self.usage_at(origin, current_ts())
    }

    fn usage_at(&self, origin: &str, now: u64) -> u32 {
        self.shard(origin)
            .lock()
            .get(origin)
            .filter(|entry| now < entry.reset_at)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }

    /// Number of tracked origins across all shards, expired or not.
    pub fn tracked_origins(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    /// Drop entries whose window lapsed more than the retention interval
    /// ago. Without this, an origin that attempts once and never returns
    /// would pin its entry for the life of the process.
    pub fn sweep(&self) -> usize {
        self.sweep_at(current_ts())
    }

    pub fn sweep_at(&self, now: u64) -> usize {
        let mut removed = 0;
        for shard in &self.shards {
            let mut map = shard.lock();
            let before = map.len();
            map.retain(|_, entry| entry.reset_at + self.retention_seconds > now);
            removed += before - map.len();
        }
        removed
    }
}
