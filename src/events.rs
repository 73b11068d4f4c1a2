use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;

const CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    BlockedSourcemap,
    BlockedProbe,
    BlockedSignature,
    BlockedAbsent,
    BlockedReputation,
    RateLimited,
    HoneypotHit,
}

/// One gateway decision worth remembering, as shown by the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct GateEvent {
    pub ts: u64,
    pub origin: String,
    pub decision: Decision,
    pub path: String,
    pub detail: Option<String>,
}

/// Bounded ring of the most recent block/trap decisions. Allowed traffic is
/// not recorded; at volume it would drown everything of interest.
#[derive(Debug, Default)]
pub struct EventLog {
    inner: Mutex<VecDeque<GateEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: GateEvent) {
        let mut ring = self.inner.lock();
        if ring.len() == CAPACITY {
            ring.pop_front();
        }
        ring.push_back(event);
    }

    /// Most recent first.
    pub fn recent(&self) -> Vec<GateEvent> {
        self.inner.lock().iter().rev().cloned().collect()
    }
}
