use parking_lot::RwLock;
use std::collections::HashSet;

/// Process-wide set of origins proven hostile by honeypot detection.
///
/// Membership is sticky for the life of the process: entries are written
/// exactly once by the honeypot subsystem and never removed. Lookups and
/// inserts are linearizable; an `is_member` following an `insert` for the
/// same origin observes membership from any thread.
#[derive(Debug, Default)]
pub struct ReputationStore {
    origins: RwLock<HashSet<String>>,
}

impl ReputationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent insert. Returns true when the origin was not yet known,
    /// so callers can log first detections exactly once.
    pub fn insert(&self, origin: &str) -> bool {
        self.origins.write().insert(origin.to_string())
    }

    pub fn is_member(&self, origin: &str) -> bool {
        self.origins.read().contains(origin)
    }

    pub fn len(&self) -> usize {
        self.origins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.read().is_empty()
    }

    /// Copy of the current membership, for the admin API.
    pub fn snapshot(&self) -> Vec<String> {
        let mut list: Vec<String> = self.origins.read().iter().cloned().collect();
        list.sort();
        list
    }
}
