use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResp {
    pub uptime_seconds: u64,
    pub version: String,
}

#[derive(Serialize)]
pub struct MetricsResp {
    pub total: u64,
    pub allowed: u64,
    pub blocked: u64,
    pub allowed_pct: u32,
    pub rate_limited: u64,
    pub honeypot_hits: u64,
    pub tracked_origins: usize,
    pub reputation_size: usize,
}

#[derive(Serialize)]
pub struct ReputationResp {
    pub count: usize,
    pub origins: Vec<String>,
}

#[derive(Serialize)]
pub struct ConfigSnapshot {
    pub window_seconds: u64,
    pub max_requests: u32,
    pub api_prefix: String,
    pub health_path: String,
    pub enforce_reputation: bool,
    pub trap_paths: Vec<String>,
    pub signature_count: usize,
}
