use serde::Deserialize;
use std::{fs, path::Path};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub admin_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 13050,
            admin_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub origin: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            origin: "http://127.0.0.1:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateConfig {
    pub window_seconds: u64,
    pub max_requests: u32,
    /// How often the background sweep runs, in seconds.
    pub purge_interval: u64,
    /// How long past `reset_at` an idle entry survives before the sweep
    /// removes it.
    pub retention_seconds: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            max_requests: 120,
            purge_interval: 300,
            retention_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Paths under this prefix are exempt from the signature rejection:
    /// documented API clients are expected there, and the rate limiter is
    /// the remaining control.
    pub api_prefix: String,
    /// The one path a UA-less client may request.
    pub health_path: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            health_path: "/health".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReputationConfig {
    /// When true, origins already in the reputation store are rejected
    /// before they consume any rate budget.
    pub enforce: bool,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self { enforce: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignatureConfig {
    /// Extra automation patterns appended after the built-in table. The
    /// built-in order is fixed so additions can never reorder precedence.
    pub extra: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    pub paths: Vec<String>,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                "/backdoor".to_string(),
                "/wp-admin.php".to_string(),
                "/.hidden/login".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub target: TargetConfig,
    pub rate: RateConfig,
    pub gateway: GatewayConfig,
    pub reputation: ReputationConfig,
    pub signatures: SignatureConfig,
    pub traps: TrapConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str::<Config>(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_baseline() {
        let cfg = Config::default();
        assert_eq!(cfg.rate.window_seconds, 60);
        assert_eq!(cfg.rate.max_requests, 120);
        assert_eq!(cfg.gateway.api_prefix, "/api");
        assert_eq!(cfg.gateway.health_path, "/health");
        assert!(cfg.reputation.enforce);
        assert!(!cfg.traps.paths.is_empty());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [rate]
            max_requests = 10

            [traps]
            paths = ["/t1"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.rate.max_requests, 10);
        assert_eq!(cfg.rate.window_seconds, 60);
        assert_eq!(cfg.traps.paths, vec!["/t1".to_string()]);
        assert_eq!(cfg.server.port, 13050);
    }
}
