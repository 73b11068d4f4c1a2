use std::time::Duration;

use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use garita::config::Config;
use garita::{build_app, AppState};

const CONFIG_PATH: &str = "config.toml";

/// Sweep long-expired rate-window entries so one-shot origins do not pin
/// memory for the life of the process.
async fn reap_rate_entries_periodically(state: AppState) {
    let interval = Duration::from_secs(state.config.rate.purge_interval);
    loop {
        tokio::time::sleep(interval).await;
        let removed = state.limiter.sweep();
        if removed > 0 {
            debug!(removed, "swept expired rate-window entries");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match Config::load(CONFIG_PATH) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!(error = %e, "could not load {CONFIG_PATH}, using built-in defaults");
            Config::default()
        }
    };

    let port = config.server.port;
    if config.server.admin_token.is_empty() {
        warn!("server.admin_token is empty; admin API is disabled");
    }

    let state = AppState::new(config);
    tokio::spawn(reap_rate_entries_periodically(state.clone()));

    let app = build_app(state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
