use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use tradefolio_core::settings::EngineSettings;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub engine: EngineSettings,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("TF_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid TF_LISTEN_ADDR")?;
        let cors_allow = std::env::var("TF_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("TF_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let mut engine = EngineSettings::default();
        if let Ok(tz) = std::env::var("TF_VALUATION_TZ") {
            engine.valuation_timezone = tz;
        }
        if let Ok(raw) = std::env::var("TF_XIRR_MAX_ITERATIONS") {
            engine.xirr_max_iterations = raw
                .parse()
                .context("Invalid TF_XIRR_MAX_ITERATIONS")?;
        }
        if let Ok(raw) = std::env::var("TF_XIRR_TOLERANCE") {
            engine.xirr_tolerance = raw.parse().context("Invalid TF_XIRR_TOLERANCE")?;
        }
        engine.validate()?;

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            engine,
        })
    }
}
