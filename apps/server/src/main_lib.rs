use std::sync::{Arc, RwLock};

use chrono::NaiveDate;
use tokio::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradefolio_core::{
    records::RecordSet, settings::EngineSettings, PortfolioEngine, RecomputeWorker,
};

use crate::config::Config;

pub struct AppState {
    /// Single owner of the authoritative record list. Holding the lock serializes mutations.
    pub engine: Mutex<PortfolioEngine>,
    /// Offloads stateless recomputes to the blocking pool.
    pub worker: RecomputeWorker,
    /// Copy of the engine settings readable without waiting on the engine lock.
    pub settings: RwLock<EngineSettings>,
}

impl AppState {
    /// Valuation date used when a request does not name one.
    pub fn resolve_today(&self, requested: Option<NaiveDate>) -> anyhow::Result<NaiveDate> {
        match requested {
            Some(date) => Ok(date),
            None => Ok(self.current_settings()?.today()?),
        }
    }

    pub fn current_settings(&self) -> anyhow::Result<EngineSettings> {
        self.settings
            .read()
            .map(|settings| settings.clone())
            .map_err(|_| anyhow::anyhow!("settings lock poisoned"))
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("TF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let settings = config.engine.clone();
    let today = settings.today()?;
    tracing::info!(
        "Valuation timezone {} (today is {})",
        settings.valuation_timezone,
        today
    );

    let engine = PortfolioEngine::new(RecordSet::new(), settings.clone(), today)?;
    let worker = RecomputeWorker::spawn();

    Ok(Arc::new(AppState {
        engine: Mutex::new(engine),
        worker,
        settings: RwLock::new(settings),
    }))
}
