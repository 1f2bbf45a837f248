use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradebook_core::{
    integrity::{IntegrityResult, IntegrityService, IntegrityServiceTrait},
    seed::SeedDataService,
    utils::time_utils::{Clock, SystemClock},
    HoldingsService, HoldingsServiceTrait, TradeRepositoryTrait, TradeService, TradeServiceTrait,
    TradeValidator,
};
use tradebook_storage_sqlite::{db, TradeRepository};

use crate::config::Config;

pub struct AppState {
    pub trade_service: Arc<dyn TradeServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub integrity_service: Arc<dyn IntegrityServiceTrait>,
    pub seed_service: Arc<SeedDataService>,
    pub db_path: String,
}

/// What the boot-time integrity pass did.
#[derive(Debug)]
pub struct StartupReport {
    pub integrity: IntegrityResult,
    pub repaired: bool,
    pub seeded: usize,
}

pub fn init_tracing() {
    let log_format = std::env::var("TB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
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
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let trade_repository: Arc<dyn TradeRepositoryTrait> =
        Arc::new(TradeRepository::new(pool.clone(), writer.clone()));

    let holdings_service: Arc<dyn HoldingsServiceTrait> = Arc::new(HoldingsService::new(
        trade_repository.clone(),
        clock.clone(),
    ));
    let trade_validator = Arc::new(TradeValidator::new(
        trade_repository.clone(),
        holdings_service.clone(),
        clock.clone(),
    ));
    let trade_service: Arc<dyn TradeServiceTrait> = Arc::new(TradeService::new(
        trade_repository.clone(),
        trade_validator,
        clock.clone(),
    ));
    let integrity_service: Arc<dyn IntegrityServiceTrait> = Arc::new(IntegrityService::new(
        trade_repository.clone(),
        clock.clone(),
    ));
    let seed_service = Arc::new(SeedDataService::new(trade_repository, clock));

    Ok(Arc::new(AppState {
        trade_service,
        holdings_service,
        integrity_service,
        seed_service,
        db_path,
    }))
}

/// Audits the ledger, repairs it when allowed, then seeds it when enabled.
pub async fn run_startup_routine(state: &AppState, config: &Config) -> StartupReport {
    let integrity = state.integrity_service.check_integrity();

    let mut repaired = false;
    if !integrity.is_healthy && integrity.corrupted_trades > 0 {
        if config.auto_repair {
            tracing::warn!(
                "Startup integrity check found {} corruption issues; repairing",
                integrity.corrupted_trades
            );
            repaired = state.integrity_service.repair_data_corruption().await;
            if !repaired {
                tracing::error!("Automatic repair of corrupted trades failed");
            }
        } else {
            tracing::warn!("Corrupted trades found but TB_AUTO_REPAIR is disabled");
        }
    }

    let mut seeded = 0;
    if config.seed_data {
        match state.seed_service.seed_data().await {
            Ok(count) => seeded = count,
            Err(e) => tracing::error!("Failed to seed demo ledger: {}", e),
        }
    }

    StartupReport {
        integrity,
        repaired,
        seeded,
    }
}
