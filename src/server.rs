use std::{net::SocketAddr, sync::Arc};

use axum::{extract::FromRef, Router};
use tracing::info;

use crate::{
    authentication::services::{AdminService, CounterService, SessionService},
    clock::{DynClock, SystemClock},
    cors,
    dashboard::services::DashboardService,
    ledger::services::LedgerService,
    repos::DynDashboardRepo,
    storage::{DynStore, MemoryStore, RecordStore, RedisStore},
};

/// Prefix applied to every key written to Redis.
pub const REDIS_KEY_PREFIX: &str = "bottledesk";

pub struct Options {
    pub address: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub redis_url: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    admin_service: AdminService,
    counter_service: CounterService,
    dashboard_service: DashboardService,
    ledger_service: LedgerService,
    session_service: SessionService,
}

impl AppState {
    pub fn new(store: DynStore, clock: DynClock) -> Self {
        let records = RecordStore::new(store);
        let dashboard_repo: DynDashboardRepo = Arc::new(records.clone());

        Self {
            admin_service: AdminService::new(records.clone(), clock.clone()),
            counter_service: CounterService::new(records.clone(), clock.clone()),
            dashboard_service: DashboardService::new(dashboard_repo.clone(), clock.clone()),
            ledger_service: LedgerService::new(dashboard_repo, clock.clone()),
            session_service: SessionService::new(records, clock),
        }
    }
}

/// Open the configured store. Without a Redis URL state only lives as long as
/// the process.
pub fn open_store(redis_url: Option<&str>) -> anyhow::Result<DynStore> {
    match redis_url {
        Some(url) => {
            info!("Using Redis storage.");

            Ok(Arc::new(RedisStore::new(url, REDIS_KEY_PREFIX)?))
        }
        None => {
            info!("No Redis URL provided. Using in-memory storage.");

            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

pub fn app(state: AppState, allowed_origins: &[String]) -> anyhow::Result<Router> {
    Ok(Router::new()
        .merge(crate::authentication::http::routes())
        .merge(crate::dashboard::http::routes())
        .merge(crate::ledger::http::routes())
        .with_state(state)
        .layer(cors::cors_layer(allowed_origins)?))
}

pub async fn serve(opts: Options) -> anyhow::Result<()> {
    let store = open_store(opts.redis_url.as_deref())?;
    let state = AppState::new(store, Arc::new(SystemClock));
    let app = app(state, &opts.allowed_origins)?;

    info!(address = %opts.address, "Starting server.");

    axum::Server::bind(&opts.address)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

impl FromRef<AppState> for AdminService {
    fn from_ref(state: &AppState) -> Self {
        state.admin_service.clone()
    }
}

impl FromRef<AppState> for CounterService {
    fn from_ref(state: &AppState) -> Self {
        state.counter_service.clone()
    }
}

impl FromRef<AppState> for DashboardService {
    fn from_ref(state: &AppState) -> Self {
        state.dashboard_service.clone()
    }
}

impl FromRef<AppState> for LedgerService {
    fn from_ref(state: &AppState) -> Self {
        state.ledger_service.clone()
    }
}

impl FromRef<AppState> for SessionService {
    fn from_ref(state: &AppState) -> Self {
        state.session_service.clone()
    }
}
