use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clickhouse::Client;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use gala_application::commands::pricing_commands;
use gala_application::ops::TimerStreamHub;
use gala_application::{AppState, Metrics};
use gala_domain::ports::{
    ActivityRepository,
    AiGateway,
    AttendeeRepository,
    BudgetRepository,
    EventRepository,
    SettingsRepository,
    TaskRepository,
    TicketRepository,
    WalletRepository,
};
use gala_domain::{DbConfig, StorageBackend};
use gala_infrastructure::{
    AppConfig,
    ClickhouseActivityRepo,
    DefaultHealthService,
    EdgeFunctionGateway,
    MemoryStore,
    PostgrestStore,
    PricingFileRepository,
};

/// Repository handles for one storage backend.
struct Repositories {
    event: Arc<dyn EventRepository>,
    task: Arc<dyn TaskRepository>,
    attendee: Arc<dyn AttendeeRepository>,
    settings: Arc<dyn SettingsRepository>,
    ticket: Arc<dyn TicketRepository>,
    budget: Arc<dyn BudgetRepository>,
    wallet: Arc<dyn WalletRepository>,
    activity: Arc<dyn ActivityRepository>,
}

impl Repositories {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: EventRepository
            + TaskRepository
            + AttendeeRepository
            + SettingsRepository
            + TicketRepository
            + BudgetRepository
            + WalletRepository
            + ActivityRepository
            + 'static,
    {
        Self {
            event: store.clone(),
            task: store.clone(),
            attendee: store.clone(),
            settings: store.clone(),
            ticket: store.clone(),
            budget: store.clone(),
            wallet: store.clone(),
            activity: store,
        }
    }
}

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let db_config = config.to_db_config()?;

        let mut repos = match db_config.storage {
            StorageBackend::Memory => {
                warn!("using in-memory storage; data is lost on restart");
                Repositories::from_store(Arc::new(MemoryStore::new()))
            }
            StorageBackend::Postgrest => {
                let url = db_config
                    .postgrest_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("postgrest_url is required"))?;
                let key = db_config
                    .postgrest_api_key
                    .as_deref()
                    .ok_or_else(|| anyhow!("postgrest_api_key is required"))?;
                info!(url = %url, "using postgrest storage");
                Repositories::from_store(Arc::new(PostgrestStore::new(
                    url,
                    key,
                    runtime_config.request_timeout_seconds,
                )?))
            }
        };

        if let Some(activity) = clickhouse_activity(&db_config).await? {
            repos.activity = activity;
        }

        let ai_gateway: Arc<dyn AiGateway> = Arc::new(EdgeFunctionGateway::new(
            runtime_config.functions_base_url.clone(),
            runtime_config.functions_api_key.clone(),
            runtime_config.request_timeout_seconds,
        )?);
        if runtime_config.functions_base_url.is_none() {
            warn!("functions_base_url is not set; AI features will fail");
        }

        let state = AppState {
            config: runtime_config,
            event_repo: repos.event.clone(),
            task_repo: repos.task,
            attendee_repo: repos.attendee,
            settings_repo: repos.settings,
            ticket_repo: repos.ticket,
            budget_repo: repos.budget,
            wallet_repo: repos.wallet,
            activity_repo: repos.activity,
            pricing_repo: Arc::new(PricingFileRepository::new()),
            ai_gateway: ai_gateway.clone(),
            health: Arc::new(DefaultHealthService::new(repos.event, ai_gateway)),
            pricing: Arc::new(RwLock::new(HashMap::new())),
            timer_hub: Arc::new(TimerStreamHub::default()),
            metrics: Arc::new(Metrics::default()),
            board_lock: Arc::new(Mutex::new(())),
            ticket_lock: Arc::new(Mutex::new(())),
            wallet_lock: Arc::new(Mutex::new(())),
        };

        if let Err(err) = pricing_commands::reload_pricing(&state).await {
            warn!(path = %state.config.pricing_path, "pricing file unreadable, using default prices: {}", err);
        }

        Ok(Self { state })
    }
}

async fn clickhouse_activity(db_config: &DbConfig) -> Result<Option<Arc<dyn ActivityRepository>>> {
    let Some(url) = &db_config.clickhouse_url else {
        return Ok(None);
    };
    let mut clickhouse = Client::default()
        .with_url(url)
        .with_database(&db_config.clickhouse_database);
    if let Some(user) = &db_config.clickhouse_user {
        clickhouse = clickhouse.with_user(user);
    }
    if let Some(password) = &db_config.clickhouse_password {
        clickhouse = clickhouse.with_password(password);
    }

    let repo = ClickhouseActivityRepo::new(clickhouse, db_config.clickhouse_database.clone());
    repo.ensure_schema().await?;
    info!(url = %url, database = %db_config.clickhouse_database, "activity log stored in clickhouse");
    Ok(Some(Arc::new(repo)))
}
