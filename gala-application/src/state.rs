use std::collections::HashMap;
use std::sync::Arc;

use gala_domain::ports::{
    ActivityRepository,
    AiGateway,
    AttendeeRepository,
    BudgetRepository,
    EventRepository,
    HealthCheckService,
    PricingRepository,
    SettingsRepository,
    TaskRepository,
    TicketRepository,
    WalletRepository,
};
use gala_domain::{AiFeature, RuntimeConfig};
use tokio::sync::{Mutex, RwLock};

use crate::ops::TimerStreamHub;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_repo: Arc<dyn EventRepository>,
    pub task_repo: Arc<dyn TaskRepository>,
    pub attendee_repo: Arc<dyn AttendeeRepository>,
    pub settings_repo: Arc<dyn SettingsRepository>,
    pub ticket_repo: Arc<dyn TicketRepository>,
    pub budget_repo: Arc<dyn BudgetRepository>,
    pub wallet_repo: Arc<dyn WalletRepository>,
    pub activity_repo: Arc<dyn ActivityRepository>,
    pub pricing_repo: Arc<dyn PricingRepository>,
    pub ai_gateway: Arc<dyn AiGateway>,
    pub health: Arc<dyn HealthCheckService>,
    /// Feature prices loaded from the pricing file; missing features use defaults.
    pub pricing: Arc<RwLock<HashMap<AiFeature, u64>>>,
    pub timer_hub: Arc<TimerStreamHub>,
    pub metrics: Arc<Metrics>,
    /// Serializes position rewrites so concurrent moves cannot interleave.
    pub board_lock: Arc<Mutex<()>>,
    pub ticket_lock: Arc<Mutex<()>>,
    pub wallet_lock: Arc<Mutex<()>>,
}
