use std::sync::Arc;

use async_trait::async_trait;
use gala_domain::ports::{AiGateway, EventRepository, HealthCheckService};

pub struct DefaultHealthService {
    event_repo: Arc<dyn EventRepository>,
    ai_gateway: Arc<dyn AiGateway>,
}

impl DefaultHealthService {
    pub fn new(event_repo: Arc<dyn EventRepository>, ai_gateway: Arc<dyn AiGateway>) -> Self {
        Self {
            event_repo,
            ai_gateway,
        }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_storage(&self) -> anyhow::Result<bool> {
        self.event_repo.ping().await.map(|_| true)
    }

    async fn check_ai_gateway(&self) -> anyhow::Result<bool> {
        self.ai_gateway.check_target().await.map(|_| true)
    }
}
