use async_trait::async_trait;
use serde_json::Value;

use crate::value_objects::AiFeature;

/// Named serverless functions proxying the AI model.
#[async_trait]
pub trait AiGateway: Send + Sync {
    async fn invoke(&self, feature: AiFeature, body: &Value) -> anyhow::Result<Value>;
    async fn check_target(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_storage(&self) -> anyhow::Result<bool>;
    async fn check_ai_gateway(&self) -> anyhow::Result<bool>;
}
