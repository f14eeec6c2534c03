use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use gala_domain::ports::AiGateway;
use gala_domain::AiFeature;

use crate::utils::join_url;

/// Calls the named serverless functions that front the AI model.
pub struct EdgeFunctionGateway {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
}

impl EdgeFunctionGateway {
    pub fn new(base_url: Option<String>, api_key: Option<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.filter(|url| !url.trim().is_empty()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    fn function_url(&self, name: &str) -> Result<String> {
        match &self.base_url {
            Some(base) => Ok(join_url(base, name)),
            None => bail!("functions_base_url not configured"),
        }
    }

    fn with_key(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key).header("apikey", key),
            None => request,
        }
    }
}

#[async_trait]
impl AiGateway for EdgeFunctionGateway {
    async fn invoke(&self, feature: AiFeature, body: &Value) -> Result<Value> {
        let url = self.function_url(feature.as_str())?;
        debug!(feature = feature.as_str(), "invoking edge function");
        let response = self
            .with_key(self.client.post(url))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let payload = response.json::<Value>().await?;
        if let Some(message) = payload.get("error").and_then(Value::as_str) {
            bail!("{} failed: {}", feature, message);
        }
        Ok(payload)
    }

    /// Any HTTP answer from the functions host counts as reachable.
    async fn check_target(&self) -> Result<()> {
        let url = self.function_url("")?;
        self.with_key(self.client.get(url)).send().await?;
        Ok(())
    }
}
