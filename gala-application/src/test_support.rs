use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use gala_domain::ports::AiGateway;
use gala_domain::{AiFeature, Event, NewEvent, RuntimeConfig, UserId};
use gala_infrastructure::{DefaultHealthService, MemoryStore};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::commands::event_commands;
use crate::ops::TimerStreamHub;
use crate::{AppState, Metrics};

pub(crate) const OWNER: &str = "user-1";
pub(crate) const STARTING_BALLOONS: u64 = 20;

/// Gateway double answering every feature with one canned response.
pub(crate) struct StubGateway {
    response: Option<Value>,
    calls: AtomicUsize,
}

impl StubGateway {
    pub(crate) fn ok(response: Value) -> Self {
        Self {
            response: Some(response),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            response: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AiGateway for StubGateway {
    async fn invoke(&self, feature: AiFeature, _body: &Value) -> anyhow::Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| anyhow!("{} responded 502", feature))
    }

    async fn check_target(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub(crate) fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        functions_base_url: None,
        functions_api_key: None,
        pricing_path: "pricing.yaml".to_string(),
        ticket_signing_secret: "test-secret".to_string(),
        starting_balloons: STARTING_BALLOONS,
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 5,
    }
}

pub(crate) fn build_state() -> AppState {
    build_state_with_gateway(Arc::new(StubGateway::ok(Value::Null)))
}

pub(crate) fn build_state_with_gateway(gateway: Arc<dyn AiGateway>) -> AppState {
    let store = Arc::new(MemoryStore::new());
    AppState {
        config: runtime_config(),
        event_repo: store.clone(),
        task_repo: store.clone(),
        attendee_repo: store.clone(),
        settings_repo: store.clone(),
        ticket_repo: store.clone(),
        budget_repo: store.clone(),
        wallet_repo: store.clone(),
        activity_repo: store.clone(),
        pricing_repo: store.clone(),
        ai_gateway: gateway.clone(),
        health: Arc::new(DefaultHealthService::new(store, gateway)),
        pricing: Arc::new(RwLock::new(HashMap::new())),
        timer_hub: Arc::new(TimerStreamHub::default()),
        metrics: Arc::new(Metrics::default()),
        board_lock: Arc::new(Mutex::new(())),
        ticket_lock: Arc::new(Mutex::new(())),
        wallet_lock: Arc::new(Mutex::new(())),
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) async fn seed_event(state: &AppState) -> Event {
    event_commands::create_event(
        state,
        NewEvent {
            owner_id: UserId(OWNER.to_string()),
            name: "Summer Gala".to_string(),
            event_type: "gala".to_string(),
            date: date(2030, 6, 1),
            time: None,
            location: Default::default(),
            budget: 1000.0,
            guest_estimate: 80,
            is_public: false,
        },
    )
    .await
    .expect("seed event")
}
