use std::str::FromStr;

use anyhow::anyhow;
use serde_json::{json, Map, Value};
use tracing::{error, info};

use crate::activity;
use crate::commands::{budget_commands, task_commands};
use crate::queries::{event_queries, pricing_queries, wallet_queries};
use crate::{AppError, AppState};
use gala_domain::{
    ActivityKind,
    ActivityRecord,
    AiFeature,
    DomainError,
    Event,
    EventId,
    GenerationResult,
    NewBudgetLine,
    NewTask,
    Priority,
    Wallet,
};

/// Runs one AI feature for the event owner. The price is reserved before the
/// edge function is called and refunded when the call or the import fails, so
/// a balance is only charged for successful generations.
///
/// The reserve, invoke and settle steps run on their own task. Dropping the
/// returned future (a request timeout, a closed connection) leaves that task
/// running, so a reservation is always either kept or refunded.
pub async fn generate(
    state: &AppState,
    event_id: EventId,
    feature: &str,
    body: Value,
) -> Result<GenerationResult, AppError> {
    let feature = AiFeature::from_str(feature)?;
    let event = event_queries::get_event(state, event_id).await?;
    let state = state.clone();
    tokio::spawn(async move { run_generation(&state, event, feature, body).await })
        .await
        .map_err(|err| AppError::Internal(anyhow!("generation task aborted: {}", err)))?
}

async fn run_generation(
    state: &AppState,
    event: Event,
    feature: AiFeature,
    body: Value,
) -> Result<GenerationResult, AppError> {
    let event_id = event.id;
    let cost = pricing_queries::feature_cost(state, feature).await;

    let reserved = adjust_balance(state, &event, |wallet| {
        wallet.debit(cost).map_err(|err| match err {
            DomainError::Conflict(msg) => AppError::PaymentRequired(msg),
            other => AppError::from(other),
        })
    })
    .await?;

    let request = with_event_context(body, &event);
    let data = match state.ai_gateway.invoke(feature, &request).await {
        Ok(data) => data,
        Err(err) => {
            state.metrics.record_ai_error();
            error!(event_id = %event_id, feature = %feature, "edge function failed: {}", err);
            refund(state, &event, cost).await?;
            return Err(AppError::Upstream(format!("{} failed: {}", feature, err)));
        }
    };

    let (imported_tasks, imported_budget_lines) = match import_results(state, event_id, feature, &data).await {
        Ok(counts) => counts,
        Err(err) => {
            error!(event_id = %event_id, feature = %feature, "importing generated items failed: {}", err);
            refund(state, &event, cost).await?;
            return Err(err);
        }
    };
    state.metrics.record_ai_request(cost);

    info!(
        event_id = %event_id,
        feature = %feature,
        cost,
        imported_tasks,
        imported_budget_lines,
        "generation completed"
    );
    activity::record_one(
        state,
        ActivityRecord::new(event_id, ActivityKind::AiGenerated, feature, format!("cost {}", cost)),
    )
    .await;

    Ok(GenerationResult {
        feature,
        cost,
        balance: reserved.balance,
        imported_tasks,
        imported_budget_lines,
        data,
    })
}

async fn import_results(
    state: &AppState,
    event_id: EventId,
    feature: AiFeature,
    data: &Value,
) -> Result<(usize, usize), AppError> {
    let mut imported_tasks = 0;
    let mut imported_budget_lines = 0;
    if feature.imports_tasks() {
        let tasks = extract_tasks(data);
        if !tasks.is_empty() {
            imported_tasks = task_commands::import_tasks(state, event_id, tasks).await?.len();
        }
    }
    if feature == AiFeature::GenerateEventPlan {
        let lines = extract_budget(data);
        if !lines.is_empty() {
            imported_budget_lines = budget_commands::import_budget_lines(state, event_id, lines)
                .await?
                .len();
        }
    }
    Ok((imported_tasks, imported_budget_lines))
}

async fn refund(state: &AppState, event: &Event, cost: u64) -> Result<Wallet, AppError> {
    adjust_balance(state, event, |wallet| {
        wallet.credit(cost);
        Ok(())
    })
    .await
}

async fn adjust_balance<F>(state: &AppState, event: &Event, change: F) -> Result<Wallet, AppError>
where
    F: FnOnce(&mut Wallet) -> Result<(), AppError>,
{
    let _guard = state.wallet_lock.lock().await;
    let mut wallet = wallet_queries::load_or_open(state, &event.owner_id).await?;
    change(&mut wallet)?;
    state.wallet_repo.save_wallet(&wallet).await?;
    Ok(wallet)
}

/// Adds an `event` object unless the caller already sent one.
fn with_event_context(body: Value, event: &Event) -> Value {
    let mut object = match body {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("input".to_string(), other);
            map
        }
    };
    object.entry("event").or_insert_with(|| {
        json!({
            "name": event.name,
            "eventType": event.event_type,
            "date": event.date,
            "time": event.time,
            "location": event.location,
            "budget": event.budget,
            "guestCount": event.guest_estimate,
        })
    });
    Value::Object(object)
}

fn extract_tasks(data: &Value) -> Vec<NewTask> {
    let Some(items) = data.get("tasks").and_then(Value::as_array) else {
        return Vec::new();
    };
    items.iter().filter_map(task_entry).collect()
}

/// Accepts a full task object, a loosely shaped one, or a bare title.
fn task_entry(value: &Value) -> Option<NewTask> {
    if let Some(title) = value.as_str() {
        return Some(NewTask {
            title: title.to_string(),
            ..NewTask::default()
        });
    }
    if let Ok(task) = serde_json::from_value::<NewTask>(value.clone()) {
        if !task.title.trim().is_empty() {
            return Some(task);
        }
    }
    let title = ["title", "name", "task"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))?;
    Some(NewTask {
        title: title.to_string(),
        category: value
            .get("category")
            .and_then(Value::as_str)
            .map(str::to_string),
        priority: value.get("priority").and_then(Value::as_str).map(Priority::from),
        ..NewTask::default()
    })
}

/// `budget` is either a list of lines or an object holding one under
/// `breakdown` or `items`.
fn extract_budget(data: &Value) -> Vec<NewBudgetLine> {
    let Some(budget) = data.get("budget") else {
        return Vec::new();
    };
    let items = budget.as_array().or_else(|| {
        ["breakdown", "items"]
            .iter()
            .find_map(|key| budget.get(*key).and_then(Value::as_array))
    });
    items
        .map(|items| items.iter().filter_map(budget_entry).collect())
        .unwrap_or_default()
}

fn budget_entry(value: &Value) -> Option<NewBudgetLine> {
    let category = ["category", "name", "item"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))?;
    let amount = ["amount", "cost", "estimatedCost", "estimated_cost"]
        .iter()
        .find_map(|key| value.get(*key).and_then(number_like))?;
    let label = ["label", "description"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string);
    Some(NewBudgetLine {
        category: category.to_string(),
        label,
        amount,
        paid: false,
    })
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse()
            .ok(),
        _ => None,
    }
}
