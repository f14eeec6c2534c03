//! Table-scoped access to a hosted PostgREST endpoint (`/rest/v1/<table>`).
//!
//! Every request carries the project key both as `apikey` and as a bearer
//! token. There are no transactions: multi-row rewrites are issued row by row.

use std::fmt::Display;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use gala_domain::ports::{
    ActivityRepository,
    AttendeeRepository,
    BudgetRepository,
    EventRepository,
    SettingsRepository,
    TaskRepository,
    TicketRepository,
    WalletRepository,
};
use gala_domain::{
    ActivityRecord,
    Attendee,
    AttendeeGroup,
    AttendeeId,
    BudgetLine,
    Event,
    EventId,
    GroupId,
    PositionChange,
    SeatmapConfig,
    Task,
    TaskId,
    Ticket,
    TicketConfig,
    TicketId,
    TimerSettings,
    UserId,
    Wallet,
};

use crate::utils::join_url;

const EVENTS: &str = "events";
const TASKS: &str = "tasks";
const GROUPS: &str = "attendee_groups";
const ATTENDEES: &str = "attendees";
const TIMER_SETTINGS: &str = "timer_settings";
const TICKET_CONFIGS: &str = "ticket_configs";
const SEATMAP_CONFIGS: &str = "seatmap_configs";
const TICKETS: &str = "tickets";
const BUDGET_LINES: &str = "budget_lines";
const WALLETS: &str = "wallets";
const ACTIVITY: &str = "activity_log";

/// Tables holding rows keyed by `event_id`, deleted before the event row.
const EVENT_CHILD_TABLES: [&str; 8] = [
    TASKS,
    ATTENDEES,
    GROUPS,
    TIMER_SETTINGS,
    TICKET_CONFIGS,
    SEATMAP_CONFIGS,
    TICKETS,
    BUDGET_LINES,
];

#[derive(Debug, Error)]
pub enum PostgrestError {
    #[error("{method} {table} responded {status}: {body}")]
    Status {
        method: Method,
        table: String,
        status: u16,
        body: String,
    },
    #[error("{table}: no row matched {filter}")]
    NoMatch { table: String, filter: String },
}

pub type PostgrestFilter = (&'static str, String);

fn eq(value: impl Display) -> String {
    format!("eq.{}", value)
}

#[derive(Clone)]
pub struct PostgrestStore {
    client: Client,
    base_url: String,
}

impl PostgrestStore {
    pub fn new(base_url: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(api_key)?);
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", api_key))?);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_seconds.max(3)))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim().to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        join_url(&self.base_url, &format!("rest/v1/{}", table))
    }

    fn request(&self, method: Method, table: &str, filters: &[PostgrestFilter]) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .query(filters)
    }

    async fn check(method: Method, table: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(PostgrestError::Status {
            method,
            table: table.to_string(),
            status: status.as_u16(),
            body,
        }
        .into())
    }

    pub async fn select<T: DeserializeOwned>(&self, table: &str, filters: &[PostgrestFilter]) -> Result<Vec<T>> {
        let mut query = filters.to_vec();
        query.push(("select", "*".to_string()));
        let response = self.request(Method::GET, table, &query).send().await?;
        let rows = Self::check(Method::GET, table, response).await?.json().await?;
        Ok(rows)
    }

    pub async fn select_one<T: DeserializeOwned>(&self, table: &str, filters: &[PostgrestFilter]) -> Result<Option<T>> {
        let mut query = filters.to_vec();
        query.push(("limit", "1".to_string()));
        Ok(self.select(table, &query).await?.into_iter().next())
    }

    pub async fn insert<T: Serialize + Sync>(&self, table: &str, rows: &[T]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let response = self
            .request(Method::POST, table, &[])
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;
        Self::check(Method::POST, table, response).await?;
        debug!(table, rows = rows.len(), "postgrest insert");
        Ok(())
    }

    /// Insert-or-replace on the table's primary key.
    pub async fn upsert<T: Serialize + Sync>(&self, table: &str, row: &T, on_conflict: &'static str) -> Result<()> {
        let response = self
            .request(Method::POST, table, &[("on_conflict", on_conflict.to_string())])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row])
            .send()
            .await?;
        Self::check(Method::POST, table, response).await?;
        Ok(())
    }

    /// Returns the number of rows changed.
    pub async fn update<T: Serialize + Sync>(&self, table: &str, filters: &[PostgrestFilter], body: &T) -> Result<usize> {
        let response = self
            .request(Method::PATCH, table, filters)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(Method::PATCH, table, response).await?.json().await?;
        Ok(rows.len())
    }

    pub async fn update_one<T: Serialize + Sync>(&self, table: &str, filters: &[PostgrestFilter], body: &T) -> Result<()> {
        if self.update(table, filters, body).await? == 0 {
            return Err(PostgrestError::NoMatch {
                table: table.to_string(),
                filter: describe(filters),
            }
            .into());
        }
        Ok(())
    }

    /// Returns the number of rows deleted.
    pub async fn delete(&self, table: &str, filters: &[PostgrestFilter]) -> Result<usize> {
        let response = self
            .request(Method::DELETE, table, filters)
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(Method::DELETE, table, response).await?.json().await?;
        Ok(rows.len())
    }
}

fn describe(filters: &[PostgrestFilter]) -> String {
    filters
        .iter()
        .map(|(column, value)| format!("{}={}", column, value))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl EventRepository for PostgrestStore {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        self.insert(EVENTS, std::slice::from_ref(event)).await
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.update_one(EVENTS, &[("id", eq(event.id))], event).await
    }

    async fn delete_event(&self, id: EventId) -> Result<bool> {
        for table in EVENT_CHILD_TABLES {
            self.delete(table, &[("event_id", eq(id))]).await?;
        }
        Ok(self.delete(EVENTS, &[("id", eq(id))]).await? > 0)
    }

    async fn fetch_event(&self, id: EventId) -> Result<Option<Event>> {
        self.select_one(EVENTS, &[("id", eq(id))]).await
    }

    async fn fetch_event_by_invite_code(&self, code: &str) -> Result<Option<Event>> {
        self.select_one(EVENTS, &[("invite_code", eq(code))]).await
    }

    async fn list_events(&self, owner: &UserId) -> Result<Vec<Event>> {
        self.select(EVENTS, &[("owner_id", eq(owner))]).await
    }

    async fn ping(&self) -> Result<()> {
        let response = self
            .request(Method::GET, EVENTS, &[("select", "id".to_string()), ("limit", "1".to_string())])
            .send()
            .await?;
        Self::check(Method::GET, EVENTS, response).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for PostgrestStore {
    async fn insert_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.insert(TASKS, tasks).await
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        self.update_one(TASKS, &[("id", eq(task.id))], task).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool> {
        Ok(self.delete(TASKS, &[("id", eq(id))]).await? > 0)
    }

    async fn fetch_task(&self, id: TaskId) -> Result<Option<Task>> {
        self.select_one(TASKS, &[("id", eq(id))]).await
    }

    async fn list_tasks(&self, event_id: EventId) -> Result<Vec<Task>> {
        self.select(TASKS, &[("event_id", eq(event_id))]).await
    }

    async fn update_positions(&self, changes: &[PositionChange]) -> Result<()> {
        for change in changes {
            let body = json!({ "status": change.status, "position": change.position });
            self.update_one(TASKS, &[("id", eq(change.task_id))], &body).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AttendeeRepository for PostgrestStore {
    async fn insert_group(&self, group: &AttendeeGroup) -> Result<()> {
        self.insert(GROUPS, std::slice::from_ref(group)).await
    }

    async fn fetch_group(&self, id: GroupId) -> Result<Option<AttendeeGroup>> {
        self.select_one(GROUPS, &[("id", eq(id))]).await
    }

    async fn list_groups(&self, event_id: EventId) -> Result<Vec<AttendeeGroup>> {
        self.select(GROUPS, &[("event_id", eq(event_id)), ("order", "name.asc".to_string())])
            .await
    }

    async fn insert_attendee(&self, attendee: &Attendee) -> Result<()> {
        self.insert(ATTENDEES, std::slice::from_ref(attendee)).await
    }

    async fn update_attendee(&self, attendee: &Attendee) -> Result<()> {
        self.update_one(ATTENDEES, &[("id", eq(attendee.id))], attendee).await
    }

    async fn fetch_attendee(&self, id: AttendeeId) -> Result<Option<Attendee>> {
        self.select_one(ATTENDEES, &[("id", eq(id))]).await
    }

    async fn list_attendees(&self, event_id: EventId) -> Result<Vec<Attendee>> {
        self.select(ATTENDEES, &[("event_id", eq(event_id))]).await
    }
}

#[async_trait]
impl SettingsRepository for PostgrestStore {
    async fn load_timer_settings(&self, event_id: EventId) -> Result<Option<TimerSettings>> {
        self.select_one(TIMER_SETTINGS, &[("event_id", eq(event_id))]).await
    }

    async fn save_timer_settings(&self, settings: &TimerSettings) -> Result<()> {
        self.upsert(TIMER_SETTINGS, settings, "event_id").await
    }

    async fn load_ticket_config(&self, event_id: EventId) -> Result<Option<TicketConfig>> {
        self.select_one(TICKET_CONFIGS, &[("event_id", eq(event_id))]).await
    }

    async fn save_ticket_config(&self, config: &TicketConfig) -> Result<()> {
        self.upsert(TICKET_CONFIGS, config, "event_id").await
    }

    async fn load_seatmap_config(&self, event_id: EventId) -> Result<Option<SeatmapConfig>> {
        self.select_one(SEATMAP_CONFIGS, &[("event_id", eq(event_id))]).await
    }

    async fn save_seatmap_config(&self, config: &SeatmapConfig) -> Result<()> {
        self.upsert(SEATMAP_CONFIGS, config, "event_id").await
    }
}

#[async_trait]
impl TicketRepository for PostgrestStore {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.insert(TICKETS, std::slice::from_ref(ticket)).await
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.update_one(TICKETS, &[("id", eq(ticket.id))], ticket).await
    }

    async fn fetch_ticket(&self, id: TicketId) -> Result<Option<Ticket>> {
        self.select_one(TICKETS, &[("id", eq(id))]).await
    }

    async fn list_tickets(&self, event_id: EventId) -> Result<Vec<Ticket>> {
        self.select(TICKETS, &[("event_id", eq(event_id))]).await
    }
}

#[async_trait]
impl BudgetRepository for PostgrestStore {
    async fn insert_budget_lines(&self, lines: &[BudgetLine]) -> Result<()> {
        self.insert(BUDGET_LINES, lines).await
    }

    async fn list_budget_lines(&self, event_id: EventId) -> Result<Vec<BudgetLine>> {
        self.select(BUDGET_LINES, &[("event_id", eq(event_id))]).await
    }
}

#[async_trait]
impl WalletRepository for PostgrestStore {
    async fn load_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>> {
        self.select_one(WALLETS, &[("user_id", eq(user_id))]).await
    }

    async fn save_wallet(&self, wallet: &Wallet) -> Result<()> {
        self.upsert(WALLETS, wallet, "user_id").await
    }
}

#[async_trait]
impl ActivityRepository for PostgrestStore {
    async fn insert_activity(&self, records: &[ActivityRecord]) -> Result<()> {
        self.insert(ACTIVITY, records).await
    }

    async fn fetch_activity(&self, event_id: EventId, limit: usize) -> Result<Vec<ActivityRecord>> {
        self.select(
            ACTIVITY,
            &[
                ("event_id", eq(event_id)),
                ("order", "event_time.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}
