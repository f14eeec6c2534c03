use std::collections::HashMap;

use async_trait::async_trait;

use crate::entities::{
    ActivityRecord,
    Attendee,
    AttendeeGroup,
    BudgetLine,
    Event,
    PositionChange,
    SeatmapConfig,
    Task,
    Ticket,
    TicketConfig,
    TimerSettings,
    Wallet,
};
use crate::value_objects::{AiFeature, AttendeeId, EventId, GroupId, TaskId, TicketId, UserId};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert_event(&self, event: &Event) -> anyhow::Result<()>;
    async fn update_event(&self, event: &Event) -> anyhow::Result<()>;
    /// Returns false when no row matched.
    async fn delete_event(&self, id: EventId) -> anyhow::Result<bool>;
    async fn fetch_event(&self, id: EventId) -> anyhow::Result<Option<Event>>;
    async fn fetch_event_by_invite_code(&self, code: &str) -> anyhow::Result<Option<Event>>;
    async fn list_events(&self, owner: &UserId) -> anyhow::Result<Vec<Event>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn insert_tasks(&self, tasks: &[Task]) -> anyhow::Result<()>;
    async fn update_task(&self, task: &Task) -> anyhow::Result<()>;
    async fn delete_task(&self, id: TaskId) -> anyhow::Result<bool>;
    async fn fetch_task(&self, id: TaskId) -> anyhow::Result<Option<Task>>;
    async fn list_tasks(&self, event_id: EventId) -> anyhow::Result<Vec<Task>>;
    async fn update_positions(&self, changes: &[PositionChange]) -> anyhow::Result<()>;
}

#[async_trait]
pub trait AttendeeRepository: Send + Sync {
    async fn insert_group(&self, group: &AttendeeGroup) -> anyhow::Result<()>;
    async fn fetch_group(&self, id: GroupId) -> anyhow::Result<Option<AttendeeGroup>>;
    async fn list_groups(&self, event_id: EventId) -> anyhow::Result<Vec<AttendeeGroup>>;
    async fn insert_attendee(&self, attendee: &Attendee) -> anyhow::Result<()>;
    async fn update_attendee(&self, attendee: &Attendee) -> anyhow::Result<()>;
    async fn fetch_attendee(&self, id: AttendeeId) -> anyhow::Result<Option<Attendee>>;
    async fn list_attendees(&self, event_id: EventId) -> anyhow::Result<Vec<Attendee>>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn load_timer_settings(&self, event_id: EventId) -> anyhow::Result<Option<TimerSettings>>;
    async fn save_timer_settings(&self, settings: &TimerSettings) -> anyhow::Result<()>;

    async fn load_ticket_config(&self, event_id: EventId) -> anyhow::Result<Option<TicketConfig>>;
    async fn save_ticket_config(&self, config: &TicketConfig) -> anyhow::Result<()>;

    async fn load_seatmap_config(&self, event_id: EventId) -> anyhow::Result<Option<SeatmapConfig>>;
    async fn save_seatmap_config(&self, config: &SeatmapConfig) -> anyhow::Result<()>;
}

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn insert_ticket(&self, ticket: &Ticket) -> anyhow::Result<()>;
    async fn update_ticket(&self, ticket: &Ticket) -> anyhow::Result<()>;
    async fn fetch_ticket(&self, id: TicketId) -> anyhow::Result<Option<Ticket>>;
    async fn list_tickets(&self, event_id: EventId) -> anyhow::Result<Vec<Ticket>>;
}

#[async_trait]
pub trait BudgetRepository: Send + Sync {
    async fn insert_budget_lines(&self, lines: &[BudgetLine]) -> anyhow::Result<()>;
    async fn list_budget_lines(&self, event_id: EventId) -> anyhow::Result<Vec<BudgetLine>>;
}

#[async_trait]
pub trait WalletRepository: Send + Sync {
    async fn load_wallet(&self, user_id: &UserId) -> anyhow::Result<Option<Wallet>>;
    async fn save_wallet(&self, wallet: &Wallet) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn insert_activity(&self, records: &[ActivityRecord]) -> anyhow::Result<()>;
    async fn fetch_activity(&self, event_id: EventId, limit: usize) -> anyhow::Result<Vec<ActivityRecord>>;
}

#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn load_pricing(&self, path: &str) -> anyhow::Result<HashMap<AiFeature, u64>>;
    async fn save_pricing(&self, path: &str, prices: &HashMap<AiFeature, u64>) -> anyhow::Result<()>;
}
