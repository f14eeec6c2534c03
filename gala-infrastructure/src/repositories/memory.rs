use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use gala_domain::ports::{
    ActivityRepository,
    AttendeeRepository,
    BudgetRepository,
    EventRepository,
    PricingRepository,
    SettingsRepository,
    TaskRepository,
    TicketRepository,
    WalletRepository,
};
use gala_domain::{
    ActivityRecord,
    AiFeature,
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

/// Process-local storage behind every repository port. Used for
/// `storage = "memory"` and in tests.
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<HashMap<EventId, Event>>,
    tasks: RwLock<HashMap<TaskId, Task>>,
    groups: RwLock<HashMap<GroupId, AttendeeGroup>>,
    attendees: RwLock<HashMap<AttendeeId, Attendee>>,
    timer_settings: RwLock<HashMap<EventId, TimerSettings>>,
    ticket_configs: RwLock<HashMap<EventId, TicketConfig>>,
    seatmaps: RwLock<HashMap<EventId, SeatmapConfig>>,
    tickets: RwLock<HashMap<TicketId, Ticket>>,
    budget_lines: RwLock<Vec<BudgetLine>>,
    wallets: RwLock<HashMap<UserId, Wallet>>,
    activity: RwLock<Vec<ActivityRecord>>,
    pricing: RwLock<HashMap<String, HashMap<AiFeature, u64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        if events.contains_key(&event.id) {
            bail!("event {} already exists", event.id);
        }
        events.insert(event.id, event.clone());
        Ok(())
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let mut events = self.events.write().await;
        let Some(slot) = events.get_mut(&event.id) else {
            bail!("event {} not found", event.id);
        };
        *slot = event.clone();
        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> Result<bool> {
        if self.events.write().await.remove(&id).is_none() {
            return Ok(false);
        }
        self.tasks.write().await.retain(|_, task| task.event_id != id);
        self.groups.write().await.retain(|_, group| group.event_id != id);
        self.attendees
            .write()
            .await
            .retain(|_, attendee| attendee.event_id != id);
        self.timer_settings.write().await.remove(&id);
        self.ticket_configs.write().await.remove(&id);
        self.seatmaps.write().await.remove(&id);
        self.tickets.write().await.retain(|_, ticket| ticket.event_id != id);
        self.budget_lines.write().await.retain(|line| line.event_id != id);
        Ok(true)
    }

    async fn fetch_event(&self, id: EventId) -> Result<Option<Event>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn fetch_event_by_invite_code(&self, code: &str) -> Result<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.values().find(|event| event.invite_code == code).cloned())
    }

    async fn list_events(&self, owner: &UserId) -> Result<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .values()
            .filter(|event| &event.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn insert_tasks(&self, tasks: &[Task]) -> Result<()> {
        let mut stored = self.tasks.write().await;
        for task in tasks {
            stored.insert(task.id, task.clone());
        }
        Ok(())
    }

    async fn update_task(&self, task: &Task) -> Result<()> {
        let mut stored = self.tasks.write().await;
        let Some(slot) = stored.get_mut(&task.id) else {
            bail!("task {} not found", task.id);
        };
        *slot = task.clone();
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool> {
        Ok(self.tasks.write().await.remove(&id).is_some())
    }

    async fn fetch_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.read().await.get(&id).cloned())
    }

    async fn list_tasks(&self, event_id: EventId) -> Result<Vec<Task>> {
        let stored = self.tasks.read().await;
        Ok(stored
            .values()
            .filter(|task| task.event_id == event_id)
            .cloned()
            .collect())
    }

    async fn update_positions(&self, changes: &[PositionChange]) -> Result<()> {
        let mut stored = self.tasks.write().await;
        if let Some(missing) = changes.iter().find(|change| !stored.contains_key(&change.task_id)) {
            bail!("task {} not found", missing.task_id);
        }
        for change in changes {
            if let Some(task) = stored.get_mut(&change.task_id) {
                task.status = change.status;
                task.position = change.position;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AttendeeRepository for MemoryStore {
    async fn insert_group(&self, group: &AttendeeGroup) -> Result<()> {
        self.groups.write().await.insert(group.id, group.clone());
        Ok(())
    }

    async fn fetch_group(&self, id: GroupId) -> Result<Option<AttendeeGroup>> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn list_groups(&self, event_id: EventId) -> Result<Vec<AttendeeGroup>> {
        let groups = self.groups.read().await;
        let mut out: Vec<AttendeeGroup> = groups
            .values()
            .filter(|group| group.event_id == event_id)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn insert_attendee(&self, attendee: &Attendee) -> Result<()> {
        self.attendees.write().await.insert(attendee.id, attendee.clone());
        Ok(())
    }

    async fn update_attendee(&self, attendee: &Attendee) -> Result<()> {
        let mut attendees = self.attendees.write().await;
        let Some(slot) = attendees.get_mut(&attendee.id) else {
            bail!("attendee {} not found", attendee.id);
        };
        *slot = attendee.clone();
        Ok(())
    }

    async fn fetch_attendee(&self, id: AttendeeId) -> Result<Option<Attendee>> {
        Ok(self.attendees.read().await.get(&id).cloned())
    }

    async fn list_attendees(&self, event_id: EventId) -> Result<Vec<Attendee>> {
        let attendees = self.attendees.read().await;
        Ok(attendees
            .values()
            .filter(|attendee| attendee.event_id == event_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load_timer_settings(&self, event_id: EventId) -> Result<Option<TimerSettings>> {
        Ok(self.timer_settings.read().await.get(&event_id).cloned())
    }

    async fn save_timer_settings(&self, settings: &TimerSettings) -> Result<()> {
        self.timer_settings
            .write()
            .await
            .insert(settings.event_id, settings.clone());
        Ok(())
    }

    async fn load_ticket_config(&self, event_id: EventId) -> Result<Option<TicketConfig>> {
        Ok(self.ticket_configs.read().await.get(&event_id).cloned())
    }

    async fn save_ticket_config(&self, config: &TicketConfig) -> Result<()> {
        self.ticket_configs
            .write()
            .await
            .insert(config.event_id, config.clone());
        Ok(())
    }

    async fn load_seatmap_config(&self, event_id: EventId) -> Result<Option<SeatmapConfig>> {
        Ok(self.seatmaps.read().await.get(&event_id).cloned())
    }

    async fn save_seatmap_config(&self, config: &SeatmapConfig) -> Result<()> {
        self.seatmaps
            .write()
            .await
            .insert(config.event_id, config.clone());
        Ok(())
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn insert_ticket(&self, ticket: &Ticket) -> Result<()> {
        self.tickets.write().await.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn update_ticket(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets = self.tickets.write().await;
        let Some(slot) = tickets.get_mut(&ticket.id) else {
            bail!("ticket {} not found", ticket.id);
        };
        *slot = ticket.clone();
        Ok(())
    }

    async fn fetch_ticket(&self, id: TicketId) -> Result<Option<Ticket>> {
        Ok(self.tickets.read().await.get(&id).cloned())
    }

    async fn list_tickets(&self, event_id: EventId) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .values()
            .filter(|ticket| ticket.event_id == event_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BudgetRepository for MemoryStore {
    async fn insert_budget_lines(&self, lines: &[BudgetLine]) -> Result<()> {
        self.budget_lines.write().await.extend_from_slice(lines);
        Ok(())
    }

    async fn list_budget_lines(&self, event_id: EventId) -> Result<Vec<BudgetLine>> {
        let lines = self.budget_lines.read().await;
        Ok(lines
            .iter()
            .filter(|line| line.event_id == event_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WalletRepository for MemoryStore {
    async fn load_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>> {
        Ok(self.wallets.read().await.get(user_id).cloned())
    }

    async fn save_wallet(&self, wallet: &Wallet) -> Result<()> {
        self.wallets
            .write()
            .await
            .insert(wallet.user_id.clone(), wallet.clone());
        Ok(())
    }
}

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn insert_activity(&self, records: &[ActivityRecord]) -> Result<()> {
        self.activity.write().await.extend_from_slice(records);
        Ok(())
    }

    async fn fetch_activity(&self, event_id: EventId, limit: usize) -> Result<Vec<ActivityRecord>> {
        let activity = self.activity.read().await;
        Ok(activity
            .iter()
            .rev()
            .filter(|record| record.event_id == event_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PricingRepository for MemoryStore {
    async fn load_pricing(&self, path: &str) -> Result<HashMap<AiFeature, u64>> {
        Ok(self.pricing.read().await.get(path).cloned().unwrap_or_default())
    }

    async fn save_pricing(&self, path: &str, prices: &HashMap<AiFeature, u64>) -> Result<()> {
        self.pricing
            .write()
            .await
            .insert(path.to_string(), prices.clone());
        Ok(())
    }
}
