// Activity entity
// Append-only audit trail of mutations per event

use serde::{Deserialize, Serialize};

use crate::utils::current_millis;
use crate::value_objects::EventId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    EventCreated,
    EventUpdated,
    EventDeleted,
    TaskCreated,
    TaskUpdated,
    TaskMoved,
    TaskDeleted,
    AttendeeJoined,
    AttendeeBanned,
    AttendeeUnbanned,
    TicketSold,
    TicketRedeemed,
    SettingsUpdated,
    BudgetUpdated,
    AiGenerated,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::EventCreated => "event_created",
            ActivityKind::EventUpdated => "event_updated",
            ActivityKind::EventDeleted => "event_deleted",
            ActivityKind::TaskCreated => "task_created",
            ActivityKind::TaskUpdated => "task_updated",
            ActivityKind::TaskMoved => "task_moved",
            ActivityKind::TaskDeleted => "task_deleted",
            ActivityKind::AttendeeJoined => "attendee_joined",
            ActivityKind::AttendeeBanned => "attendee_banned",
            ActivityKind::AttendeeUnbanned => "attendee_unbanned",
            ActivityKind::TicketSold => "ticket_sold",
            ActivityKind::TicketRedeemed => "ticket_redeemed",
            ActivityKind::SettingsUpdated => "settings_updated",
            ActivityKind::BudgetUpdated => "budget_updated",
            ActivityKind::AiGenerated => "ai_generated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub event_time: i64,
    pub event_id: EventId,
    pub kind: String,
    pub subject_id: String,
    pub detail: String,
}

impl ActivityRecord {
    pub fn new(
        event_id: EventId,
        kind: ActivityKind,
        subject_id: impl ToString,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            event_time: current_millis(),
            event_id,
            kind: kind.as_str().to_string(),
            subject_id: subject_id.to_string(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<usize>,
}
