// Ticket entity

use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, TicketId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub event_id: EventId,
    pub holder_name: String,
    pub code: String,
    pub price: f64,
    pub currency: String,
    pub issued_at: i64,
    pub redeemed_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SellTicketRequest {
    pub holder_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTicketRequest {
    pub code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketValidationStatus {
    Admitted,
    AlreadyRedeemed,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketValidation {
    pub status: TicketValidationStatus,
    pub ticket: Ticket,
}
