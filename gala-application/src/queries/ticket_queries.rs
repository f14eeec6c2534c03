use serde::Serialize;

use crate::queries::{event_queries, settings_queries};
use crate::{AppError, AppState};
use gala_domain::{EventId, Ticket};

#[derive(Debug, Clone, Serialize)]
pub struct TicketSales {
    pub sold: usize,
    pub redeemed: usize,
    pub capacity: Option<u32>,
    pub remaining: Option<u32>,
}

pub async fn list_tickets(state: &AppState, event_id: EventId) -> Result<Vec<Ticket>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let mut tickets = state.ticket_repo.list_tickets(event_id).await?;
    tickets.sort_by(|a, b| a.issued_at.cmp(&b.issued_at));
    Ok(tickets)
}

pub async fn ticket_sales(state: &AppState, event_id: EventId) -> Result<TicketSales, AppError> {
    let config = settings_queries::get_ticket_config(state, event_id).await?;
    let tickets = state.ticket_repo.list_tickets(event_id).await?;
    let sold = tickets.len();
    let redeemed = tickets.iter().filter(|ticket| ticket.redeemed_at.is_some()).count();
    Ok(TicketSales {
        sold,
        redeemed,
        capacity: config.capacity,
        remaining: config
            .capacity
            .map(|capacity| capacity.saturating_sub(sold as u32)),
    })
}
