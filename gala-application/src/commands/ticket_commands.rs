use tracing::{info, warn};

use crate::activity;
use crate::queries::settings_queries;
use crate::{AppError, AppState};
use gala_domain::services::ticket_code;
use gala_domain::{
    current_millis,
    normalize_optional_text,
    ActivityKind,
    ActivityRecord,
    EventId,
    SellTicketRequest,
    Ticket,
    TicketId,
    TicketValidation,
    TicketValidationStatus,
    ValidateTicketRequest,
};

pub async fn sell_ticket(
    state: &AppState,
    event_id: EventId,
    payload: SellTicketRequest,
) -> Result<Ticket, AppError> {
    let holder_name = normalize_optional_text(Some(payload.holder_name))
        .ok_or_else(|| AppError::BadRequest("holder_name must not be empty".to_string()))?;
    let config = settings_queries::get_ticket_config(state, event_id).await?;
    if !config.enabled {
        return Err(AppError::Conflict("ticket sales are disabled for this event".to_string()));
    }

    let _guard = state.ticket_lock.lock().await;
    if let Some(capacity) = config.capacity {
        let sold = state.ticket_repo.list_tickets(event_id).await?.len();
        if sold >= capacity as usize {
            return Err(AppError::Conflict(format!("sold out ({} of {})", sold, capacity)));
        }
    }

    let id = TicketId::new();
    let ticket = Ticket {
        id,
        event_id,
        holder_name,
        code: ticket_code::issue_code(&state.config.ticket_signing_secret, event_id, id)?,
        price: config.price,
        currency: config.currency,
        issued_at: current_millis(),
        redeemed_at: None,
    };
    state.ticket_repo.insert_ticket(&ticket).await?;
    state.metrics.record_ticket_sold();
    info!(event_id = %event_id, ticket_id = %ticket.id, "ticket sold");
    activity::record_one(
        state,
        ActivityRecord::new(event_id, ActivityKind::TicketSold, ticket.id, ticket.holder_name.clone()),
    )
    .await;
    Ok(ticket)
}

/// Checks the code signature and admits the holder once.
pub async fn validate_ticket(
    state: &AppState,
    event_id: EventId,
    payload: ValidateTicketRequest,
) -> Result<TicketValidation, AppError> {
    let ticket_id = ticket_code::verify_code(&state.config.ticket_signing_secret, event_id, &payload.code)
        .map_err(|err| {
            warn!(event_id = %event_id, "ticket code rejected: {}", err);
            AppError::from(err)
        })?;

    let _guard = state.ticket_lock.lock().await;
    let mut ticket = state
        .ticket_repo
        .fetch_ticket(ticket_id)
        .await?
        .filter(|ticket| ticket.event_id == event_id)
        .ok_or_else(|| AppError::NotFound(format!("ticket {}", ticket_id)))?;

    if ticket.redeemed_at.is_some() {
        return Ok(TicketValidation {
            status: TicketValidationStatus::AlreadyRedeemed,
            ticket,
        });
    }
    ticket.redeemed_at = Some(current_millis());
    state.ticket_repo.update_ticket(&ticket).await?;
    state.metrics.record_ticket_redeemed();
    activity::record_one(
        state,
        ActivityRecord::new(event_id, ActivityKind::TicketRedeemed, ticket.id, ticket.holder_name.clone()),
    )
    .await;
    Ok(TicketValidation {
        status: TicketValidationStatus::Admitted,
        ticket,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::settings_commands;
    use crate::queries::ticket_queries;
    use crate::test_support::{build_state, seed_event};
    use gala_domain::TicketConfigPatch;

    async fn open_sales(state: &AppState, event_id: EventId, capacity: u32) {
        settings_commands::update_ticket_config(
            state,
            event_id,
            TicketConfigPatch {
                enabled: Some(true),
                price: Some(25.0),
                capacity: Some(capacity),
                ..TicketConfigPatch::default()
            },
        )
        .await
        .expect("config");
    }

    fn sell(name: &str) -> SellTicketRequest {
        SellTicketRequest {
            holder_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn sales_require_enabled_config() {
        let state = build_state();
        let event = seed_event(&state).await;
        assert!(matches!(
            sell_ticket(&state, event.id, sell("Ann")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn capacity_limits_sales() {
        let state = build_state();
        let event = seed_event(&state).await;
        open_sales(&state, event.id, 2).await;
        let ticket = sell_ticket(&state, event.id, sell("Ann")).await.expect("sell");
        assert_eq!(ticket.price, 25.0);
        assert_eq!(ticket.currency, "USD");
        sell_ticket(&state, event.id, sell("Ben")).await.expect("sell");
        assert!(matches!(
            sell_ticket(&state, event.id, sell("Cat")).await,
            Err(AppError::Conflict(_))
        ));
        let sales = ticket_queries::ticket_sales(&state, event.id).await.expect("sales");
        assert_eq!(sales.sold, 2);
        assert_eq!(sales.remaining, Some(0));
    }

    #[tokio::test]
    async fn ticket_is_admitted_once() {
        let state = build_state();
        let event = seed_event(&state).await;
        open_sales(&state, event.id, 0).await;
        let ticket = sell_ticket(&state, event.id, sell("Ann")).await.expect("sell");
        let request = ValidateTicketRequest {
            code: ticket.code.clone(),
        };

        let first = validate_ticket(&state, event.id, request.clone()).await.expect("validate");
        assert_eq!(first.status, TicketValidationStatus::Admitted);
        assert!(first.ticket.redeemed_at.is_some());

        let second = validate_ticket(&state, event.id, request).await.expect("validate");
        assert_eq!(second.status, TicketValidationStatus::AlreadyRedeemed);
    }

    #[tokio::test]
    async fn code_for_other_event_is_rejected() {
        let state = build_state();
        let event = seed_event(&state).await;
        let other = seed_event(&state).await;
        open_sales(&state, event.id, 0).await;
        let ticket = sell_ticket(&state, event.id, sell("Ann")).await.expect("sell");
        assert!(matches!(
            validate_ticket(&state, other.id, ValidateTicketRequest { code: ticket.code }).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
