use tracing::debug;

use crate::activity;
use crate::queries::settings_queries;
use crate::{AppError, AppState};
use gala_domain::{
    ActivityKind,
    ActivityRecord,
    EventId,
    SeatmapConfig,
    SeatmapConfigPatch,
    TicketConfig,
    TicketConfigPatch,
    TimerSettings,
    TimerSettingsPatch,
};

/// Saves and pushes the new settings to every live countdown display.
pub async fn update_timer_settings(
    state: &AppState,
    event_id: EventId,
    patch: TimerSettingsPatch,
) -> Result<TimerSettings, AppError> {
    let mut settings = settings_queries::get_timer_settings(state, event_id).await?;
    settings.apply(patch)?;
    state.settings_repo.save_timer_settings(&settings).await?;
    let receivers = state.timer_hub.publish(&settings).await;
    debug!(event_id = %event_id, receivers, "timer settings published");
    record_settings_change(state, event_id, "timer").await;
    Ok(settings)
}

pub async fn update_ticket_config(
    state: &AppState,
    event_id: EventId,
    patch: TicketConfigPatch,
) -> Result<TicketConfig, AppError> {
    let mut config = settings_queries::get_ticket_config(state, event_id).await?;
    config.apply(patch)?;
    state.settings_repo.save_ticket_config(&config).await?;
    record_settings_change(state, event_id, "tickets").await;
    Ok(config)
}

pub async fn update_seatmap_config(
    state: &AppState,
    event_id: EventId,
    patch: SeatmapConfigPatch,
) -> Result<SeatmapConfig, AppError> {
    let mut config = settings_queries::get_seatmap_config(state, event_id).await?;
    config.apply(patch)?;
    state.settings_repo.save_seatmap_config(&config).await?;
    record_settings_change(state, event_id, "seatmap").await;
    Ok(config)
}

async fn record_settings_change(state: &AppState, event_id: EventId, section: &str) {
    activity::record_one(
        state,
        ActivityRecord::new(event_id, ActivityKind::SettingsUpdated, section, section),
    )
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_state, seed_event};
    use gala_domain::EnabledUnits;

    #[tokio::test]
    async fn timer_update_reaches_subscribers() {
        let state = build_state();
        let event = seed_event(&state).await;
        let mut rx = state.timer_hub.subscribe(event.id).await;

        update_timer_settings(
            &state,
            event.id,
            TimerSettingsPatch {
                title: Some("Doors open".to_string()),
                ..TimerSettingsPatch::default()
            },
        )
        .await
        .expect("update");

        let pushed = rx.recv().await.expect("pushed");
        assert_eq!(pushed.title, "Doors open");
    }

    #[tokio::test]
    async fn timer_update_needs_one_unit() {
        let state = build_state();
        let event = seed_event(&state).await;
        let none = EnabledUnits {
            months: false,
            days: false,
            hours: false,
            minutes: false,
            seconds: false,
        };
        let err = update_timer_settings(
            &state,
            event.id,
            TimerSettingsPatch {
                units: Some(none),
                ..TimerSettingsPatch::default()
            },
        )
        .await
        .expect_err("no units");
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn seatmap_rejects_reserved_seat_outside_map() {
        let state = build_state();
        let event = seed_event(&state).await;
        let config = update_seatmap_config(
            &state,
            event.id,
            SeatmapConfigPatch {
                rows: Some(3),
                seats_per_row: Some(4),
                aisle_after: Some(0),
                reserved: Some(vec!["a1".to_string(), "C4".to_string()]),
            },
        )
        .await
        .expect("update");
        assert_eq!(config.available_seats(), 10);
        assert_eq!(config.aisle_after, None);

        let err = update_seatmap_config(
            &state,
            event.id,
            SeatmapConfigPatch {
                reserved: Some(vec!["D1".to_string()]),
                ..SeatmapConfigPatch::default()
            },
        )
        .await
        .expect_err("outside");
        assert!(matches!(err, AppError::BadRequest(_)));
        let stored = settings_queries::get_seatmap_config(&state, event.id).await.expect("seatmap");
        assert_eq!(stored.reserved, vec!["A1".to_string(), "C4".to_string()]);
    }
}
