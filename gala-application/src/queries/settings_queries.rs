use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::services::countdown;
use gala_domain::{Countdown, EventId, SeatmapConfig, TicketConfig, TimerSettings};

#[derive(Debug, Clone, Serialize)]
pub struct EventCountdown {
    pub title: String,
    #[serde(flatten)]
    pub countdown: Countdown,
    /// Set once the event has started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub async fn get_timer_settings(state: &AppState, event_id: EventId) -> Result<TimerSettings, AppError> {
    event_queries::get_event(state, event_id).await?;
    if let Some(settings) = state.settings_repo.load_timer_settings(event_id).await? {
        return Ok(settings);
    }
    let settings = TimerSettings::default_for(event_id);
    state.settings_repo.save_timer_settings(&settings).await?;
    Ok(settings)
}

pub async fn get_countdown(state: &AppState, event_id: EventId) -> Result<EventCountdown, AppError> {
    countdown_at(state, event_id, Utc::now().naive_utc()).await
}

/// Event date and time are read as UTC.
pub async fn countdown_at(
    state: &AppState,
    event_id: EventId,
    now: NaiveDateTime,
) -> Result<EventCountdown, AppError> {
    let event = event_queries::get_event(state, event_id).await?;
    let settings = get_timer_settings(state, event_id).await?;
    let countdown = countdown::countdown(event.starts_at(), now, &settings.units);
    let message = countdown.has_passed.then(|| settings.passed_message.clone());
    Ok(EventCountdown {
        title: settings.title,
        countdown,
        message,
    })
}

pub async fn get_ticket_config(state: &AppState, event_id: EventId) -> Result<TicketConfig, AppError> {
    event_queries::get_event(state, event_id).await?;
    if let Some(config) = state.settings_repo.load_ticket_config(event_id).await? {
        return Ok(config);
    }
    let config = TicketConfig::default_for(event_id);
    state.settings_repo.save_ticket_config(&config).await?;
    Ok(config)
}

pub async fn get_seatmap_config(state: &AppState, event_id: EventId) -> Result<SeatmapConfig, AppError> {
    event_queries::get_event(state, event_id).await?;
    if let Some(config) = state.settings_repo.load_seatmap_config(event_id).await? {
        return Ok(config);
    }
    let config = SeatmapConfig::default_for(event_id);
    state.settings_repo.save_seatmap_config(&config).await?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::settings_commands;
    use crate::test_support::{build_state, date, seed_event};
    use gala_domain::{EnabledUnits, TimeUnit, TimerSettingsPatch};

    #[tokio::test]
    async fn settings_are_created_on_first_read() {
        let state = build_state();
        let event = seed_event(&state).await;
        assert!(state
            .settings_repo
            .load_timer_settings(event.id)
            .await
            .expect("load")
            .is_none());

        let settings = get_timer_settings(&state, event.id).await.expect("settings");
        assert_eq!(settings, TimerSettings { updated_at: settings.updated_at, ..TimerSettings::default_for(event.id) });
        assert!(state
            .settings_repo
            .load_timer_settings(event.id)
            .await
            .expect("load")
            .is_some());
    }

    #[tokio::test]
    async fn countdown_uses_enabled_units() {
        let state = build_state();
        let event = seed_event(&state).await;
        settings_commands::update_timer_settings(
            &state,
            event.id,
            TimerSettingsPatch {
                units: Some(EnabledUnits::only(TimeUnit::Days)),
                ..TimerSettingsPatch::default()
            },
        )
        .await
        .expect("update");

        let now = date(2030, 5, 21).and_hms_opt(12, 0, 0).expect("time");
        let view = countdown_at(&state, event.id, now).await.expect("countdown");
        assert!(!view.countdown.has_passed);
        assert_eq!(view.countdown.parts.days, Some(10));
        assert_eq!(view.countdown.parts.hours, None);
        assert!(view.message.is_none());
    }

    #[tokio::test]
    async fn passed_countdown_carries_message() {
        let state = build_state();
        let event = seed_event(&state).await;
        let now = date(2030, 6, 2).and_hms_opt(0, 0, 0).expect("time");
        let view = countdown_at(&state, event.id, now).await.expect("countdown");
        assert!(view.countdown.has_passed);
        assert_eq!(view.countdown.total_seconds, 0);
        assert_eq!(view.message.as_deref(), Some("The event has started!"));
    }

    #[tokio::test]
    async fn unknown_event_has_no_settings() {
        let state = build_state();
        assert!(matches!(
            get_seatmap_config(&state, EventId::new()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
