use tracing::warn;

use crate::activity;
use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::{ActivityKind, ActivityRecord, BudgetLine, EventId, NewBudgetLine};

pub async fn add_budget_line(
    state: &AppState,
    event_id: EventId,
    payload: NewBudgetLine,
) -> Result<BudgetLine, AppError> {
    event_queries::get_event(state, event_id).await?;
    let line = BudgetLine::create(event_id, payload)?;
    state
        .budget_repo
        .insert_budget_lines(std::slice::from_ref(&line))
        .await?;
    activity::record_one(
        state,
        ActivityRecord::new(
            event_id,
            ActivityKind::BudgetUpdated,
            line.id,
            format!("{} {:.2}", line.label, line.amount),
        ),
    )
    .await;
    Ok(line)
}

/// Batch insert; invalid entries are skipped.
pub async fn import_budget_lines(
    state: &AppState,
    event_id: EventId,
    payloads: Vec<NewBudgetLine>,
) -> Result<Vec<BudgetLine>, AppError> {
    let lines: Vec<BudgetLine> = payloads
        .into_iter()
        .filter_map(|payload| match BudgetLine::create(event_id, payload) {
            Ok(line) => Some(line),
            Err(err) => {
                warn!(event_id = %event_id, "skipping imported budget line: {}", err);
                None
            }
        })
        .collect();
    if lines.is_empty() {
        return Ok(lines);
    }
    state.budget_repo.insert_budget_lines(&lines).await?;
    activity::record_one(
        state,
        ActivityRecord::new(
            event_id,
            ActivityKind::BudgetUpdated,
            event_id,
            format!("imported {} budget lines", lines.len()),
        ),
    )
    .await;
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::budget_queries;
    use crate::test_support::{build_state, seed_event};

    fn line(category: &str, amount: f64, paid: bool) -> NewBudgetLine {
        NewBudgetLine {
            category: category.to_string(),
            label: None,
            amount,
            paid,
        }
    }

    #[tokio::test]
    async fn summary_tracks_planned_and_paid() {
        let state = build_state();
        let event = seed_event(&state).await;
        add_budget_line(&state, event.id, line("Venue", 600.0, true)).await.expect("line");
        add_budget_line(&state, event.id, line("catering", 550.0, false)).await.expect("line");
        assert!(matches!(
            add_budget_line(&state, event.id, line("music", -5.0, false)).await,
            Err(AppError::BadRequest(_))
        ));

        let summary = budget_queries::budget_summary(&state, event.id).await.expect("summary");
        assert_eq!(summary.planned, 1150.0);
        assert_eq!(summary.paid, 600.0);
        assert_eq!(summary.remaining, -150.0);
        assert!(summary.over_budget);
        assert_eq!(summary.by_category[0].category, "catering");
        assert_eq!(budget_queries::list_budget(&state, event.id).await.expect("list").len(), 2);
    }
}
