use crate::queries::event_queries;
use crate::{AppError, AppState};
use gala_domain::{BudgetLine, BudgetSummary, EventId};

pub async fn list_budget(state: &AppState, event_id: EventId) -> Result<Vec<BudgetLine>, AppError> {
    event_queries::get_event(state, event_id).await?;
    let mut lines = state.budget_repo.list_budget_lines(event_id).await?;
    lines.sort_by(|a, b| a.category.cmp(&b.category).then(a.created_at.cmp(&b.created_at)));
    Ok(lines)
}

pub async fn budget_summary(state: &AppState, event_id: EventId) -> Result<BudgetSummary, AppError> {
    let event = event_queries::get_event(state, event_id).await?;
    let lines = state.budget_repo.list_budget_lines(event_id).await?;
    Ok(BudgetSummary::from_lines(event.budget, &lines))
}
