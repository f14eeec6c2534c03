use axum::routing::{get, post};
use axum::Router;

use gala_application::AppState;

use crate::handlers::{
    attendee_handlers,
    budget_handlers,
    event_handlers,
    ops_handlers,
    settings_handlers,
    task_handlers,
    ticket_handlers,
    wallet_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/events",
            get(event_handlers::list_events).post(event_handlers::create_event),
        )
        .route(
            "/v1/events/:id",
            get(event_handlers::get_event)
                .patch(event_handlers::update_event)
                .delete(event_handlers::delete_event),
        )
        .route("/v1/invites/:code", get(event_handlers::find_by_invite_code))
        .route("/v1/events/:id/activity", get(event_handlers::list_activity))
        .route(
            "/v1/events/:id/tasks",
            get(task_handlers::list_tasks).post(task_handlers::create_task),
        )
        .route("/v1/events/:id/board", get(task_handlers::get_board))
        .route("/v1/events/:id/timeline", get(task_handlers::get_timeline))
        .route("/v1/events/:id/gantt", get(task_handlers::get_gantt))
        .route(
            "/v1/tasks/:id",
            get(task_handlers::get_task)
                .patch(task_handlers::update_task)
                .delete(task_handlers::delete_task),
        )
        .route("/v1/tasks/:id/toggle", post(task_handlers::toggle_task_status))
        .route("/v1/tasks/:id/move", post(task_handlers::move_task))
        .route(
            "/v1/events/:id/groups",
            get(attendee_handlers::list_groups).post(attendee_handlers::create_group),
        )
        .route("/v1/events/:id/attendees", get(attendee_handlers::list_attendees))
        .route("/v1/join", post(attendee_handlers::join_event))
        .route("/v1/attendees/:id/ban", post(attendee_handlers::ban_attendee))
        .route("/v1/attendees/:id/unban", post(attendee_handlers::unban_attendee))
        .route(
            "/v1/events/:id/timer",
            get(settings_handlers::get_timer_settings).put(settings_handlers::update_timer_settings),
        )
        .route("/v1/events/:id/timer/stream", get(settings_handlers::timer_stream))
        .route("/v1/events/:id/countdown", get(settings_handlers::get_countdown))
        .route(
            "/v1/events/:id/seatmap",
            get(settings_handlers::get_seatmap_config).put(settings_handlers::update_seatmap_config),
        )
        .route(
            "/v1/events/:id/tickets",
            get(ticket_handlers::list_tickets).post(ticket_handlers::sell_ticket),
        )
        .route(
            "/v1/events/:id/tickets/config",
            get(settings_handlers::get_ticket_config).put(settings_handlers::update_ticket_config),
        )
        .route("/v1/events/:id/tickets/validate", post(ticket_handlers::validate_ticket))
        .route("/v1/events/:id/tickets/sales", get(ticket_handlers::ticket_sales))
        .route(
            "/v1/events/:id/budget",
            get(budget_handlers::list_budget).post(budget_handlers::add_budget_line),
        )
        .route("/v1/events/:id/budget/summary", get(budget_handlers::budget_summary))
        .route("/v1/events/:id/ai/:feature", post(wallet_handlers::generate))
        .route("/v1/wallets/:user_id", get(wallet_handlers::get_wallet))
        .route("/v1/wallets/:user_id/credit", post(wallet_handlers::credit_wallet))
        .route(
            "/v1/pricing",
            get(wallet_handlers::list_prices).put(wallet_handlers::update_price),
        )
        .route("/v1/pricing/reload", post(wallet_handlers::reload_pricing))
        .route("/v1/ops/ai-gateway/check", get(ops_handlers::ai_gateway_check))
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route("/v1/ops/metrics/prometheus", get(ops_handlers::metrics_prometheus))
        .with_state(state)
}
