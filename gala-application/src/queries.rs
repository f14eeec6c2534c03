pub mod activity_queries;
pub mod attendee_queries;
pub mod budget_queries;
pub mod event_queries;
pub mod pricing_queries;
pub mod settings_queries;
pub mod task_queries;
pub mod ticket_queries;
pub mod wallet_queries;
