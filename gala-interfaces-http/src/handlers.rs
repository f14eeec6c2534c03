pub mod attendee_handlers;
pub mod budget_handlers;
pub mod event_handlers;
pub mod ops_handlers;
pub mod settings_handlers;
pub mod task_handlers;
pub mod ticket_handlers;
pub mod wallet_handlers;
