pub mod attendee_commands;
pub mod budget_commands;
pub mod event_commands;
pub mod generation_commands;
pub mod pricing_commands;
pub mod settings_commands;
pub mod task_commands;
pub mod ticket_commands;
pub mod wallet_commands;
