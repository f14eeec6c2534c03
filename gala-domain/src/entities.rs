// Domain entities
pub mod activity;
pub mod attendee;
pub mod budget;
pub mod config;
pub mod event;
pub mod settings;
pub mod task;
pub mod ticket;
pub mod wallet;

pub use activity::*;
pub use attendee::*;
pub use budget::*;
pub use config::*;
pub use event::*;
pub use settings::*;
pub use task::*;
pub use ticket::*;
pub use wallet::*;
