// Pure domain services
pub mod access;
pub mod countdown;
pub mod kanban;
pub mod ticket_code;
pub mod timeline;

pub use access::*;
pub use countdown::*;
pub use kanban::*;
pub use ticket_code::*;
pub use timeline::*;
