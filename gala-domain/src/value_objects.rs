// Domain value objects
pub mod ai_feature;
pub mod group_type;
pub mod identifiers;
pub mod priority;
pub mod task_status;
pub mod time_unit;

pub use ai_feature::*;
pub use group_type::*;
pub use identifiers::*;
pub use priority::*;
pub use task_status::*;
pub use time_unit::*;
