pub mod clickhouse_activity;
pub mod memory;
pub mod postgrest;
pub mod pricing_file;

pub use clickhouse_activity::*;
pub use memory::*;
pub use postgrest::*;
pub use pricing_file::*;
