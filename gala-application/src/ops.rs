pub mod timer_stream_hub;

pub use timer_stream_hub::*;
