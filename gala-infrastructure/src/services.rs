pub mod edge_function_gateway;
pub mod health_service;

pub use edge_function_gateway::*;
pub use health_service::*;
