//! HTTP API handlers for recivo-ra

pub mod classify;
pub mod health;
pub mod logs;

pub use classify::classify_routes;
pub use health::health_routes;
pub use logs::log_routes;
