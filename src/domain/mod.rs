// Domain layer - Telemetry and view models
pub mod connection;
pub mod dashboard;
pub mod scale;
pub mod telemetry;
