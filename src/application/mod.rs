// Application layer - Connection lifecycle, rendering and commands
pub mod chart_renderer;
pub mod command_dispatcher;
pub mod connection_manager;
pub mod dashboard_service;
pub mod indicator_renderer;
pub mod snapshot_store;
pub mod telemetry_link;
