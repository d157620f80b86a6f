// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_command_client;
pub mod websocket_link;
