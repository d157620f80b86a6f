use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub upstream: UpstreamSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub stream_url: String,
    pub command_base_url: String,
    pub reconnect_delay_ms: u64,
    pub command_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub listen_addr: SocketAddr,
}

impl UpstreamSettings {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("upstream.stream_url", "ws://127.0.0.1:8000/ws/glucose")?
        .set_default("upstream.command_base_url", "http://127.0.0.1:8000")?
        .set_default("upstream.reconnect_delay_ms", 3000)?
        .set_default("upstream.command_timeout_ms", 2000)?
        .set_default("server.listen_addr", "0.0.0.0:8080")?)
}

/// Defaults, overlaid by `config/dashboard.{toml,yaml,json}` if present,
/// overlaid by `GLUCODOSE__SECTION__KEY` environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("GLUCODOSE").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
