// Streaming link traits - implemented by the websocket adapter and by test fakes
use async_trait::async_trait;

/// Transport failures: the link could not be opened or broke while open.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("failed to open telemetry link: {0}")]
    Open(String),
    #[error("telemetry link failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait TelemetryLink: Send + Sync {
    /// Open a fresh link to the streaming endpoint
    async fn open(&self) -> Result<Box<dyn LinkSession>, LinkError>;
}

#[async_trait]
pub trait LinkSession: Send {
    /// Next inbound text message, in receipt order. `None` once the link is closed.
    async fn recv(&mut self) -> Option<Result<String, LinkError>>;

    /// Close the link from our side
    async fn close(&mut self);
}
