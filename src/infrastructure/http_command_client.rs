// HTTP implementation of the command transport
use crate::application::command_dispatcher::{CommandError, CommandTransport, DeviceCommand};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpCommandClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCommandClient {
    pub fn new(base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn command_url(&self, command: DeviceCommand) -> String {
        format!("{}{}", self.base_url, command.path())
    }
}

#[async_trait]
impl CommandTransport for HttpCommandClient {
    async fn send(&self, command: DeviceCommand) -> Result<(), CommandError> {
        let response = self
            .client
            .post(self.command_url(command))
            .send()
            .await
            .map_err(|e| CommandError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CommandError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}
