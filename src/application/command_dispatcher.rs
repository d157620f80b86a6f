// Command dispatcher - fire-and-forget control requests
use crate::application::snapshot_store::SnapshotReader;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    Start,
    Stop,
    Spike,
    ToggleCooler,
}

impl DeviceCommand {
    /// Path on the command backend.
    pub fn path(self) -> &'static str {
        match self {
            DeviceCommand::Start => "/start",
            DeviceCommand::Stop => "/stop",
            DeviceCommand::Spike => "/spike",
            DeviceCommand::ToggleCooler => "/cooler",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("command request failed: {0}")]
    Request(String),
    #[error("command rejected with status {0}")]
    Status(u16),
}

#[async_trait]
pub trait CommandTransport: Send + Sync {
    /// Send one empty-body request; the response body is not read.
    async fn send(&self, command: DeviceCommand) -> Result<(), CommandError>;
}

/// Issues control commands without waiting on or interpreting the outcome.
///
/// The effect of a command only becomes visible through a later snapshot.
#[derive(Clone)]
pub struct CommandDispatcher {
    transport: Arc<dyn CommandTransport>,
    snapshot: SnapshotReader,
}

impl CommandDispatcher {
    pub fn new(transport: Arc<dyn CommandTransport>, snapshot: SnapshotReader) -> Self {
        Self {
            transport,
            snapshot,
        }
    }

    /// Start or stop, depending on the running flag of the current snapshot.
    pub fn toggle_running(&self) -> DeviceCommand {
        let command = if self.snapshot.current().is_running {
            DeviceCommand::Stop
        } else {
            DeviceCommand::Start
        };
        self.dispatch(command);
        command
    }

    pub fn start(&self) {
        self.dispatch(DeviceCommand::Start);
    }

    pub fn stop(&self) {
        self.dispatch(DeviceCommand::Stop);
    }

    pub fn trigger_spike(&self) {
        self.dispatch(DeviceCommand::Spike);
    }

    pub fn toggle_cooler(&self) {
        self.dispatch(DeviceCommand::ToggleCooler);
    }

    fn dispatch(&self, command: DeviceCommand) {
        let transport = self.transport.clone();
        tokio::spawn(async move {
            // Failures are neither retried nor reported to the operator
            if let Err(e) = transport.send(command).await {
                tracing::debug!("Command {:?} failed: {}", command, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::snapshot_store::SnapshotStore;
    use crate::domain::telemetry::TelemetrySnapshot;
    use tokio::sync::mpsc;

    struct RecordingTransport {
        sent: mpsc::UnboundedSender<DeviceCommand>,
        fail: bool,
    }

    #[async_trait]
    impl CommandTransport for RecordingTransport {
        async fn send(&self, command: DeviceCommand) -> Result<(), CommandError> {
            let _ = self.sent.send(command);
            if self.fail {
                Err(CommandError::Status(500))
            } else {
                Ok(())
            }
        }
    }

    fn dispatcher(store: &SnapshotStore, fail: bool) -> (CommandDispatcher, mpsc::UnboundedReceiver<DeviceCommand>) {
        let (sent, rx) = mpsc::unbounded_channel();
        let transport = Arc::new(RecordingTransport { sent, fail });
        (CommandDispatcher::new(transport, store.reader()), rx)
    }

    #[tokio::test]
    async fn test_toggle_follows_snapshot_running_flag() {
        let store = SnapshotStore::new();
        let (dispatcher, mut sent) = dispatcher(&store, false);

        assert_eq!(dispatcher.toggle_running(), DeviceCommand::Start);
        assert_eq!(sent.recv().await, Some(DeviceCommand::Start));

        // The dispatcher keeps no running flag of its own
        assert_eq!(dispatcher.toggle_running(), DeviceCommand::Start);
        assert_eq!(sent.recv().await, Some(DeviceCommand::Start));

        store.replace(TelemetrySnapshot {
            is_running: true,
            ..Default::default()
        });
        assert_eq!(dispatcher.toggle_running(), DeviceCommand::Stop);
        assert_eq!(sent.recv().await, Some(DeviceCommand::Stop));
    }

    #[tokio::test]
    async fn test_actions_hit_their_endpoints() {
        let store = SnapshotStore::new();
        let (dispatcher, mut sent) = dispatcher(&store, false);

        dispatcher.trigger_spike();
        assert_eq!(sent.recv().await.map(DeviceCommand::path), Some("/spike"));
        dispatcher.toggle_cooler();
        assert_eq!(sent.recv().await.map(DeviceCommand::path), Some("/cooler"));
        dispatcher.start();
        assert_eq!(sent.recv().await.map(DeviceCommand::path), Some("/start"));
        dispatcher.stop();
        assert_eq!(sent.recv().await.map(DeviceCommand::path), Some("/stop"));
    }

    #[tokio::test]
    async fn test_failures_leave_local_state_alone() {
        let store = SnapshotStore::new();
        let reader = store.reader();
        let (dispatcher, mut sent) = dispatcher(&store, true);

        dispatcher.trigger_spike();
        assert_eq!(sent.recv().await, Some(DeviceCommand::Spike));
        assert_eq!(*reader.current(), TelemetrySnapshot::default());
    }
}
