// Snapshot store - single writer, many readers, whole-snapshot replacement
use crate::domain::telemetry::TelemetrySnapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// Write side of the store. Not `Clone`: whoever owns it is the only writer.
#[derive(Debug)]
pub struct SnapshotStore {
    tx: watch::Sender<Arc<TelemetrySnapshot>>,
}

/// Cheap, cloneable read handle.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    rx: watch::Receiver<Arc<TelemetrySnapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(TelemetrySnapshot::default()));
        Self { tx }
    }

    /// Swap in a new snapshot. Readers see either the old or the new one, never a mix.
    pub fn replace(&self, snapshot: TelemetrySnapshot) {
        self.tx.send_replace(Arc::new(snapshot));
    }

    pub fn reader(&self) -> SnapshotReader {
        SnapshotReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotReader {
    pub fn current(&self) -> Arc<TelemetrySnapshot> {
        self.rx.borrow().clone()
    }

    /// Wait for the next replacement. Errors once the writer is gone.
    #[cfg(test)]
    pub async fn changed(&mut self) -> Result<Arc<TelemetrySnapshot>, watch::error::RecvError> {
        self.rx.changed().await?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_default_snapshot() {
        let store = SnapshotStore::new();
        assert_eq!(*store.reader().current(), TelemetrySnapshot::default());
    }

    #[tokio::test]
    async fn test_replace_is_wholesale() {
        let store = SnapshotStore::new();
        let mut reader = store.reader();

        store.replace(TelemetrySnapshot {
            current_bg: 180.0,
            current_iob: 0.3,
            ..Default::default()
        });
        let first = reader.changed().await.unwrap();
        assert_eq!(first.current_iob, 0.3);

        store.replace(TelemetrySnapshot {
            current_bg: 175.0,
            ..Default::default()
        });
        let second = reader.changed().await.unwrap();
        assert_eq!(second.current_bg, 175.0);
        assert_eq!(second.current_iob, 0.0);
        assert_eq!(reader.current().current_bg, 175.0);
    }
}
