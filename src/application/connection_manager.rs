// Connection manager - keeps one streaming link alive and publishes snapshots
use crate::application::snapshot_store::SnapshotStore;
use crate::application::telemetry_link::{LinkError, LinkSession, TelemetryLink};
use crate::domain::connection::ConnectionState;
use crate::domain::telemetry::TelemetrySnapshot;
use futures::future::BoxFuture;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Sleep;

/// Side effects requested by the state machine, carried out by the driver task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    OpenLink,
    ScheduleReconnect(Duration),
    CancelReconnect,
    CloseLink,
}

/// Synchronous connection lifecycle: `Disconnected -> Connecting -> Connected -> Disconnected`.
///
/// Holds at most one link and one pending reconnect. After `teardown` every
/// input is ignored.
#[derive(Debug)]
pub struct ConnectionMachine {
    state: ConnectionState,
    reconnect_delay: Duration,
    reconnect_pending: bool,
    torn_down: bool,
}

impl ConnectionMachine {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_delay,
            reconnect_pending: false,
            torn_down: false,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[cfg(test)]
    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    pub fn connect(&mut self) -> Vec<LinkAction> {
        if self.torn_down || self.state != ConnectionState::Disconnected {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            actions.push(LinkAction::CancelReconnect);
        }
        self.state = ConnectionState::Connecting;
        actions.push(LinkAction::OpenLink);
        actions
    }

    pub fn on_link_opened(&mut self) {
        if !self.torn_down && self.state == ConnectionState::Connecting {
            self.state = ConnectionState::Connected;
        }
    }

    /// Parse an inbound payload. Malformed payloads are dropped and the
    /// current snapshot stays in place.
    pub fn on_message(&mut self, payload: &str) -> Option<TelemetrySnapshot> {
        if self.torn_down || self.state != ConnectionState::Connected {
            return None;
        }

        match TelemetrySnapshot::from_json(payload) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!("Discarding telemetry message: {}", e);
                None
            }
        }
    }

    /// The link closed or failed to open; schedule exactly one reconnect.
    pub fn on_link_closed(&mut self) -> Vec<LinkAction> {
        if self.torn_down || self.state == ConnectionState::Disconnected {
            return Vec::new();
        }

        self.state = ConnectionState::Disconnected;
        self.reconnect_pending = true;
        vec![LinkAction::ScheduleReconnect(self.reconnect_delay)]
    }

    pub fn on_reconnect_due(&mut self) -> Vec<LinkAction> {
        if self.torn_down || !self.reconnect_pending {
            return Vec::new();
        }

        self.reconnect_pending = false;
        self.connect()
    }

    pub fn teardown(&mut self) -> Vec<LinkAction> {
        if self.torn_down {
            return Vec::new();
        }
        self.torn_down = true;

        let mut actions = Vec::new();
        if self.reconnect_pending {
            self.reconnect_pending = false;
            actions.push(LinkAction::CancelReconnect);
        }
        if self.state != ConnectionState::Disconnected {
            actions.push(LinkAction::CloseLink);
        }
        actions
    }
}

/// Read side of the connection status, for the header label.
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    rx: watch::Receiver<ConnectionState>,
}

impl ConnectionStatus {
    pub fn current(&self) -> ConnectionState {
        *self.rx.borrow()
    }

    #[cfg(test)]
    pub async fn wait_for(&mut self, state: ConnectionState) -> bool {
        self.rx.wait_for(|s| *s == state).await.is_ok()
    }
}

pub struct ConnectionManager {
    machine: ConnectionMachine,
    link: Arc<dyn TelemetryLink>,
    store: SnapshotStore,
    status: watch::Sender<ConnectionState>,
}

/// Owned by whoever mounted the dashboard; `teardown` stops all link activity.
pub struct ConnectionHandle {
    status: ConnectionStatus,
    teardown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ConnectionHandle {
    pub fn status(&self) -> ConnectionStatus {
        self.status.clone()
    }

    /// Cancel any pending reconnect, close the link and wait for the driver to exit.
    pub async fn teardown(mut self) {
        if let Some(tx) = self.teardown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::warn!("Connection task ended abnormally: {}", e);
        }
    }
}

type OpenFuture = BoxFuture<'static, Result<Box<dyn LinkSession>, LinkError>>;

/// Live resources owned by the driver task.
#[derive(Default)]
struct LinkSlots {
    opening: Option<OpenFuture>,
    session: Option<Box<dyn LinkSession>>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

enum Wake {
    Teardown,
    Opened(Result<Box<dyn LinkSession>, LinkError>),
    Inbound(Option<Result<String, LinkError>>),
    ReconnectDue,
}

impl ConnectionManager {
    /// The manager takes the store: it is the only writer.
    pub fn new(link: Arc<dyn TelemetryLink>, store: SnapshotStore, reconnect_delay: Duration) -> Self {
        let (status, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            machine: ConnectionMachine::new(reconnect_delay),
            link,
            store,
            status,
        }
    }

    /// Start the driver task and issue the first `connect()`.
    pub fn spawn(self) -> ConnectionHandle {
        let status = ConnectionStatus {
            rx: self.status.subscribe(),
        };
        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(self.run(rx));

        ConnectionHandle {
            status,
            teardown: Some(tx),
            task,
        }
    }

    async fn run(mut self, mut teardown: oneshot::Receiver<()>) {
        let mut slots = LinkSlots::default();

        let actions = self.machine.connect();
        self.apply(actions, &mut slots).await;
        self.publish_status();

        loop {
            let wake = tokio::select! {
                biased;
                _ = &mut teardown => Wake::Teardown,
                result = wait_open(&mut slots.opening) => Wake::Opened(result),
                inbound = wait_inbound(&mut slots.session) => Wake::Inbound(inbound),
                _ = wait_reconnect(&mut slots.reconnect) => Wake::ReconnectDue,
            };

            let actions = match wake {
                Wake::Teardown => {
                    let actions = self.machine.teardown();
                    self.apply(actions, &mut slots).await;
                    tracing::info!("Telemetry connection torn down");
                    break;
                }
                Wake::Opened(Ok(session)) => {
                    slots.opening = None;
                    slots.session = Some(session);
                    self.machine.on_link_opened();
                    tracing::info!("Telemetry link connected");
                    Vec::new()
                }
                Wake::Opened(Err(e)) => {
                    slots.opening = None;
                    tracing::warn!("{}", e);
                    self.machine.on_link_closed()
                }
                Wake::Inbound(Some(Ok(payload))) => {
                    if let Some(snapshot) = self.machine.on_message(&payload) {
                        self.store.replace(snapshot);
                    }
                    Vec::new()
                }
                Wake::Inbound(Some(Err(e))) => {
                    slots.session = None;
                    tracing::warn!("{}", e);
                    self.machine.on_link_closed()
                }
                Wake::Inbound(None) => {
                    slots.session = None;
                    tracing::info!("Telemetry link closed");
                    self.machine.on_link_closed()
                }
                Wake::ReconnectDue => {
                    slots.reconnect = None;
                    self.machine.on_reconnect_due()
                }
            };

            self.apply(actions, &mut slots).await;
            self.publish_status();
        }
    }

    async fn apply(&self, actions: Vec<LinkAction>, slots: &mut LinkSlots) {
        for action in actions {
            match action {
                LinkAction::OpenLink => {
                    let link = self.link.clone();
                    slots.opening = Some(Box::pin(async move { link.open().await }));
                }
                LinkAction::ScheduleReconnect(delay) => {
                    tracing::info!("Reconnecting in {} ms", delay.as_millis());
                    slots.reconnect = Some(Box::pin(tokio::time::sleep(delay)));
                }
                LinkAction::CancelReconnect => {
                    slots.reconnect = None;
                }
                LinkAction::CloseLink => {
                    slots.opening = None;
                    if let Some(mut session) = slots.session.take() {
                        session.close().await;
                    }
                }
            }
        }
    }

    fn publish_status(&self) {
        self.status.send_if_modified(|current| {
            let next = self.machine.state();
            let changed = *current != next;
            *current = next;
            changed
        });
    }
}

async fn wait_open(opening: &mut Option<OpenFuture>) -> Result<Box<dyn LinkSession>, LinkError> {
    match opening {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

async fn wait_inbound(session: &mut Option<Box<dyn LinkSession>>) -> Option<Result<String, LinkError>> {
    match session {
        Some(session) => session.recv().await,
        None => std::future::pending().await,
    }
}

async fn wait_reconnect(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => std::future::pending().await,
    }
}
