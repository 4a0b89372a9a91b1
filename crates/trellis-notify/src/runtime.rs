use futures::StreamExt;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::alerts::{AlertLevel, AlertSink};
use crate::models::{Notification, NotificationGroup};
use crate::session::{Identity, SessionState};
use crate::store::{group_notifications, MarkReadOutcome, NotificationStore};
use crate::transport::{topic_for, NotificationApi, PushSubscription, PushTransport};

/// Commands consumers send through [`NotifyHandle`].
#[derive(Debug, Clone)]
pub enum EngineCommand {
    MarkAsRead {
        id: String,
    },
    /// Bulk mark-as-read over a group's unread ids. Applied id-by-id so a
    /// partial failure affects only the failed id.
    MarkGroupAsRead {
        ids: Vec<String>,
    },
    /// Re-run the baseline fetch for the bound identity. Recovery path for
    /// counter drift; the embedding application picks the cadence.
    Refresh,
    Shutdown,
}

/// One atomic view of the engine: group list, counter and session state from
/// the same store revision, never observable separately.
#[derive(Debug, Clone, Default)]
pub struct EngineSnapshot {
    pub groups: Vec<NotificationGroup>,
    pub unread_count: u64,
    pub session: SessionState,
}

/// The engine is gone; commands can no longer be delivered.
#[derive(Debug, thiserror::Error)]
#[error("notification engine is no longer running")]
pub struct EngineStopped;

/// Cloneable consumer-facing handle: read-only reactive snapshots plus the
/// imperative read-state operations.
#[derive(Clone)]
pub struct NotifyHandle {
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    snapshot_rx: watch::Receiver<EngineSnapshot>,
}

impl NotifyHandle {
    pub fn mark_as_read(&self, id: impl Into<String>) -> Result<(), EngineStopped> {
        self.send(EngineCommand::MarkAsRead { id: id.into() })
    }

    /// Mark every unread notification in the group as read.
    pub fn mark_group_as_read(&self, group: &NotificationGroup) -> Result<(), EngineStopped> {
        self.send(EngineCommand::MarkGroupAsRead {
            ids: group.unread_ids.clone(),
        })
    }

    pub fn refresh(&self) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Refresh)
    }

    pub fn shutdown(&self) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Shutdown)
    }

    /// Current snapshot (groups, counter, session state).
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Reactive view; `changed().await` wakes on every published snapshot.
    pub fn watch(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshot_rx.clone()
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        self.command_tx.send(command).map_err(|_| EngineStopped)
    }
}

/// The notification synchronization engine.
///
/// One cooperative task: identity changes, push payloads and consumer
/// commands all funnel through the `run` loop, so the store is mutated from
/// exactly one place, needs no locking, and every operation is atomic to
/// observers. Suspension happens only at network awaits.
pub struct NotifyEngine<A, P, S> {
    api: A,
    push: P,
    alerts: S,
    identity_rx: watch::Receiver<Option<Identity>>,
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    command_rx: mpsc::UnboundedReceiver<EngineCommand>,
    snapshot_tx: watch::Sender<EngineSnapshot>,
    store: NotificationStore,
    state: SessionState,
    /// Exclusively owned: at most one subscription exists, and rebinding
    /// closes the old one before opening the next.
    subscription: Option<PushSubscription>,
    published_revision: u64,
}

impl<A, P, S> NotifyEngine<A, P, S>
where
    A: NotificationApi,
    P: PushTransport,
    S: AlertSink,
{
    pub fn new(
        api: A,
        push: P,
        alerts: S,
        identity_rx: watch::Receiver<Option<Identity>>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(EngineSnapshot::default());
        Self {
            api,
            push,
            alerts,
            identity_rx,
            command_tx,
            command_rx,
            snapshot_tx,
            store: NotificationStore::new(),
            state: SessionState::Unbound,
            subscription: None,
            published_revision: 0,
        }
    }

    pub fn handle(&self) -> NotifyHandle {
        NotifyHandle {
            command_tx: self.command_tx.clone(),
            snapshot_rx: self.snapshot_tx.subscribe(),
        }
    }

    pub async fn run(mut self) {
        // Bind whatever identity is already current at startup
        let initial = self.identity_rx.borrow_and_update().clone();
        self.rebind(initial).await;

        loop {
            tokio::select! {
                changed = self.identity_rx.changed() => {
                    if changed.is_err() {
                        break; // identity provider is gone
                    }
                    let identity = self.identity_rx.borrow_and_update().clone();
                    self.rebind(identity).await;
                }
                payload = next_payload(self.subscription.as_mut()) => {
                    match payload {
                        Some(payload) => self.on_push(payload),
                        None => {
                            debug!("push channel ended");
                            self.subscription = None;
                        }
                    }
                }
                command = self.command_rx.recv() => {
                    match command {
                        Some(EngineCommand::MarkAsRead { id }) => self.mark_as_read(&id).await,
                        Some(EngineCommand::MarkGroupAsRead { ids }) => {
                            for id in ids {
                                self.mark_as_read(&id).await;
                            }
                        }
                        Some(EngineCommand::Refresh) => self.refresh().await,
                        Some(EngineCommand::Shutdown) | None => break,
                    }
                }
            }
        }

        self.unbind();
    }

    /// Tear down the previous session and, when an identity is present,
    /// bring up the next one: baseline count, baseline page, then the push
    /// channel. Teardown always runs first so a stale channel can never leak
    /// events into the new identity's view.
    async fn rebind(&mut self, identity: Option<Identity>) {
        self.unbind();

        let Some(identity) = identity else {
            return;
        };

        info!(user_id = %identity.user_id, "binding notification session");
        self.state = SessionState::BaselineLoading;
        self.publish();

        // Baseline completes or fails before the channel opens, so the only
        // overlap the store has to absorb is a push duplicating a
        // just-fetched event.
        if !self.load_baseline().await {
            debug!("identity changed during baseline; abandoning bind");
            return;
        }

        match self.push.subscribe(&topic_for(&identity)).await {
            Ok(subscription) => {
                if self.identity_moved_on() {
                    debug!("identity changed during subscribe; abandoning bind");
                    return;
                }
                self.subscription = Some(subscription);
            }
            Err(error) => {
                warn!(%error, "push subscribe failed; continuing with baseline only");
                self.alerts
                    .show(AlertLevel::Warning, "Live notifications are unavailable");
            }
        }

        self.state = SessionState::Live;
        self.publish();
    }

    /// Close-then-clear. Closing flips the subscription's accepting flag
    /// synchronously, before any transport teardown completes.
    fn unbind(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            debug!("closing push subscription");
            subscription.close();
        }
        self.state = SessionState::Unbound;
        self.store.clear();
        self.publish();
    }

    /// Fetch the authoritative count and the first page. Returns false when
    /// the identity signal moved on mid-flight, in which case nothing further
    /// may be applied for this bind.
    ///
    /// A failed fetch leaves the store as it was and surfaces a non-fatal
    /// alert; the session still comes up on whatever baseline succeeded.
    async fn load_baseline(&mut self) -> bool {
        match self.api.fetch_unread_count().await {
            Ok(count) => {
                if self.identity_moved_on() {
                    return false;
                }
                self.store.set_counter(count);
                self.publish();
            }
            Err(error) => {
                if self.identity_moved_on() {
                    return false;
                }
                warn!(%error, "baseline unread count fetch failed");
                self.alerts
                    .show(AlertLevel::Warning, "Could not refresh notification count");
            }
        }

        match self.api.fetch_notifications().await {
            Ok(items) => {
                if self.identity_moved_on() {
                    return false;
                }
                self.store.replace_all(items);
                self.publish();
            }
            Err(error) => {
                if self.identity_moved_on() {
                    return false;
                }
                warn!(%error, "baseline notifications fetch failed");
                self.alerts
                    .show(AlertLevel::Warning, "Could not load notifications");
            }
        }

        true
    }

    /// Stale-response guard: true once the identity signal has a value this
    /// session was not bound to. Checked after every await in the bind path.
    fn identity_moved_on(&self) -> bool {
        self.identity_rx.has_changed().unwrap_or(true)
    }

    /// Push-delivery boundary: parse, guard the session state, append, and
    /// fire the one transient alert a genuinely new arrival gets. Baseline
    /// loads never pass through here, so they can never spam alerts.
    fn on_push(&mut self, payload: Value) {
        if self.state != SessionState::Live {
            debug!("discarding push payload outside live session");
            return;
        }

        let notification = match Notification::from_payload(payload) {
            Ok(notification) => notification,
            Err(error) => {
                warn!(%error, "dropping malformed push payload");
                return;
            }
        };

        debug!(id = %notification.id, "push notification received");
        let content = notification.content.clone();
        if self.store.append(notification) {
            self.publish();
            self.alerts.show(AlertLevel::Info, &content);
        }
    }

    /// Optimistic local mark plus remote acknowledgement. A failed
    /// acknowledgement is surfaced but never rolled back; the next baseline
    /// fetch reconciles the drift.
    async fn mark_as_read(&mut self, id: &str) {
        if self.store.mark_read(id) != MarkReadOutcome::MarkedRead {
            return;
        }
        self.publish();

        if let Err(error) = self.api.acknowledge_read(id).await {
            warn!(id, %error, "failed to acknowledge notification as read");
            self.alerts
                .show(AlertLevel::Warning, "Could not sync read state");
        }
    }

    /// On-demand baseline re-fetch for the bound identity.
    async fn refresh(&mut self) {
        if self.state == SessionState::Unbound {
            return;
        }
        self.load_baseline().await;
    }

    /// Recompute the projection and publish one atomic snapshot. The group
    /// list is memoized on the store revision: an unchanged store with an
    /// unchanged session state publishes nothing.
    fn publish(&mut self) {
        let revision = self.store.revision();
        if revision == self.published_revision && self.snapshot_tx.borrow().session == self.state {
            return;
        }
        self.published_revision = revision;
        let snapshot = EngineSnapshot {
            groups: group_notifications(self.store.notifications()),
            unread_count: self.store.unread_count(),
            session: self.state,
        };
        let _ = self.snapshot_tx.send(snapshot);
    }
}

/// Pends while no subscription is open; the select loop re-evaluates on
/// every iteration, so a fresh subscription is picked up immediately.
async fn next_payload(subscription: Option<&mut PushSubscription>) -> Option<Value> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => futures::future::pending().await,
    }
}
